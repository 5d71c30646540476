//! Decimal parsing for ports and sizes with `strtol`-style diagnostics.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("not a decimal number")]
    NotANumber,
    #[error("{0}: extra characters at end of input")]
    TrailingCharacters(String),
    #[error("out of range")]
    OutOfRange,
    #[error("greater than {}", u16::MAX)]
    TooLarge,
    #[error("less than 0")]
    Negative,
}

/// Splits `input` into sign, digits and the remainder, skipping leading whitespace.
fn split_number(input: &str) -> Result<(bool, &str), ConversionError> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(rest.len());
    if end == 0 {
        return Err(ConversionError::NotANumber);
    }
    if end != rest.len() {
        return Err(ConversionError::TrailingCharacters(input.to_owned()));
    }
    Ok((negative, rest))
}

pub fn parse_port(input: &str) -> Result<u16, ConversionError> {
    let (negative, digits) = split_number(input)?;
    let value: i64 = digits.parse().map_err(|_| ConversionError::OutOfRange)?;
    if negative {
        return if value == 0 { Ok(0) } else { Err(ConversionError::Negative) };
    }
    u16::try_from(value).map_err(|_| ConversionError::TooLarge)
}

pub fn parse_size(input: &str) -> Result<usize, ConversionError> {
    let (negative, digits) = split_number(input)?;
    let value: u64 = digits.parse().map_err(|_| ConversionError::OutOfRange)?;
    if negative && value != 0 {
        return Err(ConversionError::OutOfRange);
    }
    usize::try_from(value).map_err(|_| ConversionError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports() {
        assert_eq!(parse_port("5000"), Ok(5000));
        assert_eq!(parse_port("  +80"), Ok(80));
        assert_eq!(parse_port("65535"), Ok(65535));
        assert_eq!(parse_port("65536"), Err(ConversionError::TooLarge));
        assert_eq!(parse_port("-1"), Err(ConversionError::Negative));
        assert_eq!(parse_port("99999999999999999999"), Err(ConversionError::OutOfRange));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_port("abc"), Err(ConversionError::NotANumber));
        assert_eq!(parse_port(""), Err(ConversionError::NotANumber));
        assert_eq!(parse_size("-"), Err(ConversionError::NotANumber));
        let err = parse_size("12kb").unwrap_err();
        assert_eq!(err.to_string(), "12kb: extra characters at end of input");
        assert_eq!(ConversionError::NotANumber.to_string(), "not a decimal number");
        assert_eq!(ConversionError::TooLarge.to_string(), "greater than 65535");
    }

    #[test]
    fn sizes() {
        assert_eq!(parse_size("1024"), Ok(1024));
        assert_eq!(parse_size("0"), Ok(0));
        assert_eq!(parse_size("-5"), Err(ConversionError::OutOfRange));
        assert_eq!(parse_size("18446744073709551616"), Err(ConversionError::OutOfRange));
    }
}
