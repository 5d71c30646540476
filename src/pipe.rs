use std::io::{Read, Write};

use log::{debug, info};

use crate::copy::{copy, TransferStats};
use crate::error::{RelayError, TransferError};
use crate::option::RelayOption;
use crate::transport;

/// Runs a single transfer from `source` to `sink` and flushes the sink.
pub fn relay_once<R, W>(source: &mut R, sink: &mut W, buffer_size: usize) -> Result<TransferStats, TransferError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let stats = copy(source, sink, buffer_size)?;
    sink.flush().map_err(TransferError::Write)?;
    Ok(stats)
}

/// One-shot mode: the configured file (or stdin) into stdout or the outbound connection.
pub fn bootstrap(opts: &RelayOption) -> Result<TransferStats, RelayError> {
    let mut source = transport::create_source(opts)?;
    let mut sink = transport::create_sink(opts)?;
    match &opts.file {
        Some(path) => debug!("relaying {} to {}", path.display(), sink.describe()),
        None => debug!("relaying stdin to {}", sink.describe()),
    }

    let stats = relay_once(&mut source, &mut sink, opts.buffer_size)?;
    info!("transferred {} bytes in {} rounds", stats.bytes, stats.rounds);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    struct CountingSink {
        data: Vec<u8>,
        flushed: bool,
    }

    impl Write for CountingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushed = true;
            Ok(())
        }
    }

    #[test]
    fn flushes_after_copy() {
        let mut sink = CountingSink { data: Vec::new(), flushed: false };
        let stats = relay_once(&mut Cursor::new(b"hello world".to_vec()), &mut sink, 1024).unwrap();
        assert!(sink.flushed);
        assert_eq!(sink.data, b"hello world");
        assert_eq!(stats.bytes, 11);
    }
}
