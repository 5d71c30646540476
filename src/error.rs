use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Failure inside a single transfer session.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
    #[error("write failed: sink accepted 0 of {0} bytes")]
    WriteZero(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    Config(String),
    #[error("cannot read config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("cannot connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("cannot install signal handling: {0}")]
    Signal(#[source] io::Error),
}

impl RelayError {
    /// Process exit status for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            RelayError::Config(_) | RelayError::ConfigFile { .. } => 2,
            RelayError::Open { .. }
            | RelayError::Bind { .. }
            | RelayError::Connect { .. }
            | RelayError::Accept(_) => 3,
            RelayError::Transfer(_) => 4,
            RelayError::Signal(_) => 5,
        }
    }
}

/// Interrupted system calls are retried, everything else is surfaced.
pub fn is_retryable(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Interrupted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_interrupted_is_retryable() {
        assert!(is_retryable(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(!is_retryable(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(!is_retryable(&io::Error::from(io::ErrorKind::BrokenPipe)));
    }

    #[test]
    fn exit_codes_are_distinct_per_class() {
        let config = RelayError::Config("bad".into());
        let transfer = RelayError::Transfer(TransferError::WriteZero(3));
        let signal = RelayError::Signal(io::Error::from(io::ErrorKind::Other));
        assert_eq!(config.exit_code(), 2);
        assert_eq!(transfer.exit_code(), 4);
        assert_eq!(signal.exit_code(), 5);
        assert_eq!(transfer.to_string(), "write failed: sink accepted 0 of 3 bytes");
    }
}
