use std::io::{Read, Write};

use log::trace;

use crate::error::{is_retryable, TransferError};

pub const DEFAULT_BUF_SIZE: usize = 1024;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransferStats {
    pub bytes: u64,
    /// read/write rounds that carried data
    pub rounds: u64,
}

/// Moves every byte `source` produces into `sink` until end of stream.
///
/// Each round reads up to `buffer_size` bytes and writes all of them before
/// the next read, so partial writes by the sink are continued until the chunk
/// is flushed. Interrupted reads and writes are re-issued. Any other failure
/// stops the transfer; bytes already written are left in place.
///
/// # Panics
///
/// Panics if `buffer_size` is 0.
pub fn copy<R, W>(source: &mut R, sink: &mut W, buffer_size: usize) -> Result<TransferStats, TransferError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    assert!(buffer_size > 0, "buffer size must be positive");
    let mut buf = vec![0u8; buffer_size];
    let mut stats = TransferStats::default();

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if is_retryable(&e) => {
                trace!("read interrupted, retrying");
                continue;
            }
            Err(e) => return Err(TransferError::Read(e)),
        };
        write_chunk(sink, &buf[..n])?;
        stats.bytes += n as u64;
        stats.rounds += 1;
        trace!("round {}: {} bytes", stats.rounds, n);
    }

    Ok(stats)
}

fn write_chunk<W: Write + ?Sized>(sink: &mut W, mut chunk: &[u8]) -> Result<(), TransferError> {
    while !chunk.is_empty() {
        match sink.write(chunk) {
            Ok(0) => return Err(TransferError::WriteZero(chunk.len())),
            Ok(n) => chunk = &chunk[n..],
            Err(e) if is_retryable(&e) => trace!("write interrupted, retrying"),
            Err(e) => return Err(TransferError::Write(e)),
        }
    }
    Ok(())
}
