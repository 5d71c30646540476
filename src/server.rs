use std::fmt;
use std::io::{self, Write};
use std::net::{SocketAddr, TcpListener};

use log::{debug, info, warn};

use crate::copy::copy;
use crate::error::{is_retryable, RelayError};
use crate::option::RelayOption;
use crate::transport;
use crate::utils::signal::{self, Cancellation};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServerReport {
    /// sessions accepted and run to an end, failed ones included
    pub sessions: u64,
    pub failed: u64,
    pub bytes: u64,
}

/// Accepts one client at a time and relays everything it sends into a shared sink.
///
/// The next client is not accepted until the previous connection has been
/// drained and closed. Cancellation is only observed between sessions.
pub struct RelayServer {
    listener: TcpListener,
    buffer_size: usize,
    cancel: Cancellation,
}

impl RelayServer {
    /// # Panics
    ///
    /// Panics if `buffer_size` is 0.
    pub fn new(listener: TcpListener, buffer_size: usize, cancel: Cancellation) -> Self {
        assert!(buffer_size > 0, "buffer size must be positive");
        RelayServer { listener, buffer_size, cancel }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Binds, connects the sink, hooks up SIGINT/SIGTERM and serves until cancelled.
    /// Session lines go to stdout.
    pub fn bootstrap(opts: &RelayOption) -> Result<ServerReport, RelayError> {
        let listener = transport::create_listener(opts)?
            .ok_or_else(|| RelayError::Config("server mode needs an input address".into()))?;
        let mut sink = transport::create_sink(opts)?;

        let cancel = Cancellation::new();
        signal::install(cancel.clone()).map_err(RelayError::Signal)?;

        let server = RelayServer::new(listener, opts.buffer_size, cancel);
        if let Ok(addr) = server.local_addr() {
            info!("relay listening on tcp://{}, forwarding to {}", addr, sink.describe());
        }
        server.run(&mut sink, &mut io::stdout())
    }

    pub fn run<W, A>(&self, sink: &mut W, announcer: &mut A) -> Result<ServerReport, RelayError>
    where
        W: Write + ?Sized,
        A: Write + ?Sized,
    {
        // registered before the first check so a racing cancel either sees the
        // address or leaves the flag for us to see
        if let Ok(addr) = self.local_addr() {
            self.cancel.wake_on(addr);
        }
        let mut report = ServerReport::default();

        while !self.cancel.is_cancelled() {
            let (mut conn, peer) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(e) if is_retryable(&e) => {
                    debug!("accept interrupted, stopping");
                    break;
                }
                Err(e) if is_transient_accept_error(&e) => {
                    warn!("accept failed: {}", e);
                    continue;
                }
                Err(e) => return Err(RelayError::Accept(e)),
            };
            if self.cancel.is_cancelled() {
                debug!("dropping {} accepted during shutdown", peer);
                break;
            }

            announce(announcer, format_args!("Accepted from {}:{}", peer.ip(), peer.port()));
            let result = copy(&mut conn, sink, self.buffer_size);
            announce(announcer, format_args!("Closing {}:{}", peer.ip(), peer.port()));
            drop(conn);

            report.sessions += 1;
            match result {
                Ok(stats) => {
                    report.bytes += stats.bytes;
                    info!("session {} done: {} bytes in {} rounds", peer, stats.bytes, stats.rounds);
                }
                Err(e) => {
                    report.failed += 1;
                    warn!("session {} failed: {}", peer, e);
                }
            }
            if let Err(e) = sink.flush() {
                warn!("flushing sink after session {} failed: {}", peer, e);
            }
        }

        info!(
            "relay stopped after {} sessions ({} failed, {} bytes)",
            report.sessions, report.failed, report.bytes
        );
        Ok(report)
    }
}

/// Failures tied to a single pending connection rather than the listener.
fn is_transient_accept_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::TimedOut
    )
}

fn announce<A: Write + ?Sized>(announcer: &mut A, line: fmt::Arguments) {
    if let Err(e) = writeln!(announcer, "{}", line).and_then(|_| announcer.flush()) {
        warn!("cannot write session line: {}", e);
    }
}
