//! Turns resolved options into open endpoints.

mod base;
mod file;
mod tcp;

use std::io;
use std::net::TcpListener;

pub use base::{Sink, Source};
pub use file::open_file;
pub use tcp::{bind_listener, connect};

use crate::error::RelayError;
use crate::option::RelayOption;

/// Input for one-shot mode: the named file, or stdin.
pub fn create_source(opts: &RelayOption) -> Result<Source, RelayError> {
    match &opts.file {
        Some(path) => Ok(Source::File(open_file(path)?)),
        None => Ok(Source::Stdin(io::stdin())),
    }
}

/// Listening socket for server mode, if an inbound address is configured.
pub fn create_listener(opts: &RelayOption) -> Result<Option<TcpListener>, RelayError> {
    opts.inbound().map(bind_listener).transpose()
}

pub fn create_sink(opts: &RelayOption) -> Result<Sink, RelayError> {
    match opts.outbound() {
        Some(addr) => Ok(Sink::Tcp(connect(addr)?)),
        None => Ok(Sink::Stdout(io::stdout())),
    }
}
