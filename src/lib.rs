//! Byte-stream relay: a file, stdin or inbound TCP clients copied into stdout
//! or one outbound TCP connection.

pub mod copy;
pub mod error;
pub mod option;
pub mod pipe;
pub mod server;
pub mod transport;
pub mod utils;

pub use copy::TransferStats;
pub use error::{RelayError, TransferError};
pub use option::{Args, Mode, RelayOption};
pub use server::{RelayServer, ServerReport};
pub use utils::signal::Cancellation;
