pub mod conversion;
pub mod logger;
pub mod signal;
