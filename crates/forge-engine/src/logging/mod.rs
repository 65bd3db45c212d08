//! Logger setup.
//!
//! Library code only uses the `log` facade; binaries call [`init_logging`]
//! once at the top of `main`.

mod init;

pub use init::{LoggingConfig, init_logging};
