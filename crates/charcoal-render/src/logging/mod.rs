//! Logging setup helpers.
//!
//! The library itself only emits through the `log` facade; hosts that do
//! not bring their own logger can call [`init_logging`] once at startup.

mod init;

pub use init::{LoggingConfig, init_logging};
