//! Logging setup.
//!
//! The engine logs through the `log` facade only. Hosts that already install a
//! logger can skip `init_logging` entirely.

mod init;

pub use init::{init_logging, LoggingConfig};
