//! Logging utilities.
//!
//! Centralizes logger initialization. Everything else in the crate logs
//! through the standard `log` facade, so embedders can swap the backend.

mod init;

pub use init::{LoggingConfig, init_logging};
