//! Core types for tooldesk.
//!
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Client, console, and observability configuration

mod config;
mod errors;

pub use config::{
    ClientConfig, Config, ConsoleConfig, ObservabilityConfig, DEFAULT_API_URL, ENV_API_URL,
    ENV_STATUS_TTL_MS,
};
pub use errors::{Error, Result};
