//! # Tooldesk - tool management console
//!
//! Client and terminal console for the tools an agent backend exposes:
//! - Typed client for the four `/tools` REST endpoints
//! - Cached tool list, replaced wholesale on every fetch
//! - Add-tool forms for Python source and OpenAPI documents
//! - Transient status banner with a fixed lifetime
//!
//! ## Architecture
//!
//! ```text
//!   stdin commands ─→ ┌──────────── Console ────────────┐
//!                     │  PythonToolForm  OpenApiToolForm │
//!                     │            │          │          │
//!                     │            ▼          ▼          │
//!                     │   ToolShell (catalog, tab, banner)
//!                     └────────────────┬─────────────────┘
//!                                      ▼
//!                          ToolApi ─ HttpToolClient ─→ backend
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod client;
pub mod console;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;
pub mod validation;

pub use types::{Config, Error, Result};
