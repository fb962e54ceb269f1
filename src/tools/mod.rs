//! Tool metadata as reported by the backend.
//!
//! The backend owns tool definitions; this module only describes their shape
//! and keeps the client-side cache.

pub mod catalog;

pub use catalog::{ParamSchema, Tool, ToolCatalog, ToolList, ToolParameters};
