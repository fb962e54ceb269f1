//! Terminal front end: state shell, forms, text views, and the command loop.

pub mod forms;
pub mod render;
pub mod repl;
pub mod shell;
pub mod status;

pub use forms::{FormPhase, OpenApiToolForm, PythonToolForm};
pub use repl::{Command, Console};
pub use shell::{Tab, ToolShell};
pub use status::{StatusKind, StatusMessage};
