//! Plain-text views.
//!
//! Every function here is pure: state in, text out. The console loop writes
//! the result to the terminal after each state change.

use std::fmt::Write;

use crate::client::ToolApi;
use crate::console::forms::{FormPhase, OpenApiToolForm, PythonToolForm};
use crate::console::shell::{Tab, ToolShell};
use crate::console::status::StatusMessage;
use crate::tools::{ParamSchema, Tool};

pub const APP_TITLE: &str = "AI Assistant Tool Management";
pub const EMPTY_LIST_MESSAGE: &str = "No tools available. Add one to get started!";

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}

fn quoted_block(out: &mut String, text: &str) {
    for line in text.lines() {
        let _ = writeln!(out, "  | {}", line);
    }
}

/// One parameter row: name, type, then whatever else the schema carries.
pub fn render_param_row(name: &str, schema: &ParamSchema, required: bool) -> String {
    let mut parts = vec![name.to_string(), format!("Type: {}", schema.param_type)];
    if let Some(desc) = schema.description() {
        parts.push(desc.to_string());
    }
    let labels = schema.enum_labels();
    if !labels.is_empty() {
        parts.push(format!("one of: {}", labels.join(" | ")));
    }
    if let Some(default) = &schema.default {
        parts.push(format!("default: {}", default));
    }
    if required {
        parts.push("(required)".to_string());
    }
    format!("    {}", parts.join("  "))
}

pub fn render_tool(tool: &Tool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", tool.name);
    if !tool.description.is_empty() {
        let _ = writeln!(out, "  {}", tool.description);
    }

    let params = &tool.parameters;
    if !params.properties.is_empty() {
        let _ = writeln!(out, "  Parameters:");
        for (name, schema) in &params.properties {
            let _ = writeln!(out, "{}", render_param_row(name, schema, params.is_required(name)));
        }
    }
    out
}

/// The list view, or its empty-state message.
pub fn render_tool_list(tools: &[Tool]) -> String {
    let mut out = String::new();
    heading(&mut out, Tab::List.label());

    if tools.is_empty() {
        let _ = writeln!(out, "{}", EMPTY_LIST_MESSAGE);
        return out;
    }

    for (i, tool) in tools.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&render_tool(tool));
    }
    out
}

/// One line per tool.
pub fn render_tool_summary(tools: &[Tool]) -> String {
    if tools.is_empty() {
        return format!("{}\n", EMPTY_LIST_MESSAGE);
    }
    let mut out = String::new();
    for tool in tools {
        let _ = writeln!(out, "{}", tool.to_summary_line());
    }
    out
}

pub fn render_status(message: &StatusMessage) -> String {
    format!("[{}] {}", message.kind.as_str(), message.text)
}

pub fn render_tabs(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn render_python_form(form: &PythonToolForm) -> String {
    let mut out = String::new();
    heading(&mut out, "Add Python Function Tool");
    let _ = writeln!(out, "Function name: {}", form.function_name);
    let _ = writeln!(out, "Python code:");
    quoted_block(&mut out, &form.function_code);

    if let Some(err) = form.error() {
        let _ = writeln!(out, "Error: {}", err);
    }

    let action = match form.phase() {
        FormPhase::Submitting => "Adding tool...".to_string(),
        FormPhase::Idle if form.can_submit() => "Ready: `submit` to add the tool".to_string(),
        FormPhase::Idle => "Submit disabled: function name and code are required".to_string(),
    };
    let _ = writeln!(out, "{}", action);
    out
}

pub fn render_openapi_form(form: &OpenApiToolForm) -> String {
    let mut out = String::new();
    heading(&mut out, Tab::AddOpenApi.label());

    let op = form.operation_id.trim();
    if op.is_empty() {
        let _ = writeln!(
            out,
            "Operation ID (optional): <blank, the first operation in the spec is used>"
        );
    } else {
        let _ = writeln!(out, "Operation ID (optional): {}", op);
    }
    let _ = writeln!(out, "OpenAPI specification:");
    quoted_block(&mut out, &form.spec_text);

    if let Some(err) = form.error() {
        let _ = writeln!(out, "Error: {}", err);
    }

    let action = match form.phase() {
        FormPhase::Submitting => "Adding...",
        FormPhase::Idle => "Ready: `submit` to add the tool",
    };
    let _ = writeln!(out, "{}", action);
    out
}

/// Whole screen: title, status banner, tab bar, active view.
pub fn render_screen<A: ToolApi>(
    shell: &ToolShell<A>,
    python: &PythonToolForm,
    openapi: &OpenApiToolForm,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", APP_TITLE);
    let _ = writeln!(out, "{}", "=".repeat(APP_TITLE.len()));

    if let Some(status) = shell.status() {
        let _ = writeln!(out, "{}", render_status(status));
    }

    let _ = writeln!(out, "{}", render_tabs(shell.tab()));
    out.push('\n');

    let body = match shell.tab() {
        Tab::List => render_tool_list(shell.tools()),
        Tab::AddPython => render_python_form(python),
        Tab::AddOpenApi => render_openapi_form(openapi),
    };
    out.push_str(&body);
    out
}
