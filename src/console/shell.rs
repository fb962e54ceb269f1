//! Console state shell.
//!
//! Owns the cached tool list, the active tab and the status banner, and is
//! the only thing that talks to the backend. The list changes only through a
//! successful fetch; mutations never patch it locally.

use crate::client::{DeleteToolResponse, OpenApiSpec, ToolApi};
use crate::console::status::{StatusBanner, StatusMessage};
use crate::tools::{Tool, ToolCatalog};
use crate::types::{ConsoleConfig, Result};
use tokio::time::Instant;

pub const PYTHON_TOOL_ADDED: &str = "Python tool added successfully";
pub const OPENAPI_TOOL_ADDED: &str = "OpenAPI tool added successfully";

/// Which view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    List,
    AddPython,
    AddOpenApi,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::List, Tab::AddPython, Tab::AddOpenApi];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::List => "Available Tools",
            Tab::AddPython => "Add Python Tool",
            Tab::AddOpenApi => "Add OpenAPI Tool",
        }
    }

    /// Parse the console name of a tab.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "list" | "tools" => Some(Tab::List),
            "python" | "py" => Some(Tab::AddPython),
            "openapi" | "api" => Some(Tab::AddOpenApi),
            _ => None,
        }
    }
}

/// State shell over a [`ToolApi`].
#[derive(Debug)]
pub struct ToolShell<A> {
    api: A,
    catalog: ToolCatalog,
    tab: Tab,
    status: StatusBanner,
}

impl<A: ToolApi> ToolShell<A> {
    pub fn new(api: A, config: &ConsoleConfig) -> Self {
        Self {
            api,
            catalog: ToolCatalog::new(),
            tab: Tab::List,
            status: StatusBanner::new(config.status_ttl),
        }
    }

    /// Backend handle, for callers that await a request themselves and hand
    /// the result back through one of the `apply_*` methods.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Initial load.
    pub async fn mount(&mut self) -> Result<()> {
        tracing::debug!("mounting tool shell");
        self.refresh().await
    }

    /// Refetch the whole list. On failure the previous list stays.
    pub async fn refresh(&mut self) -> Result<()> {
        let result = self.api.list_tools().await;
        self.apply_fetch(result)
    }

    /// Delete a tool and refetch. A failed refetch replaces the success
    /// message with the fetch error.
    pub async fn delete_tool(&mut self, name: &str) -> Result<DeleteToolResponse> {
        let result = self.api.delete_tool(name).await;
        let result = self.apply_delete(result);
        if result.is_ok() {
            let _ = self.refresh().await;
        }
        result
    }

    /// Register a tool from Python source.
    pub async fn add_python_tool(&mut self, code: &str, name: &str) -> Result<Option<Tool>> {
        let result = self.api.add_python_tool(code, name).await;
        self.after_add(result, PYTHON_TOOL_ADDED).await
    }

    /// Register a tool from an OpenAPI document.
    pub async fn add_openapi_tool(
        &mut self,
        spec: OpenApiSpec,
        operation_id: Option<String>,
    ) -> Result<Option<Tool>> {
        let result = self.api.add_openapi_tool(spec, operation_id).await;
        self.after_add(result, OPENAPI_TOOL_ADDED).await
    }

    async fn after_add(
        &mut self,
        result: Result<Option<Tool>>,
        success: &str,
    ) -> Result<Option<Tool>> {
        let result = self.apply_add(result, success);
        if result.is_ok() {
            let _ = self.refresh().await;
        }
        result
    }

    /// Take the outcome of a list call.
    pub fn apply_fetch(&mut self, result: Result<Vec<Tool>>) -> Result<()> {
        match result {
            Ok(tools) => {
                tracing::debug!(count = tools.len(), "tool list replaced");
                self.catalog.replace(tools);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch tools");
                self.status
                    .show(StatusMessage::error(format!("Error fetching tools: {}", e)));
                Err(e)
            }
        }
    }

    /// Take the outcome of a delete call. The caller refetches on success.
    pub fn apply_delete(
        &mut self,
        result: Result<DeleteToolResponse>,
    ) -> Result<DeleteToolResponse> {
        match result {
            Ok(resp) => {
                self.status.show(StatusMessage::success(format!(
                    "{} deleted successfully",
                    resp.deleted_tool
                )));
                Ok(resp)
            }
            Err(e) => {
                self.status
                    .show(StatusMessage::error(format!("Error deleting tool: {}", e)));
                Err(e)
            }
        }
    }

    /// Take the outcome of an add call. On success the list tab becomes
    /// active; the caller refetches.
    pub fn apply_add(
        &mut self,
        result: Result<Option<Tool>>,
        success: &str,
    ) -> Result<Option<Tool>> {
        match result {
            Ok(tool) => {
                tracing::info!(tool = ?tool.as_ref().map(|t| t.name.as_str()), "tool registered");
                self.tab = Tab::List;
                self.status.show(StatusMessage::success(success));
                Ok(tool)
            }
            Err(e) => {
                self.status
                    .show(StatusMessage::error(format!("Error adding tool: {}", e)));
                Err(e)
            }
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn tools(&self) -> &[Tool] {
        self.catalog.tools()
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Show a message that did not come from a backend call.
    pub fn notify(&mut self, message: StatusMessage) {
        self.status.show(message);
    }

    /// Live status message, if any.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    pub fn status_deadline(&self) -> Option<Instant> {
        self.status.deadline()
    }

    /// Clear the banner once its deadline passed.
    pub fn expire_status(&mut self) -> bool {
        self.status.expire()
    }
}
