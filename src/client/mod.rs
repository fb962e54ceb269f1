//! Backend client: the four REST calls the console makes.
//!
//! [`ToolApi`] is the seam between the console state and the network; the
//! console is generic over it and [`HttpToolClient`] is the production
//! implementation.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::Tool;
use crate::types::{Error, Result};

pub use http::HttpToolClient;

/// An OpenAPI document as the user supplied it.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenApiSpec {
    /// Raw text; parsed as JSON before anything is sent.
    Text(String),
    /// Already-parsed document, sent as-is.
    Document(Value),
}

impl OpenApiSpec {
    /// Parse the spec into a JSON document.
    pub fn into_document(self) -> Result<Value> {
        match self {
            OpenApiSpec::Text(text) => {
                serde_json::from_str(&text).map_err(|e| Error::invalid_spec(e.to_string()))
            }
            OpenApiSpec::Document(doc) => Ok(doc),
        }
    }
}

/// Body of `POST /tools/python-function`.
#[derive(Debug, Clone, Serialize)]
pub struct PythonFunctionRequest<'a> {
    pub function_code: &'a str,
    pub function_name: &'a str,
}

/// Body of `POST /tools/openapi-spec`.
#[derive(Debug, Clone, Serialize)]
pub struct OpenApiSpecRequest {
    pub spec: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

impl OpenApiSpecRequest {
    /// Build the request body. A blank operation id is left out entirely.
    pub fn new(spec: OpenApiSpec, operation_id: Option<String>) -> Result<Self> {
        let spec = spec.into_document()?;
        let operation_id = operation_id
            .map(|op| op.trim().to_string())
            .filter(|op| !op.is_empty());
        Ok(Self { spec, operation_id })
    }
}

/// Response of `DELETE /tools/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteToolResponse {
    pub deleted_tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Operations against the tool backend.
///
/// Every failure is returned to the caller as-is. Nothing here retries.
///
/// The add endpoints answer with an echo whose shape the backend decides.
/// Any success status counts as registered; the echo comes back as a
/// [`Tool`] only when it describes one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolApi: Send + Sync {
    /// `GET /tools/`
    async fn list_tools(&self) -> Result<Vec<Tool>>;

    /// `POST /tools/python-function`
    async fn add_python_tool(&self, code: &str, name: &str) -> Result<Option<Tool>>;

    /// `POST /tools/openapi-spec`
    async fn add_openapi_tool(
        &self,
        spec: OpenApiSpec,
        operation_id: Option<String>,
    ) -> Result<Option<Tool>>;

    /// `DELETE /tools/{name}`
    async fn delete_tool(&self, name: &str) -> Result<DeleteToolResponse>;
}
