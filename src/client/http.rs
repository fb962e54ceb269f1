//! reqwest-backed [`ToolApi`].

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{DeleteToolResponse, OpenApiSpec, OpenApiSpecRequest, PythonFunctionRequest, ToolApi};
use crate::tools::{Tool, ToolList};
use crate::types::{ClientConfig, Error, Result};

/// HTTP client for the tool backend.
#[derive(Debug, Clone)]
pub struct HttpToolClient {
    http: Client,
    base: Url,
}

impl HttpToolClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| Error::config(format!("invalid api_url '{}': {}", config.api_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::config(format!(
                "api_url '{}' cannot be used as a base URL",
                config.api_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base,
        })
    }

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so a tool name containing `/` or `?` stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("api_url '{}' cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl ToolApi for HttpToolClient {
    async fn list_tools(&self) -> Result<Vec<Tool>> {
        let url = self.endpoint(&["tools", ""])?;
        tracing::debug!(%url, "listing tools");

        let response = self.http.get(url).send().await?;
        let list: ToolList = decode(response).await?;

        tracing::debug!(count = list.tools.len(), "tools fetched");
        Ok(list.tools)
    }

    async fn add_python_tool(&self, code: &str, name: &str) -> Result<Option<Tool>> {
        let url = self.endpoint(&["tools", "python-function"])?;
        tracing::info!(%url, function_name = name, "registering python tool");

        let body = PythonFunctionRequest {
            function_code: code,
            function_name: name,
        };
        let response = self.http.post(url).json(&body).send().await?;
        decode_echo(response).await
    }

    async fn add_openapi_tool(
        &self,
        spec: OpenApiSpec,
        operation_id: Option<String>,
    ) -> Result<Option<Tool>> {
        // Parse before touching the network
        let body = OpenApiSpecRequest::new(spec, operation_id)?;

        let url = self.endpoint(&["tools", "openapi-spec"])?;
        tracing::info!(%url, operation_id = ?body.operation_id, "registering openapi tool");

        let response = self.http.post(url).json(&body).send().await?;
        decode_echo(response).await
    }

    async fn delete_tool(&self, name: &str) -> Result<DeleteToolResponse> {
        let url = self.endpoint(&["tools", name])?;
        tracing::info!(%url, tool = name, "deleting tool");

        let response = self.http.delete(url).send().await?;
        decode(response).await
    }
}

/// Decode a JSON body, turning non-success statuses into [`Error::Status`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = success_body(response).await?;
    serde_json::from_str(&body).map_err(|e| Error::decode(e.to_string()))
}

/// Read the echo of an add call. Any success status is a registration; the
/// body is kept only if it parses as a tool.
async fn decode_echo(response: Response) -> Result<Option<Tool>> {
    let body = success_body(response).await?;
    let tool = serde_json::from_str::<Tool>(&body).ok();
    if tool.is_none() {
        tracing::debug!(echo = %body, "add response is not a tool description");
    }
    Ok(tool)
}

/// Read the body of a successful response.
async fn success_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_detail(&body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "unknown error".to_string());
        tracing::warn!(status = status.as_u16(), %message, "backend returned an error");
        return Err(Error::status(status.as_u16(), message));
    }
    Ok(body)
}

/// Pull a human-readable message out of a FastAPI-style error body.
///
/// `detail` is either a string or a list of `{loc, msg, type}` objects.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
