//! Add-tool forms.
//!
//! Both forms run the same `Idle -> Submitting -> Idle` machine and refuse a
//! second submit while one is in flight.

use serde_json::Value;

use crate::client::{OpenApiSpec, ToolApi};
use crate::console::shell::ToolShell;
use crate::tools::Tool;
use crate::types::{Error, Result};
use crate::validation::validate_non_empty;

/// Example function the Python form starts with.
pub const EXAMPLE_PYTHON_NAME: &str = "getWeather";

pub const EXAMPLE_PYTHON_CODE: &str = r#"def get_weather(location, unit="celsius"):
    """Get the current weather in a given location.

    Args:
        location (str): The city and state, e.g., "San Francisco, CA"
        unit (str): The unit of temperature, either "celsius" or "fahrenheit".
            Defaults to "celsius".

    Returns:
        dict: A dictionary containing the weather information.
    """
    weather_data = {
        "location": location,
        "temperature": 22,
        "unit": unit,
        "condition": "Sunny"
    }
    return weather_data"#;

/// Example document the OpenAPI form starts with.
pub const EXAMPLE_OPENAPI_SPEC: &str = r#"{
  "openapi": "3.0.0",
  "info": {
    "title": "Example API",
    "version": "1.0.0"
  },
  "paths": {
    "/example": {
      "get": {
        "operationId": "getExample",
        "summary": "Get example data",
        "responses": {
          "200": {
            "description": "Success"
          }
        }
      }
    }
  }
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
}

fn already_submitting() -> Error {
    Error::validation("a submission is already in progress")
}

// =============================================================================
// Python form
// =============================================================================

/// Function name + source text.
#[derive(Debug, Clone)]
pub struct PythonToolForm {
    pub function_name: String,
    pub function_code: String,
    phase: FormPhase,
    error: Option<String>,
}

/// Owned copy of what a Python submit sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonSubmission {
    pub function_name: String,
    pub function_code: String,
}

impl Default for PythonToolForm {
    fn default() -> Self {
        Self::new(EXAMPLE_PYTHON_NAME, EXAMPLE_PYTHON_CODE)
    }
}

impl PythonToolForm {
    pub fn new(function_name: impl Into<String>, function_code: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            function_code: function_code.into(),
            phase: FormPhase::Idle,
            error: None,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Last local error, cleared on the next submit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit gate: idle, and both fields filled in.
    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::Idle
            && !self.function_name.trim().is_empty()
            && !self.function_code.trim().is_empty()
    }

    /// Move to `Submitting` and hand out the payload.
    pub fn begin_submit(&mut self) -> Result<PythonSubmission> {
        if self.phase == FormPhase::Submitting {
            return Err(already_submitting());
        }
        self.error = None;

        let checked = validate_non_empty(&self.function_name, "function name")
            .and_then(|_| validate_non_empty(&self.function_code, "function code"));
        if let Err(e) = checked {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.phase = FormPhase::Submitting;
        Ok(PythonSubmission {
            function_name: self.function_name.trim().to_string(),
            function_code: self.function_code.clone(),
        })
    }

    /// Back to `Idle`, keeping any error for display.
    pub fn finish_submit<T>(&mut self, result: &Result<T>) {
        self.phase = FormPhase::Idle;
        self.error = result.as_ref().err().map(|e| e.to_string());
    }

    /// Validate, send through the shell, and return to idle.
    pub async fn submit<A: ToolApi>(&mut self, shell: &mut ToolShell<A>) -> Result<Option<Tool>> {
        let submission = self.begin_submit()?;
        let result = shell
            .add_python_tool(&submission.function_code, &submission.function_name)
            .await;
        self.finish_submit(&result);
        result
    }
}

// =============================================================================
// OpenAPI form
// =============================================================================

/// Spec text + optional operation id.
#[derive(Debug, Clone)]
pub struct OpenApiToolForm {
    pub spec_text: String,
    pub operation_id: String,
    phase: FormPhase,
    error: Option<String>,
}

/// Parsed payload of an OpenAPI submit.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiSubmission {
    pub spec: Value,
    pub operation_id: Option<String>,
}

impl Default for OpenApiToolForm {
    fn default() -> Self {
        Self::new(EXAMPLE_OPENAPI_SPEC, "")
    }
}

impl OpenApiToolForm {
    pub fn new(spec_text: impl Into<String>, operation_id: impl Into<String>) -> Self {
        Self {
            spec_text: spec_text.into(),
            operation_id: operation_id.into(),
            phase: FormPhase::Idle,
            error: None,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::Idle
    }

    /// Parse the spec text. On a parse error the form stays idle and the
    /// error is kept locally; nothing reaches the backend.
    pub fn begin_submit(&mut self) -> Result<OpenApiSubmission> {
        if self.phase == FormPhase::Submitting {
            return Err(already_submitting());
        }
        self.error = None;

        let spec = match OpenApiSpec::Text(self.spec_text.clone()).into_document() {
            Ok(spec) => spec,
            Err(e) => {
                tracing::debug!(error = %e, "openapi spec rejected before submit");
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        let operation_id = Some(self.operation_id.trim())
            .filter(|op| !op.is_empty())
            .map(str::to_string);

        self.phase = FormPhase::Submitting;
        Ok(OpenApiSubmission { spec, operation_id })
    }

    pub fn finish_submit<T>(&mut self, result: &Result<T>) {
        self.phase = FormPhase::Idle;
        self.error = result.as_ref().err().map(|e| e.to_string());
    }

    pub async fn submit<A: ToolApi>(&mut self, shell: &mut ToolShell<A>) -> Result<Option<Tool>> {
        let submission = self.begin_submit()?;
        let result = shell
            .add_openapi_tool(
                OpenApiSpec::Document(submission.spec),
                submission.operation_id,
            )
            .await;
        self.finish_submit(&result);
        result
    }
}
