//! Tool catalog, the client-side copy of what the backend has registered.
//!
//! Tools are created and destroyed only by the backend. The catalog is a
//! read-only cache that is replaced wholesale after every successful fetch.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// Parameter schema
// =============================================================================

/// JSON-schema fragment describing one tool parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamSchema {
    #[serde(rename = "type", default)]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamSchema {
    /// Description text, treating an empty string as absent.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Enum values rendered as plain strings.
    pub fn enum_labels(&self) -> Vec<String> {
        self.enum_values
            .iter()
            .flatten()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

// =============================================================================
// Parameters object
// =============================================================================

/// The `parameters` object of a tool.
///
/// `properties` keeps the order the backend sent, which for Python tools is
/// the function signature order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameters {
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,
    #[serde(
        default,
        deserialize_with = "ordered_properties",
        serialize_with = "serialize_properties"
    )]
    pub properties: Vec<(String, ParamSchema)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            schema_type: object_type(),
            properties: Vec::new(),
            required: None,
        }
    }
}

impl ToolParameters {
    pub fn is_required(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|names| names.iter().any(|n| n == name))
    }

    pub fn get(&self, name: &str) -> Option<&ParamSchema> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, schema)| schema)
    }
}

fn object_type() -> String {
    "object".to_string()
}

fn ordered_properties<'de, D>(deserializer: D) -> Result<Vec<(String, ParamSchema)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PropertiesVisitor;

    impl<'de> Visitor<'de> for PropertiesVisitor {
        type Value = Vec<(String, ParamSchema)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of parameter name to schema")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, schema)) = map.next_entry::<String, ParamSchema>()? {
                out.push((name, schema));
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(PropertiesVisitor)
}

fn serialize_properties<S>(props: &[(String, ParamSchema)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;
    let mut map = serializer.serialize_map(Some(props.len()))?;
    for (name, schema) in props {
        map.serialize_entry(name, schema)?;
    }
    map.end()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Tool
// =============================================================================

/// A tool as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: ToolParameters,
}

impl Tool {
    /// One-line signature summary.
    ///
    /// Format: `- name(param1: type, param2?: type): description`
    pub fn to_summary_line(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .properties
            .iter()
            .map(|(name, schema)| {
                let optional = if self.parameters.is_required(name) { "" } else { "?" };
                format!("{}{}: {}", name, optional, schema.param_type)
            })
            .collect();

        format!("- {}({}): {}", self.name, params.join(", "), self.description)
    }
}

/// Response body of `GET /tools/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tools: Vec<Tool>,
}

// =============================================================================
// Tool catalog
// =============================================================================

/// Cached tool list in backend order. Owns metadata only.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    tools: Vec<Tool>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Replace the whole cache with a freshly fetched list.
    pub fn replace(&mut self, tools: Vec<Tool>) {
        self.tools = tools;
    }

    /// All cached tools in backend order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Check if a tool exists.
    pub fn has_tool(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// List all tool names in backend order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Number of cached tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
