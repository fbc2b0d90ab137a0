//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Definition of a tool the model may request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "recognize_song")
    pub name: String,
    /// Human-readable description presented to the model
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "number")
    pub param_type: String,
    /// Closed set of accepted values, if the parameter is an enum
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub allowed_values: Vec<String>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Names of all required parameters.
    pub fn required_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }

    /// Render this definition as the JSON declaration the model API expects.
    pub fn to_api_declaration(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        for param in &self.parameters {
            let mut prop = serde_json::Map::new();
            prop.insert("type".into(), serde_json::json!(param.param_type));
            prop.insert("description".into(), serde_json::json!(param.description));
            if !param.allowed_values.is_empty() {
                prop.insert("enum".into(), serde_json::json!(param.allowed_values));
            }
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));
        }

        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": self.required_parameters().collect::<Vec<_>>(),
            }
        })
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
            allowed_values: Vec::new(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    pub fn with_allowed_values(
        mut self,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Catalog of the tools available during an exchange.
///
/// Declaration order is stable (insertion order) so the prompt sent to the
/// model is deterministic. Registering a tool under an existing name replaces
/// the earlier definition in place.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    order: Vec<String>,
    tools: HashMap<String, ToolDefinition>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            tools: HashMap::new(),
        }
    }

    /// Register a tool definition (builder pattern). Last registration wins
    /// on a name collision, keeping the original position.
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        if !self.tools.contains_key(&tool.name) {
            self.order.push(tool.name.clone());
        }
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All definitions in insertion order.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Convert all definitions to the format expected by the model API.
    pub fn to_api_tools(&self) -> Vec<serde_json::Value> {
        self.definitions()
            .map(ToolDefinition::to_api_declaration)
            .collect()
    }
}

/// One request from the model to execute a specific tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Correlation token assigned by the model capability
    pub invocation_id: String,
    /// Name of the requested tool
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolInvocation {
    pub fn new(
        invocation_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an optional i64 argument
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }
}
