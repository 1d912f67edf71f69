//! Tool calling definitions

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The only tool kind the API defines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    #[default]
    Function,
}

/// Tool definition (for function calling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type", default)]
    pub tool_type: ToolType,
    pub function: FunctionDescription,
}

impl Tool {
    pub fn function(function: FunctionDescription) -> Self {
        Self {
            tool_type: ToolType::Function,
            function,
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub name: String,
    pub parameters: serde_json::Value, // JSON Schema
}

impl FunctionDescription {
    pub fn new(name: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            description: None,
            name: name.into(),
            parameters,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Describe a function whose parameters are the JSON Schema of `T`.
    pub fn from_type<T: schemars::JsonSchema>(name: impl Into<String>) -> Self {
        Self::new(name, crate::structured::json_schema_from_type::<T>())
    }
}

/// How the model may pick a tool: `"none"`, `"auto"`, or a named function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ToolChoiceRepr", into = "ToolChoiceRepr")]
pub enum ToolChoice {
    None,
    Auto,
    Function { name: String },
}

impl ToolChoice {
    pub fn function(name: impl Into<String>) -> Self {
        ToolChoice::Function { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ToolChoiceMode {
    None,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FunctionName {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum ToolChoiceRepr {
    Mode(ToolChoiceMode),
    Named {
        #[serde(rename = "type")]
        tool_type: ToolType,
        function: FunctionName,
    },
}

impl From<ToolChoiceRepr> for ToolChoice {
    fn from(repr: ToolChoiceRepr) -> Self {
        match repr {
            ToolChoiceRepr::Mode(ToolChoiceMode::None) => ToolChoice::None,
            ToolChoiceRepr::Mode(ToolChoiceMode::Auto) => ToolChoice::Auto,
            ToolChoiceRepr::Named { function, .. } => ToolChoice::Function {
                name: function.name,
            },
        }
    }
}

impl From<ToolChoice> for ToolChoiceRepr {
    fn from(choice: ToolChoice) -> Self {
        match choice {
            ToolChoice::None => ToolChoiceRepr::Mode(ToolChoiceMode::None),
            ToolChoice::Auto => ToolChoiceRepr::Mode(ToolChoiceMode::Auto),
            ToolChoice::Function { name } => ToolChoiceRepr::Named {
                tool_type: ToolType::Function,
                function: FunctionName { name },
            },
        }
    }
}

/// Tool call (invocation from model)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default)]
    pub tool_type: ToolType,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String, // JSON text
}

impl FunctionCall {
    /// Parse the JSON-encoded arguments.
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> crate::Result<T> {
        let args = if self.arguments.trim().is_empty() {
            "{}"
        } else {
            self.arguments.as_str()
        };
        Ok(serde_json::from_str(args)?)
    }
}
