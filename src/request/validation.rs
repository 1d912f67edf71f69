//! Opt-in request checks.
//!
//! Serialization never validates; callers run these before sending when they
//! want documented bounds and cross-field consistency enforced locally.

use super::options::Transform;
use super::plugin::Plugin;
use super::reasoning::ReasoningBudget;
use super::{ChatConfig, ChatRequest, ModelRouting};
use crate::structured::{ResponseFormat, SchemaDescriptor};
use crate::types::{ContentPart, Message, MessageContent, ToolChoice};
use crate::{Error, ErrorContext, Result};
use std::collections::HashSet;

fn invalid(field: impl Into<String>, message: impl Into<String>) -> Error {
    Error::validation_with_context(
        message,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("request_validator"),
    )
}

/// Check `value` lies in `(min, max]` or `[min, max]`.
fn check_range(
    field: &str,
    value: Option<f64>,
    min: f64,
    min_inclusive: bool,
    max: f64,
) -> Result<()> {
    let Some(v) = value else {
        return Ok(());
    };
    let above_min = if min_inclusive { v >= min } else { v > min };
    if above_min && v <= max {
        return Ok(());
    }
    let open = if min_inclusive { '[' } else { '(' };
    Err(Error::validation_with_context(
        format!("{} must be in {}{}, {}]", field, open, min, max),
        ErrorContext::new()
            .with_field_path(format!("config.{}", field))
            .with_details(format!("got {}", v))
            .with_source("request_validator"),
    ))
}

impl ChatConfig {
    /// Check documented parameter bounds and cross-field consistency.
    pub fn validate(&self) -> Result<()> {
        self.validate_routing()?;
        self.validate_sampling()?;
        self.validate_reasoning()?;
        self.validate_tools()?;
        self.validate_plugins()?;

        if let Some(format) = &self.response_format {
            format.validate()?;
        }
        if let Some(transforms) = &self.transforms {
            if transforms.len() > 1 {
                return Err(invalid(
                    "config.transforms",
                    format!(
                        "at most one transform is allowed, got {:?}",
                        transforms
                            .iter()
                            .map(|t| match t {
                                Transform::MiddleOut => "middle-out",
                            })
                            .collect::<Vec<_>>()
                    ),
                ));
            }
        }
        if let Some(user) = &self.user {
            if user.trim().is_empty() {
                return Err(invalid("config.user", "user identifier must not be blank"));
            }
        }

        tracing::debug!(
            models = ?self.routing.candidates(),
            fallback = self.routing.is_fallback(),
            "chat config validated"
        );
        Ok(())
    }

    fn validate_routing(&self) -> Result<()> {
        match &self.routing {
            ModelRouting::Single { model: Some(m) } if m.trim().is_empty() => {
                Err(invalid("config.model", "model id must not be blank"))
            }
            ModelRouting::Fallback { models } if models.is_empty() => Err(invalid(
                "config.models",
                "fallback routing needs at least one model",
            )),
            ModelRouting::Fallback { models } => {
                match models.iter().position(|m| m.trim().is_empty()) {
                    Some(i) => Err(invalid(
                        format!("config.models[{}]", i),
                        "model id must not be blank",
                    )),
                    None => Ok(()),
                }
            }
            ModelRouting::Single { .. } => Ok(()),
        }
    }

    fn validate_sampling(&self) -> Result<()> {
        check_range("temperature", self.temperature, 0.0, true, 2.0)?;
        check_range("top_p", self.top_p, 0.0, false, 1.0)?;
        check_range("top_a", self.top_a, 0.0, true, 1.0)?;
        check_range("min_p", self.min_p, 0.0, false, 1.0)?;
        check_range("frequency_penalty", self.frequency_penalty, -2.0, true, 2.0)?;
        check_range("presence_penalty", self.presence_penalty, -2.0, true, 2.0)?;
        check_range("repetition_penalty", self.repetition_penalty, 0.0, false, 2.0)?;

        if self.top_k == Some(0) {
            return Err(invalid("config.top_k", "top_k must be at least 1"));
        }
        if self.max_tokens == Some(0) {
            return Err(invalid("config.max_tokens", "max_tokens must be at least 1"));
        }
        if let Some(bias) = &self.logit_bias {
            for (token, value) in bias {
                if !(-100.0..=100.0).contains(value) {
                    return Err(invalid(
                        format!("config.logit_bias.{}", token.0),
                        "logit bias must be in [-100, 100]",
                    ));
                }
            }
        }
        Ok(())
    }

    fn validate_reasoning(&self) -> Result<()> {
        if let Some(reasoning) = &self.reasoning {
            if reasoning.budget == Some(ReasoningBudget::MaxTokens(0)) {
                return Err(invalid(
                    "config.reasoning.max_tokens",
                    "reasoning budget must be at least 1 token",
                ));
            }
            if reasoning.enabled == Some(false) && reasoning.budget.is_some() {
                tracing::warn!("reasoning budget set while reasoning is disabled");
            }
        }
        Ok(())
    }

    fn validate_tools(&self) -> Result<()> {
        let mut names = HashSet::new();
        if let Some(tools) = &self.tools {
            for (i, tool) in tools.iter().enumerate() {
                let name = tool.name();
                if name.trim().is_empty() {
                    return Err(invalid(
                        format!("config.tools[{}].function.name", i),
                        "tool name must not be blank",
                    ));
                }
                if !names.insert(name) {
                    return Err(invalid(
                        format!("config.tools[{}].function.name", i),
                        format!("duplicate tool name '{}'", name),
                    ));
                }
            }
        }

        match (&self.tool_choice, &self.tools) {
            (Some(ToolChoice::Function { name }), Some(_)) if !names.contains(name.as_str()) => {
                Err(invalid(
                    "config.tool_choice.function.name",
                    format!("tool_choice names undeclared tool '{}'", name),
                ))
            }
            (Some(choice), None) if *choice != ToolChoice::None => {
                tracing::warn!(?choice, "tool_choice set without any tools");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn validate_plugins(&self) -> Result<()> {
        let Some(plugins) = &self.plugins else {
            return Ok(());
        };
        let mut seen = HashSet::new();
        for (i, plugin) in plugins.iter().enumerate() {
            if !seen.insert(plugin.id()) {
                return Err(invalid(
                    format!("config.plugins[{}]", i),
                    format!("plugin '{}' listed more than once", plugin.id()),
                ));
            }
            if let Plugin::Web {
                max_results,
                search_prompt,
                ..
            } = plugin
            {
                if *max_results == 0 {
                    return Err(invalid(
                        format!("config.plugins[{}].max_results", i),
                        "web plugin needs max_results of at least 1",
                    ));
                }
                if search_prompt.trim().is_empty() {
                    return Err(invalid(
                        format!("config.plugins[{}].search_prompt", i),
                        "web plugin needs a search prompt",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl ResponseFormat {
    pub fn validate(&self) -> Result<()> {
        if let ResponseFormat::JsonSchema { json_schema } = self {
            if json_schema.name.trim().is_empty() {
                return Err(invalid(
                    "config.response_format.json_schema.name",
                    "schema name must not be blank",
                ));
            }
            json_schema
                .schema
                .validate_at("config.response_format.json_schema.schema")?;
        }
        Ok(())
    }
}

impl SchemaDescriptor {
    /// Every `required` key must be a declared property, at every nesting level.
    pub fn validate(&self) -> Result<()> {
        self.validate_at("schema")
    }

    fn validate_at(&self, path: &str) -> Result<()> {
        match self {
            SchemaDescriptor::Array { items } => items.validate_at(&format!("{}.items", path)),
            SchemaDescriptor::Object(obj) => {
                for key in obj.required.iter().flatten() {
                    if !obj.properties.contains_key(key) {
                        return Err(invalid(
                            format!("{}.required", path),
                            format!("required key '{}' is not a declared property", key),
                        ));
                    }
                }
                for (name, prop) in &obj.properties {
                    if let crate::structured::TypeSpec::Union(types) = &prop.property_type {
                        if types.is_empty() {
                            return Err(invalid(
                                format!("{}.properties.{}.type", path, name),
                                "type union must not be empty",
                            ));
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

impl Message {
    /// Check the content segments are well formed.
    pub fn validate(&self) -> Result<()> {
        validate_message(self, "message")
    }
}

fn validate_message(message: &Message, path: &str) -> Result<()> {
    let parts = match &message.content {
        MessageContent::Text(_) => return Ok(()),
        MessageContent::Parts(parts) => parts,
    };
    if parts.is_empty() {
        return Err(invalid(
            format!("{}.content", path),
            "content part list must not be empty",
        ));
    }
    for (i, part) in parts.iter().enumerate() {
        let part_path = format!("{}.content[{}]", path, i);
        match part {
            ContentPart::Text { .. } => {}
            ContentPart::ImageUrl { image_url } => check_url(&part_path, &image_url.url)?,
            ContentPart::VideoUrl { video_url } => check_url(&part_path, &video_url.url)?,
            ContentPart::File { file } => {
                if file.filename().trim().is_empty() {
                    return Err(invalid(
                        format!("{}.file.filename", part_path),
                        "attachment needs a filename",
                    ));
                }
                if file.file_data().is_empty() {
                    return Err(invalid(
                        format!("{}.file", part_path),
                        "attachment has no data",
                    ));
                }
            }
            ContentPart::InputAudio { input_audio } => {
                if input_audio.data.is_empty() {
                    return Err(invalid(
                        format!("{}.inputAudio.data", part_path),
                        "audio segment has no data",
                    ));
                }
            }
        }
    }
    Ok(())
}

fn check_url(path: &str, raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| invalid(format!("{}.url", path), format!("invalid URL: {}", e)))?;
    match parsed.scheme() {
        "http" | "https" | "data" => Ok(()),
        other => Err(invalid(
            format!("{}.url", path),
            format!("unsupported URL scheme '{}'", other),
        )),
    }
}

impl ChatRequest {
    /// Validate the message list and the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.messages.is_empty() {
            return Err(invalid("messages", "at least one message is required"));
        }
        for (i, message) in self.messages.iter().enumerate() {
            validate_message(message, &format!("messages[{}]", i))?;
        }
        self.config.validate()
    }
}
