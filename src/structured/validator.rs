//! Checking model output against a requested response format.

use crate::response::Choice;
use crate::structured::format::{ResponseFormat, SchemaDescriptor};
use crate::{Error, ErrorContext, Result};
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// A single place where output failed its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer into the output, empty for the root
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Compiled validator for a [`SchemaDescriptor`].
pub struct OutputValidator {
    schema: JSONSchema,
}

impl fmt::Debug for OutputValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputValidator").finish_non_exhaustive()
    }
}

impl OutputValidator {
    pub fn new(descriptor: &SchemaDescriptor) -> Result<Self> {
        let document = descriptor.to_json_schema();
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&document)
            .map_err(|e| {
                Error::validation_with_context(
                    format!("schema does not compile: {}", e),
                    ErrorContext::new().with_source("output_validator"),
                )
            })?;
        Ok(Self { schema })
    }

    /// Validator for a response format; `None` for free-form `json_object` mode.
    pub fn for_format(format: &ResponseFormat) -> Result<Option<Self>> {
        format.schema().map(Self::new).transpose()
    }

    pub fn validate(&self, data: &Value) -> Vec<SchemaViolation> {
        match self.schema.validate(data) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|e| SchemaViolation {
                    path: e.instance_path.to_string(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }

    pub fn is_valid(&self, data: &Value) -> bool {
        self.schema.is_valid(data)
    }
}

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("valid regex"));
static EMBEDDED_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid regex"));
static EMBEDDED_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[\s\S]*\]").expect("valid regex"));

/// Model output parsed as JSON and checked against the requested format.
#[derive(Debug, Clone)]
pub struct StructuredOutput {
    raw: String,
    parsed: Option<Value>,
    violations: Vec<SchemaViolation>,
}

impl StructuredOutput {
    /// Parse text without checking it against any schema.
    pub fn parse(content: impl Into<String>) -> Self {
        let raw = content.into();
        let parsed = extract_json(raw.trim());
        let violations = if parsed.is_none() {
            vec![SchemaViolation {
                path: String::new(),
                message: "output is not valid JSON".to_string(),
            }]
        } else {
            Vec::new()
        };
        Self {
            raw,
            parsed,
            violations,
        }
    }

    /// Parse the text and validate it against `format`.
    pub fn check(content: impl Into<String>, format: &ResponseFormat) -> Result<Self> {
        let mut output = Self::parse(content);
        let Some(parsed) = output.parsed.as_ref() else {
            return Ok(output);
        };
        match OutputValidator::for_format(format)? {
            Some(validator) => output.violations = validator.validate(parsed),
            None if !parsed.is_object() => output.violations.push(SchemaViolation {
                path: String::new(),
                message: "json_object mode expects a JSON object".to_string(),
            }),
            None => {}
        }
        if !output.violations.is_empty() {
            tracing::debug!(
                violations = output.violations.len(),
                "structured output failed validation"
            );
        }
        Ok(output)
    }

    /// Validate the content of a response choice against `format`.
    pub fn from_choice(choice: &Choice, format: &ResponseFormat) -> Result<Self> {
        let content = choice.message.content.as_deref().ok_or_else(|| {
            Error::validation_with_context(
                "choice has no content to parse",
                ErrorContext::new()
                    .with_field_path("choices[].message.content")
                    .with_source("structured_output"),
            )
        })?;
        Self::check(content, format)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> Option<&Value> {
        self.parsed.as_ref()
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_some() && self.violations.is_empty()
    }

    /// Deserialize the validated output into `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        if !self.is_valid() {
            let details = self
                .violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::validation_with_context(
                "structured output does not match its schema",
                ErrorContext::new()
                    .with_details(details)
                    .with_source("structured_output"),
            ));
        }
        let value = self.parsed.unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }
}

/// Extract JSON from raw text, a fenced code block, or an embedded object/array.
fn extract_json(text: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(text) {
        return Some(v);
    }

    if let Some(inner) = FENCED_JSON.captures(text).and_then(|c| c.get(1)) {
        if let Ok(v) = serde_json::from_str::<Value>(inner.as_str().trim()) {
            return Some(v);
        }
    }

    [&*EMBEDDED_OBJECT, &*EMBEDDED_ARRAY]
        .into_iter()
        .filter_map(|re| re.find(text))
        .find_map(|m| serde_json::from_str::<Value>(m.as_str()).ok())
}
