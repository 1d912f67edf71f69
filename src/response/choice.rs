//! Per-choice response shapes.

use crate::types::{ImageUrl, ToolCall};
use crate::{Error, ErrorContext, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// One candidate completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Raw finish reason; `null` while unknown. See [`Choice::finish`].
    #[serde(deserialize_with = "Option::deserialize")]
    pub finish_reason: Option<String>,
    pub message: ChoiceMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ChoiceError>,
}

impl Choice {
    pub fn finish(&self) -> Option<FinishReason> {
        self.finish_reason.as_deref().map(FinishReason::parse)
    }

    pub fn has_tool_calls(&self) -> bool {
        self.message
            .tool_calls
            .as_ref()
            .map(|c| !c.is_empty())
            .unwrap_or(false)
    }
}

/// Assistant message within a choice.
///
/// `content` and `reasoning` are always present on the wire and may be `null`;
/// `tool_calls` and `images` are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(deserialize_with = "Option::deserialize")]
    pub content: Option<String>,
    pub role: String,
    #[serde(deserialize_with = "Option::deserialize")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<GeneratedImage>>,
}

/// Image produced by an image-generation model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratedImage {
    ImageUrl { image_url: ImageUrl },
}

impl GeneratedImage {
    pub fn url(&self) -> &str {
        match self {
            GeneratedImage::ImageUrl { image_url } => &image_url.url,
        }
    }

    /// Decode a base64 data URL into its media type and bytes.
    pub fn decode(&self) -> Result<(String, Vec<u8>)> {
        let url = self.url();
        let malformed = |details: &str| {
            Error::validation_with_context(
                "image is not a base64 data URL",
                ErrorContext::new()
                    .with_field_path("message.images[].image_url.url")
                    .with_details(details.to_string())
                    .with_source("generated_image"),
            )
        };
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| malformed("missing data: prefix"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| malformed("missing ',' separator"))?;
        let media_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| malformed("not base64 encoded"))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| malformed(&e.to_string()))?;
        Ok((media_type.to_string(), bytes))
    }
}

/// Error attached to a single choice of an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceError {
    pub code: i64,
    pub message: String,
}

/// Classified finish reason. Values depend on the model; unknown ones are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    FunctionCall,
    Other(String),
}

impl FinishReason {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "stop" | "end_turn" | "stop_sequence" => Self::Stop,
            "length" | "max_tokens" => Self::Length,
            "content_filter" => Self::ContentFilter,
            "tool_calls" | "tool_use" => Self::ToolCalls,
            "function_call" => Self::FunctionCall,
            other => Self::Other(other.to_string()),
        }
    }

    /// Output was cut short rather than completed.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Length | Self::ContentFilter)
    }
}
