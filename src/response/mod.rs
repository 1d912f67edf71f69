//! # Response Module
//!
//! A completion call answers with exactly one of two envelopes: a success body
//! carrying choices, or an error body under a top-level `error` key.
//! [`ChatResponse`] models the pair and branches on that key.
//!
//! ```rust
//! use ai_lib_openrouter::response::ChatResponse;
//!
//! let resp: ChatResponse =
//!     serde_json::from_str(r#"{"error":{"status":429,"message":"rate limited"}}"#).unwrap();
//! let err = resp.into_result().unwrap_err();
//! assert!(err.is_retryable());
//! ```

pub mod choice;
pub mod generation;

pub use choice::{Choice, ChoiceError, ChoiceMessage, FinishReason, GeneratedImage};
pub use generation::{GenerationData, GenerationStats};

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Success(ResponseSuccess),
    Error(ResponseError),
}

impl<'de> Deserialize<'de> for ChatResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error as _;

        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("error").filter(|e| !e.is_null()).is_some() {
            serde_json::from_value(value)
                .map(ChatResponse::Error)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(ChatResponse::Success)
                .map_err(D::Error::custom)
        }
    }
}

impl ChatResponse {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ChatResponse::Success(_))
    }

    /// The success body, or the error envelope as [`Error::Remote`].
    pub fn into_result(self) -> Result<ResponseSuccess> {
        match self {
            ChatResponse::Success(s) => Ok(s),
            ChatResponse::Error(e) => {
                tracing::debug!(status = e.error.status, "API returned an error envelope");
                Err(e.into())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSuccess {
    pub id: String,
    pub choices: Vec<Choice>,
    /// Unix timestamp (seconds)
    pub created: i64,
    pub model: String,
    /// Only present if the provider supports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ResponseSuccess {
    pub fn first_choice(&self) -> Option<&Choice> {
        self.choices.first()
    }

    /// Text of the first choice, if it produced any.
    pub fn content(&self) -> Option<&str> {
        self.first_choice()?.message.content.as_deref()
    }

    /// Choices that carry their own error.
    pub fn failed_choices(&self) -> impl Iterator<Item = (usize, &ChoiceError)> {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.error.as_ref().map(|e| (i, e)))
    }

    /// Check the envelope holds at least one choice; log inconsistent usage.
    pub fn validate(&self) -> Result<()> {
        if self.choices.is_empty() {
            return Err(Error::validation_with_context(
                "success response has no choices",
                ErrorContext::new()
                    .with_field_path("choices")
                    .with_details(format!("response id {}", self.id))
                    .with_source("response_validator"),
            ));
        }
        if let Some(usage) = &self.usage {
            if !usage.is_consistent() {
                tracing::warn!(
                    id = %self.id,
                    prompt = usage.prompt_tokens,
                    completion = usage.completion_tokens,
                    total = usage.total_tokens,
                    "usage total does not equal prompt + completion"
                );
            }
        }
        for (i, err) in self.failed_choices() {
            tracing::warn!(choice = i, code = err.code, message = %err.message, "choice failed");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Including images and tools if any
    pub prompt_tokens: u32,
    /// The tokens generated
    pub completion_tokens: u32,
    /// Sum of the above two fields
    pub total_tokens: u32,
}

impl Usage {
    pub fn is_consistent(&self) -> bool {
        self.prompt_tokens.checked_add(self.completion_tokens) == Some(self.total_tokens)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "code")]
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl From<ResponseError> for Error {
    fn from(e: ResponseError) -> Self {
        Error::remote(e.error.status, e.error.message, e.error.metadata)
    }
}
