use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path that caused the error (e.g., "config.temperature", "messages[0].content[1]")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_validator", "config_loader")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for building, loading and interpreting payloads.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Remote error: HTTP {status} ({class}): {message}")]
    Remote {
        status: u16,
        class: String,
        message: String,
        retryable: bool,
        metadata: Option<serde_json::Value>,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Build a remote error from an API error status, classifying it on the way.
    pub fn remote(
        status: u16,
        message: impl Into<String>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        let class = classify_status(status);
        Error::Remote {
            status,
            class: class.to_string(),
            message: message.into(),
            retryable: is_retryable_class(class),
            metadata,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Remote { retryable: true, .. })
    }
}

/// Map an API status code onto a standard error class.
///
/// Statuses follow the documented error codes of the chat-completion endpoint:
/// 400 bad request, 401 invalid credentials, 402 insufficient credits,
/// 403 moderation, 408 timeout, 429 rate limited, 502 upstream model error,
/// 503 no available provider.
pub fn classify_status(status: u16) -> &'static str {
    match status {
        400 | 422 => "invalid_request",
        401 => "authentication",
        402 => "quota_exhausted",
        403 => "permission_denied",
        404 => "not_found",
        408 => "timeout",
        409 => "conflict",
        413 => "request_too_large",
        429 => "rate_limited",
        499 => "cancelled",
        502 | 503 | 529 => "overloaded",
        500..=599 => "server_error",
        _ => "other",
    }
}

/// Transient classes for which the same request may succeed later.
pub fn is_retryable_class(class: &str) -> bool {
    matches!(
        class,
        "rate_limited" | "overloaded" | "server_error" | "timeout" | "conflict"
    )
}
