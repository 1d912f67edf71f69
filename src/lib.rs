//! # ai-lib-openrouter
//!
//! Typed request/response contract for the OpenRouter chat-completion API.
//!
//! ## Overview
//!
//! The crate describes every value that crosses the API boundary so that code
//! building requests and code reading responses are checked against one source
//! of truth. It performs no network I/O: pair it with any HTTP client.
//!
//! ## Core Ideas
//!
//! - **Tagged unions**: every "one of" on the wire is a Rust enum, so callers branch
//!   exhaustively (routing mode, response format, plugin id, content part, envelope)
//! - **Absent is not null**: optional fields are skipped when `None`; fields the API
//!   sends as `null` stay `null` on the way back out
//! - **Closed literal sets**: effort levels, quantizations, aspect ratios and audio
//!   formats are fieldless enums; anything else fails to parse
//! - **Opt-in checks**: documented bounds are enforced by `validate()` methods, never
//!   implicitly by serialization
//!
//! ## Quick Start
//!
//! ```rust
//! use ai_lib_openrouter::{ChatConfig, ChatRequest, ChatResponse, Message};
//! use ai_lib_openrouter::request::plugin::Plugin;
//!
//! let config = ChatConfig::model("openai/gpt-4o")
//!     .with_temperature(0.7)
//!     .with_plugin(Plugin::web(3, "Relevant web results:"));
//! let request = ChatRequest::new(
//!     vec![Message::system("Be brief."), Message::user("What's new in Rust?")],
//!     config,
//! );
//! request.validate().unwrap();
//! let body = request.to_body().unwrap();
//! assert_eq!(body["plugins"][0]["id"], "web");
//!
//! let raw = r#"{"id":"gen-1","created":0,"model":"openai/gpt-4o",
//!     "choices":[{"finish_reason":"stop",
//!     "message":{"role":"assistant","content":"Plenty.","reasoning":null}}]}"#;
//! let response: ChatResponse = serde_json::from_str(raw).unwrap();
//! assert_eq!(response.into_result().unwrap().content(), Some("Plenty."));
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Messages, content parts and tool definitions |
//! | [`request`] | Request configuration, routing, plugins, validation, presets |
//! | [`structured`] | `response_format` shapes and output validation |
//! | [`response`] | Success/error envelopes, choices, usage, generation stats |
//! | [`error`] | Error type and API status classification |

pub mod error;
pub mod request;
pub mod response;
pub mod structured;
pub mod types;

pub use error::{Error, ErrorContext};
pub use request::{ChatConfig, ChatRequest, ModelRouting, RequestHeaders};
pub use response::{ChatResponse, GenerationStats, ResponseSuccess};
pub use structured::ResponseFormat;
pub use types::{
    message::{ContentPart, Message, MessageRole},
    tool::{Tool, ToolCall, ToolChoice},
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
