//! # Types Module
//!
//! Message and tool shapes shared by requests and responses.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Conversational turn with plain or multimodal content |
//! | [`ContentPart`] | Typed segment: text, image, file, audio, video |
//! | [`Tool`] | Callable function descriptor sent with a request |
//! | [`ToolChoice`] | `none`, `auto` or a named function |
//! | [`ToolCall`] | Function invocation returned by the model |
//!
//! ## Example
//!
//! ```rust
//! use ai_lib_openrouter::types::{ContentPart, FunctionDescription, Message, MessageRole, Tool};
//!
//! let system = Message::system("You are a helpful assistant");
//! let user = Message::with_parts(
//!     MessageRole::User,
//!     vec![
//!         ContentPart::text("What is in this image?"),
//!         ContentPart::image_url("https://example.com/cat.png"),
//!     ],
//! );
//!
//! let tool = Tool::function(
//!     FunctionDescription::new(
//!         "get_weather",
//!         serde_json::json!({
//!             "type": "object",
//!             "properties": {"location": {"type": "string"}}
//!         }),
//!     )
//!     .with_description("Get current weather for a location"),
//! );
//! # let _ = (system, user, tool);
//! ```

pub mod message;
pub mod tool;

pub use message::{
    ContentPart, FieldCasing, FileAttachment, ImageUrl, InputAudio, InputAudioFormat, Message,
    MessageContent, MessageRole, VideoUrl,
};
pub use tool::{FunctionCall, FunctionDescription, Tool, ToolCall, ToolChoice, ToolType};
