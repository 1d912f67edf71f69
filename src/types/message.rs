//! Conversation turns with plain-text or multimodal content.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single conversational turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn with_parts(role: MessageRole, parts: Vec<ContentPart>) -> Self {
        Self {
            role,
            content: MessageContent::Parts(parts),
        }
    }

    /// Concatenated text of the message, ignoring non-text segments.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(t) => t.clone(),
            MessageContent::Parts(ps) => ps
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn contains_image(&self) -> bool {
        self.any_part(|p| matches!(p, ContentPart::ImageUrl { .. }))
    }

    pub fn contains_audio(&self) -> bool {
        self.any_part(|p| matches!(p, ContentPart::InputAudio { .. }))
    }

    pub fn contains_file(&self) -> bool {
        self.any_part(|p| matches!(p, ContentPart::File { .. }))
    }

    pub fn contains_video(&self) -> bool {
        self.any_part(|p| matches!(p, ContentPart::VideoUrl { .. }))
    }

    fn any_part(&self, pred: impl Fn(&ContentPart) -> bool) -> bool {
        match &self.content {
            MessageContent::Text(_) => false,
            MessageContent::Parts(ps) => ps.iter().any(pred),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Message content (can be string or array of content parts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageContent::Text(text.into())
    }

    pub fn parts(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// Typed content segment of a multimodal message, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    ImageUrl {
        image_url: ImageUrl,
    },
    File {
        file: FileAttachment,
    },
    InputAudio {
        #[serde(rename = "inputAudio")]
        input_audio: InputAudio,
    },
    VideoUrl {
        #[serde(rename = "videoUrl")]
        video_url: VideoUrl,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String, // http(s) URL or data URL
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAudio {
    pub data: String, // base64 encoded
    pub format: InputAudioFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputAudioFormat {
    Wav,
    Mp3,
    Aiff,
    Aac,
    Ogg,
    Flac,
    M4a,
    Pcm16,
    Pcm24,
}

impl InputAudioFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        let f = match ext.to_lowercase().as_str() {
            "wav" => Self::Wav,
            "mp3" => Self::Mp3,
            "aiff" | "aif" => Self::Aiff,
            "aac" => Self::Aac,
            "ogg" => Self::Ogg,
            "flac" => Self::Flac,
            "m4a" => Self::M4a,
            _ => return None,
        };
        Some(f)
    }
}

/// File attachment payload.
///
/// The API accepts two spellings of the data field, `file_data` and `fileData`.
/// Both are kept as distinct variants so a payload round-trips with the
/// spelling it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileAttachment {
    Snake {
        filename: String,
        file_data: String,
    },
    Camel {
        filename: String,
        #[serde(rename = "fileData")]
        file_data: String,
    },
}

/// Which spelling a [`FileAttachment`] uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCasing {
    Snake,
    Camel,
}

impl FileAttachment {
    pub fn filename(&self) -> &str {
        match self {
            Self::Snake { filename, .. } | Self::Camel { filename, .. } => filename,
        }
    }

    pub fn file_data(&self) -> &str {
        match self {
            Self::Snake { file_data, .. } | Self::Camel { file_data, .. } => file_data,
        }
    }

    pub fn casing(&self) -> FieldCasing {
        match self {
            Self::Snake { .. } => FieldCasing::Snake,
            Self::Camel { .. } => FieldCasing::Camel,
        }
    }
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    pub fn video_url(url: impl Into<String>) -> Self {
        ContentPart::VideoUrl {
            video_url: VideoUrl { url: url.into() },
        }
    }

    /// Inline image bytes as a base64 data URL.
    pub fn image_bytes(bytes: &[u8], media_type: &str) -> Self {
        Self::image_url(data_url(media_type, bytes))
    }

    pub fn image_from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let media_type = guess_media_type(path).unwrap_or("application/octet-stream");
        Ok(Self::image_bytes(&bytes, media_type))
    }

    /// File attachment using the `file_data` spelling.
    pub fn file(filename: impl Into<String>, file_data: impl Into<String>) -> Self {
        ContentPart::File {
            file: FileAttachment::Snake {
                filename: filename.into(),
                file_data: file_data.into(),
            },
        }
    }

    /// Read a local file and attach it as a base64 data URL.
    pub fn file_from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let media_type = guess_media_type(path).unwrap_or("application/octet-stream");
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::file(filename, data_url(media_type, &bytes)))
    }

    pub fn input_audio(data: impl Into<String>, format: InputAudioFormat) -> Self {
        ContentPart::InputAudio {
            input_audio: InputAudio {
                data: data.into(),
                format,
            },
        }
    }

    pub fn audio_from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let format = InputAudioFormat::from_extension(ext).ok_or_else(|| {
            crate::Error::validation_with_context(
                format!("unsupported audio extension '{}'", ext),
                crate::ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("content_builder"),
            )
        })?;
        let bytes = std::fs::read(path)?;
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(Self::input_audio(data, format))
    }
}

pub(crate) fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

fn guess_media_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    let mt = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        _ => return None,
    };
    Some(mt)
}
