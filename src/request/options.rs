//! Smaller request options: stop sequences, prediction, transforms, web
//! search, image generation and debug switches.

use serde::{Deserialize, Serialize};

/// One stop sequence or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stop {
    Single(String),
    Multiple(Vec<String>),
}

impl Stop {
    pub fn sequences(&self) -> Vec<&str> {
        match self {
            Stop::Single(s) => vec![s.as_str()],
            Stop::Multiple(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Stop {
    fn from(s: &str) -> Self {
        Stop::Single(s.to_string())
    }
}

impl From<Vec<String>> for Stop {
    fn from(v: Vec<String>) -> Self {
        Stop::Multiple(v)
    }
}

/// Predicted output used to cut latency when most of the answer is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Prediction {
    Content { content: String },
}

/// Router-side prompt transforms; never forwarded to providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transform {
    MiddleOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchOptions {
    pub search_context_size: SearchContextSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchContextSize {
    Low,
    Med,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Image,
    Text,
}

/// Output modalities for image-generating models.
///
/// The API accepts exactly `["image", "text"]`; any other list fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Modality>", into = "Vec<Modality>")]
pub struct ImageAndText;

impl ImageAndText {
    pub fn modalities(&self) -> [Modality; 2] {
        [Modality::Image, Modality::Text]
    }
}

impl TryFrom<Vec<Modality>> for ImageAndText {
    type Error = String;

    fn try_from(list: Vec<Modality>) -> std::result::Result<Self, Self::Error> {
        if list == [Modality::Image, Modality::Text] {
            Ok(ImageAndText)
        } else {
            Err(format!(
                "modalities must be exactly [\"image\", \"text\"], got {:?}",
                list
            ))
        }
    }
}

impl From<ImageAndText> for Vec<Modality> {
    fn from(m: ImageAndText) -> Self {
        m.modalities().to_vec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "2:3")]
    Portrait2x3,
    #[serde(rename = "3:2")]
    Landscape3x2,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "4:5")]
    Portrait4x5,
    #[serde(rename = "5:4")]
    Landscape5x4,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "21:9")]
    Ultrawide21x9,
}

impl AspectRatio {
    /// Width over height.
    pub fn ratio(&self) -> f64 {
        let (w, h) = match self {
            Self::Square => (1, 1),
            Self::Portrait2x3 => (2, 3),
            Self::Landscape3x2 => (3, 2),
            Self::Portrait3x4 => (3, 4),
            Self::Landscape4x3 => (4, 3),
            Self::Portrait4x5 => (4, 5),
            Self::Landscape5x4 => (5, 4),
            Self::Portrait9x16 => (9, 16),
            Self::Landscape16x9 => (16, 9),
            Self::Ultrawide21x9 => (21, 9),
        };
        w as f64 / h as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugOptions {
    /// Return the transformed body that was sent upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub echo_upstream_body: Option<bool>,
}
