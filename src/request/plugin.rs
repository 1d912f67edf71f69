//! Request-time plugins, tagged by `id`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "id")]
pub enum Plugin {
    #[serde(rename = "file-parser")]
    FileParser { pdf: PdfOptions },
    #[serde(rename = "web")]
    Web {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        engine: Option<WebEngine>,
        max_results: u32,
        search_prompt: String,
    },
    #[serde(rename = "response-healing")]
    ResponseHealing,
}

impl Plugin {
    pub fn file_parser(engine: PdfEngine) -> Self {
        Plugin::FileParser {
            pdf: PdfOptions { engine },
        }
    }

    pub fn web(max_results: u32, search_prompt: impl Into<String>) -> Self {
        Plugin::Web {
            engine: None,
            max_results,
            search_prompt: search_prompt.into(),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Plugin::FileParser { .. } => "file-parser",
            Plugin::Web { .. } => "web",
            Plugin::ResponseHealing => "response-healing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfOptions {
    pub engine: PdfEngine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PdfEngine {
    MistralOcr,
    PdfText,
    Native,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebEngine {
    Exa,
    Native,
}
