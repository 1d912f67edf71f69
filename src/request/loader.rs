//! Loading [`ChatConfig`] presets from YAML or JSON.
//!
//! A preset file holds the config keys at top level plus an optional
//! `headers` section:
//!
//! ```yaml
//! headers:
//!   http_referer: https://example.com
//!   x_title: Example
//! models: [anthropic/claude-3.5-sonnet, openai/gpt-4o]
//! route: fallback
//! temperature: 0.2
//! provider:
//!   data_collection: deny
//! ```

use super::{ChatConfig, RequestHeaders};
use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the default preset directory.
pub const CONFIG_DIR_ENV: &str = "OPENROUTER_CONFIG_DIR";

const EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

#[derive(Debug, Deserialize)]
struct PresetFile {
    #[serde(default)]
    headers: RequestHeaders,
    #[serde(flatten)]
    config: ChatConfig,
}

impl PresetFile {
    fn into_config(self) -> ChatConfig {
        let mut config = self.config;
        config.headers = self.headers;
        config
    }
}

/// Reads and validates config presets.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_path: Option<PathBuf>,
    validate: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            base_path: std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from),
            validate: true,
        }
    }

    pub fn with_base_path(mut self, path: impl AsRef<Path>) -> Self {
        self.base_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Skip [`ChatConfig::validate`] on loaded presets.
    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    /// Load `<base>/<name>.{yaml,yml,json}`.
    pub fn load_preset(&self, name: &str) -> Result<ChatConfig> {
        let base = self.base_path.as_ref().ok_or_else(|| {
            Error::configuration_with_context(
                format!("no preset directory configured; set {}", CONFIG_DIR_ENV),
                ErrorContext::new().with_source("config_loader"),
            )
        })?;

        let path = EXTENSIONS
            .iter()
            .map(|ext| base.join(format!("{}.{}", name, ext)))
            .find(|p| p.is_file())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    format!("preset '{}' not found", name),
                    ErrorContext::new()
                        .with_field_path(base.display().to_string())
                        .with_details(format!("tried extensions {:?}", EXTENSIONS))
                        .with_source("config_loader"),
                )
            })?;
        self.load_file(path)
    }

    /// Load a preset file, choosing the parser from its extension.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ChatConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading chat config preset");

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "json" => self.parse_json(&content),
            "yaml" | "yml" => self.parse_yaml(&content),
            other => Err(Error::configuration_with_context(
                format!("unsupported preset extension '{}'", other),
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("config_loader"),
            )),
        }
    }

    pub fn parse_yaml(&self, content: &str) -> Result<ChatConfig> {
        let preset: PresetFile = serde_yaml::from_str(content)?;
        self.finish(preset)
    }

    pub fn parse_json(&self, content: &str) -> Result<ChatConfig> {
        let preset: PresetFile = serde_json::from_str(content)?;
        self.finish(preset)
    }

    fn finish(&self, preset: PresetFile) -> Result<ChatConfig> {
        let config = preset.into_config();
        if self.validate {
            config.validate()?;
        }
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::provider::DataCollection;

    #[test]
    fn test_yaml_preset() {
        let yaml = r#"
headers:
  http_referer: https://example.com
  x_title: Example
models: [anthropic/claude-3.5-sonnet, openai/gpt-4o]
route: fallback
temperature: 0.2
logit_bias:
  50256: -100
provider:
  data_collection: deny
"#;
        let cfg = ConfigLoader::new().parse_yaml(yaml).unwrap();
        assert!(cfg.routing.is_fallback());
        assert_eq!(cfg.temperature, Some(0.2));
        assert_eq!(cfg.headers.x_title.as_deref(), Some("Example"));
        assert_eq!(
            cfg.provider.unwrap().data_collection,
            Some(DataCollection::Deny)
        );
        assert_eq!(cfg.logit_bias.unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_preset_is_rejected() {
        let err = ConfigLoader::new()
            .parse_json(r#"{"model": "m", "temperature": 3.0}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));

        let cfg = ConfigLoader::new()
            .without_validation()
            .parse_json(r#"{"model": "m", "temperature": 3.0}"#)
            .unwrap();
        assert_eq!(cfg.temperature, Some(3.0));
    }

    #[test]
    fn test_load_preset_from_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        std::fs::write(dir.join("fast.yml"), "model: openai/gpt-4o-mini\nmax_tokens: 256\n")
            .unwrap();

        let loader = ConfigLoader::new().with_base_path(dir);
        let cfg = loader.load_preset("fast").unwrap();
        assert_eq!(cfg.routing.candidates(), vec!["openai/gpt-4o-mini"]);
        assert_eq!(cfg.max_tokens, Some(256));

        assert!(matches!(
            loader.load_preset("missing"),
            Err(Error::Configuration { .. })
        ));
    }
}
