//! Provider routing preferences.

use serde::{Deserialize, Serialize};

/// Model-serving precision level usable as a routing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantization {
    Int4,
    Int8,
    Fp6,
    Fp8,
    Fp16,
    Bf16,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataCollection {
    Allow,
    Deny,
}

/// `provider` request block. Every field is independent and optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPreferences {
    /// Only route to these providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only: Option<Vec<String>>,
    /// Try providers in this order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
    /// Never route to these providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantizations: Option<Vec<Quantization>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_collection: Option<DataCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_fallbacks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_parameters: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_distillable_text: Option<bool>,
}

impl ProviderPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = Some(providers.into_iter().map(Into::into).collect());
        self
    }

    pub fn only<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(providers.into_iter().map(Into::into).collect());
        self
    }

    pub fn ignore<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = Some(providers.into_iter().map(Into::into).collect());
        self
    }

    pub fn quantizations(mut self, q: Vec<Quantization>) -> Self {
        self.quantizations = Some(q);
        self
    }

    pub fn data_collection(mut self, policy: DataCollection) -> Self {
        self.data_collection = Some(policy);
        self
    }

    pub fn allow_fallbacks(mut self, allow: bool) -> Self {
        self.allow_fallbacks = Some(allow);
        self
    }

    pub fn require_parameters(mut self, require: bool) -> Self {
        self.require_parameters = Some(require);
        self
    }

    /// Whether `provider` survives the `only`/`ignore` filters.
    pub fn permits(&self, provider: &str) -> bool {
        let listed = |list: &Option<Vec<String>>| {
            list.as_ref()
                .map(|l| l.iter().any(|p| p.eq_ignore_ascii_case(provider)))
        };
        if listed(&self.ignore) == Some(true) {
            return false;
        }
        listed(&self.only).unwrap_or(true)
    }
}
