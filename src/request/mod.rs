//! # Request Module
//!
//! The request side of the contract: [`ChatConfig`] holds every optional knob of a
//! chat-completion call, [`ChatRequest`] merges it with the message list into the
//! JSON body, and [`RequestHeaders`] carries the attribution headers that travel
//! beside the body.
//!
//! | Submodule | Contents |
//! |-----------|----------|
//! | [`reasoning`] | `reasoning` block: toggle plus effort level or token budget |
//! | [`provider`] | `provider` routing preferences and quantization filters |
//! | [`plugin`] | `plugins` entries tagged by `id` |
//! | [`options`] | stop sequences, prediction, transforms, web search, image config, debug |
//! | [`validation`] | opt-in bounds and consistency checks |
//! | [`loader`] | config presets from YAML or JSON files |
//!
//! ## Example
//!
//! ```rust
//! use ai_lib_openrouter::request::{ChatConfig, ChatRequest, ModelRouting};
//! use ai_lib_openrouter::request::reasoning::{Reasoning, ReasoningEffort};
//! use ai_lib_openrouter::Message;
//!
//! let config = ChatConfig::fallback(["anthropic/claude-3.5-sonnet", "openai/gpt-4o"])
//!     .with_temperature(0.2)
//!     .with_reasoning(Reasoning::effort(ReasoningEffort::Low));
//! let request = ChatRequest::new(vec![Message::user("Hello")], config);
//!
//! let body = request.to_body().unwrap();
//! assert_eq!(body["route"], "fallback");
//! assert!(body.get("model").is_none());
//! ```

pub mod loader;
pub mod options;
pub mod plugin;
pub mod provider;
pub mod reasoning;
pub mod validation;

use crate::structured::ResponseFormat;
use crate::types::{Message, Tool, ToolChoice};
use crate::Result;
use options::{
    DebugOptions, ImageAndText, ImageConfig, Prediction, Stop, Transform, WebSearchOptions,
};
use plugin::Plugin;
use provider::ProviderPreferences;
use reasoning::Reasoning;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub use loader::ConfigLoader;

/// Which model(s) serve the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoutingRepr", into = "RoutingRepr")]
pub enum ModelRouting {
    /// One model, or the account default when `None`.
    Single { model: Option<String> },
    /// Ordered models tried in turn (`route: "fallback"`).
    Fallback { models: Vec<String> },
}

impl Default for ModelRouting {
    fn default() -> Self {
        ModelRouting::Single { model: None }
    }
}

impl ModelRouting {
    /// Models in the order they will be tried.
    pub fn candidates(&self) -> Vec<&str> {
        match self {
            ModelRouting::Single { model } => model.iter().map(String::as_str).collect(),
            ModelRouting::Fallback { models } => models.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ModelRouting::Fallback { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Route {
    Fallback,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RoutingRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    models: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    route: Option<Route>,
}

impl TryFrom<RoutingRepr> for ModelRouting {
    type Error = String;

    fn try_from(repr: RoutingRepr) -> std::result::Result<Self, Self::Error> {
        match (repr.route, repr.model, repr.models) {
            (Some(Route::Fallback), None, Some(models)) if !models.is_empty() => {
                Ok(ModelRouting::Fallback { models })
            }
            (Some(Route::Fallback), None, _) => {
                Err("route \"fallback\" requires a non-empty `models` list".into())
            }
            (Some(Route::Fallback), Some(_), _) => {
                Err("route \"fallback\" cannot be combined with `model`".into())
            }
            (None, _, Some(_)) => Err("`models` requires route \"fallback\"".into()),
            (None, model, None) => Ok(ModelRouting::Single { model }),
        }
    }
}

impl From<ModelRouting> for RoutingRepr {
    fn from(routing: ModelRouting) -> Self {
        match routing {
            ModelRouting::Single { model } => RoutingRepr {
                model,
                ..RoutingRepr::default()
            },
            ModelRouting::Fallback { models } => RoutingRepr {
                model: None,
                models: Some(models),
                route: Some(Route::Fallback),
            },
        }
    }
}

/// Attribution headers sent alongside the body, never inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeaders {
    /// Site URL used for app rankings.
    #[serde(default, alias = "httpReferer", skip_serializing_if = "Option::is_none")]
    pub http_referer: Option<String>,
    /// Site title used for app rankings.
    #[serde(default, alias = "xTitle", skip_serializing_if = "Option::is_none")]
    pub x_title: Option<String>,
}

impl RequestHeaders {
    pub fn header_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(referer) = &self.http_referer {
            pairs.push(("HTTP-Referer", referer.as_str()));
        }
        if let Some(title) = &self.x_title {
            pairs.push(("X-Title", title.as_str()));
        }
        pairs
    }
}

/// Vocabulary token id used as a `logit_bias` key.
///
/// JSON object keys are strings, so both `"50256"` and `50256` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub u32);

impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TokenIdVisitor;

        impl<'de> serde::de::Visitor<'de> for TokenIdVisitor {
            type Value = TokenId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a token id as integer or numeric string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<TokenId, E> {
                u32::try_from(v)
                    .map(TokenId)
                    .map_err(|_| E::custom(format!("token id {} out of range", v)))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<TokenId, E> {
                u32::try_from(v)
                    .map(TokenId)
                    .map_err(|_| E::custom(format!("token id {} out of range", v)))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<TokenId, E> {
                v.trim()
                    .parse::<u32>()
                    .map(TokenId)
                    .map_err(|_| E::custom(format!("invalid token id '{}'", v)))
            }
        }

        deserializer.deserialize_any(TokenIdVisitor)
    }
}

/// Optional request configuration. Absent fields mean "provider default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(skip)]
    pub headers: RequestHeaders,

    #[serde(flatten)]
    pub routing: ModelRouting,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderPreferences>,
    /// Stable end-user identifier for abuse detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Stop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Not available for OpenAI models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<BTreeMap<TokenId, f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transforms: Option<Vec<Transform>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<Plugin>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search_options: Option<WebSearchOptions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalities: Option<ImageAndText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugOptions>,
}

impl ChatConfig {
    pub fn model(model: impl Into<String>) -> Self {
        Self {
            routing: ModelRouting::Single {
                model: Some(model.into()),
            },
            ..Self::default()
        }
    }

    pub fn fallback<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routing: ModelRouting::Fallback {
                models: models.into_iter().map(Into::into).collect(),
            },
            ..Self::default()
        }
    }

    pub fn with_headers(mut self, headers: RequestHeaders) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_stop(mut self, stop: impl Into<Stop>) -> Self {
        self.stop = Some(stop.into());
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_reasoning(mut self, reasoning: Reasoning) -> Self {
        self.reasoning = Some(reasoning);
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    pub fn with_provider(mut self, provider: ProviderPreferences) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>, choice: Option<ToolChoice>) -> Self {
        self.tools = Some(tools);
        self.tool_choice = choice;
        self
    }

    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.get_or_insert_with(Vec::new).push(plugin);
        self
    }

    pub fn with_logit_bias(mut self, token: u32, bias: f64) -> Self {
        self.logit_bias
            .get_or_insert_with(BTreeMap::new)
            .insert(TokenId(token), bias);
        self
    }

    /// Overlay the fields set in `other` on top of `self`.
    ///
    /// Routing is replaced only when `other` names a model.
    pub fn merge(mut self, other: ChatConfig) -> Self {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        if !other.routing.candidates().is_empty() {
            self.routing = other.routing;
        }
        if other.headers.http_referer.is_some() {
            self.headers.http_referer = other.headers.http_referer;
        }
        if other.headers.x_title.is_some() {
            self.headers.x_title = other.headers.x_title;
        }
        overlay!(
            reasoning,
            response_format,
            provider,
            user,
            stop,
            min_p,
            max_tokens,
            temperature,
            top_a,
            top_p,
            top_k,
            frequency_penalty,
            presence_penalty,
            repetition_penalty,
            seed,
            logit_bias,
            tools,
            tool_choice,
            transforms,
            prediction,
            plugins,
            web_search_options,
            modalities,
            image_config,
            debug,
        );
        self
    }
}

/// Full request body: the message list with the config flattened beside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub config: ChatConfig,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>, config: ChatConfig) -> Self {
        Self { messages, config }
    }

    /// JSON body to POST to the completions endpoint.
    pub fn to_body(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn header_pairs(&self) -> Vec<(&'static str, &str)> {
        self.config.headers.header_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_routing_shape() {
        let cfg = ChatConfig::fallback(["a/one", "b/two"]);
        let v = serde_json::to_value(&cfg).unwrap();
        assert_eq!(v, json!({"models": ["a/one", "b/two"], "route": "fallback"}));
    }

    #[test]
    fn test_single_routing_shape() {
        let v = serde_json::to_value(ChatConfig::model("openai/gpt-4o")).unwrap();
        assert_eq!(v, json!({"model": "openai/gpt-4o"}));
        assert_eq!(serde_json::to_value(ChatConfig::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_routing_exclusivity() {
        let bad = [
            json!({"route": "fallback"}),
            json!({"route": "fallback", "models": []}),
            json!({"route": "fallback", "models": ["a"], "model": "b"}),
            json!({"models": ["a"]}),
            json!({"route": "round-robin", "models": ["a"]}),
        ];
        for payload in bad {
            assert!(
                serde_json::from_value::<ChatConfig>(payload.clone()).is_err(),
                "accepted {}",
                payload
            );
        }

        let ok: ChatConfig =
            serde_json::from_value(json!({"route": "fallback", "models": ["a", "b"]})).unwrap();
        assert_eq!(ok.routing.candidates(), vec!["a", "b"]);
        assert!(ok.routing.is_fallback());
    }

    #[test]
    fn test_headers_stay_out_of_body() {
        let cfg = ChatConfig::model("m").with_headers(RequestHeaders {
            http_referer: Some("https://example.com".into()),
            x_title: Some("Example".into()),
        });
        let req = ChatRequest::new(vec![Message::user("hi")], cfg);
        let body = req.to_body().unwrap();
        assert!(body.get("headers").is_none());
        assert!(body.get("http_referer").is_none());
        assert_eq!(
            req.header_pairs(),
            vec![("HTTP-Referer", "https://example.com"), ("X-Title", "Example")]
        );
    }

    #[test]
    fn test_logit_bias_keys() {
        let cfg = ChatConfig::model("m").with_logit_bias(50256, -100.0);
        let v = serde_json::to_value(&cfg).unwrap();
        assert_eq!(v["logit_bias"], json!({"50256": -100.0}));

        let req: ChatRequest = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "x"}],
            "model": "m",
            "logit_bias": {"42": 5.5}
        }))
        .unwrap();
        assert_eq!(
            req.config.logit_bias.unwrap().get(&TokenId(42)),
            Some(&5.5)
        );
    }

    #[test]
    fn test_request_body_round_trip() {
        let raw = json!({
            "messages": [{"role": "user", "content": "hello"}],
            "models": ["x/a", "y/b"],
            "route": "fallback",
            "temperature": 0.7,
            "reasoning": {"enabled": true, "effort": "medium"},
            "provider": {"order": ["openai"], "allow_fallbacks": true},
            "plugins": [{"id": "response-healing"}],
            "transforms": ["middle-out"],
            "debug": {"echo_upstream_body": true}
        });
        let req: ChatRequest = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(req.to_body().unwrap(), raw);
    }

    #[test]
    fn test_modalities_only_accept_image_and_text() {
        let ok: ChatConfig =
            serde_json::from_value(json!({"model": "m", "modalities": ["image", "text"]}))
                .unwrap();
        assert_eq!(ok.modalities, Some(ImageAndText));
        assert_eq!(
            serde_json::to_value(&ok).unwrap()["modalities"],
            json!(["image", "text"])
        );

        for bad in [json!(["text"]), json!(["image", "image", "image"]), json!([])] {
            let payload = json!({"model": "m", "modalities": bad});
            assert!(
                serde_json::from_value::<ChatConfig>(payload.clone()).is_err(),
                "accepted {}",
                payload
            );
        }
    }

    #[test]
    fn test_merge_overlays_set_fields() {
        let base = ChatConfig::model("base/model")
            .with_temperature(0.3)
            .with_max_tokens(100);
        let over = ChatConfig {
            temperature: Some(0.9),
            ..ChatConfig::default()
        };
        let merged = base.merge(over);
        assert_eq!(merged.temperature, Some(0.9));
        assert_eq!(merged.max_tokens, Some(100));
        assert_eq!(merged.routing.candidates(), vec!["base/model"]);
    }
}
