//! Reasoning-token controls.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    High,
    Medium,
    Low,
}

/// How much reasoning to spend: a coarse effort level or an explicit token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningBudget {
    Effort(ReasoningEffort),
    MaxTokens(u32),
}

/// `reasoning` request block.
///
/// On the wire `effort` and `max_tokens` are sibling keys; a payload carrying
/// both is rejected when parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReasoningRepr", into = "ReasoningRepr")]
pub struct Reasoning {
    pub enabled: Option<bool>,
    /// Reason internally but leave the trace out of the response.
    pub exclude: Option<bool>,
    pub budget: Option<ReasoningBudget>,
}

impl Reasoning {
    pub fn effort(effort: ReasoningEffort) -> Self {
        Self {
            budget: Some(ReasoningBudget::Effort(effort)),
            ..Self::default()
        }
    }

    pub fn max_tokens(max_tokens: u32) -> Self {
        Self {
            budget: Some(ReasoningBudget::MaxTokens(max_tokens)),
            ..Self::default()
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn exclude(mut self, exclude: bool) -> Self {
        self.exclude = Some(exclude);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReasoningRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exclude: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    effort: Option<ReasoningEffort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl TryFrom<ReasoningRepr> for Reasoning {
    type Error = String;

    fn try_from(repr: ReasoningRepr) -> Result<Self, Self::Error> {
        let budget = match (repr.effort, repr.max_tokens) {
            (Some(_), Some(_)) => {
                return Err("reasoning: `effort` and `max_tokens` are mutually exclusive".into())
            }
            (Some(effort), None) => Some(ReasoningBudget::Effort(effort)),
            (None, Some(max)) => Some(ReasoningBudget::MaxTokens(max)),
            (None, None) => None,
        };
        Ok(Self {
            enabled: repr.enabled,
            exclude: repr.exclude,
            budget,
        })
    }
}

impl From<Reasoning> for ReasoningRepr {
    fn from(r: Reasoning) -> Self {
        let (effort, max_tokens) = match r.budget {
            Some(ReasoningBudget::Effort(e)) => (Some(e), None),
            Some(ReasoningBudget::MaxTokens(m)) => (None, Some(m)),
            None => (None, None),
        };
        Self {
            exclude: r.exclude,
            enabled: r.enabled,
            effort,
            max_tokens,
        }
    }
}
