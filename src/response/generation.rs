//! Post-hoc generation statistics, fetched separately by generation id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub data: GenerationData,
}

/// Billing and telemetry for one completed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationData {
    pub id: String,
    pub model: String,
    /// Always `false`; stats are only reported for non-streamed generations.
    #[serde(deserialize_with = "literal_false")]
    pub streamed: bool,
    /// Milliseconds spent generating.
    pub generation_time: u64,
    pub created_at: DateTime<Utc>,
    pub tokens_prompt: u32,
    pub tokens_completion: u32,
    pub native_tokens_prompt: u32,
    pub native_tokens_completion: u32,
    pub num_media_prompt: Option<u32>,
    pub num_media_completion: Option<u32>,
    pub origin: String,
    /// USD
    pub total_cost: f64,
    pub cache_discount: Option<f64>,
}

fn literal_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match bool::deserialize(deserializer)? {
        false => Ok(false),
        true => Err(serde::de::Error::custom("`streamed` must be false")),
    }
}

impl GenerationData {
    pub fn total_tokens(&self) -> u64 {
        u64::from(self.tokens_prompt) + u64::from(self.tokens_completion)
    }

    pub fn total_native_tokens(&self) -> u64 {
        u64::from(self.native_tokens_prompt) + u64::from(self.native_tokens_completion)
    }

    pub fn generation_duration(&self) -> Duration {
        Duration::from_millis(self.generation_time)
    }

    /// Cost per thousand native tokens, `None` when no tokens were billed.
    pub fn cost_per_1k_native_tokens(&self) -> Option<f64> {
        match self.total_native_tokens() {
            0 => None,
            n => Some(self.total_cost / n as f64 * 1000.0),
        }
    }

    /// Completion tokens per second of generation time.
    pub fn throughput(&self) -> Option<f64> {
        let secs = self.generation_duration().as_secs_f64();
        (secs > 0.0).then(|| self.tokens_completion as f64 / secs)
    }

    pub fn format_cost(&self) -> String {
        if self.total_cost < 0.01 {
            format!("{:.4}¢", self.total_cost * 100.0)
        } else {
            format!("${:.4}", self.total_cost)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "data": {
                "id": "gen-123",
                "model": "openai/gpt-4o",
                "streamed": false,
                "generation_time": 2000,
                "created_at": "2024-05-01T12:00:00Z",
                "tokens_prompt": 100,
                "tokens_completion": 50,
                "native_tokens_prompt": 120,
                "native_tokens_completion": 80,
                "num_media_prompt": null,
                "num_media_completion": null,
                "origin": "https://example.com",
                "total_cost": 0.002,
                "cache_discount": null
            }
        })
    }

    #[test]
    fn test_parse_stats() {
        let stats: GenerationStats = serde_json::from_value(sample()).unwrap();
        let d = &stats.data;
        assert_eq!(d.total_tokens(), 150);
        assert_eq!(d.total_native_tokens(), 200);
        assert_eq!(d.generation_duration(), Duration::from_secs(2));
        assert_eq!(d.throughput(), Some(25.0));
        assert!((d.cost_per_1k_native_tokens().unwrap() - 0.01).abs() < 1e-12);
        assert_eq!(d.created_at.timestamp(), 1_714_564_800);
        assert_eq!(d.format_cost(), "0.2000¢");
    }

    #[test]
    fn test_token_totals_do_not_overflow() {
        let mut raw = sample();
        raw["data"]["tokens_prompt"] = json!(4_000_000_000u32);
        raw["data"]["tokens_completion"] = json!(500_000_000u32);
        raw["data"]["native_tokens_prompt"] = json!(u32::MAX);
        raw["data"]["native_tokens_completion"] = json!(u32::MAX);
        let stats: GenerationStats = serde_json::from_value(raw).unwrap();
        assert_eq!(stats.data.total_tokens(), 4_500_000_000);
        assert_eq!(stats.data.total_native_tokens(), 2 * u64::from(u32::MAX));
        assert!(stats.data.cost_per_1k_native_tokens().is_some());
    }

    #[test]
    fn test_streamed_must_be_false() {
        let mut raw = sample();
        raw["data"]["streamed"] = json!(true);
        assert!(serde_json::from_value::<GenerationStats>(raw).is_err());
    }

    #[test]
    fn test_nulls_round_trip() {
        let stats: GenerationStats = serde_json::from_value(sample()).unwrap();
        let back = serde_json::to_value(&stats).unwrap();
        assert!(back["data"]["num_media_prompt"].is_null());
        assert!(back["data"]["cache_discount"].is_null());
    }
}
