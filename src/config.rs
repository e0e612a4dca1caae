use std::env;

/// Connection details for an OpenAI-compatible model API.
///
/// Read from the environment so the same binary works against OpenAI,
/// a local gateway, or nothing at all. When `BERRYVISION_AI_API_KEY` is
/// unset the server runs without AI interpretation.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
}

impl AiConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("BERRYVISION_AI_API_KEY").ok()?;
        Some(Self {
            api_key,
            base_url: env::var("BERRYVISION_AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            chat_model: env::var("BERRYVISION_AI_CHAT_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            embedding_model: env::var("BERRYVISION_AI_EMBEDDING_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
        })
    }
}

/// Thresholds driving alert emission.
#[derive(Debug, Clone)]
pub struct AlertThresholds {
    /// Health score below which an AI-flagged issue is critical.
    pub critical_health_score: i32,
    /// Days the previous record must span for negative growth to count
    /// as a sustained decline.
    pub stunted_growth_days: i64,
    pub temperature_min_c: f64,
    pub temperature_max_c: f64,
    pub humidity_min_pct: f64,
    pub humidity_max_pct: f64,
    pub soil_moisture_min_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            critical_health_score: 40,
            stunted_growth_days: 7,
            temperature_min_c: 2.0,
            temperature_max_c: 38.0,
            humidity_min_pct: 20.0,
            humidity_max_pct: 95.0,
            soil_moisture_min_pct: 15.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_default_ranges_are_ordered() {
        let t = AlertThresholds::default();
        assert!(t.temperature_min_c < t.temperature_max_c);
        assert!(t.humidity_min_pct < t.humidity_max_pct);
        assert!(t.critical_health_score > 0 && t.critical_health_score < 100);
    }
}
