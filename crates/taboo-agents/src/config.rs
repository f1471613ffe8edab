//! Reasoning-endpoint configuration.
//!
//! Everything comes from the environment with working local defaults, so
//! `taboo play` against a llama.cpp or proxy endpoint needs no flags at all.

use std::time::Duration;

/// OpenAI-compatible chat endpoint plus the two model tiers.
///
/// The heavier model drives the creative roles (cluer, guessers, card
/// generation); the fast model handles the cheap classification calls
/// (buzzer, judge).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL up to and including the API version, e.g. `http://host:8080/v1`.
    pub base_url: String,
    /// Bearer token; empty means the endpoint is unauthenticated.
    pub api_key: String,
    pub model: String,
    pub fast_model: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("TABOO_LLM_URL")
                .unwrap_or_else(|_| "http://localhost:8080/v1".into()),
            api_key: std::env::var("TABOO_LLM_API_KEY").unwrap_or_default(),
            model: std::env::var("TABOO_LLM_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".into()),
            fast_model: std::env::var("TABOO_LLM_FAST_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-lite".into()),
            timeout: Duration::from_secs(120),
        }
    }
}

impl LlmConfig {
    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_tolerates_trailing_slash() {
        let mut config = LlmConfig::default();
        config.base_url = "http://host:8080/v1/".into();
        assert_eq!(config.chat_url(), "http://host:8080/v1/chat/completions");
    }
}
