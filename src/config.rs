// Configuration, loaded from environment variables (with .env support via
// dotenvy in main). Held as an explicit struct rather than globals so tests
// can point the client at a mock server.

use std::env;

pub const DEFAULT_PORT: u16 = 9900;
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1";

/// Settings for the OpenAI-compatible completion API.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL up to (not including) `/chat/completions`.
    pub api_base: String,
    pub api_key: String,
    /// Model used for the assistant reply.
    pub chat_model: String,
    /// Model used for the importance/duration classification call.
    pub classifier_model: String,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let chat_model =
            env::var("MULL_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());
        Self {
            api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            // The classifier defaults to the chat model unless overridden.
            classifier_model: env::var("MULL_CLASSIFIER_MODEL")
                .unwrap_or_else(|_| chat_model.clone()),
            chat_model,
        }
    }

    /// Config aimed at an arbitrary endpoint, for tests and local gateways.
    pub fn for_endpoint(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: String::new(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            classifier_model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_joins_cleanly() {
        let cfg = LlmConfig::for_endpoint("http://127.0.0.1:8080/v1/");
        assert_eq!(
            cfg.completions_url(),
            "http://127.0.0.1:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_for_endpoint_uses_default_models() {
        let cfg = LlmConfig::for_endpoint("http://localhost:1234");
        assert_eq!(cfg.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(cfg.classifier_model, DEFAULT_CHAT_MODEL);
    }
}
