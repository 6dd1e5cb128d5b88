//! OpenAI client configuration.

use std::fmt;
use std::time::Duration;

use crate::AiError;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_base: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Read the API key from the process environment.
    pub fn from_env() -> Result<Self, AiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AiError> {
        match lookup(API_KEY_VAR) {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(AiError::NotConfigured(format!(
                "{API_KEY_VAR} is not set. Add it to your environment or a .env file."
            ))),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let config = OpenAiConfig::new("sk-very-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn missing_key_is_not_configured() {
        let err = OpenAiConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, AiError::NotConfigured(ref msg) if msg.contains(API_KEY_VAR)));
    }

    #[test]
    fn blank_key_is_not_configured() {
        let err = OpenAiConfig::from_lookup(|_| Some("  ".into())).unwrap_err();
        assert!(matches!(err, AiError::NotConfigured(_)));
    }

    #[test]
    fn key_is_trimmed_and_defaults_apply() {
        let config = OpenAiConfig::from_lookup(|name| {
            (name == API_KEY_VAR).then(|| "sk-abc\n".to_string())
        })
        .unwrap();
        assert_eq!(config.api_key, "sk-abc");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn builders_override_defaults() {
        let config = OpenAiConfig::new("k")
            .with_api_base("http://localhost:8080/v1")
            .with_request_timeout(Duration::from_secs(5));
        assert_eq!(config.api_base, "http://localhost:8080/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
