//! Configuration schema types for ProbTutor.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the tutor ships with.

mod assistant;
mod console;
mod docqa;
mod history;
mod polling;
mod system;

pub use assistant::*;
pub use console::*;
pub use docqa::*;
pub use history::*;
pub use polling::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for ProbTutor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbTutorConfig {
    pub assistant: AssistantConfig,
    pub polling: PollingConfig,
    pub history: HistoryConfig,
    pub console: ConsoleConfig,
    pub docqa: DocQaConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_assistant_matches_tutor() {
        let config = ProbTutorConfig::default();
        assert_eq!(config.assistant.name, "ProbTutor");
        assert_eq!(config.assistant.model, "gpt-4o");
        assert!(config.assistant.code_interpreter);
        assert!(config.assistant.assistant_id.is_none());
        assert!(config.assistant.instructions.contains("ProbTutor"));
        assert_eq!(config.assistant.api_base, "https://api.openai.com/v1");
    }

    #[test]
    fn default_polling_is_fixed_two_seconds_within_a_minute() {
        let config = ProbTutorConfig::default();
        assert_eq!(config.polling.interval_ms, 2000);
        assert_eq!(config.polling.max_wait_secs, 60);
        assert_eq!(config.polling.backoff_factor, 1.0);
        assert_eq!(config.polling.requires_action, RequiresActionPolicy::Wait);
    }

    #[test]
    fn default_console_bounds() {
        let config = ProbTutorConfig::default();
        assert_eq!(config.history.max_entries, 50);
        assert_eq!(config.console.min_input_chars, 3);
        assert_eq!(config.console.max_input_chars, 1000);
        assert!(config.console.show_progress);
    }

    #[test]
    fn default_docqa_pipeline() {
        let config = ProbTutorConfig::default();
        assert_eq!(config.docqa.chunk_size, 1000);
        assert_eq!(config.docqa.chunk_overlap, 100);
        assert_eq!(config.docqa.top_k, 4);
        assert_eq!(config.docqa.chat_model, "gemma3:4b");
        assert_eq!(config.docqa.embedding_model, "all-minilm");
        assert!(config.docqa.normalize_embeddings);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: ProbTutorConfig = toml::from_str(
            r#"
[polling]
max_wait_secs = 120
requires_action = "fail_fast"
"#,
        )
        .unwrap();
        assert_eq!(config.polling.max_wait_secs, 120);
        assert_eq!(config.polling.interval_ms, 2000);
        assert_eq!(config.polling.requires_action, RequiresActionPolicy::FailFast);
        assert_eq!(config.history.max_entries, 50);
    }

    #[test]
    fn log_level_parses_lowercase() {
        let config: ProbTutorConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.level.as_directive(), "debug");
    }
}
