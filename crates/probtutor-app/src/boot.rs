//! Startup: environment, logging, config, and wiring the tutor together.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use probtutor_ai::{
    AiError, AssistantId, AssistantSpec, OpenAiClient, OpenAiConfig, PollSettings,
    RequiresAction, SessionManager, SessionSettings, ToolKind,
};
use probtutor_common::{ConfigError, EventBus};
use probtutor_config::schema::{PollingConfig, ProbTutorConfig, RequiresActionPolicy};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

/// Load `.env` from the working directory; a missing file is fine.
pub fn load_env() {
    let _ = dotenvy::dotenv();
}

/// Filter directive: the CLI override when given, else the configured
/// level for all `probtutor*` targets.
pub fn log_directive(cli: Option<&str>, config: &ProbTutorConfig) -> String {
    match cli {
        Some(directive) => directive.to_string(),
        None => format!("probtutor={}", config.logging.level.as_directive()),
    }
}

pub fn init_logging(directive: &str) {
    let directive: Directive = directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

/// Load config, falling back to defaults. The error, if any, is returned
/// alongside so it can be logged once logging is up.
pub fn load_config(path: Option<&Path>) -> (ProbTutorConfig, Option<ConfigError>) {
    match probtutor_config::load_config(path) {
        Ok(config) => (config, None),
        Err(e) => (ProbTutorConfig::default(), Some(e)),
    }
}

pub fn poll_settings(polling: &PollingConfig) -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(polling.interval_ms),
        max_wait: Duration::from_secs(polling.max_wait_secs),
        backoff_factor: polling.backoff_factor,
        max_interval: Duration::from_millis(polling.max_interval_ms),
        requires_action: match polling.requires_action {
            RequiresActionPolicy::Wait => RequiresAction::Wait,
            RequiresActionPolicy::FailFast => RequiresAction::FailFast,
        },
    }
}

pub fn session_settings(config: &ProbTutorConfig) -> SessionSettings {
    let assistant = &config.assistant;
    let mut tools = Vec::new();
    if assistant.code_interpreter {
        tools.push(ToolKind::CodeInterpreter);
    }
    SessionSettings {
        assistant: AssistantSpec {
            name: assistant.name.clone(),
            instructions: assistant.instructions.clone(),
            model: assistant.model.clone(),
            tools,
        },
        existing_assistant: assistant
            .assistant_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(AssistantId::from),
        poll: poll_settings(&config.polling),
        history_limit: config.history.max_entries,
    }
}

/// Build a session manager over the OpenAI API. Fails with
/// `NotConfigured` when no API key is available.
pub fn connect(config: &ProbTutorConfig, events: Arc<EventBus>) -> Result<SessionManager, AiError> {
    let openai = OpenAiConfig::from_env()?
        .with_api_base(config.assistant.api_base.clone())
        .with_request_timeout(Duration::from_secs(u64::from(
            config.assistant.request_timeout_secs,
        )));
    tracing::debug!(?openai, "OpenAI client configured");
    let client = OpenAiClient::new(openai);
    Ok(SessionManager::new(Arc::new(client), session_settings(config)).with_events(events))
}
