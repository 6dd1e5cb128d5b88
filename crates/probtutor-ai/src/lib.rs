//! Tutoring engine for ProbTutor.
//!
//! Drives one conversation against a hosted assistant with a code-execution
//! tool:
//! - `SessionManager` owns the assistant id, the active thread and the
//!   bounded local history
//! - `RunPoller` waits for a run to leave the pending states under a
//!   client-side budget
//! - `ResponseExtractor` pulls the first text answer and any generated
//!   images out of the latest assistant message
//! - `OpenAiClient` implements `AssistantService` over the OpenAI
//!   Assistants HTTP API

pub mod extractor;
pub mod history;
pub mod openai;
pub mod poller;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;
pub mod usage;

use std::time::Duration;

use async_trait::async_trait;

pub use extractor::{Extracted, ResolvedImage, ResponseExtractor};
pub use history::{HistoryEntry, HistoryStore, MAX_CONVERSATION_LENGTH};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use poller::{PollSettings, RequiresAction, RunPoller};
pub use session::{Reply, SessionManager, SessionSettings, TurnOutcome};
pub use types::{
    AssistantId, AssistantSpec, ContentPart, FileId, MessageId, Role, Run, RunError, RunId,
    RunStatus, RunUsage, ThreadId, ThreadMessage, ToolKind,
};
pub use usage::UsageTracker;

/// The hosted assistant service, reduced to the calls the tutor makes.
#[async_trait]
pub trait AssistantService: Send + Sync {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<AssistantId, AiError>;

    async fn create_thread(&self) -> Result<ThreadId, AiError>;

    async fn add_message(
        &self,
        thread: &ThreadId,
        role: Role,
        text: &str,
    ) -> Result<MessageId, AiError>;

    async fn create_run(&self, thread: &ThreadId, assistant: &AssistantId)
        -> Result<Run, AiError>;

    async fn retrieve_run(&self, thread: &ThreadId, run: &RunId) -> Result<Run, AiError>;

    /// Messages of a thread, newest first.
    async fn list_messages(&self, thread: &ThreadId) -> Result<Vec<ThreadMessage>, AiError>;

    async fn file_content(&self, file: &FileId) -> Result<Vec<u8>, AiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("not configured: {0}")]
    NotConfigured(String),
    #[error(
        "run timed out after waiting {}s (limit {}s); it may still finish remotely",
        .waited.as_secs(),
        .budget.as_secs()
    )]
    Timeout { waited: Duration, budget: Duration },
    #[error("run ended with status {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    RunFailed {
        status: RunStatus,
        detail: Option<String>,
    },
    #[error("no text response found in the assistant message")]
    NoTextResponse,
    #[error("could not fetch image {file_id}: {reason}")]
    ImageFetchFailed { file_id: FileId, reason: String },
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl AiError {
    /// Transport or service failures, as opposed to run outcomes.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            AiError::ApiError(_)
                | AiError::RateLimited
                | AiError::NetworkError(_)
                | AiError::ParseError(_)
        )
    }
}
