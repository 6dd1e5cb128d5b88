//! Session settings and turn results.

use crate::extractor::ResolvedImage;
use crate::history::MAX_CONVERSATION_LENGTH;
use crate::poller::PollSettings;
use crate::types::{AssistantId, AssistantSpec, RunId, RunUsage, ThreadId, ToolKind};
use crate::AiError;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub assistant: AssistantSpec,
    /// Reuse this hosted assistant instead of creating one.
    pub existing_assistant: Option<AssistantId>,
    pub poll: PollSettings,
    pub history_limit: usize,
}

impl SessionSettings {
    pub fn new(assistant: AssistantSpec) -> Self {
        Self {
            assistant,
            existing_assistant: None,
            poll: PollSettings::default(),
            history_limit: MAX_CONVERSATION_LENGTH,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new(AssistantSpec {
            name: "ProbTutor".into(),
            instructions: String::new(),
            model: "gpt-4o".into(),
            tools: vec![ToolKind::CodeInterpreter],
        })
    }
}

/// A successful turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub images: Vec<ResolvedImage>,
    pub thread_id: ThreadId,
    pub run_id: RunId,
    pub usage: Option<RunUsage>,
}

/// Result of one user turn. Failures are values so the caller's loop can
/// show them and carry on.
#[derive(Debug)]
pub enum TurnOutcome {
    Answered(Reply),
    Failed(AiError),
}

impl TurnOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, TurnOutcome::Answered(_))
    }

    pub fn reply(&self) -> Option<&Reply> {
        match self {
            TurnOutcome::Answered(reply) => Some(reply),
            TurnOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AiError> {
        match self {
            TurnOutcome::Answered(_) => None,
            TurnOutcome::Failed(err) => Some(err),
        }
    }

    /// Text to show the user: the answer, or a description of the failure.
    pub fn message(&self) -> String {
        match self {
            TurnOutcome::Answered(reply) => reply.text.clone(),
            TurnOutcome::Failed(err) => format!("Sorry, no answer this time: {err}"),
        }
    }
}
