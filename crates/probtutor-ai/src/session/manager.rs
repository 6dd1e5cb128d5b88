//! SessionManager struct, provisioning and thread lifecycle.

use std::sync::Arc;

use probtutor_common::{Event, EventBus};
use tokio::sync::Mutex;
use tracing::info;

use crate::history::{HistoryEntry, HistoryStore};
use crate::types::{AssistantId, RunUsage, ThreadId};
use crate::usage::UsageTracker;
use crate::{AiError, AssistantService};

use super::types::SessionSettings;

pub(super) struct SessionState {
    pub(super) assistant_id: Option<AssistantId>,
    pub(super) thread_id: Option<ThreadId>,
    pub(super) history: HistoryStore,
    pub(super) usage: UsageTracker,
}

/// One conversation with a hosted assistant.
///
/// All mutable state sits behind one async mutex that a turn holds from
/// start to finish, so concurrent `send_message` calls on the same manager
/// run one after the other.
pub struct SessionManager {
    pub(super) service: Arc<dyn AssistantService>,
    pub(super) settings: SessionSettings,
    pub(super) events: Option<Arc<EventBus>>,
    pub(super) state: Mutex<SessionState>,
}

impl SessionManager {
    pub fn new(service: Arc<dyn AssistantService>, settings: SessionSettings) -> Self {
        let state = SessionState {
            assistant_id: None,
            thread_id: None,
            history: HistoryStore::new(settings.history_limit),
            usage: UsageTracker::new(),
        };
        Self {
            service,
            settings,
            events: None,
            state: Mutex::new(state),
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub(super) fn publish(&self, event: Event) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }

    /// Create the hosted assistant, or adopt the configured existing one.
    ///
    /// On failure the manager stays unconfigured and `send_message` keeps
    /// returning `NotConfigured`.
    pub async fn provision_assistant(&self) -> Result<AssistantId, AiError> {
        let id = match &self.settings.existing_assistant {
            Some(id) => {
                info!(assistant_id = %id, "using existing assistant");
                id.clone()
            }
            None => {
                let id = self.service.create_assistant(&self.settings.assistant).await?;
                info!(
                    assistant_id = %id,
                    name = %self.settings.assistant.name,
                    model = %self.settings.assistant.model,
                    "assistant created"
                );
                id
            }
        };
        self.state.lock().await.assistant_id = Some(id.clone());
        self.publish(Event::AssistantReady {
            assistant_id: id.to_string(),
        });
        Ok(id)
    }

    pub async fn is_configured(&self) -> bool {
        self.state.lock().await.assistant_id.is_some()
    }

    /// Start a fresh thread, replacing the current one and clearing history.
    pub async fn start_session(&self) -> Result<ThreadId, AiError> {
        let mut state = self.state.lock().await;
        let thread = self.service.create_thread().await?;
        state.thread_id = Some(thread.clone());
        state.history.clear();
        info!(thread_id = %thread, "session started");
        self.publish(Event::SessionStarted {
            thread_id: thread.to_string(),
        });
        Ok(thread)
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().await.history.to_vec()
    }

    pub async fn thread_id(&self) -> Option<ThreadId> {
        self.state.lock().await.thread_id.clone()
    }

    pub async fn assistant_id(&self) -> Option<AssistantId> {
        self.state.lock().await.assistant_id.clone()
    }

    pub async fn usage_total(&self) -> RunUsage {
        self.state.lock().await.usage.total()
    }

    pub async fn usage_summary(&self) -> String {
        self.state.lock().await.usage.summary()
    }
}
