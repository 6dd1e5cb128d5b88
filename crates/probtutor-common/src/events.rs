//! Progress events emitted by the tutoring session.
//!
//! The session core never prints. It publishes `Event`s on an `EventBus`
//! and front ends subscribe to render progress however they like.

use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    AssistantReady {
        assistant_id: String,
    },
    SessionStarted {
        thread_id: String,
    },
    RunStarted {
        thread_id: String,
        run_id: String,
    },
    /// One status fetch of a run; `waited_ms` is the time since the first fetch.
    RunPolled {
        run_id: String,
        status: String,
        waited_ms: u64,
    },
    RunFinished {
        run_id: String,
        status: String,
    },
    RunTimedOut {
        run_id: String,
        waited_ms: u64,
    },
    ImageResolved {
        file_id: String,
        bytes: usize,
    },
    ImageSkipped {
        file_id: String,
        reason: String,
    },
    TurnRecorded {
        history_len: usize,
    },
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        tracing::trace!(?event, "publish");
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
