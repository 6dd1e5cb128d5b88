//! One user turn: message, run, poll, extract, record.

use probtutor_common::{new_correlation_id, Event};
use tracing::{info, warn, Instrument};

use crate::extractor::{answer_for_run, ResponseExtractor};
use crate::poller::RunPoller;
use crate::types::{AssistantId, Role, RunStatus};
use crate::AiError;

use super::manager::{SessionManager, SessionState};
use super::types::{Reply, TurnOutcome};

impl SessionManager {
    /// Send `text` as the user and wait for the assistant's answer.
    ///
    /// `Err` only when no assistant has been provisioned. Every other
    /// failure (timeout, failed run, missing text, transport errors) comes
    /// back as `TurnOutcome::Failed` and leaves the session usable.
    pub async fn send_message(&self, text: &str) -> Result<TurnOutcome, AiError> {
        let mut state = self.state.lock().await;
        let assistant_id = state.assistant_id.clone().ok_or_else(|| {
            AiError::NotConfigured("no assistant has been provisioned".into())
        })?;

        let span = tracing::info_span!(
            "turn",
            cid = %new_correlation_id(),
            thread = tracing::field::Empty
        );
        let outcome = match self
            .run_turn(&mut state, &assistant_id, text)
            .instrument(span)
            .await
        {
            Ok(reply) => {
                state.history.record_turn(text, reply.text.clone());
                let history_len = state.history.len();
                info!(
                    run_id = %reply.run_id,
                    images = reply.images.len(),
                    history_len,
                    "turn answered"
                );
                self.publish(Event::TurnRecorded { history_len });
                TurnOutcome::Answered(reply)
            }
            Err(err) => {
                warn!(error = %err, "turn failed");
                TurnOutcome::Failed(err)
            }
        };
        Ok(outcome)
    }

    async fn run_turn(
        &self,
        state: &mut SessionState,
        assistant_id: &AssistantId,
        text: &str,
    ) -> Result<Reply, AiError> {
        let thread = match &state.thread_id {
            Some(thread) => thread.clone(),
            None => {
                let thread = self.service.create_thread().await?;
                info!(thread_id = %thread, "session started implicitly");
                self.publish(Event::SessionStarted {
                    thread_id: thread.to_string(),
                });
                state.thread_id = Some(thread.clone());
                thread
            }
        };
        tracing::Span::current().record("thread", tracing::field::display(&thread));

        self.service.add_message(&thread, Role::User, text).await?;
        let run = self.service.create_run(&thread, assistant_id).await?;
        tracing::debug!(run_id = %run.id, "run created");
        self.publish(Event::RunStarted {
            thread_id: thread.to_string(),
            run_id: run.id.to_string(),
        });

        let mut poller = RunPoller::new(self.service.as_ref(), &self.settings.poll);
        if let Some(bus) = self.events.as_deref() {
            poller = poller.with_events(bus);
        }
        let run = poller.wait(&thread, &run.id).await?;

        if run.status != RunStatus::Completed {
            return Err(AiError::RunFailed {
                status: run.status,
                detail: run.last_error.as_ref().map(ToString::to_string),
            });
        }
        if let Some(usage) = &run.usage {
            state.usage.record(usage);
        }

        let messages = self.service.list_messages(&thread).await?;
        let latest = answer_for_run(&messages, &run.id).ok_or(AiError::NoTextResponse)?;

        let mut extractor = ResponseExtractor::new(self.service.as_ref());
        if let Some(bus) = self.events.as_deref() {
            extractor = extractor.with_events(bus);
        }
        let extracted = extractor.extract(latest).await?;

        Ok(Reply {
            text: extracted.text,
            images: extracted.images,
            thread_id: thread,
            run_id: run.id,
            usage: run.usage,
        })
    }
}
