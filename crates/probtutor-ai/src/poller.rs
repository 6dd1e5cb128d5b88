//! Waits for a run to leave its pending states.
//!
//! The budget is measured from the first fetch and checked after every
//! sleep. A run that exceeds it is abandoned locally and never cancelled
//! remotely, so it may still complete later on the service side.

use std::time::Duration;

use probtutor_common::{Event, EventBus};
use tokio::time::Instant;

use crate::types::{Run, RunId, RunStatus, ThreadId};
use crate::{AiError, AssistantService};

/// What to do when a run stops in `requires_action`.
///
/// The tutor never registers function tools, so the service should never
/// ask for outputs. `Wait` keeps polling until the budget runs out;
/// `FailFast` returns the run immediately so the caller can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequiresAction {
    #[default]
    Wait,
    FailFast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_wait: Duration,
    /// Multiplier applied to the interval after every sleep; 1.0 is fixed.
    pub backoff_factor: f64,
    /// Upper bound for the interval once backoff kicks in.
    pub max_interval: Duration,
    pub requires_action: RequiresAction,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(60),
            backoff_factor: 1.0,
            max_interval: Duration::from_secs(10),
            requires_action: RequiresAction::Wait,
        }
    }
}

/// Floor for the sleep between fetches.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);
/// Ceiling for `backoff_factor`.
pub const MAX_BACKOFF_FACTOR: f64 = 4.0;

impl PollSettings {
    fn first_interval(&self) -> Duration {
        self.interval.max(MIN_INTERVAL)
    }

    fn keeps_waiting(&self, status: RunStatus) -> bool {
        match status {
            RunStatus::Queued | RunStatus::InProgress => true,
            RunStatus::RequiresAction => self.requires_action == RequiresAction::Wait,
            _ => false,
        }
    }

    fn next_interval(&self, current: Duration) -> Duration {
        if self.backoff_factor <= 1.0 || self.backoff_factor.is_nan() {
            return current;
        }
        let factor = self.backoff_factor.min(MAX_BACKOFF_FACTOR);
        Duration::try_from_secs_f64(current.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX)
            .min(self.max_interval.max(current))
    }
}

pub struct RunPoller<'a> {
    service: &'a dyn AssistantService,
    settings: &'a PollSettings,
    events: Option<&'a EventBus>,
}

impl<'a> RunPoller<'a> {
    pub fn new(service: &'a dyn AssistantService, settings: &'a PollSettings) -> Self {
        Self {
            service,
            settings,
            events: None,
        }
    }

    pub fn with_events(mut self, events: &'a EventBus) -> Self {
        self.events = Some(events);
        self
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = self.events {
            bus.publish(event);
        }
    }

    /// Fetch, and while pending sleep then fetch again.
    ///
    /// Returns the first non-pending run, or `AiError::Timeout` once the
    /// time since the first fetch exceeds `max_wait`. Service errors from a
    /// fetch are propagated as-is.
    pub async fn wait(&self, thread: &ThreadId, run_id: &RunId) -> Result<Run, AiError> {
        let started = Instant::now();
        let mut waited = Duration::ZERO;
        let mut interval = self.settings.first_interval();

        loop {
            let run = self.service.retrieve_run(thread, run_id).await?;
            tracing::debug!(
                run_id = %run_id,
                status = %run.status,
                waited_ms = waited.as_millis() as u64,
                "run polled"
            );
            self.publish(Event::RunPolled {
                run_id: run_id.to_string(),
                status: run.status.to_string(),
                waited_ms: waited.as_millis() as u64,
            });

            if !self.settings.keeps_waiting(run.status) {
                self.publish(Event::RunFinished {
                    run_id: run_id.to_string(),
                    status: run.status.to_string(),
                });
                return Ok(run);
            }

            tokio::time::sleep(interval).await;
            waited = started.elapsed();
            if waited > self.settings.max_wait {
                tracing::warn!(
                    run_id = %run_id,
                    waited_secs = waited.as_secs(),
                    "giving up on run; it is left running remotely"
                );
                self.publish(Event::RunTimedOut {
                    run_id: run_id.to_string(),
                    waited_ms: waited.as_millis() as u64,
                });
                return Err(AiError::Timeout {
                    waited,
                    budget: self.settings.max_wait,
                });
            }
            interval = self.settings.next_interval(interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedService;
    use crate::types::AssistantId;

    async fn start_run(service: &ScriptedService) -> (ThreadId, RunId) {
        let thread = service.create_thread().await.unwrap();
        let run = service
            .create_run(&thread, &AssistantId::from("asst_test"))
            .await
            .unwrap();
        (thread, run.id)
    }

    #[tokio::test(start_paused = true)]
    async fn three_fetches_for_queued_in_progress_completed() {
        let service = ScriptedService::new().with_statuses(vec![
            RunStatus::Queued,
            RunStatus::InProgress,
            RunStatus::Completed,
        ]);
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings::default();

        let started = Instant::now();
        let run = RunPoller::new(&service, &settings)
            .wait(&thread, &run_id)
            .await
            .unwrap();

        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(service.retrieve_count(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn completed_on_first_fetch_does_not_sleep() {
        let service = ScriptedService::new();
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings::default();

        let started = Instant::now();
        let run = RunPoller::new(&service, &settings)
            .wait(&thread, &run_id)
            .await
            .unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(service.retrieve_count(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn never_completing_run_times_out_after_budget() {
        let service = ScriptedService::new().with_statuses(vec![RunStatus::InProgress]);
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings::default();

        let err = RunPoller::new(&service, &settings)
            .wait(&thread, &run_id)
            .await
            .unwrap_err();

        match err {
            AiError::Timeout { waited, budget } => {
                assert_eq!(budget, Duration::from_secs(60));
                assert_eq!(waited, Duration::from_secs(62));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        // 31 sleeps of 2s; the fetch after the last sleep never happens.
        assert_eq!(service.retrieve_count(), 31);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_is_returned_not_retried() {
        let service = ScriptedService::new()
            .with_statuses(vec![RunStatus::InProgress, RunStatus::Failed]);
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings::default();

        let run = RunPoller::new(&service, &settings)
            .wait(&thread, &run_id)
            .await
            .unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(service.retrieve_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn requires_action_keeps_waiting_by_default() {
        let service = ScriptedService::new().with_statuses(vec![
            RunStatus::RequiresAction,
            RunStatus::Completed,
        ]);
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings::default();

        let run = RunPoller::new(&service, &settings)
            .wait(&thread, &run_id)
            .await
            .unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(service.retrieve_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn requires_action_fail_fast_returns_immediately() {
        let service = ScriptedService::new().with_statuses(vec![RunStatus::RequiresAction]);
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings {
            requires_action: RequiresAction::FailFast,
            ..PollSettings::default()
        };

        let run = RunPoller::new(&service, &settings)
            .wait(&thread, &run_id)
            .await
            .unwrap();
        assert_eq!(run.status, RunStatus::RequiresAction);
        assert_eq!(service.retrieve_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_grows_interval_up_to_cap() {
        let service = ScriptedService::new().with_statuses(vec![
            RunStatus::Queued,
            RunStatus::Queued,
            RunStatus::Queued,
            RunStatus::Queued,
            RunStatus::Completed,
        ]);
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings {
            interval: Duration::from_secs(1),
            backoff_factor: 2.0,
            max_interval: Duration::from_secs(3),
            ..PollSettings::default()
        };

        let started = Instant::now();
        RunPoller::new(&service, &settings)
            .wait(&thread, &run_id)
            .await
            .unwrap();
        // 1 + 2 + 3 + 3
        assert_eq!(started.elapsed(), Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_poll_and_finish_events() {
        let service = ScriptedService::new()
            .with_statuses(vec![RunStatus::InProgress, RunStatus::Completed]);
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings::default();
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        RunPoller::new(&service, &settings)
            .with_events(&bus)
            .wait(&thread, &run_id)
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::RunPolled { waited_ms: 0, ref status, .. } if status == "in_progress"
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::RunPolled { waited_ms: 2000, ref status, .. } if status == "completed"
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::RunFinished { ref status, .. } if status == "completed"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_errors_propagate() {
        let service = ScriptedService::new().failing_retrieve();
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings::default();

        let err = RunPoller::new(&service, &settings)
            .wait(&thread, &run_id)
            .await
            .unwrap_err();
        assert!(err.is_service_error());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_still_reaches_timeout() {
        let service = ScriptedService::new().with_statuses(vec![RunStatus::InProgress]);
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings {
            interval: Duration::ZERO,
            max_wait: Duration::from_millis(50),
            ..PollSettings::default()
        };

        let err = RunPoller::new(&service, &settings)
            .wait(&thread, &run_id)
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Timeout { .. }));
        assert_eq!(service.retrieve_count(), 51);
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_backoff_factor_is_clamped_and_capped() {
        let service = ScriptedService::new().with_statuses(vec![
            RunStatus::Queued,
            RunStatus::Queued,
            RunStatus::Queued,
            RunStatus::Completed,
        ]);
        let (thread, run_id) = start_run(&service).await;
        let settings = PollSettings {
            interval: Duration::from_secs(1),
            backoff_factor: 1e30,
            max_interval: Duration::from_secs(3),
            ..PollSettings::default()
        };

        let started = Instant::now();
        RunPoller::new(&service, &settings)
            .wait(&thread, &run_id)
            .await
            .unwrap();
        // 1 + 3 + 3
        assert_eq!(started.elapsed(), Duration::from_secs(7));
    }

    #[test]
    fn backoff_never_overflows() {
        let settings = PollSettings {
            backoff_factor: f64::INFINITY,
            max_interval: Duration::MAX,
            ..PollSettings::default()
        };
        assert_eq!(
            settings.next_interval(Duration::from_secs(2)),
            Duration::from_secs(8)
        );
        assert_eq!(settings.next_interval(Duration::MAX), Duration::MAX);
    }

    #[test]
    fn fixed_interval_without_backoff() {
        let settings = PollSettings::default();
        assert_eq!(
            settings.next_interval(Duration::from_secs(2)),
            Duration::from_secs(2)
        );
    }
}
