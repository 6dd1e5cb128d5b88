//! Interactive chat console.
//!
//! Reads one line at a time, filters it through the `InputGate`, and hands
//! accepted questions to the `SessionManager`. A failed turn is printed and
//! the loop carries on; only a termination word, end of input or the
//! shutdown signal ends it.

pub mod input;
pub mod render;

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;

use probtutor_ai::{SessionManager, TurnOutcome};
use probtutor_common::{Event, EventBus};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast;
use tracing::info;

use input::{ConsoleCommand, InputDecision, InputGate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    EndOfInput,
    Interrupted,
}

pub struct ChatConsole<'a, W: Write> {
    manager: &'a SessionManager,
    gate: InputGate,
    image_dir: PathBuf,
    events: Option<&'a EventBus>,
    out: W,
}

impl<'a, W: Write> ChatConsole<'a, W> {
    pub fn new(manager: &'a SessionManager, gate: InputGate, image_dir: PathBuf, out: W) -> Self {
        Self {
            manager,
            gate,
            image_dir,
            events: None,
            out,
        }
    }

    /// Render run progress from this bus while a turn is in flight.
    pub fn with_progress(mut self, events: &'a EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub async fn run<R, S>(&mut self, input: R, shutdown: S) -> std::io::Result<ExitReason>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        let mut lines = input.lines();
        tokio::pin!(shutdown);

        let reason = loop {
            write!(self.out, "\nYou: ")?;
            self.out.flush()?;

            let line = tokio::select! {
                biased;
                _ = &mut shutdown => break ExitReason::Interrupted,
                line = lines.next_line() => line?,
            };
            let Some(line) = line else {
                break ExitReason::EndOfInput;
            };

            match self.gate.classify(&line) {
                InputDecision::Empty => writeln!(self.out, "Please type a question.")?,
                InputDecision::Quit => break ExitReason::Quit,
                InputDecision::TooShort { min, .. } => writeln!(
                    self.out,
                    "That is too short. Please ask with at least {min} characters."
                )?,
                InputDecision::TooLong { len, max } => writeln!(
                    self.out,
                    "That is too long ({len} characters). Please keep it to {max}."
                )?,
                InputDecision::Command(command) => self.command(command).await?,
                InputDecision::Accept(question) => {
                    if !self.ask(question, &mut shutdown).await? {
                        break ExitReason::Interrupted;
                    }
                }
            }
        };

        info!(?reason, "console closed");
        writeln!(self.out, "\nGoodbye! Keep practising probability.")?;
        self.out.flush()?;
        Ok(reason)
    }

    /// Run one turn. Returns `false` when shutdown arrived first.
    async fn ask<S>(
        &mut self,
        question: &str,
        shutdown: &mut std::pin::Pin<&mut S>,
    ) -> std::io::Result<bool>
    where
        S: Future<Output = ()>,
    {
        let manager = self.manager;
        let mut events = self.events.map(EventBus::subscribe);
        let turn = manager.send_message(question);
        tokio::pin!(turn);

        let result = loop {
            tokio::select! {
                biased;
                _ = shutdown.as_mut() => return Ok(false),
                event = next_event(&mut events) => self.progress(&event)?,
                result = &mut turn => break result,
            }
        };
        if let Some(rx) = events.as_mut() {
            while let Ok(event) = rx.try_recv() {
                self.progress(&event)?;
            }
        }

        match result {
            Ok(TurnOutcome::Answered(reply)) => {
                writeln!(self.out, "\nProbTutor: {}", reply.text)?;
                for path in render::save_images(&self.image_dir, &reply.images).await {
                    writeln!(self.out, "[chart saved to {}]", path.display())?;
                }
            }
            Ok(outcome @ TurnOutcome::Failed(_)) => {
                writeln!(self.out, "\nProbTutor: {}", outcome.message())?;
            }
            Err(err) => {
                writeln!(self.out, "\nProbTutor is not ready: {err}")?;
            }
        }
        Ok(true)
    }

    fn progress(&mut self, event: &Event) -> std::io::Result<()> {
        if let Some(line) = render::progress_line(event) {
            writeln!(self.out, "  .. {line}")?;
        }
        Ok(())
    }

    async fn command(&mut self, command: ConsoleCommand) -> std::io::Result<()> {
        match command {
            ConsoleCommand::History => {
                let entries = self.manager.history().await;
                writeln!(self.out, "{}", render::history(&entries))?;
            }
            ConsoleCommand::New => match self.manager.start_session().await {
                Ok(_) => writeln!(self.out, "Started a new conversation.")?,
                Err(err) => writeln!(self.out, "Could not start a new conversation: {err}")?,
            },
            ConsoleCommand::Usage => {
                let summary = self.manager.usage_summary().await;
                writeln!(self.out, "Token usage: {summary}")?;
            }
            ConsoleCommand::Help => writeln!(self.out, "{}", render::help(&self.gate))?,
        }
        Ok(())
    }
}

/// Next event from an optional receiver; never resolves without one.
async fn next_event(rx: &mut Option<broadcast::Receiver<Event>>) -> Event {
    let Some(rx) = rx else {
        return std::future::pending().await;
    };
    loop {
        match rx.recv().await {
            Ok(event) => return event,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return std::future::pending().await,
        }
    }
}
