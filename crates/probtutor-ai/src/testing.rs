//! In-memory stand-in for the hosted assistant service.
//!
//! Every run follows the same status script (the last status repeats
//! forever). When a run is first observed as `completed` the next queued
//! reply is appended to its thread as an assistant message tagged with the
//! run id; without a queued reply the assistant echoes the latest user
//! message. A queued silent reply completes the run without posting.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::types::{
    AssistantId, AssistantSpec, ContentPart, FileId, MessageId, Role, Run, RunError, RunId,
    RunStatus, RunUsage, ThreadId, ThreadMessage,
};
use crate::{AiError, AssistantService};

/// One call made against a `ScriptedService`, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateAssistant { name: String },
    CreateThread,
    AddMessage { thread: ThreadId, text: String },
    CreateRun { thread: ThreadId },
    RetrieveRun { run: RunId },
    ListMessages { thread: ThreadId },
    FileContent { file: FileId },
}

struct RunState {
    thread: ThreadId,
    fetches: usize,
    delivered: bool,
}

#[derive(Default)]
struct State {
    next_id: u64,
    threads: HashMap<ThreadId, Vec<ThreadMessage>>,
    runs: HashMap<RunId, RunState>,
    replies: VecDeque<Option<Vec<ContentPart>>>,
    calls: Vec<Call>,
}

impl State {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{}", self.next_id)
    }
}

pub struct ScriptedService {
    state: Mutex<State>,
    statuses: Vec<RunStatus>,
    run_error: Option<RunError>,
    usage: Option<RunUsage>,
    files: HashMap<FileId, Vec<u8>>,
    fail_add_message: bool,
    fail_retrieve: bool,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            statuses: vec![RunStatus::Completed],
            run_error: None,
            usage: None,
            files: HashMap::new(),
            fail_add_message: false,
            fail_retrieve: false,
        }
    }

    /// Status returned by successive fetches of every run.
    pub fn with_statuses(mut self, statuses: Vec<RunStatus>) -> Self {
        if !statuses.is_empty() {
            self.statuses = statuses;
        }
        self
    }

    /// Queue the content of the next assistant reply.
    pub fn with_reply(self, content: Vec<ContentPart>) -> Self {
        self.lock().replies.push_back(Some(content));
        self
    }

    /// The next completed run posts no assistant message at all.
    pub fn with_silent_reply(self) -> Self {
        self.lock().replies.push_back(None);
        self
    }

    pub fn with_text_reply(self, text: &str) -> Self {
        self.with_reply(vec![ContentPart::Text(text.to_string())])
    }

    pub fn with_file(mut self, id: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(FileId::from(id), bytes);
        self
    }

    /// Error detail attached to runs that end in `failed`.
    pub fn with_run_error(mut self, code: &str, message: &str) -> Self {
        self.run_error = Some(RunError {
            code: code.to_string(),
            message: message.to_string(),
        });
        self
    }

    /// Usage attached to runs that end in `completed`.
    pub fn with_usage(mut self, prompt_tokens: u64, completion_tokens: u64) -> Self {
        self.usage = Some(RunUsage {
            prompt_tokens,
            completion_tokens,
        });
        self
    }

    pub fn failing_add_message(mut self) -> Self {
        self.fail_add_message = true;
        self
    }

    pub fn failing_retrieve(mut self) -> Self {
        self.fail_retrieve = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn retrieve_count(&self) -> usize {
        self.count(|c| matches!(c, Call::RetrieveRun { .. }))
    }

    pub fn file_fetch_count(&self) -> usize {
        self.count(|c| matches!(c, Call::FileContent { .. }))
    }

    pub fn add_message_count(&self) -> usize {
        self.count(|c| matches!(c, Call::AddMessage { .. }))
    }

    pub fn thread_count(&self) -> usize {
        self.count(|c| matches!(c, Call::CreateThread))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn status_at(&self, fetch: usize) -> RunStatus {
        let last = self.statuses.len() - 1;
        self.statuses[fetch.min(last)]
    }
}

impl Default for ScriptedService {
    fn default() -> Self {
        Self::new()
    }
}

fn echo_of(messages: &[ThreadMessage]) -> Vec<ContentPart> {
    let question = messages
        .iter()
        .rev()
        .filter(|m| m.role == Role::User)
        .find_map(|m| {
            m.content.iter().find_map(|p| match p {
                ContentPart::Text(t) => Some(t.clone()),
                ContentPart::Image(_) => None,
            })
        })
        .unwrap_or_default();
    vec![ContentPart::Text(format!("answer to: {question}"))]
}

#[async_trait]
impl AssistantService for ScriptedService {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<AssistantId, AiError> {
        let mut state = self.lock();
        state.calls.push(Call::CreateAssistant {
            name: spec.name.clone(),
        });
        Ok(AssistantId::new(state.next("asst")))
    }

    async fn create_thread(&self) -> Result<ThreadId, AiError> {
        let mut state = self.lock();
        state.calls.push(Call::CreateThread);
        let id = ThreadId::new(state.next("thread"));
        state.threads.insert(id.clone(), Vec::new());
        Ok(id)
    }

    async fn add_message(
        &self,
        thread: &ThreadId,
        role: Role,
        text: &str,
    ) -> Result<MessageId, AiError> {
        let mut state = self.lock();
        state.calls.push(Call::AddMessage {
            thread: thread.clone(),
            text: text.to_string(),
        });
        if self.fail_add_message {
            return Err(AiError::NetworkError("connection reset".into()));
        }
        let id = MessageId::new(state.next("msg"));
        let messages = state
            .threads
            .get_mut(thread)
            .ok_or_else(|| AiError::ApiError(format!("HTTP 404: no thread {thread}")))?;
        messages.push(ThreadMessage {
            id: id.clone(),
            role,
            run_id: None,
            content: vec![ContentPart::Text(text.to_string())],
        });
        Ok(id)
    }

    async fn create_run(
        &self,
        thread: &ThreadId,
        _assistant: &AssistantId,
    ) -> Result<Run, AiError> {
        let mut state = self.lock();
        state.calls.push(Call::CreateRun {
            thread: thread.clone(),
        });
        let id = RunId::new(state.next("run"));
        state.runs.insert(
            id.clone(),
            RunState {
                thread: thread.clone(),
                fetches: 0,
                delivered: false,
            },
        );
        Ok(Run {
            id,
            status: RunStatus::Queued,
            last_error: None,
            usage: None,
        })
    }

    async fn retrieve_run(&self, _thread: &ThreadId, run: &RunId) -> Result<Run, AiError> {
        let mut state = self.lock();
        state.calls.push(Call::RetrieveRun { run: run.clone() });
        if self.fail_retrieve {
            return Err(AiError::NetworkError("connection reset".into()));
        }

        let (thread, fetch, delivered) = {
            let entry = state
                .runs
                .get_mut(run)
                .ok_or_else(|| AiError::ApiError(format!("HTTP 404: no run {run}")))?;
            let fetch = entry.fetches;
            entry.fetches += 1;
            (entry.thread.clone(), fetch, entry.delivered)
        };
        let status = self.status_at(fetch);

        if status == RunStatus::Completed && !delivered {
            let content = match state.replies.pop_front() {
                Some(queued) => queued,
                None => Some(echo_of(
                    state.threads.get(&thread).map(Vec::as_slice).unwrap_or(&[]),
                )),
            };
            if let Some(content) = content {
                let id = MessageId::new(state.next("msg"));
                if let Some(messages) = state.threads.get_mut(&thread) {
                    messages.push(ThreadMessage {
                        id,
                        role: Role::Assistant,
                        run_id: Some(run.clone()),
                        content,
                    });
                }
            }
            if let Some(entry) = state.runs.get_mut(run) {
                entry.delivered = true;
            }
        }

        Ok(Run {
            id: run.clone(),
            status,
            last_error: match status {
                RunStatus::Failed => self.run_error.clone(),
                _ => None,
            },
            usage: match status {
                RunStatus::Completed => self.usage,
                _ => None,
            },
        })
    }

    async fn list_messages(&self, thread: &ThreadId) -> Result<Vec<ThreadMessage>, AiError> {
        let mut state = self.lock();
        state.calls.push(Call::ListMessages {
            thread: thread.clone(),
        });
        let messages = state
            .threads
            .get(thread)
            .ok_or_else(|| AiError::ApiError(format!("HTTP 404: no thread {thread}")))?;
        Ok(messages.iter().rev().cloned().collect())
    }

    async fn file_content(&self, file: &FileId) -> Result<Vec<u8>, AiError> {
        self.lock()
            .calls
            .push(Call::FileContent { file: file.clone() });
        self.files
            .get(file)
            .cloned()
            .ok_or_else(|| AiError::ApiError(format!("HTTP 404: no file {file}")))
    }
}
