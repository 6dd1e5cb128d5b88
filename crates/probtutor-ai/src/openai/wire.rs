//! JSON shapes of the Assistants API, and their conversion to domain types.

use serde::Deserialize;

use crate::types::{
    AssistantSpec, ContentPart, FileId, MessageId, Role, Run, RunError, RunId, RunStatus,
    RunUsage, ThreadMessage,
};

/// Any object we only need the id of (assistant, thread, message).
#[derive(Debug, Deserialize)]
pub(crate) struct IdObject {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunObject {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunErrorObject>,
    #[serde(default)]
    pub usage: Option<UsageObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunErrorObject {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsageObject {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageList {
    pub data: Vec<MessageObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageObject {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentObject>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentObject {
    Text { text: TextObject },
    ImageFile { image_file: ImageFileObject },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextObject {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageFileObject {
    pub file_id: String,
}

impl From<RunObject> for Run {
    fn from(run: RunObject) -> Self {
        Run {
            id: RunId::new(run.id),
            status: run.status,
            last_error: run.last_error.map(|e| RunError {
                code: e.code,
                message: e.message,
            }),
            usage: run.usage.map(|u| RunUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            }),
        }
    }
}

impl From<MessageObject> for ThreadMessage {
    fn from(msg: MessageObject) -> Self {
        let content = msg
            .content
            .into_iter()
            .filter_map(|part| match part {
                ContentObject::Text { text } => Some(ContentPart::Text(text.value)),
                ContentObject::ImageFile { image_file } => {
                    Some(ContentPart::Image(FileId::new(image_file.file_id)))
                }
                ContentObject::Other => None,
            })
            .collect();
        ThreadMessage {
            id: MessageId::new(msg.id),
            role: msg.role,
            run_id: msg.run_id.map(RunId::new),
            content,
        }
    }
}

pub(crate) fn assistant_body(spec: &AssistantSpec) -> serde_json::Value {
    let tools: Vec<_> = spec
        .tools
        .iter()
        .map(|tool| serde_json::json!({ "type": tool }))
        .collect();
    serde_json::json!({
        "name": spec.name,
        "instructions": spec.instructions,
        "model": spec.model,
        "tools": tools,
    })
}
