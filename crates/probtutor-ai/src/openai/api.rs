//! AssistantService implementation for OpenAiClient.

use async_trait::async_trait;

use crate::types::{
    AssistantId, AssistantSpec, FileId, MessageId, Role, Run, RunId, ThreadId, ThreadMessage,
};
use crate::{AiError, AssistantService};

use super::client::OpenAiClient;
use super::wire::{assistant_body, IdObject, MessageList, RunObject};

#[async_trait]
impl AssistantService for OpenAiClient {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<AssistantId, AiError> {
        let created: IdObject = self.post_json("assistants", &assistant_body(spec)).await?;
        Ok(AssistantId::new(created.id))
    }

    async fn create_thread(&self) -> Result<ThreadId, AiError> {
        let created: IdObject = self.post_json("threads", &serde_json::json!({})).await?;
        Ok(ThreadId::new(created.id))
    }

    async fn add_message(
        &self,
        thread: &ThreadId,
        role: Role,
        text: &str,
    ) -> Result<MessageId, AiError> {
        let body = serde_json::json!({ "role": role, "content": text });
        let created: IdObject = self
            .post_json(&format!("threads/{thread}/messages"), &body)
            .await?;
        Ok(MessageId::new(created.id))
    }

    async fn create_run(
        &self,
        thread: &ThreadId,
        assistant: &AssistantId,
    ) -> Result<Run, AiError> {
        let body = serde_json::json!({ "assistant_id": assistant });
        let run: RunObject = self
            .post_json(&format!("threads/{thread}/runs"), &body)
            .await?;
        Ok(run.into())
    }

    async fn retrieve_run(&self, thread: &ThreadId, run: &RunId) -> Result<Run, AiError> {
        let run: RunObject = self
            .get_json(&format!("threads/{thread}/runs/{run}"))
            .await?;
        Ok(run.into())
    }

    async fn list_messages(&self, thread: &ThreadId) -> Result<Vec<ThreadMessage>, AiError> {
        let list: MessageList = self
            .get_json(&format!("threads/{thread}/messages?order=desc"))
            .await?;
        Ok(list.data.into_iter().map(Into::into).collect())
    }

    async fn file_content(&self, file: &FileId) -> Result<Vec<u8>, AiError> {
        self.get_bytes(&format!("files/{file}/content")).await
    }
}
