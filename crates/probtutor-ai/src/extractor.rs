//! Pulls the answer out of a finished thread.
//!
//! Text is taken first: a message without text fails the turn outright.
//! Images are best-effort, so a file that cannot be fetched is logged and
//! skipped while the text answer still goes through.

use probtutor_common::{Event, EventBus};

use crate::types::{ContentPart, FileId, Role, RunId, ThreadMessage};
use crate::{AiError, AssistantService};

/// An image the service generated, with its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub file_id: FileId,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    pub images: Vec<ResolvedImage>,
}

/// The newest assistant message posted by `run`, given a newest-first
/// listing. Answers left by earlier runs never match.
pub fn answer_for_run<'m>(messages: &'m [ThreadMessage], run: &RunId) -> Option<&'m ThreadMessage> {
    messages
        .iter()
        .find(|m| m.role == Role::Assistant && m.run_id.as_ref() == Some(run))
}

/// First non-empty text part of a message.
pub fn first_text(message: &ThreadMessage) -> Result<&str, AiError> {
    message
        .content
        .iter()
        .find_map(|part| match part {
            ContentPart::Text(text) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        })
        .ok_or(AiError::NoTextResponse)
}

/// Image file ids of a message, in content order.
pub fn image_ids(message: &ThreadMessage) -> impl Iterator<Item = &FileId> {
    message.content.iter().filter_map(|part| match part {
        ContentPart::Image(id) => Some(id),
        ContentPart::Text(_) => None,
    })
}

pub struct ResponseExtractor<'a> {
    service: &'a dyn AssistantService,
    events: Option<&'a EventBus>,
}

impl<'a> ResponseExtractor<'a> {
    pub fn new(service: &'a dyn AssistantService) -> Self {
        Self {
            service,
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

    /// Extract the text and fetch every image of `message`.
    pub async fn extract(&self, message: &ThreadMessage) -> Result<Extracted, AiError> {
        let text = first_text(message)?.to_string();

        let mut images = Vec::new();
        for file_id in image_ids(message) {
            match self.fetch_image(file_id).await {
                Ok(bytes) => {
                    self.publish(Event::ImageResolved {
                        file_id: file_id.to_string(),
                        bytes: bytes.len(),
                    });
                    images.push(ResolvedImage {
                        file_id: file_id.clone(),
                        bytes,
                    });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping image");
                    let reason = match err {
                        AiError::ImageFetchFailed { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    self.publish(Event::ImageSkipped {
                        file_id: file_id.to_string(),
                        reason,
                    });
                }
            }
        }

        Ok(Extracted { text, images })
    }

    async fn fetch_image(&self, file_id: &FileId) -> Result<Vec<u8>, AiError> {
        let bytes = self
            .service
            .file_content(file_id)
            .await
            .map_err(|e| AiError::ImageFetchFailed {
                file_id: file_id.clone(),
                reason: e.to_string(),
            })?;
        if bytes.is_empty() {
            return Err(AiError::ImageFetchFailed {
                file_id: file_id.clone(),
                reason: "empty payload".into(),
            });
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedService;
    use crate::types::MessageId;

    fn message(role: Role, content: Vec<ContentPart>) -> ThreadMessage {
        ThreadMessage {
            id: MessageId::from("msg_1"),
            role,
            run_id: None,
            content,
        }
    }

    fn from_run(run: &str, text: &str) -> ThreadMessage {
        ThreadMessage {
            run_id: Some(RunId::from(run)),
            ..message(Role::Assistant, vec![ContentPart::Text(text.into())])
        }
    }

    #[test]
    fn first_text_skips_images_and_blank_text() {
        let msg = message(
            Role::Assistant,
            vec![
                ContentPart::Image(FileId::from("file_1")),
                ContentPart::Text("   ".into()),
                ContentPart::Text("42".into()),
                ContentPart::Text("later".into()),
            ],
        );
        assert_eq!(first_text(&msg).unwrap(), "42");
    }

    #[test]
    fn first_text_without_text_is_no_text_response() {
        let msg = message(
            Role::Assistant,
            vec![ContentPart::Image(FileId::from("file_1"))],
        );
        assert!(matches!(first_text(&msg), Err(AiError::NoTextResponse)));
    }

    #[test]
    fn answer_is_taken_from_the_completed_run_only() {
        let messages = vec![
            message(Role::User, vec![ContentPart::Text("q2".into())]),
            from_run("run_1", "answer one"),
            message(Role::User, vec![ContentPart::Text("q1".into())]),
        ];
        assert!(answer_for_run(&messages, &RunId::from("run_2")).is_none());

        let mut messages = messages;
        messages.insert(0, from_run("run_2", "answer two"));
        let answer = answer_for_run(&messages, &RunId::from("run_2")).unwrap();
        assert_eq!(first_text(answer).unwrap(), "answer two");
    }

    #[tokio::test]
    async fn image_then_text_yields_text_and_one_image() {
        let service = ScriptedService::new().with_file("file_1", vec![0x89, b'P', b'N', b'G']);
        let msg = message(
            Role::Assistant,
            vec![
                ContentPart::Image(FileId::from("file_1")),
                ContentPart::Text("42".into()),
            ],
        );

        let extracted = ResponseExtractor::new(&service).extract(&msg).await.unwrap();
        assert_eq!(extracted.text, "42");
        assert_eq!(extracted.images.len(), 1);
        assert_eq!(extracted.images[0].file_id, FileId::from("file_1"));
        assert_eq!(extracted.images[0].bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn missing_and_empty_images_are_skipped() {
        let service = ScriptedService::new()
            .with_file("file_ok", vec![1, 2, 3])
            .with_file("file_empty", Vec::new());
        let msg = message(
            Role::Assistant,
            vec![
                ContentPart::Text("see chart".into()),
                ContentPart::Image(FileId::from("file_missing")),
                ContentPart::Image(FileId::from("file_empty")),
                ContentPart::Image(FileId::from("file_ok")),
            ],
        );
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let extracted = ResponseExtractor::new(&service)
            .with_events(&bus)
            .extract(&msg)
            .await
            .unwrap();
        assert_eq!(extracted.text, "see chart");
        assert_eq!(extracted.images.len(), 1);
        assert_eq!(extracted.images[0].file_id, FileId::from("file_ok"));

        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::ImageSkipped { ref file_id, .. } if file_id == "file_missing"
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::ImageSkipped { ref reason, .. } if reason == "empty payload"
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::ImageResolved { bytes: 3, .. }
        ));
    }

    #[tokio::test]
    async fn no_text_fails_before_fetching_images() {
        let service = ScriptedService::new().with_file("file_1", vec![1]);
        let msg = message(
            Role::Assistant,
            vec![ContentPart::Image(FileId::from("file_1"))],
        );
        let err = ResponseExtractor::new(&service).extract(&msg).await.unwrap_err();
        assert!(matches!(err, AiError::NoTextResponse));
        assert_eq!(service.file_fetch_count(), 0);
    }
}
