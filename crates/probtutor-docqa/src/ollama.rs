//! Ollama-backed embedder and chat model.
//!
//! Both talk to a local Ollama server: `/api/embed` for batch embeddings
//! and `/api/chat` (non-streaming) for answers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::index::l2_normalize;
use crate::{ChatModel, DocQaError, Embedder};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

fn http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(300))
        .build()
        .expect("failed to build HTTP client")
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DocQaError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let text = text.chars().take(200).collect::<String>();
        return Err(DocQaError::Network(format!("Ollama returned {status}: {text}")));
    }
    Ok(response)
}

pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
    normalize: bool,
}

impl OllamaEmbedder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: model.into(),
            normalize: true,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DocQaError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(model = %self.model, count = texts.len(), "Sending embed request to Ollama");

        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url.trim_end_matches('/')))
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| DocQaError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| DocQaError::Parse(e.to_string()))?;

        if body.embeddings.len() != texts.len() {
            return Err(DocQaError::Embedding(format!(
                "asked for {} embeddings, got {}",
                texts.len(),
                body.embeddings.len()
            )));
        }
        let mut embeddings = body.embeddings;
        if self.normalize {
            embeddings.iter_mut().for_each(|v| l2_normalize(v));
        }
        Ok(embeddings)
    }
}

pub struct OllamaChat {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaChat {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn complete(&self, prompt: &str) -> Result<String, DocQaError> {
        debug!(model = %self.model, "Sending chat request to Ollama");

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url.trim_end_matches('/')))
            .json(&body)
            .send()
            .await
            .map_err(|e| DocQaError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| DocQaError::Parse(e.to_string()))?;
        Ok(chat.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_request_shape() {
        let input = vec!["a".to_string(), "b".to_string()];
        let json = serde_json::to_value(EmbedRequest {
            model: "all-minilm",
            input: &input,
        })
        .unwrap();
        assert_eq!(json["model"], "all-minilm");
        assert_eq!(json["input"][1], "b");
    }

    #[test]
    fn chat_request_is_non_streaming() {
        let json = serde_json::to_value(ChatRequest {
            model: "gemma3:4b",
            messages: vec![ChatMessage {
                role: "user".into(),
                content: "hi".into(),
            }],
            stream: false,
        })
        .unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn chat_response_parses_message_content() {
        let json = r#"{"model":"gemma3:4b","message":{"role":"assistant","content":"0.5"},"done":true}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.message.content, "0.5");
    }

    #[tokio::test]
    async fn empty_batch_skips_the_request() {
        let embedder = OllamaEmbedder::new("all-minilm").with_base_url("http://127.0.0.1:9");
        assert!(embedder.embed(&[]).await.unwrap().is_empty());
    }
}
