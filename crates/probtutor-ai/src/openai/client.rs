//! OpenAI client struct, request helpers, and response checking.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::AiError;

use super::config::OpenAiConfig;

pub(crate) const ASSISTANTS_BETA: &str = "assistants=v2";

/// OpenAI Assistants API client.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(config.request_timeout)
                .build()
                .expect("failed to build HTTP client"),
            config,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.config.api_key)
            .header("OpenAI-Beta", ASSISTANTS_BETA)
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, AiError> {
        debug!(path, "OpenAI POST");
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AiError> {
        debug!(path, "OpenAI GET");
        let response = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, AiError> {
        debug!(path, "OpenAI GET (binary)");
        let response = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;
        let response = check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(AiError::RateLimited);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let text = text.chars().take(200).collect::<String>();
        return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path() {
        let client = OpenAiClient::new(OpenAiConfig::new("k"));
        assert_eq!(
            client.url("threads/thread_1/runs"),
            "https://api.openai.com/v1/threads/thread_1/runs"
        );

        let client = OpenAiClient::new(OpenAiConfig::new("k").with_api_base("http://proxy/v1/"));
        assert_eq!(client.url("/files/f/content"), "http://proxy/v1/files/f/content");
    }
}
