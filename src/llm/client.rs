use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CodingError, Result};

/// Turns text into an embedding vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Per-request generation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub model: String,
    /// Reasoning effort hint ("low", "medium", "high"), if the model supports it
    pub reasoning_effort: Option<String>,
}

impl GenerateOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reasoning_effort: None,
        }
    }

    pub fn with_reasoning_effort(mut self, effort: impl Into<String>) -> Self {
        self.reasoning_effort = Some(effort.into());
        self
    }
}

/// Produces text from a system prompt and a user prompt
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, system: &str, user: &str, options: &GenerateOptions)
    -> Result<String>;
}

/// Configuration for the OpenAI-compatible API client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key (from OPENAI_API_KEY env var)
    pub api_key: String,
    /// Base URL, e.g. "https://api.openai.com/v1"
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                CodingError::Config(
                    "OPENAI_API_KEY is missing. Set it in the environment or in a .env file"
                        .to_string(),
                )
            })?;

        let base_url = lookup("OPENAI_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());

        Ok(Self::new(api_key, base_url))
    }

    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Client for the OpenAI embeddings and responses endpoints
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
    embedding_model: String,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig, embedding_model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CodingError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            embedding_model: embedding_model.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: text,
        };

        let response = self
            .client
            .post(self.endpoint("embeddings"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                CodingError::EmbeddingProvider(format!("failed to send request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CodingError::EmbeddingProvider(format!(
                "API error: {} - {}",
                status, body
            )));
        }

        let response: EmbeddingResponse = response.json().await.map_err(|e| {
            CodingError::EmbeddingProvider(format!("failed to parse response: {}", e))
        })?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| CodingError::EmbeddingProvider("no embedding in response".to_string()))?;

        debug!("Embedded {} chars into {} dims", text.len(), embedding.len());
        Ok(embedding)
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        options: &GenerateOptions,
    ) -> Result<String> {
        let request = ResponsesRequest {
            model: &options.model,
            input: vec![
                InputMessage {
                    role: "developer",
                    content: system,
                },
                InputMessage {
                    role: "user",
                    content: user,
                },
            ],
            reasoning: options
                .reasoning_effort
                .as_deref()
                .map(|effort| Reasoning { effort }),
        };

        let response = self
            .client
            .post(self.endpoint("responses"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                CodingError::GenerationProvider(format!("failed to send request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CodingError::GenerationProvider(format!(
                "API error: {} - {}",
                status, body
            )));
        }

        let response: ResponsesResponse = response.json().await.map_err(|e| {
            CodingError::GenerationProvider(format!("failed to parse response: {}", e))
        })?;

        response
            .output_text()
            .ok_or_else(|| CodingError::GenerationProvider("no text content in response".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<Reasoning<'a>>,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Reasoning<'a> {
    effort: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

impl ResponsesResponse {
    /// Concatenate every `output_text` part of every message item
    fn output_text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .output
            .iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| item.content.iter())
            .filter(|c| c.content_type == "output_text")
            .map(|c| c.text.as_str())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_missing_key_mentions_dotenv() {
        let err = OpenAiConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, CodingError::Config(ref s) if s.contains(".env")));

        let err = OpenAiConfig::from_lookup(|k| (k == "OPENAI_API_KEY").then(|| "  ".to_string()));
        assert!(err.is_err());
    }

    #[test]
    fn test_config_from_lookup_defaults_base_url() {
        let config =
            OpenAiConfig::from_lookup(|k| (k == "OPENAI_API_KEY").then(|| "sk-test".to_string()))
                .unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, OpenAiConfig::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_trims_base_url() {
        let config = OpenAiConfig::new(" key ".to_string(), "http://localhost:8080/v1/".to_string());
        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_request_serialization() {
        let request = ResponsesRequest {
            model: "gpt-5-mini",
            input: vec![InputMessage {
                role: "developer",
                content: "sys",
            }],
            reasoning: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-5-mini");
        assert_eq!(json["input"][0]["role"], "developer");
        assert!(json.get("reasoning").is_none());

        let request = ResponsesRequest {
            reasoning: Some(Reasoning { effort: "low" }),
            ..request
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["reasoning"]["effort"], "low");
    }

    #[test]
    fn test_output_text_skips_reasoning_items() {
        let json = r#"{
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "Hello"},
                    {"type": "output_text", "text": " there"}
                ]}
            ]
        }"#;
        let response: ResponsesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.output_text().as_deref(), Some("Hello there"));
    }

    #[test]
    fn test_output_text_missing() {
        let response: ResponsesResponse = serde_json::from_str(r#"{"output": []}"#).unwrap();
        assert!(response.output_text().is_none());
    }

    #[test]
    fn test_embedding_response_parse() {
        let json = r#"{"object": "list", "data": [{"index": 0, "embedding": [0.5, -0.25]}]}"#;
        let response: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data[0].embedding, vec![0.5, -0.25]);
    }
}
