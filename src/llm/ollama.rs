//! Local Ollama backend, using the non-streaming `/api/generate` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{InsightError, Result};
use crate::llm::http::{build_client, send};
use crate::llm::{GenerationOptions, LlmClient};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    pub base_url: String,
    /// Any model pulled into the local instance, e.g. "sqlcoder".
    pub model: String,
    pub timeout_secs: u64,
}

impl OllamaConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    http: Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let http = build_client(config.timeout_secs)?;
        Ok(Self { config, http })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }

    /// Temperature zero keeps decoding greedy.
    fn request_body<'a>(&'a self, prompt: &'a str, options: &GenerationOptions) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: ModelOptions {
                temperature: 0.0,
                num_predict: options.max_new_tokens,
            },
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let request = self
            .http
            .post(self.endpoint())
            .json(&self.request_body(prompt, options));
        let reply = send(request, "Ollama").await?;

        if !reply.status.is_success() {
            return Err(InsightError::model(format!(
                "Ollama returned {}: {}",
                reply.status,
                reply.body.trim()
            )));
        }

        parse_reply(&reply.body)
    }

    fn describe(&self) -> String {
        format!("ollama:{}", self.config.model)
    }
}

fn parse_reply(body: &str) -> Result<String> {
    serde_json::from_str::<GenerateReply>(body)
        .map(|reply| reply.response)
        .map_err(|e| InsightError::model(format!("Unexpected Ollama response: {e}")))
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: ModelOptions,
}

#[derive(Debug, Serialize)]
struct ModelOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_builders() {
        let config = OllamaConfig::new("sqlcoder")
            .with_url("http://gpu-box:11434/")
            .with_timeout(120);
        assert_eq!(
            config,
            OllamaConfig {
                base_url: "http://gpu-box:11434/".to_string(),
                model: "sqlcoder".to_string(),
                timeout_secs: 120,
            }
        );
    }

    #[test]
    fn test_endpoint() {
        let client = OllamaClient::new(OllamaConfig::new(DEFAULT_OLLAMA_MODEL)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:11434/api/generate");

        let client =
            OllamaClient::new(OllamaConfig::new("m").with_url("http://gpu-box:11434/")).unwrap();
        assert_eq!(client.endpoint(), "http://gpu-box:11434/api/generate");
    }

    #[test]
    fn test_request_body() {
        let client = OllamaClient::new(OllamaConfig::new("sqlcoder")).unwrap();
        let json = serde_json::to_value(client.request_body("prompt", &GenerationOptions::new(32)))
            .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "model": "sqlcoder",
                "prompt": "prompt",
                "stream": false,
                "options": { "temperature": 0.0, "num_predict": 32 }
            })
        );
    }

    #[test]
    fn test_parse_reply() {
        let body = r#"{"model":"sqlcoder","response":"SELECT 1;","done":true}"#;
        assert_eq!(parse_reply(body).unwrap(), "SELECT 1;");
        assert!(parse_reply(r#"{"error":"model not found"}"#).is_err());
    }
}
