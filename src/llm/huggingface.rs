//! Hugging Face Inference API client.
//!
//! Implements the LlmClient trait for hosted text2text-generation models
//! (T5-style seq2seq models fine-tuned for text-to-SQL).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{InsightError, Result};
use crate::llm::http::{build_client, send, Reply};
use crate::llm::{GenerationOptions, LlmClient};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default Inference API base URL.
pub const DEFAULT_HF_URL: &str = "https://api-inference.huggingface.co";

/// Default text-to-SQL model.
pub const DEFAULT_HF_MODEL: &str = "mrm8488/t5-base-finetuned-wikiSQL";

/// Hugging Face client configuration.
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// Base URL for the Inference API.
    pub base_url: String,
    /// Model repository id (e.g., "mrm8488/t5-base-finetuned-wikiSQL").
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl HuggingFaceConfig {
    /// Creates a new config with the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_HF_URL.to_string(),
            model: model.into(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the API token.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HF_MODEL)
    }
}

/// Hugging Face Inference API client.
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    config: HuggingFaceConfig,
    client: Client,
}

impl HuggingFaceClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: HuggingFaceConfig) -> Result<Self> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Returns the model endpoint URL.
    fn model_url(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request<'a>(prompt: &'a str, options: &GenerationOptions) -> HfRequest<'a> {
        HfRequest {
            inputs: prompt,
            parameters: HfParameters {
                max_new_tokens: options.max_new_tokens,
                do_sample: false,
                return_full_text: false,
            },
            options: HfOptions {
                wait_for_model: true,
            },
        }
    }
}

#[async_trait]
impl LlmClient for HuggingFaceClient {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let request = Self::build_request(prompt, options);

        let mut builder = self.client.post(self.model_url()).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let Reply { status, body } = send(builder, "the Inference API").await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(InsightError::model(
                "Authentication failed. Check your HF_API_TOKEN.",
            ));
        }

        if !status.is_success() {
            let detail = serde_json::from_str::<HfError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(InsightError::model(format!(
                "Inference API error ({status}): {detail}"
            )));
        }

        parse_generation(&body)
    }

    fn describe(&self) -> String {
        format!("huggingface:{}", self.config.model)
    }
}

/// Parses a text2text-generation response body.
fn parse_generation(body: &str) -> Result<String> {
    let generations: Vec<HfGeneration> = serde_json::from_str(body)
        .map_err(|e| InsightError::model(format!("Failed to parse response: {}", e)))?;

    generations
        .into_iter()
        .next()
        .map(|g| g.generated_text)
        .ok_or_else(|| InsightError::model("Inference API returned no generations"))
}

// Inference API types

#[derive(Debug, Serialize)]
struct HfRequest<'a> {
    inputs: &'a str,
    parameters: HfParameters,
    options: HfOptions,
}

#[derive(Debug, Serialize)]
struct HfParameters {
    max_new_tokens: u32,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Debug, Serialize)]
struct HfOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct HfGeneration {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct HfError {
    error: String,
}
