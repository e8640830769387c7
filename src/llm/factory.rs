//! Model client factory.
//!
//! Centralizes provider-specific logic for creating model clients.

use crate::config::LlmConfig;
use crate::error::Result;
use crate::llm::huggingface::DEFAULT_HF_MODEL;
use crate::llm::ollama::DEFAULT_OLLAMA_MODEL;
use crate::llm::{
    HuggingFaceClient, HuggingFaceConfig, LlmClient, LlmProvider, MockLlmClient, OllamaClient,
    OllamaConfig,
};

/// Creates a model client from the configuration.
///
/// Unset model names and base URLs fall back to the provider defaults:
/// - Hugging Face: `mrm8488/t5-base-finetuned-wikiSQL` on the public Inference API
/// - Ollama: `llama3.2:3b` on `http://localhost:11434`
pub fn create_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    match config.provider()? {
        LlmProvider::HuggingFace => {
            let model = config.model.as_deref().unwrap_or(DEFAULT_HF_MODEL);
            let mut hf = HuggingFaceConfig::new(model)
                .with_api_key(config.api_key.clone())
                .with_timeout(config.timeout_secs);
            if let Some(url) = &config.base_url {
                hf = hf.with_url(url.as_str());
            }
            Ok(Box::new(HuggingFaceClient::new(hf)?))
        }
        LlmProvider::Ollama => {
            let model = config.model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL);
            let mut ollama = OllamaConfig::new(model).with_timeout(config.timeout_secs);
            if let Some(url) = &config.base_url {
                ollama = ollama.with_url(url.as_str());
            }
            Ok(Box::new(OllamaClient::new(ollama)?))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}
