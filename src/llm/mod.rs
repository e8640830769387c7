//! Text-to-SQL model integration.
//!
//! The model is an opaque text-to-text function: a prompt goes in, generated
//! text comes out. This module provides the client trait, the provider
//! implementations, prompt construction and SQL extraction from raw output.

pub mod factory;
pub mod huggingface;
mod http;
pub mod mock;
pub mod ollama;
pub mod parser;
pub mod prompt;

pub use factory::create_client;
pub use huggingface::{HuggingFaceClient, HuggingFaceConfig};
pub use mock::MockLlmClient;
pub use ollama::{OllamaClient, OllamaConfig};
pub use parser::extract_sql;
pub use prompt::build_prompt;

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::Result;

/// Decoding parameters for a single generation.
///
/// Decoding is always greedy (no sampling), so identical prompts produce
/// identical output for a given model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Upper bound on generated tokens.
    pub max_new_tokens: u32,
}

impl GenerationOptions {
    /// Creates options with the given token budget.
    pub fn new(max_new_tokens: u32) -> Self {
        Self { max_new_tokens }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::new(128)
    }
}

/// Trait for text generation backends.
///
/// Implementations must be thread-safe (Send + Sync) to support async operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given prompt.
    ///
    /// Returns the raw generated text; extracting SQL is the caller's job.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Short human-readable backend description for logs.
    fn describe(&self) -> String;
}

/// Model provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Hugging Face Inference API (hosted seq2seq models)
    #[default]
    HuggingFace,
    /// Local Ollama instance
    Ollama,
    /// Mock client for testing (no network access)
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown model provider: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
