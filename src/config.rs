//! Configuration management for insight.
//!
//! Handles loading configuration from TOML files and environment variables,
//! covering the dataset location, the text-to-SQL model provider and
//! display limits.

use crate::error::{InsightError, Result};
use crate::llm::LlmProvider;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure for insight.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Dataset configuration.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Model provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Output limits.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Dataset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the Superstore CSV export.
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/superstore.csv")
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

/// Model provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "huggingface", "ollama" or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name; each provider has its own default when unset.
    #[serde(default)]
    pub model: Option<String>,

    /// API base URL; each provider has its own default when unset.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Output token budget for a single generation.
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API token (never read from the config file).
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Ollama endpoint from the environment, used while the provider is ollama.
    #[serde(skip)]
    pub ollama_url: Option<String>,
}

fn default_provider() -> String {
    "huggingface".to_string()
}

fn default_max_new_tokens() -> u32 {
    128
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
            max_new_tokens: default_max_new_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
            ollama_url: None,
        }
    }
}

impl LlmConfig {
    /// Parses the configured provider name.
    pub fn provider(&self) -> Result<LlmProvider> {
        self.provider.parse().map_err(InsightError::config)
    }

    /// Switches provider, keeping `base_url` in step with `ollama_url`.
    ///
    /// An explicit `base_url` is left alone.
    pub fn set_provider(&mut self, provider: impl Into<String>) {
        self.provider = provider.into();
        let is_ollama = self.provider.eq_ignore_ascii_case("ollama");
        if is_ollama && self.base_url.is_none() {
            self.base_url = self.ollama_url.clone();
        } else if !is_ollama && self.base_url.is_some() && self.base_url == self.ollama_url {
            self.base_url = None;
        }
    }
}

/// Output limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Maximum number of result rows printed as a table.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_max_rows() -> usize {
    50
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("superstore-insight")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| InsightError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            InsightError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies environment variables on top of the file configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// Recognized keys: `INSIGHT_DATASET`, `INSIGHT_LLM_PROVIDER`,
    /// `INSIGHT_LLM_MODEL`, `HF_API_TOKEN`, `OLLAMA_URL`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("INSIGHT_DATASET") {
            self.dataset.path = PathBuf::from(path);
        }
        if let Some(url) = lookup("OLLAMA_URL") {
            self.llm.ollama_url = Some(url);
        }
        let provider = lookup("INSIGHT_LLM_PROVIDER").unwrap_or_else(|| self.llm.provider.clone());
        self.llm.set_provider(provider);
        if let Some(model) = lookup("INSIGHT_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if self.llm.api_key.is_none() {
            self.llm.api_key = lookup("HF_API_TOKEN");
        }
    }

    /// Checks values that serde cannot validate on its own.
    pub fn validate(&self) -> Result<()> {
        self.llm.provider()?;

        if let Some(base_url) = &self.llm.base_url {
            Url::parse(base_url)
                .map_err(|e| InsightError::config(format!("Invalid base_url '{base_url}': {e}")))?;
        }

        if self.llm.max_new_tokens == 0 {
            return Err(InsightError::config("max_new_tokens must be at least 1"));
        }

        Ok(())
    }
}
