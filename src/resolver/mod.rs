//! Question to SQL resolution.
//!
//! The model is asked first. When its output contains no recognizable SQL, or
//! the call fails outright, the keyword fallback table is consulted.

pub mod fallback;
pub mod presets;

pub use fallback::{match_fallback, FallbackRule, FALLBACK_RULES};
pub use presets::{preset, EXAMPLE_QUESTIONS};

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{InsightError, Result};
use crate::llm::parser::normalize_terminator;
use crate::llm::{build_prompt, extract_sql, GenerationOptions, LlmClient};

/// Where the resolved SQL came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SqlSource {
    /// Extracted from model output.
    Model,
    /// Supplied by a fallback rule.
    Fallback {
        rule: &'static str,
        /// Set when the model call itself failed.
        model_error: Option<String>,
    },
    /// Given verbatim by the user; no model involved.
    Direct,
}

impl SqlSource {
    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback { .. } => "fallback",
            Self::Direct => "direct",
        }
    }
}

/// SQL ready to hand to the dataset store.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    /// Starts with SELECT and ends with exactly one `;`.
    pub sql: String,
    pub source: SqlSource,
    /// Time spent in the model call.
    pub latency: Duration,
}

/// Turns questions into SQL.
pub struct QueryResolver {
    client: Box<dyn LlmClient>,
    options: GenerationOptions,
}

impl ResolvedQuery {
    /// Wraps user-supplied SQL, normalizing its terminator.
    pub fn direct(sql: &str) -> Self {
        Self {
            sql: normalize_terminator(sql),
            source: SqlSource::Direct,
            latency: Duration::ZERO,
        }
    }
}

impl QueryResolver {
    /// Creates a resolver around a model client.
    pub fn new(client: Box<dyn LlmClient>, options: GenerationOptions) -> Self {
        Self { client, options }
    }

    /// Description of the underlying model backend.
    pub fn backend(&self) -> String {
        self.client.describe()
    }

    /// Resolves a question to SQL.
    ///
    /// # Errors
    ///
    /// `InsightError::Model` when the model call failed and no fallback rule
    /// matched; `InsightError::Unresolved` when the model answered without SQL
    /// and no rule matched.
    pub async fn resolve(&self, question: &str) -> Result<ResolvedQuery> {
        let prompt = build_prompt(question);
        debug!(
            backend = %self.client.describe(),
            prompt_len = prompt.len(),
            "Requesting SQL from model"
        );

        let start = Instant::now();
        let outcome = self.client.generate(&prompt, &self.options).await;
        let latency = start.elapsed();
        let latency_ms = latency.as_millis() as u64;

        let model_error = match outcome {
            Ok(raw) => {
                debug!(latency_ms, response_len = raw.len(), "Model responded");
                if let Some(sql) = extract_sql(&raw) {
                    return Ok(ResolvedQuery {
                        sql,
                        source: SqlSource::Model,
                        latency,
                    });
                }
                debug!("No SQL in model output");
                None
            }
            Err(e) => {
                warn!(latency_ms, error = %e, "Model call failed");
                Some(e)
            }
        };

        match (match_fallback(question), model_error) {
            (Some(rule), model_error) => {
                debug!(rule = rule.name, "Using fallback rule");
                Ok(ResolvedQuery {
                    sql: rule.sql.to_string(),
                    source: SqlSource::Fallback {
                        rule: rule.name,
                        model_error: model_error.map(|e| e.message().to_string()),
                    },
                    latency,
                })
            }
            (None, Some(e)) => Err(e),
            (None, None) => Err(InsightError::unresolved(question.trim())),
        }
    }
}
