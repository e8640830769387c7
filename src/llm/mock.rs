//! Mock model client for testing.
//!
//! Provides deterministic responses based on the question embedded in the prompt.

use async_trait::async_trait;

use crate::error::{InsightError, Result};
use crate::llm::prompt::QUESTION_MARKER;
use crate::llm::{GenerationOptions, LlmClient};

/// Response returned when no pattern matches.
///
/// Deliberately contains no SQL, like the small seq2seq models this stands in for
/// when they get confused, so callers fall through to their fallback rules.
const DEFAULT_RESPONSE: &str = "I am not sure how to answer that.";

/// Mock client that returns canned responses based on input patterns.
///
/// Used for unit testing and offline demos without making real API calls.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
    /// When set, every call fails with this message.
    failure: Option<String>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the question contains `pattern`, the mock will return `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Makes every call fail as if the model endpoint were unreachable.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Generates a mock response based on the question.
    fn mock_response(&self, question: &str) -> String {
        let question_lower = question.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if question_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        DEFAULT_RESPONSE.to_string()
    }

    /// Extracts the question line from a full prompt.
    ///
    /// The column list in the prompt would otherwise match almost any pattern.
    fn extract_question(prompt: &str) -> &str {
        prompt
            .rfind(QUESTION_MARKER)
            .map(|idx| {
                let rest = &prompt[idx + QUESTION_MARKER.len()..];
                rest.lines().next().unwrap_or_default().trim()
            })
            .unwrap_or(prompt)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<String> {
        if let Some(message) = &self.failure {
            return Err(InsightError::model(message.clone()));
        }
        Ok(self.mock_response(Self::extract_question(prompt)))
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
