//! Core orchestrator for superstore-insight.
//!
//! Owns the resolver and the dataset and runs a question through
//! resolve, execute and chart selection.

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::chart::{select_chart, ChartSpec};
use crate::config::Config;
use crate::db::{Dataset, QueryResult};
use crate::error::{InsightError, Result};
use crate::llm::{create_client, GenerationOptions};
use crate::resolver::{QueryResolver, ResolvedQuery};

/// A successful query with its chosen chart.
#[derive(Debug, Clone)]
pub struct Insight {
    pub result: QueryResult,
    pub chart: Option<ChartSpec>,
}

/// Everything known about one question after it has been handled.
#[derive(Debug)]
pub struct Answer {
    /// The question, or the raw SQL for direct queries.
    pub question: String,
    /// Present once SQL has been resolved.
    pub resolved: Option<ResolvedQuery>,
    pub outcome: Result<Insight>,
}

impl Answer {
    /// Returns true if the query ran.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Returns the failure, if any.
    pub fn error(&self) -> Option<&InsightError> {
        self.outcome.as_ref().err()
    }
}

/// Application context.
///
/// The dataset is loaded on first use and at most once.
pub struct App {
    config: Config,
    resolver: QueryResolver,
    dataset: OnceCell<Dataset>,
}

impl App {
    /// Creates an application around an existing resolver.
    pub fn new(config: Config, resolver: QueryResolver) -> Self {
        Self {
            config,
            resolver,
            dataset: OnceCell::new(),
        }
    }

    /// Creates an application, building the model client from configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = create_client(&config.llm)?;
        let options = GenerationOptions::new(config.llm.max_new_tokens);
        info!(backend = %client.describe(), "Model client ready");
        Ok(Self::new(config, QueryResolver::new(client, options)))
    }

    /// Uses an already loaded dataset instead of reading the configured file.
    pub fn with_dataset(self, dataset: Dataset) -> Self {
        Self {
            dataset: OnceCell::new_with(Some(dataset)),
            ..self
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &QueryResolver {
        &self.resolver
    }

    /// Returns the dataset, loading it on first call.
    pub async fn dataset(&self) -> Result<&Dataset> {
        self.dataset
            .get_or_try_init(|| async {
                debug!(path = %self.config.dataset.path.display(), "Loading dataset");
                Dataset::load(&self.config.dataset.path).await
            })
            .await
    }

    /// Returns true once the dataset has been loaded.
    pub fn is_dataset_loaded(&self) -> bool {
        self.dataset.initialized()
    }

    /// Answers a natural-language question.
    pub async fn ask(&self, question: &str) -> Answer {
        let question = question.trim();

        match self.resolver.resolve(question).await {
            Ok(resolved) => self.run(question.to_string(), resolved).await,
            Err(e) => Answer {
                question: question.to_string(),
                resolved: None,
                outcome: Err(e),
            },
        }
    }

    /// Runs user-supplied SQL without the resolver.
    pub async fn run_sql(&self, sql: &str) -> Answer {
        let resolved = ResolvedQuery::direct(sql);
        self.run(sql.trim().to_string(), resolved).await
    }

    async fn run(&self, question: String, resolved: ResolvedQuery) -> Answer {
        let outcome = self.execute(&resolved.sql).await;
        Answer {
            question,
            resolved: Some(resolved),
            outcome,
        }
    }

    async fn execute(&self, sql: &str) -> Result<Insight> {
        let result = self.dataset().await?.execute(sql).await?;
        let chart = select_chart(&result);
        debug!(
            row_count = result.row_count,
            chart = ?chart.as_ref().map(|c| c.kind),
            "Query answered"
        );
        Ok(Insight { result, chart })
    }
}
