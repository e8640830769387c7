//! Command-line argument parsing for insight.

use crate::config::Config;
use crate::output::OutputFormat;
use crate::render::CanvasSize;
use crate::resolver::{preset, EXAMPLE_QUESTIONS};
use clap::Parser;
use std::path::PathBuf;

/// Ask business questions about the Superstore dataset in plain English.
#[derive(Parser, Debug)]
#[command(name = "insight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Question to answer; starts an interactive session when omitted
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Ask one of the preset example questions (1-based)
    #[arg(short = 'p', long, value_name = "N", conflicts_with_all = ["question", "sql"])]
    pub preset: Option<usize>,

    /// List the preset example questions and exit
    #[arg(long)]
    pub list_presets: bool,

    /// Run SQL directly against the dataset, skipping the model
    #[arg(long, value_name = "SQL", conflicts_with = "question")]
    pub sql: Option<String>,

    /// Model provider (huggingface, ollama, mock)
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Model name for the selected provider
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Path to the Superstore CSV
    #[arg(short = 'd', long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Chart size (WIDTHxHEIGHT, e.g., "100x30"); defaults to the terminal width
    #[arg(long, value_name = "SIZE")]
    pub size: Option<String>,

    /// Print tables only
    #[arg(long)]
    pub no_chart: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    ListPresets,
    Question(String),
    Sql(String),
    Interactive,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line overrides on top of file and environment config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(provider) = &self.provider {
            config.llm.set_provider(provider.clone());
        }
        if let Some(model) = &self.model {
            config.llm.model = Some(model.clone());
        }
        if let Some(path) = &self.dataset {
            config.dataset.path = path.clone();
        }
    }

    /// Determines the run mode.
    pub fn mode(&self) -> std::result::Result<Mode, String> {
        if self.list_presets {
            return Ok(Mode::ListPresets);
        }
        if let Some(sql) = &self.sql {
            return Ok(Mode::Sql(sql.clone()));
        }
        if let Some(number) = self.preset {
            return preset(number).map(|q| Mode::Question(q.to_string())).ok_or_else(|| {
                format!(
                    "Invalid preset {number}: choose 1 to {}",
                    EXAMPLE_QUESTIONS.len()
                )
            });
        }
        match self.question.as_deref().map(str::trim) {
            Some("") => Err("Question must not be empty".to_string()),
            Some(question) => Ok(Mode::Question(question.to_string())),
            None => Ok(Mode::Interactive),
        }
    }

    /// Parses the chart size from the --size argument.
    ///
    /// Without --size the terminal dimensions are used.
    pub fn parse_canvas_size(&self) -> std::result::Result<CanvasSize, String> {
        match &self.size {
            Some(size) => size.parse(),
            None => Ok(CanvasSize::from_terminal()),
        }
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    /// Blank line.
    Skip,
    Exit,
    Question(String),
    /// `/sql <query>`
    Sql(String),
}

/// Interprets a line typed in the interactive session.
///
/// A bare preset number asks that preset.
pub fn parse_session_input(line: &str) -> SessionInput {
    let line = line.trim();

    if line.is_empty() {
        return SessionInput::Skip;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return SessionInput::Exit;
    }
    if let Some(sql) = line.strip_prefix("/sql") {
        if sql.is_empty() || sql.starts_with(char::is_whitespace) {
            return match sql.trim() {
                "" => SessionInput::Skip,
                sql => SessionInput::Sql(sql.to_string()),
            };
        }
    }
    if let Some(question) = line.parse::<usize>().ok().and_then(preset) {
        return SessionInput::Question(question.to_string());
    }
    SessionInput::Question(line.to_string())
}

/// Formats the numbered preset list.
pub fn format_presets() -> String {
    EXAMPLE_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n")
}
