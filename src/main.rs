//! insight - ask business questions about the Superstore dataset.

use std::io::{IsTerminal, Write};
use std::process::ExitCode;

use superstore_insight::app::{Answer, App};
use superstore_insight::cli::{format_presets, parse_session_input, Cli, Mode, SessionInput};
use superstore_insight::config::Config;
use superstore_insight::error::{InsightError, Result};
use superstore_insight::logging::init_stderr_logging;
use superstore_insight::output::{format_answer, format_error, OutputFormat, ReportOptions};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

/// Exit code when a one-shot question fails.
const QUESTION_FAILED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    init_stderr_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}", format_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mode = cli.mode().map_err(InsightError::config)?;

    if mode == Mode::ListPresets {
        println!("{}", format_presets());
        return Ok(ExitCode::SUCCESS);
    }

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.apply_env_overrides();
    cli.apply_to(&mut config);
    config.validate()?;

    let format = cli.parse_output_format().map_err(InsightError::config)?;
    let options = ReportOptions {
        max_rows: config.display.max_rows,
        canvas: cli.parse_canvas_size().map_err(InsightError::config)?,
        show_chart: !cli.no_chart,
    };

    let app = App::from_config(config)?;
    let dataset = app.dataset().await?;
    info!(rows = dataset.row_count(), "Dataset ready");

    match mode {
        Mode::Question(question) => one_shot(app.ask(&question).await, format, &options),
        Mode::Sql(sql) => one_shot(app.run_sql(&sql).await, format, &options),
        Mode::Interactive => interactive(&app, format, &options).await,
        Mode::ListPresets => Ok(ExitCode::SUCCESS),
    }
}

fn print_answer(answer: &Answer, format: OutputFormat, options: &ReportOptions) -> Result<()> {
    println!("{}", format_answer(answer, format, options)?);
    Ok(())
}

fn one_shot(answer: Answer, format: OutputFormat, options: &ReportOptions) -> Result<ExitCode> {
    print_answer(&answer, format, options)?;
    if answer.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(QUESTION_FAILED))
    }
}

/// Reads questions from stdin until `exit`, `quit` or end of input.
///
/// Failed questions are reported and the session continues.
async fn interactive(app: &App, format: OutputFormat, options: &ReportOptions) -> Result<ExitCode> {
    let prompt = std::io::stdin().is_terminal();

    if prompt {
        eprintln!("Ask a question about the Superstore data, or pick a preset:");
        eprintln!("{}", format_presets());
        eprintln!("Type /sql <query> to run SQL directly, exit to quit.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if prompt {
            eprint!("> ");
            let _ = std::io::stderr().flush();
        }

        let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| InsightError::internal(format!("Failed to read input: {e}")))?
        else {
            break;
        };

        let answer = match parse_session_input(&line) {
            SessionInput::Skip => continue,
            SessionInput::Exit => break,
            SessionInput::Question(question) => app.ask(&question).await,
            SessionInput::Sql(sql) => app.run_sql(&sql).await,
        };

        print_answer(&answer, format, options)?;
        if format == OutputFormat::Text {
            println!();
        }
    }

    Ok(ExitCode::SUCCESS)
}
