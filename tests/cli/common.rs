//! Helpers for running the `insight` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Exit code, stdout and stderr of one run.
pub type RunOutput = (i32, String, String);

fn command(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_insight"));
    let config = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/no-such-config.toml");

    cmd.arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("INSIGHT_DATASET")
        .env_remove("INSIGHT_LLM_PROVIDER")
        .env_remove("INSIGHT_LLM_MODEL")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn collect(output: std::process::Output) -> RunOutput {
    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (exit_code, stdout, stderr)
}

/// Runs the binary with the mock model and the fixture dataset.
pub fn run_insight(args: &[&str]) -> RunOutput {
    run_insight_with_stdin(args, "")
}

/// Like [`run_insight`], feeding `stdin` to the process.
pub fn run_insight_with_stdin(args: &[&str], stdin: &str) -> RunOutput {
    let dataset = crate::integration::fixture_path();
    let mut cmd = command(&["--provider", "mock"]);
    cmd.arg("--dataset").arg(dataset).args(args).stdin(Stdio::piped());

    let mut child = cmd.spawn().expect("Failed to execute command");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");
    collect(child.wait_with_output().expect("Failed to wait for command"))
}

/// Runs the binary with exactly the given arguments.
pub fn run_raw(args: &[&str]) -> RunOutput {
    collect(
        command(args)
            .stdin(Stdio::null())
            .output()
            .expect("Failed to execute command"),
    )
}
