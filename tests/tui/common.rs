//! Common test utilities for TUI tests.

use std::process::Command;

/// Runs the playground binary in headless mode with the given arguments.
///
/// Always passes a config path that does not exist so a developer's own
/// config file cannot change the outcome, and disables simulated latency.
pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_playground"))
        .args([
            "--headless",
            "--config",
            "/nonexistent/db-playground/config.toml",
            "--latency-ms",
            "0",
        ])
        .args(args)
        .env_remove("PLAYGROUND_DATA_DIR")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
