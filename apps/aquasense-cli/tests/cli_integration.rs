//! Integration tests for the AquaSense CLI.
//!
//! Runs each subcommand against a temporary data directory. None of these
//! tests reach the network.

use anyhow::Result;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the aquasense binary with `args` against `data_dir`
fn aquasense(data_dir: &TempDir, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_aquasense"))
        .arg("--data-dir")
        .arg(data_dir.path())
        .args(args)
        .env_remove("AQUASENSE_ENV")
        .env_remove("AQUASENSE_BACKEND_URL")
        .env_remove("AQUASENSE_PREDICTION_URL")
        .output()?;
    Ok(output)
}

fn valid_answers() -> Vec<&'static str> {
    vec![
        "questionnaire",
        "--people",
        "4",
        "--children",
        "2",
        "--temperature",
        "28",
        "--water-saving-devices",
        "yes",
        "--showers-per-day",
        "3",
        "--time-per-shower",
        "8",
        "--washing-per-week",
        "5",
        "--rainwater-harvesting",
        "no",
        "--taps-running",
        "no",
        "--estimated-usage",
        "300",
    ]
}

#[test]
fn test_cli_version() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_aquasense"))
        .arg("--version")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("aquasense"));

    Ok(())
}

#[test]
fn test_cli_help() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_aquasense"))
        .arg("--help")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("questionnaire"));
    assert!(stdout.contains("alerts"));
    assert!(stdout.contains("session"));

    Ok(())
}

#[test]
fn test_nav_highlights_active_route() -> Result<()> {
    let data_dir = tempfile::tempdir()?;

    let output = aquasense(&data_dir, &["nav", "--active", "/leaderboard"])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("> Leaderboard  /Leaderboard"));
    assert!(stdout.contains("  Dashboard  /Dashboard1"));
    assert!(stdout.contains("Product Suggestions"));

    Ok(())
}

#[test]
fn test_alerts_default_reading() -> Result<()> {
    let data_dir = tempfile::tempdir()?;

    let output = aquasense(&data_dir, &["alerts"])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Approaching your daily water limit."));
    assert!(stdout.contains("(80.0% used)"));

    Ok(())
}

#[test]
fn test_alerts_exceeded_and_invalid_quota() -> Result<()> {
    let data_dir = tempfile::tempdir()?;

    let output = aquasense(&data_dir, &["alerts", "--used", "200", "--quota", "150"])?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("exceeded your daily water limit"));

    let output = aquasense(&data_dir, &["alerts", "--quota", "0"])?;
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("invalid daily quota"));

    Ok(())
}

#[test]
fn test_session_login_show_logout() -> Result<()> {
    let data_dir = tempfile::tempdir()?;

    let output = aquasense(&data_dir, &["session", "login", "--user-id", "u1", "--token", "t"])?;
    assert!(output.status.success());

    let output = aquasense(&data_dir, &["session", "show"])?;
    assert!(String::from_utf8(output.stdout)?.contains("Signed in as u1"));

    let storage = std::fs::read_to_string(data_dir.path().join("storage.json"))?;
    assert!(storage.contains("\"token\""));

    aquasense(&data_dir, &["session", "logout"])?;
    let output = aquasense(&data_dir, &["session", "show"])?;
    assert!(String::from_utf8(output.stdout)?.contains("Not signed in"));

    Ok(())
}

#[test]
fn test_invalid_questionnaire_exits_non_zero() -> Result<()> {
    let data_dir = tempfile::tempdir()?;
    let mut args = valid_answers();
    args[2] = "-3";

    let output = aquasense(&data_dir, &args)?;

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Please correct the following answers"));
    assert!(stdout.contains("(people): Please enter a valid number"));
    assert!(!stdout.contains("(children)"));
    assert!(!data_dir.path().join("storage.json").exists());

    Ok(())
}

#[test]
fn test_missing_answers_are_listed() -> Result<()> {
    let data_dir = tempfile::tempdir()?;

    let output = aquasense(&data_dir, &["questionnaire", "--people", "4"])?;

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("(tapsRunning): Please select Yes or No"));
    assert!(!stdout.contains("(people)"));

    Ok(())
}

#[test]
fn test_questionnaire_without_session_redirects_to_login() -> Result<()> {
    let data_dir = tempfile::tempdir()?;

    let output = aquasense(&data_dir, &valid_answers())?;

    assert!(output.status.success(), "questionnaire failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("User ID not found. Please login again."));
    assert!(stdout.contains("Next view: /login"));

    // Answers are kept for the next attempt
    let storage = std::fs::read_to_string(data_dir.path().join("storage.json"))?;
    assert!(storage.contains("questionnaireData"));
    assert!(!storage.contains("predictedUsage"));

    Ok(())
}

#[test]
fn test_dashboard_without_prediction() -> Result<()> {
    let data_dir = tempfile::tempdir()?;

    let output = aquasense(&data_dir, &["dashboard"])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Not signed in"));
    assert!(stdout.contains("No prediction yet"));

    Ok(())
}
