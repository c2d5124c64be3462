//! Integration tests for the scanfix CLI
//!
//! Runs the built binary against a scratch directory and checks the
//! generated files plus the stdout progress and manifest output.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Test helper to get the CLI binary path
fn get_cli_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    if path.ends_with("deps") {
        path.pop(); // Remove "deps" directory
    }
    path.push("scanfix");
    #[cfg(windows)]
    path.set_extension("exe");
    path
}

fn setup_temp_dir() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

fn run_cli_command(args: &[&str]) -> Result<std::process::Output> {
    let output = Command::new(get_cli_path()).args(args).output()?;
    Ok(output)
}

#[test]
fn test_cli_generates_catalog() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let out_dir = temp_dir.path().join("documents");

    let output = run_cli_command(&["--output", out_dir.to_str().unwrap()])?;
    assert!(output.status.success(), "CLI should exit successfully");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Creating test files for bulk scanning tests"));
    assert!(stdout.contains("✓ Created:"));
    assert!(stdout.contains("All test files created successfully!"));
    assert!(stdout.contains("Filename"));

    let file_count = fs::read_dir(&out_dir)?.count();
    assert_eq!(file_count, 13);

    let pdf = fs::read(out_dir.join("test-document.pdf"))?;
    assert!(pdf.starts_with(b"%PDF-"));

    Ok(())
}

#[test]
fn test_cli_rerun_overwrites_in_place() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let out_dir = temp_dir.path().join("documents");
    let out = out_dir.to_str().unwrap();

    assert!(run_cli_command(&["--output", out])?.status.success());
    assert!(run_cli_command(&["--output", out])?.status.success());

    assert_eq!(fs::read_dir(&out_dir)?.count(), 13);
    Ok(())
}

#[test]
fn test_cli_help() -> Result<()> {
    let output = run_cli_command(&["--help"])?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--output"));
    Ok(())
}
