use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_codex-profiles");

/// Temporary home holding a profile document.
pub struct StoreFixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl StoreFixture {
    pub fn new(document: &Value) -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create temp dir")?;
        let path = dir.path().join(".ai-codex-profiles.json");
        let serialized = serde_json::to_string_pretty(document)?;
        fs::write(&path, format!("{serialized}\n"))
            .with_context(|| format!("failed to write fixture {}", path.display()))?;
        Ok(Self { dir, path })
    }

    pub fn empty() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create temp dir")?;
        let path = dir.path().join(".ai-codex-profiles.json");
        Ok(Self { dir, path })
    }

    pub fn read(&self) -> Result<Value> {
        read_json(&self.path)
    }

    /// Launcher invocation isolated to this fixture.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(BINARY_PATH);
        command
            .args(args)
            .env("AI_CODEX_CONFIG_PATH", &self.path)
            .env("HOME", self.dir.path())
            .env("AI_CODEX_CREDENTIAL_BACKEND", "plaintext")
            .env_remove("CODEX_CMD")
            .env_remove("OPENAI_API_KEY")
            .env_remove("OPENAI_BASE_URL")
            .env_remove("RUST_LOG");
        command
    }

    pub fn run(&self, args: &[&str]) -> Result<Output> {
        self.command(args)
            .output()
            .with_context(|| format!("failed to run {BINARY_PATH}"))
    }
}

pub fn read_json(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON {}", path.display()))
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
