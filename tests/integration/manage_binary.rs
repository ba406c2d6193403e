use anyhow::Result;
use serde_json::{json, Value};

use crate::common::{stderr, stdout, StoreFixture};

fn two_profiles() -> Result<StoreFixture> {
    StoreFixture::new(&json!({
        "config": {
            "profiles": [
                { "name": "work", "baseUrl": "https://work.example/v1", "model": "gpt-5" },
                { "name": "home", "baseUrl": "https://api.openai.com/v1" }
            ],
            "defaultProfile": "work"
        },
        "credentials": { "work": "sk-work" }
    }))
}

#[test]
fn list_shows_profiles_and_credential_status() -> Result<()> {
    let fixture = two_profiles()?;

    let output = fixture.run(&["list"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("work (default)"), "stdout: {out}");
    assert!(out.contains("Base URL: https://work.example/v1"), "stdout: {out}");
    assert!(out.contains("Model: gpt-5"), "stdout: {out}");
    assert!(out.contains("Credential: ✗ Missing"), "stdout: {out}");
    assert!(!out.contains("sk-work"), "secrets must not be printed: {out}");
    Ok(())
}

#[test]
fn default_updates_the_document() -> Result<()> {
    let fixture = two_profiles()?;

    let output = fixture.run(&["default", "home"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let document = fixture.read()?;
    assert_eq!(document["config"]["defaultProfile"], json!("home"));
    assert_eq!(document["credentials"]["work"], json!("sk-work"));
    Ok(())
}

#[test]
fn default_for_unknown_profile_fails() -> Result<()> {
    let fixture = two_profiles()?;

    let output = fixture.run(&["default", "ghost"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("Profile \"ghost\" not found."),
        "stderr: {}",
        stderr(&output)
    );
    assert_eq!(fixture.read()?["config"]["defaultProfile"], json!("work"));
    Ok(())
}

#[test]
fn delete_with_yes_removes_profile_default_and_credential() -> Result<()> {
    let fixture = two_profiles()?;

    let output = fixture.run(&["delete", "work", "--yes"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let document = fixture.read()?;
    let names: Vec<&str> = document["config"]["profiles"]
        .as_array()
        .map(|profiles| profiles.iter().filter_map(|p| p["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["home"]);
    assert_eq!(document["config"].get("defaultProfile"), None);
    assert_eq!(
        document.get("credentials").and_then(|c| c.get("work")),
        None::<&Value>
    );
    Ok(())
}

#[test]
fn doctor_reports_config_location_and_status() -> Result<()> {
    let fixture = two_profiles()?;

    let output = fixture
        .command(&["doctor"])
        .env("CODEX_CMD", "definitely-not-installed-9d1a")
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Profiles: 2 configured"), "stdout: {out}");
    assert!(out.contains("✗ Not found"), "stdout: {out}");
    assert!(
        out.contains(&fixture.path.display().to_string()),
        "stdout: {out}"
    );
    assert!(out.contains("Status: ✓ Valid"), "stdout: {out}");
    assert!(out.contains("Secure storage: ✗ Unavailable"), "stdout: {out}");
    Ok(())
}

#[test]
fn unknown_credential_backend_setting_fails_before_touching_the_store() -> Result<()> {
    let fixture = two_profiles()?;
    let before = std::fs::read_to_string(&fixture.path)?;

    let output = fixture
        .command(&["delete", "work", "--yes"])
        .env("AI_CODEX_CREDENTIAL_BACKEND", "vault")
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("AI_CODEX_CREDENTIAL_BACKEND"),
        "stderr: {}",
        stderr(&output)
    );
    assert_eq!(std::fs::read_to_string(&fixture.path)?, before);
    Ok(())
}

#[test]
fn version_flag_is_handled_by_clap() -> Result<()> {
    let fixture = StoreFixture::empty()?;

    let output = fixture.run(&["--version"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        stdout(&output).contains(env!("CARGO_PKG_VERSION")),
        "stdout: {}",
        stdout(&output)
    );
    Ok(())
}
