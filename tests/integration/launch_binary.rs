use anyhow::Result;
use serde_json::json;

use crate::common::{stderr, stdout, StoreFixture};

fn single_profile() -> Result<StoreFixture> {
    StoreFixture::new(&json!({
        "config": {
            "profiles": [
                { "name": "work", "baseUrl": "https://custom.api.com/v1" }
            ]
        },
        "credentials": { "work": "sk-test" }
    }))
}

#[cfg(unix)]
#[test]
fn child_exit_code_is_returned_verbatim() -> Result<()> {
    let fixture = single_profile()?;

    let output = fixture.run(&["work", "--cmd", "sh", "-c", "exit 7"])?;

    assert_eq!(output.status.code(), Some(7), "stderr: {}", stderr(&output));
    assert!(
        stderr(&output).contains("Launching with profile: work"),
        "stderr: {}",
        stderr(&output)
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn child_sees_profile_credentials_and_no_ambient_openai_vars() -> Result<()> {
    let fixture = single_profile()?;

    let output = fixture
        .command(&[
            "work",
            "--cmd",
            "sh",
            "-c",
            "printf '%s|%s|%s' \"$OPENAI_API_KEY\" \"$OPENAI_BASE_URL\" \"$OPENAI_ORGANIZATION\"",
        ])
        .env("OPENAI_ORGANIZATION", "org-ambient")
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "sk-test|https://custom.api.com/v1|");
    Ok(())
}

#[cfg(unix)]
#[test]
fn single_profile_is_used_without_a_name() -> Result<()> {
    let fixture = single_profile()?;

    let output = fixture.run(&["--cmd", "sh", "-c", "exit 0"])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        stderr(&output).contains("Using profile: work"),
        "stderr: {}",
        stderr(&output)
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn codex_cmd_overrides_cmd_flag() -> Result<()> {
    let fixture = single_profile()?;

    let output = fixture
        .command(&["work", "--cmd", "definitely-not-installed", "-c", "exit 3"])
        .env("CODEX_CMD", "sh")
        .output()?;

    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    Ok(())
}

#[test]
fn unknown_profile_exits_with_one() -> Result<()> {
    let fixture = single_profile()?;

    let output = fixture.run(&["ghost"])?;

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Profile \"ghost\" not found."), "stderr: {err}");
    assert!(err.contains("codex-profiles list"), "stderr: {err}");
    Ok(())
}

#[test]
fn launch_without_profiles_exits_with_one() -> Result<()> {
    let fixture = StoreFixture::empty()?;

    let output = fixture.run(&[])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("No profiles configured."),
        "stderr: {}",
        stderr(&output)
    );
    Ok(())
}

#[test]
fn missing_credential_exits_with_one() -> Result<()> {
    let fixture = StoreFixture::new(&json!({
        "config": {
            "profiles": [{ "name": "bare", "baseUrl": "https://x.example/v1" }]
        }
    }))?;

    let output = fixture.run(&["bare", "--cmd", "true"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("No credential found for profile \"bare\"."),
        "stderr: {}",
        stderr(&output)
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn missing_binary_is_a_spawn_failure() -> Result<()> {
    let fixture = single_profile()?;

    let output = fixture.run(&["work", "--cmd", "definitely-not-installed-4b2e"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("definitely-not-installed-4b2e"),
        "stderr: {}",
        stderr(&output)
    );
    Ok(())
}
