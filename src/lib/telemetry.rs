//! Telemetry initialization and launch event helpers.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter: the launcher shares its terminal with the child, so stay quiet.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Initialize `tracing` and route developer logs to stderr.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Payload describing a prepared launch. Never carries the credential.
#[derive(Debug)]
pub struct LaunchTelemetry<'a> {
    pub profile: &'a str,
    pub binary: &'a str,
    pub args: &'a [String],
    pub credential_env: &'a str,
    pub base_url_injected: bool,
}

/// Emit a prepared launch to `tracing`.
pub fn emit_launch(telemetry: &LaunchTelemetry<'_>) {
    info!(
        target: "codex_profiles::launcher",
        profile = telemetry.profile,
        binary = telemetry.binary,
        args = ?telemetry.args,
        credential_env = telemetry.credential_env,
        base_url_injected = telemetry.base_url_injected,
        "Launching external command"
    );
}
