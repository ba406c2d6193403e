//! Launch orchestration: resolve, prepare, spawn, wait.
use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, warn};

use crate::{
    lib::{
        errors::LauncherError,
        telemetry::{emit_launch, LaunchTelemetry},
    },
    store::ProfileStore,
};

use super::{
    build_command, prepare_environment, resolve_profile, CommandRequest, EnvMap, LaunchCommand,
    Platform, ProfileSelector, Resolution, BASE_URL_ENV,
};

/// Profile name and raw arguments from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    pub profile: Option<String>,
    pub args: Vec<String>,
}

/// Everything a launch reads besides the request.
pub struct LaunchContext<'a> {
    pub store: &'a ProfileStore,
    pub env: &'a EnvMap,
    pub binary_override: Option<&'a str>,
    pub platform: Platform,
}

/// Fully computed launch, ready to spawn.
#[derive(Debug, Clone)]
pub struct PreparedLaunch {
    pub profile_name: String,
    pub model: Option<String>,
    pub resolution: Resolution,
    pub command: LaunchCommand,
    pub env: EnvMap,
}

/// Resolve the profile and credential, then compute environment and command.
pub fn prepare_launch(
    context: &LaunchContext<'_>,
    request: &LaunchRequest,
    selector: &dyn ProfileSelector,
) -> Result<PreparedLaunch, LauncherError> {
    let config = context.store.read_config();
    let (profile, resolution) = resolve_profile(&config, request.profile.as_deref(), selector)?;

    let credential = context
        .store
        .get_credential(&profile.name)?
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| LauncherError::MissingCredential {
            name: profile.name.clone(),
            reason: None,
        })?;

    let env = prepare_environment(context.env, &profile, &credential);
    let command = build_command(CommandRequest {
        binary_override: context.binary_override,
        model: profile.model.as_deref(),
        model_provider: profile.model_provider.as_deref(),
        raw_args: &request.args,
        platform: context.platform,
    });

    emit_launch(&LaunchTelemetry {
        profile: &profile.name,
        binary: &command.binary,
        args: &command.args,
        credential_env: profile.credential_env_key(),
        base_url_injected: env.contains_key(BASE_URL_ENV),
    });

    Ok(PreparedLaunch {
        profile_name: profile.name,
        model: profile.model,
        resolution,
        command,
        env,
    })
}

/// Spawn the prepared command with inherited stdio and wait for it.
///
/// Returns the child's exit code; a child ended by a signal reports 0.
pub async fn spawn_and_wait(prepared: &PreparedLaunch) -> Result<i32, LauncherError> {
    let mut command = Command::from(std_command(&prepared.command));
    command
        .env_clear()
        .envs(&prepared.env)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let status = command
        .status()
        .await
        .map_err(|source| LauncherError::Spawn {
            binary: prepared.command.binary.clone(),
            source,
        })?;

    let code = status.code().unwrap_or_else(|| {
        warn!(
            target: "codex_profiles::launcher",
            status = %status,
            "Child exited without a code"
        );
        0
    });
    info!(
        target: "codex_profiles::launcher",
        profile = %prepared.profile_name,
        exit_code = code,
        "External command finished"
    );
    Ok(code)
}

/// Process for `launch`. Windows goes through `cmd /C` with the arguments
/// passed verbatim, so `codex.cmd` shims resolve.
#[cfg(windows)]
pub fn std_command(launch: &LaunchCommand) -> std::process::Command {
    use std::os::windows::process::CommandExt;

    let mut command = std::process::Command::new("cmd");
    command.arg("/C").raw_arg(&launch.binary);
    for arg in &launch.args {
        command.raw_arg(arg);
    }
    command
}

#[cfg(not(windows))]
pub fn std_command(launch: &LaunchCommand) -> std::process::Command {
    let mut command = std::process::Command::new(&launch.binary);
    command.args(&launch.args);
    command
}

/// Resolve, prepare, and run the external command. Returns its exit code.
pub async fn execute_with_profile(
    context: &LaunchContext<'_>,
    request: &LaunchRequest,
    selector: &dyn ProfileSelector,
) -> Result<i32, LauncherError> {
    let prepared = prepare_launch(context, request, selector)?;

    if prepared.resolution == Resolution::OnlyProfile {
        eprintln!("Using profile: {}", prepared.profile_name);
    }
    eprintln!("🚀 Launching with profile: {}", prepared.profile_name);
    if let Some(model) = &prepared.model {
        eprintln!("   Model: {model}");
    }

    spawn_and_wait(&prepared).await
}
