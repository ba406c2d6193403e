//! Entry point for codex-profiles.
use std::process::ExitCode;

use codex_profiles::{
    cli::{
        execute_cli_command, parse_invocation, CliCommand, CommandContext,
        CredentialBackendChoice, LauncherSettings, ParsedCommand, RuntimeExit, SystemBinaryCheck,
        TerminalPrompter,
    },
    launcher::{
        capture_process_env, execute_with_profile, version_command, EnvMap, LaunchContext,
        LaunchRequest, Platform,
    },
    lib::telemetry,
    store::ProfileStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(code) => code,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<ExitCode, RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let command = parse_invocation(&args);

    let env = capture_process_env();
    let settings = LauncherSettings::from_env(&env).map_err(RuntimeExit::from_error)?;
    let store = match settings.credential_backend {
        CredentialBackendChoice::Auto => ProfileStore::open(&settings.store_path),
        CredentialBackendChoice::Plaintext => ProfileStore::plaintext(&settings.store_path),
    };
    let prompter = TerminalPrompter::new();

    match command {
        ParsedCommand::Launch(request) => {
            run_launch(&store, &env, &settings, &prompter, request).await
        }
        ParsedCommand::Cli(command) => handle_cli_command(&store, &settings, &prompter, command),
    }
}

async fn run_launch(
    store: &ProfileStore,
    env: &EnvMap,
    settings: &LauncherSettings,
    prompter: &TerminalPrompter,
    request: LaunchRequest,
) -> Result<ExitCode, RuntimeExit> {
    let context = LaunchContext {
        store,
        env,
        binary_override: settings.binary_override.as_deref(),
        platform: Platform::current(),
    };
    let code = execute_with_profile(&context, &request, prompter).await?;
    Ok(RuntimeExit::child(code).report())
}

fn handle_cli_command(
    store: &ProfileStore,
    settings: &LauncherSettings,
    prompter: &TerminalPrompter,
    command: CliCommand,
) -> Result<ExitCode, RuntimeExit> {
    let context = CommandContext {
        store,
        prompter,
        binary_check: &SystemBinaryCheck,
        version_command: version_command(
            settings.binary_override.as_deref(),
            Platform::current(),
        ),
    };
    let message = execute_cli_command(command, &context)?;
    println!("{message}");
    Ok(ExitCode::SUCCESS)
}
