//! Handlers for the profile management subcommands.
use std::process::Stdio;

use tracing::{debug, info, warn};
use url::Url;

use crate::{
    launcher::{std_command, LaunchCommand},
    lib::errors::LauncherError,
    store::{BackendKind, Profile, ProfileStore, PRESETS},
};

use super::{args::DeleteArgs, CliCommand, Prompter};

const CUSTOM_PRESET_LABEL: &str = "Custom";

/// Launch-binary check used by `doctor`.
pub trait BinaryCheck {
    /// Whether the version command runs and exits successfully.
    fn binary_available(&self, command: &LaunchCommand) -> bool;
}

/// Runs the binary on this machine.
pub struct SystemBinaryCheck;

impl BinaryCheck for SystemBinaryCheck {
    fn binary_available(&self, command: &LaunchCommand) -> bool {
        let status = std_command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) => status.success(),
            Err(err) => {
                debug!(
                    target: "codex_profiles::cli",
                    binary = %command.binary,
                    reason = %err,
                    "Binary check failed"
                );
                false
            }
        }
    }
}

/// Collaborators shared by every subcommand.
pub struct CommandContext<'a> {
    pub store: &'a ProfileStore,
    pub prompter: &'a dyn Prompter,
    pub binary_check: &'a dyn BinaryCheck,
    /// `--version` call for the binary a launch would run.
    pub version_command: LaunchCommand,
}

/// Run a management subcommand and return the text to print.
pub fn execute_cli_command(
    command: CliCommand,
    context: &CommandContext<'_>,
) -> Result<String, LauncherError> {
    match command {
        CliCommand::Setup => run_setup(context),
        CliCommand::List => Ok(render_list(context.store)),
        CliCommand::Default(args) => set_default(context.store, &args.name),
        CliCommand::Delete(args) => run_delete(context, &args),
        CliCommand::Doctor => Ok(render_doctor(context)),
    }
}

/// Interactive profile creation; an existing name is overwritten only after confirmation.
pub fn run_setup(context: &CommandContext<'_>) -> Result<String, LauncherError> {
    let prompter = context.prompter;
    eprintln!("🔧 Profile Setup Wizard");

    let mut choices: Vec<String> = PRESETS.iter().map(|preset| preset.label.to_string()).collect();
    choices.push(CUSTOM_PRESET_LABEL.to_string());
    let choice = prompter.select("Select a preset or create custom", &choices, 0)?;

    let template = match PRESETS.get(choice) {
        Some(preset) => preset.to_profile(""),
        None => prompt_custom_profile(prompter)?,
    };

    let name = prompter.input("Enter profile name", false, &validate_profile_name)?;
    let existed = context.store.read_config().contains(&name);
    if existed {
        let overwrite = prompter.confirm(
            &format!("Profile \"{name}\" already exists. Overwrite?"),
            false,
        )?;
        if !overwrite {
            return Ok("Setup cancelled.".to_string());
        }
    }

    let secret = prompter.password("Enter API key")?;

    let profile = Profile { name, ..template };
    let name = profile.name.clone();
    context.store.upsert_profile(profile)?;
    if let Err(err) = context.store.store_credential(&name, &secret) {
        if !existed {
            if let Err(cleanup) = context.store.delete_profile(&name) {
                warn!(
                    target: "codex_profiles::cli",
                    profile = %name,
                    reason = %cleanup,
                    "Profile left without a credential"
                );
            }
        }
        return Err(err.into());
    }
    info!(
        target: "codex_profiles::cli",
        profile = %name,
        backend = context.store.backend_kind().as_str(),
        "Profile saved"
    );

    let mut lines = vec![format!("✓ Profile \"{name}\" saved successfully!")];
    if context.store.backend_kind() == BackendKind::Plaintext {
        lines.push(format!(
            "⚠️  Credentials stored in plaintext in {} (secure storage unavailable)",
            context.store.path().display()
        ));
    }
    Ok(lines.join("\n"))
}

fn prompt_custom_profile(prompter: &dyn Prompter) -> Result<Profile, LauncherError> {
    let base_url = prompter.input("Enter API base URL", false, &validate_base_url)?;
    let model = prompter.input("Enter model name (optional)", true, &accept_any)?;
    let env_key_name = prompter.input(
        "Environment variable for the API key (optional, default OPENAI_API_KEY)",
        true,
        &validate_env_key_name,
    )?;
    let model_provider = prompter.input("Codex model provider (optional)", true, &accept_any)?;

    let mut profile = Profile::new("", base_url);
    profile.model = non_empty(model);
    profile.env_key_name = non_empty(env_key_name);
    profile.model_provider = non_empty(model_provider);
    Ok(profile)
}

/// Accepts anything `url` parses as an absolute URL.
pub fn validate_base_url(input: &str) -> Result<(), String> {
    Url::parse(input)
        .map(|_| ())
        .map_err(|_| "Please enter a valid URL".to_string())
}

pub fn validate_profile_name(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        Err("Profile name cannot be empty".to_string())
    } else {
        Ok(())
    }
}

fn validate_env_key_name(input: &str) -> Result<(), String> {
    let valid = input
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err("Use letters, digits, and underscores only".to_string())
    }
}

fn accept_any(_input: &str) -> Result<(), String> {
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Profiles with default marker, endpoint, model, and credential status.
pub fn render_list(store: &ProfileStore) -> String {
    let config = store.read_config();
    let profiles = store.profiles_with_credentials();

    if profiles.is_empty() {
        return "No profiles configured.\nRun \"codex-profiles setup\" to create a profile."
            .to_string();
    }

    let mut lines = vec!["📋 Configured Profiles:".to_string(), String::new()];
    for entry in &profiles {
        let profile = &entry.profile;
        lines.push(format!("{}{}", profile.name, default_marker(config.is_default(&profile.name))));
        lines.push(format!("  Base URL: {}", profile.base_url));
        if let Some(model) = &profile.model {
            lines.push(format!("  Model: {model}"));
        }
        if let Some(key) = &profile.env_key_name {
            lines.push(format!("  Key variable: {key}"));
        }
        if let Some(provider) = &profile.model_provider {
            lines.push(format!("  Provider: {provider}"));
        }
        lines.push(if entry.has_credential() {
            "  Credential: ✓ Stored".to_string()
        } else {
            "  Credential: ✗ Missing".to_string()
        });
        lines.push(String::new());
    }
    lines.join("\n").trim_end().to_string()
}

fn default_marker(is_default: bool) -> &'static str {
    if is_default {
        " (default)"
    } else {
        ""
    }
}

pub fn set_default(store: &ProfileStore, name: &str) -> Result<String, LauncherError> {
    store.set_default_profile(name)?;
    Ok(format!("✓ Default profile set to \"{name}\""))
}

/// Delete after confirmation; declining is reported, not treated as an error.
pub fn run_delete(context: &CommandContext<'_>, args: &DeleteArgs) -> Result<String, LauncherError> {
    if !context.store.read_config().contains(&args.name) {
        return Err(LauncherError::ProfileNotFound {
            name: args.name.clone(),
        });
    }

    if !args.yes {
        let confirmed = context.prompter.confirm(
            &format!("Are you sure you want to delete profile \"{}\"?", args.name),
            false,
        )?;
        if !confirmed {
            return Ok("Deletion cancelled.".to_string());
        }
    }

    context.store.delete_profile(&args.name)?;
    Ok(format!("✓ Profile \"{}\" deleted successfully!", args.name))
}

/// Health report: secure storage, launch binary, profiles, and the store file.
pub fn render_doctor(context: &CommandContext<'_>) -> String {
    let store = context.store;
    let mut lines = vec!["🏥 System Health Check".to_string(), String::new()];

    if store.is_secure_storage_available() {
        lines.push("Secure storage: ✓ Available".to_string());
    } else {
        lines.push("Secure storage: ✗ Unavailable".to_string());
        lines.push("  → Credentials stored in plaintext".to_string());
        lines.push("  → Install an OS keyring service for secure storage".to_string());
    }

    let binary = &context.version_command.binary;
    if context.binary_check.binary_available(&context.version_command) {
        lines.push(format!("Launch binary ({binary}): ✓ Found"));
    } else {
        lines.push(format!("Launch binary ({binary}): ✗ Not found"));
        lines.push("  → Install the Codex CLI or use the --cmd flag for testing".to_string());
    }

    let config = store.read_config();
    let profiles = store.profiles_with_credentials();
    lines.push(String::new());
    lines.push(format!("Profiles: {} configured", profiles.len()));
    if profiles.is_empty() {
        lines.push("  → No profiles configured".to_string());
        lines.push("  → Run \"codex-profiles setup\" to create a profile".to_string());
    }
    for entry in &profiles {
        let mark = if entry.has_credential() { "✓" } else { "✗" };
        lines.push(format!(
            "  {mark} {}{}",
            entry.profile.name,
            default_marker(config.is_default(&entry.profile.name))
        ));
    }

    lines.push(String::new());
    lines.push("Configuration File:".to_string());
    lines.push(format!("  Location: {}", store.path().display()));
    let status = match store.read_config_checked() {
        Ok(Some(_)) => "✓ Valid",
        Ok(None) => "Not created yet",
        Err(_) => "✗ Invalid or corrupted",
    };
    lines.push(format!("  Status: {status}"));

    lines.join("\n")
}
