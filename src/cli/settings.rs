//! Launcher settings resolved from the environment.
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::{
    launcher::EnvMap,
    lib::{
        errors::SettingsError,
        fs::{resolve_home_dir, DEFAULT_STORE_FILE_NAME},
    },
};

/// Overrides the profile store location.
pub const CONFIG_PATH_ENV: &str = "AI_CODEX_CONFIG_PATH";
/// Overrides the launched binary; wins over `--cmd`.
pub const BINARY_OVERRIDE_ENV: &str = "CODEX_CMD";
/// `plaintext` keeps credentials in the profile document and never touches the OS keyring.
pub const CREDENTIAL_BACKEND_ENV: &str = "AI_CODEX_CREDENTIAL_BACKEND";
const HOME_ENV: &str = "HOME";
const USER_PROFILE_ENV: &str = "USERPROFILE";

/// Where the store path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePathSource {
    Env,
    Home,
}

/// Which credential backend the store opens with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CredentialBackendChoice {
    /// OS keyring when it answers, plaintext otherwise.
    #[default]
    Auto,
    Plaintext,
}

impl CredentialBackendChoice {
    fn parse(value: &str) -> Result<Self, SettingsError> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "plaintext" => Ok(Self::Plaintext),
            _ => Err(SettingsError::InvalidCredentialBackend {
                env: CREDENTIAL_BACKEND_ENV,
                value: value.to_string(),
            }),
        }
    }
}

/// Resolved launcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSettings {
    pub store_path: PathBuf,
    pub store_path_source: StorePathSource,
    pub binary_override: Option<String>,
    pub credential_backend: CredentialBackendChoice,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(alias = "AI_CODEX_CONFIG_PATH")]
    ai_codex_config_path: Option<String>,
    #[serde(alias = "CODEX_CMD")]
    codex_cmd: Option<String>,
    #[serde(alias = "AI_CODEX_CREDENTIAL_BACKEND")]
    ai_codex_credential_backend: Option<String>,
}

impl LauncherSettings {
    /// Resolve settings from an explicit environment map.
    ///
    /// Store path order: `AI_CODEX_CONFIG_PATH` → `$HOME/.ai-codex-profiles.json`
    /// → `%USERPROFILE%\.ai-codex-profiles.json`.
    pub fn from_env(env: &EnvMap) -> Result<Self, SettingsError> {
        let raw = load_raw(env)?;

        let binary_override = raw.codex_cmd.and_then(non_blank);
        let credential_backend = match raw.ai_codex_credential_backend.and_then(non_blank) {
            Some(value) => CredentialBackendChoice::parse(&value)?,
            None => CredentialBackendChoice::default(),
        };
        let (store_path, store_path_source) = match raw.ai_codex_config_path.and_then(non_blank) {
            Some(path) => (PathBuf::from(path), StorePathSource::Env),
            None => {
                let home = resolve_home_dir(
                    env.get(HOME_ENV).map(String::as_str),
                    env.get(USER_PROFILE_ENV).map(String::as_str),
                )
                .ok_or(SettingsError::HomeUnavailable {
                    env: CONFIG_PATH_ENV,
                })?;
                (home.join(DEFAULT_STORE_FILE_NAME), StorePathSource::Home)
            }
        };

        debug!(
            target: "codex_profiles::cli",
            store_path = %store_path.display(),
            source = ?store_path_source,
            binary_override = binary_override.as_deref().unwrap_or(""),
            credential_backend = ?credential_backend,
            "Resolved launcher settings"
        );

        Ok(Self {
            store_path,
            store_path_source,
            binary_override,
            credential_backend,
        })
    }
}

fn load_raw(env: &EnvMap) -> Result<RawSettings, SettingsError> {
    let source: config::Map<String, String> = env
        .iter()
        .filter(|(key, _)| {
            [CONFIG_PATH_ENV, BINARY_OVERRIDE_ENV, CREDENTIAL_BACKEND_ENV].contains(&key.as_str())
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    config::Config::builder()
        .add_source(config::Environment::default().source(Some(source)))
        .build()
        .and_then(|document| document.try_deserialize::<RawSettings>())
        .map_err(|source| SettingsError::Load { source })
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
