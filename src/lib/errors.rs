use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors raised while resolving launcher settings from the environment.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings source could not be built or deserialized.
    #[error("Failed to load launcher settings: {source}")]
    Load {
        #[source]
        source: ConfigLoaderError,
    },
    /// Neither an explicit store path nor a home directory is available.
    #[error("Cannot locate the profile store: set {env} or HOME")]
    HomeUnavailable { env: &'static str },
    #[error("Unsupported {env} value `{value}`: expected `auto` or `plaintext`")]
    InvalidCredentialBackend { env: &'static str, value: String },
}

/// Errors raised while reading or writing the persisted profile document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The profile document exists but could not be read.
    #[error("Failed to read profile store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The profile document is not valid JSON of the expected shape.
    #[error("Profile store {path} is invalid or corrupted: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Writing or replacing the profile document failed.
    #[error("Failed to write profile store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to serialize profile store: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The OS keyring rejected an operation.
    #[error("Secure credential storage failed for `{name}`: {message}")]
    Keyring { name: String, message: String },
    /// The credential was written to the OS keyring, which this process cannot reach.
    #[error("Credential for profile `{name}` is held in secure storage, which is unavailable")]
    SecureStorageUnavailable { name: String },
    #[error("Profile \"{name}\" not found.")]
    ProfileNotFound { name: String },
}

/// Failures that end a launcher invocation. Each maps to exit code 1 at the
/// program boundary.
#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("Profile \"{name}\" not found.")]
    ProfileNotFound { name: String },
    #[error("No profiles configured.")]
    NoProfiles,
    #[error("No credential found for profile \"{name}\".{}", reason_suffix(.reason))]
    MissingCredential {
        name: String,
        reason: Option<String>,
    },
    #[error("Failed to execute command `{binary}`: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },
    #[error("Interactive prompt failed: {message}")]
    Prompt { message: String },
    #[error(transparent)]
    Store(StoreError),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|reason| format!(" ({reason})"))
        .unwrap_or_default()
}

impl LauncherError {
    /// Directive shown after the error message, if any.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            LauncherError::ProfileNotFound { .. } => {
                Some("Run \"codex-profiles list\" to see available profiles.")
            }
            LauncherError::NoProfiles => {
                Some("Run \"codex-profiles setup\" to create a profile.")
            }
            LauncherError::MissingCredential { .. } => {
                Some("Run \"codex-profiles setup\" to configure credentials.")
            }
            LauncherError::Spawn { .. } => {
                Some("Install the Codex CLI or pass --cmd <binary> to launch something else.")
            }
            LauncherError::Store(StoreError::Corrupt { .. }) => {
                Some("Fix or remove the profile store, then run \"codex-profiles setup\".")
            }
            LauncherError::Prompt { .. } | LauncherError::Store(_) => None,
        }
    }
}

impl From<StoreError> for LauncherError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::ProfileNotFound { name } => LauncherError::ProfileNotFound { name },
            StoreError::SecureStorageUnavailable { name } => LauncherError::MissingCredential {
                name,
                reason: Some("secure storage is unavailable in this environment".into()),
            },
            other => LauncherError::Store(other),
        }
    }
}

impl From<dialoguer::Error> for LauncherError {
    fn from(value: dialoguer::Error) -> Self {
        LauncherError::Prompt {
            message: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_storage_unavailable_maps_to_missing_credential() {
        let error = LauncherError::from(StoreError::SecureStorageUnavailable {
            name: "work".into(),
        });

        match &error {
            LauncherError::MissingCredential { name, reason } => {
                assert_eq!(name, "work");
                assert!(reason.is_some(), "reason should explain the failure");
            }
            other => panic!("Unexpected error: {other:?}"),
        }
        assert!(
            error.to_string().contains("secure storage is unavailable"),
            "message: {error}"
        );
    }

    #[test]
    fn store_not_found_maps_to_launcher_not_found() {
        let error = LauncherError::from(StoreError::ProfileNotFound {
            name: "ghost".into(),
        });

        assert!(matches!(error, LauncherError::ProfileNotFound { ref name } if name == "ghost"));
        assert_eq!(error.to_string(), "Profile \"ghost\" not found.");
    }

    #[test]
    fn every_user_facing_kind_has_a_remediation() {
        let errors = [
            LauncherError::ProfileNotFound { name: "x".into() },
            LauncherError::NoProfiles,
            LauncherError::MissingCredential {
                name: "x".into(),
                reason: None,
            },
            LauncherError::Spawn {
                binary: "codex".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "missing"),
            },
        ];

        for error in errors {
            assert!(error.remediation().is_some(), "no remediation for {error:?}");
        }
    }

    #[test]
    fn missing_credential_message_omits_empty_reason() {
        let error = LauncherError::MissingCredential {
            name: "work".into(),
            reason: None,
        };
        assert_eq!(
            error.to_string(),
            "No credential found for profile \"work\"."
        );
    }
}
