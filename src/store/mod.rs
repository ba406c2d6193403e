//! Profile store: profile records plus credentials in one durable document.
use std::path::Path;

use tracing::{debug, info, warn};

use crate::lib::errors::StoreError;

pub mod credentials;
pub mod document;
pub mod model;

pub use credentials::{
    detect_backend, keyring_available, BackendKind, CredentialBackend, KeyringBackend,
    PlaintextBackend, KEYRING_SERVICE,
};
pub use document::{Document, DocumentFile};
pub use model::{
    Config, Preset, Profile, ProfileWithCredential, DEFAULT_ENV_KEY_NAME, PRESETS,
};

/// Read/write contract over the profile document and the selected credential backend.
pub struct ProfileStore {
    file: DocumentFile,
    backend: Box<dyn CredentialBackend>,
}

impl ProfileStore {
    /// Open the store at `path`, choosing the keyring when it is reachable.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let file = DocumentFile::new(path.as_ref());
        let backend = detect_backend(&file);
        Self::with_backend(file, backend)
    }

    /// Open the store with plaintext credentials only.
    pub fn plaintext(path: impl AsRef<Path>) -> Self {
        let file = DocumentFile::new(path.as_ref());
        let backend = Box::new(PlaintextBackend::new(file.clone()));
        Self::with_backend(file, backend)
    }

    pub fn with_backend(file: DocumentFile, backend: Box<dyn CredentialBackend>) -> Self {
        debug!(
            target: "codex_profiles::store",
            path = %file.path().display(),
            backend = backend.kind().as_str(),
            "Opened profile store"
        );
        Self { file, backend }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn is_secure_storage_available(&self) -> bool {
        self.backend.kind() == BackendKind::Secure && self.backend.is_available()
    }

    /// Current config, or an empty one when the document is missing or unreadable.
    pub fn read_config(&self) -> Config {
        match self.read_config_checked() {
            Ok(config) => config.unwrap_or_default(),
            Err(err) => {
                warn!(
                    target: "codex_profiles::store",
                    path = %self.file.path().display(),
                    reason = %err,
                    "Falling back to an empty profile list"
                );
                Config::default()
            }
        }
    }

    /// Strict read for health checks. `Ok(None)` when nothing has been saved yet.
    pub fn read_config_checked(&self) -> Result<Option<Config>, StoreError> {
        let Some(document) = self.file.load()? else {
            return Ok(None);
        };
        document.config().map(Some).map_err(|source| self.corrupt(source))
    }

    fn corrupt(&self, source: serde_json::Error) -> StoreError {
        StoreError::Corrupt {
            path: self.file.path().to_path_buf(),
            source,
        }
    }

    /// Replace the config, keeping every other part of the document as it was.
    pub fn write_config(&self, config: &Config) -> Result<(), StoreError> {
        self.file.update(|doc| doc.set_config(config))?;
        info!(
            target: "codex_profiles::store",
            profiles = config.profiles.len(),
            default_profile = config.default_profile.as_deref().unwrap_or(""),
            "Saved profile configuration"
        );
        Ok(())
    }

    pub fn store_credential(&self, name: &str, secret: &str) -> Result<(), StoreError> {
        self.backend.store(name, secret)?;
        if self.backend.kind() == BackendKind::Secure {
            // Plaintext copies are dropped once the keyring holds the secret.
            let marked = self.file.update(|doc| {
                doc.mark_secure(name);
                doc.remove_plaintext_credential(name);
                Ok(())
            });
            if let Err(err) = marked {
                warn!(
                    target: "codex_profiles::store",
                    profile = name,
                    reason = %err,
                    "Profile store update failed; removing the keyring entry again"
                );
                if let Err(rollback) = self.backend.delete(name) {
                    warn!(
                        target: "codex_profiles::store",
                        profile = name,
                        reason = %rollback,
                        "Keyring entry left behind"
                    );
                }
                return Err(err);
            }
        }
        info!(
            target: "codex_profiles::store",
            profile = name,
            backend = self.backend.kind().as_str(),
            "Stored credential"
        );
        Ok(())
    }

    pub fn get_credential(&self, name: &str) -> Result<Option<String>, StoreError> {
        if let Some(secret) = self.backend.get(name)? {
            return Ok(Some(secret));
        }
        if self.backend.kind() == BackendKind::Secure {
            // Written while the keyring was unreachable.
            return match PlaintextBackend::new(self.file.clone()).get(name) {
                Err(StoreError::SecureStorageUnavailable { .. }) => Ok(None),
                other => other,
            };
        }
        Ok(None)
    }

    /// Remove the credential from every place it may live. Idempotent.
    pub fn delete_credential(&self, name: &str) -> Result<(), StoreError> {
        self.backend.delete(name)?;
        if self.backend.kind() == BackendKind::Secure {
            PlaintextBackend::new(self.file.clone()).delete(name)?;
        }
        Ok(())
    }

    pub fn profiles_with_credentials(&self) -> Vec<ProfileWithCredential> {
        self.read_config()
            .profiles
            .into_iter()
            .map(|profile| {
                let credential = self.get_credential(&profile.name).unwrap_or_else(|err| {
                    debug!(
                        target: "codex_profiles::store",
                        profile = %profile.name,
                        reason = %err,
                        "Credential lookup failed"
                    );
                    None
                });
                ProfileWithCredential {
                    profile,
                    credential,
                }
            })
            .collect()
    }

    /// Insert a new profile or replace the one with the same name.
    pub fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        let mut config = self.read_config();
        config.upsert(profile);
        self.write_config(&config)
    }

    pub fn set_default_profile(&self, name: &str) -> Result<(), StoreError> {
        let mut config = self.read_config();
        if !config.contains(name) {
            return Err(StoreError::ProfileNotFound {
                name: name.to_string(),
            });
        }
        config.default_profile = Some(name.to_string());
        self.write_config(&config)
    }

    /// Remove a profile, its default pointer, and its credential.
    ///
    /// The profile, default pointer, and plaintext credential disappear in a
    /// single document replace; a keyring entry is removed afterwards.
    pub fn delete_profile(&self, name: &str) -> Result<(), StoreError> {
        self.file.update(|doc| {
            let mut config = doc.config().map_err(|source| self.corrupt(source))?;
            if !config.remove(name) {
                return Err(StoreError::ProfileNotFound {
                    name: name.to_string(),
                });
            }
            doc.set_config(&config)?;
            doc.remove_plaintext_credential(name);
            doc.unmark_secure(name);
            Ok(())
        })?;
        self.backend.delete(name)?;
        info!(
            target: "codex_profiles::store",
            profile = name,
            "Deleted profile"
        );
        Ok(())
    }
}
