//! Credential backends: the OS keyring, or plaintext inside the profile document.
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::lib::errors::StoreError;

use super::document::DocumentFile;

/// Keyring service name under which secrets are filed.
pub const KEYRING_SERVICE: &str = "ai-codex-starter";
/// Account used to check keyring availability.
const KEYRING_CHECK_ACCOUNT: &str = "__availability_check__";

/// Which kind of backend holds credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Secure,
    Plaintext,
}

impl BackendKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Secure => "secure",
            BackendKind::Plaintext => "plaintext",
        }
    }
}

/// Storage for profile secrets, keyed by profile name.
pub trait CredentialBackend: Send + Sync {
    fn kind(&self) -> BackendKind;
    fn is_available(&self) -> bool;
    fn store(&self, name: &str, secret: &str) -> Result<(), StoreError>;
    fn get(&self, name: &str) -> Result<Option<String>, StoreError>;
    /// Idempotent: deleting a missing entry succeeds.
    fn delete(&self, name: &str) -> Result<(), StoreError>;
}

/// Secrets held by the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringBackend {
    service: String,
}

impl KeyringBackend {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, name: &str) -> Result<keyring::Entry, StoreError> {
        keyring::Entry::new(&self.service, name).map_err(|err| keyring_error(name, err))
    }
}

impl Default for KeyringBackend {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE)
    }
}

impl CredentialBackend for KeyringBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Secure
    }

    fn is_available(&self) -> bool {
        keyring_available()
    }

    fn store(&self, name: &str, secret: &str) -> Result<(), StoreError> {
        self.entry(name)?
            .set_password(secret)
            .map_err(|err| keyring_error(name, err))
    }

    fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        match self.entry(name)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(keyring_error(name, err)),
        }
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        match self.entry(name)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(keyring_error(name, err)),
        }
    }
}

fn keyring_error(name: &str, err: keyring::Error) -> StoreError {
    StoreError::Keyring {
        name: name.to_string(),
        message: err.to_string(),
    }
}

/// Secrets kept in the `credentials` map of the profile document.
#[derive(Debug, Clone)]
pub struct PlaintextBackend {
    file: DocumentFile,
}

impl PlaintextBackend {
    pub fn new(file: DocumentFile) -> Self {
        Self { file }
    }
}

impl CredentialBackend for PlaintextBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Plaintext
    }

    fn is_available(&self) -> bool {
        true
    }

    fn store(&self, name: &str, secret: &str) -> Result<(), StoreError> {
        self.file.update(|doc| {
            doc.set_plaintext_credential(name, secret);
            doc.unmark_secure(name);
            Ok(())
        })
    }

    fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        let document = match self.file.load() {
            Ok(document) => document.unwrap_or_default(),
            Err(StoreError::Corrupt { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        if let Some(secret) = document.plaintext_credential(name) {
            return Ok(Some(secret.to_string()));
        }
        if document.is_secure(name) {
            return Err(StoreError::SecureStorageUnavailable {
                name: name.to_string(),
            });
        }
        Ok(None)
    }

    /// Drops the plaintext entry and any secure marker. The file is only
    /// rewritten when one of them was present.
    fn delete(&self, name: &str) -> Result<(), StoreError> {
        let document = match self.file.load() {
            Ok(Some(document)) => document,
            Ok(None) | Err(StoreError::Corrupt { .. }) => return Ok(()),
            Err(err) => return Err(err),
        };
        if document.plaintext_credential(name).is_none() && !document.is_secure(name) {
            return Ok(());
        }
        self.file.update(|doc| {
            doc.remove_plaintext_credential(name);
            doc.unmark_secure(name);
            Ok(())
        })
    }
}

/// Whether the OS keyring answers requests. Checked once per process.
pub fn keyring_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        let available = check_keyring(KEYRING_SERVICE);
        info!(
            target: "codex_profiles::store",
            available,
            "Checked secure credential storage"
        );
        available
    })
}

fn check_keyring(service: &str) -> bool {
    let entry = match keyring::Entry::new(service, KEYRING_CHECK_ACCOUNT) {
        Ok(entry) => entry,
        Err(err) => {
            debug!(target: "codex_profiles::store", reason = %err, "Keyring entry rejected");
            return false;
        }
    };
    keyring_answered(entry.get_password())
}

/// A lookup that reaches the Secret Service (or platform store) counts as
/// available, even when the entry is absent. Anything else means no daemon.
fn keyring_answered(lookup: keyring::Result<String>) -> bool {
    match lookup {
        Ok(_) | Err(keyring::Error::NoEntry) => true,
        Err(err) => {
            debug!(target: "codex_profiles::store", reason = %err, "Keyring unavailable");
            false
        }
    }
}

/// Pick the backend for this process: the keyring when it answers, plaintext otherwise.
pub fn detect_backend(file: &DocumentFile) -> Box<dyn CredentialBackend> {
    if keyring_available() {
        Box::new(KeyringBackend::default())
    } else {
        Box::new(PlaintextBackend::new(file.clone()))
    }
}
