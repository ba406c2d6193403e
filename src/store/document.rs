//! On-disk profile document: `{ config, credentials?, secureCredentials? }`.
//!
//! The document is handled as a raw JSON object. Each key is decoded on its
//! own, so a malformed `config` never costs the `credentials` map, and keys
//! this crate does not know are written back unchanged.
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::lib::{errors::StoreError, fs::write_atomic};

use super::model::Config;

const CONFIG_KEY: &str = "config";
const CREDENTIALS_KEY: &str = "credentials";
const SECURE_CREDENTIALS_KEY: &str = "secureCredentials";

/// Whole persisted unit as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    pub fn from_object(root: Map<String, Value>) -> Self {
        Self { root }
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Decode the `config` key. A missing key is an empty config.
    pub fn config(&self) -> Result<Config, serde_json::Error> {
        match self.root.get(CONFIG_KEY) {
            Some(value) => serde_json::from_value(value.clone()),
            None => Ok(Config::default()),
        }
    }

    /// Replace only the `config` key.
    pub fn set_config(&mut self, config: &Config) -> Result<(), StoreError> {
        let value = serde_json::to_value(config).map_err(StoreError::Serialize)?;
        self.root.insert(CONFIG_KEY.to_string(), value);
        Ok(())
    }

    /// Plaintext secret for `name`. Non-string entries are ignored.
    pub fn plaintext_credential(&self, name: &str) -> Option<&str> {
        self.root
            .get(CREDENTIALS_KEY)
            .and_then(Value::as_object)
            .and_then(|map| map.get(name))
            .and_then(Value::as_str)
    }

    pub fn set_plaintext_credential(&mut self, name: &str, secret: &str) {
        let slot = self
            .root
            .entry(CREDENTIALS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            warn!(
                target: "codex_profiles::store",
                "Replacing non-object credentials entry in profile store"
            );
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            map.insert(name.to_string(), Value::String(secret.to_string()));
        }
    }

    /// Returns `true` when an entry was removed.
    pub fn remove_plaintext_credential(&mut self, name: &str) -> bool {
        self.root
            .get_mut(CREDENTIALS_KEY)
            .and_then(Value::as_object_mut)
            .map(|map| map.remove(name).is_some())
            .unwrap_or(false)
    }

    pub fn is_secure(&self, name: &str) -> bool {
        self.root
            .get(SECURE_CREDENTIALS_KEY)
            .and_then(Value::as_array)
            .map(|names| names.iter().any(|entry| entry.as_str() == Some(name)))
            .unwrap_or(false)
    }

    pub fn mark_secure(&mut self, name: &str) {
        if self.is_secure(name) {
            return;
        }
        let slot = self
            .root
            .entry(SECURE_CREDENTIALS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(names) = slot {
            names.push(Value::String(name.to_string()));
        }
    }

    /// Returns `true` when the name was listed. The key is dropped once empty.
    pub fn unmark_secure(&mut self, name: &str) -> bool {
        let Some(Value::Array(names)) = self.root.get_mut(SECURE_CREDENTIALS_KEY) else {
            return false;
        };
        let before = names.len();
        names.retain(|entry| entry.as_str() != Some(name));
        let removed = before != names.len();
        if names.is_empty() {
            self.root.remove(SECURE_CREDENTIALS_KEY);
        }
        removed
    }
}

/// Handle to the profile document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. `Ok(None)` when the file does not exist.
    pub fn load(&self) -> Result<Option<Document>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(
                    target: "codex_profiles::store",
                    path = %self.path.display(),
                    "Profile store does not exist yet"
                );
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str::<Map<String, Value>>(&content)
            .map(|root| Some(Document::from_object(root)))
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    /// Load for a read-modify-write cycle. A file that is not a JSON object is
    /// replaced by an empty document; a malformed `config` key is left to the caller.
    pub fn load_for_update(&self) -> Result<Document, StoreError> {
        match self.load() {
            Ok(document) => Ok(document.unwrap_or_default()),
            Err(StoreError::Corrupt { path, source }) => {
                warn!(
                    target: "codex_profiles::store",
                    path = %path.display(),
                    reason = %source,
                    "Profile store is corrupted; starting from an empty document"
                );
                Ok(Document::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Atomically replace the document on disk. The temp file is created
    /// owner-only, so the replaced document is too.
    pub fn save(&self, document: &Document) -> Result<(), StoreError> {
        let mut content = serde_json::to_vec_pretty(document.as_object()).map_err(StoreError::Serialize)?;
        content.push(b'\n');
        write_atomic(&self.path, &content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            target: "codex_profiles::store",
            path = %self.path.display(),
            keys = document.as_object().len(),
            "Profile store written"
        );
        Ok(())
    }

    /// Read, mutate, and atomically write back the document.
    pub fn update<T>(
        &self,
        mutate: impl FnOnce(&mut Document) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut document = self.load_for_update()?;
        let result = mutate(&mut document)?;
        self.save(&document)?;
        Ok(result)
    }
}
