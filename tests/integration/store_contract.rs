use std::{collections::BTreeMap, fs, path::Path, sync::Mutex};

use anyhow::Result;
use serde_json::json;

use codex_profiles::{
    lib::errors::StoreError,
    store::{BackendKind, Config, CredentialBackend, DocumentFile, Profile, ProfileStore},
};

use crate::common::read_json;

/// Keyring stand-in so the secure path runs without an OS service.
#[derive(Default)]
struct MemoryKeyring {
    secrets: Mutex<BTreeMap<String, String>>,
}

impl CredentialBackend for MemoryKeyring {
    fn kind(&self) -> BackendKind {
        BackendKind::Secure
    }

    fn is_available(&self) -> bool {
        true
    }

    fn store(&self, name: &str, secret: &str) -> Result<(), StoreError> {
        self.lock()?.insert(name.to_string(), secret.to_string());
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.lock()?.remove(name);
        Ok(())
    }
}

impl MemoryKeyring {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.secrets.lock().map_err(|err| StoreError::Keyring {
            name: "memory".into(),
            message: err.to_string(),
        })
    }
}

fn stores(dir: &Path) -> Vec<ProfileStore> {
    vec![
        ProfileStore::plaintext(dir.join("plain.json")),
        ProfileStore::with_backend(
            DocumentFile::new(dir.join("secure.json")),
            Box::new(MemoryKeyring::default()),
        ),
    ]
}

#[test]
fn every_backend_honours_the_store_contract() -> Result<()> {
    let temp = tempfile::tempdir()?;

    for store in stores(temp.path()) {
        let kind = store.backend_kind().as_str();
        assert_eq!(store.read_config(), Config::default(), "{kind}: empty start");

        let mut work = Profile::new("work", "https://work.example/v1");
        work.model = Some("gpt-5".into());
        let config = Config {
            profiles: vec![work, Profile::new("home", "https://api.openai.com/v1")],
            default_profile: Some("work".into()),
        };
        store.write_config(&config)?;
        assert_eq!(store.read_config(), config, "{kind}: round trip");

        store.store_credential("work", "sk-work")?;
        store.write_config(&config)?;
        assert_eq!(
            store.get_credential("work")?.as_deref(),
            Some("sk-work"),
            "{kind}: credential survives config writes"
        );
        assert_eq!(store.get_credential("home")?, None, "{kind}: missing is None");

        store.delete_profile("work")?;
        let after = store.read_config();
        assert_eq!(after.default_profile, None, "{kind}: default cleared");
        assert!(!after.contains("work"), "{kind}: profile removed");
        assert_eq!(store.get_credential("work")?, None, "{kind}: credential removed");

        store.delete_credential("work")?;
    }
    Ok(())
}

#[test]
fn documents_from_older_installs_are_read_and_preserved() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("profiles.json");
    fs::write(
        &path,
        serde_json::to_string_pretty(&json!({
            "config": {
                "profiles": [{ "name": "legacy", "baseUrl": "https://legacy.example/v1" }]
            },
            "credentials": { "legacy": "sk-legacy" },
            "lastUpdatedBy": "another-tool"
        }))?,
    )?;
    let store = ProfileStore::plaintext(&path);

    assert_eq!(
        store.get_credential("legacy")?.as_deref(),
        Some("sk-legacy")
    );
    store.upsert_profile(Profile::new("new", "https://new.example/v1"))?;

    let document = read_json(&path)?;
    assert_eq!(document["lastUpdatedBy"], json!("another-tool"));
    assert_eq!(document["credentials"]["legacy"], json!("sk-legacy"));
    assert_eq!(document["config"]["profiles"][1]["baseUrl"], json!("https://new.example/v1"));
    assert_eq!(document["config"]["profiles"][0].get("model"), None);
    Ok(())
}

#[test]
fn keyring_held_secret_is_reported_when_only_plaintext_is_reachable() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("profiles.json");
    let secure = ProfileStore::with_backend(
        DocumentFile::new(&path),
        Box::new(MemoryKeyring::default()),
    );
    secure.upsert_profile(Profile::new("work", "https://work.example/v1"))?;
    secure.store_credential("work", "sk-secret")?;

    let document = read_json(&path)?;
    assert_eq!(document["secureCredentials"], json!(["work"]));
    assert!(!fs::read_to_string(&path)?.contains("sk-secret"));

    let plaintext = ProfileStore::plaintext(&path);
    let error = plaintext
        .get_credential("work")
        .expect_err("secret lives in the keyring");
    assert!(matches!(error, StoreError::SecureStorageUnavailable { ref name } if name == "work"));
    Ok(())
}
