//! Profile records as persisted in the profile document.
use serde::{Deserialize, Serialize};

/// Credential variable used when a profile does not name its own.
pub const DEFAULT_ENV_KEY_NAME: &str = "OPENAI_API_KEY";

/// Named connection settings for one API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Environment variable that receives the credential (e.g. `MINIMAX_API_KEY`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_key_name: Option<String>,
    /// Codex `model_provider` override (e.g. `minimax`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_provider: Option<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            model: None,
            env_key_name: None,
            model_provider: None,
        }
    }

    /// Variable name the credential is exported under.
    pub fn credential_env_key(&self) -> &str {
        self.env_key_name
            .as_deref()
            .filter(|key| !key.is_empty())
            .unwrap_or(DEFAULT_ENV_KEY_NAME)
    }
}

/// Profile list plus the optional default selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
}

impl Config {
    pub fn find(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn is_default(&self, name: &str) -> bool {
        self.default_profile.as_deref() == Some(name)
    }

    /// Replace the profile with the same name in place, or append it.
    pub fn upsert(&mut self, profile: Profile) {
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Remove a profile and clear the default pointer if it referenced it.
    /// Returns `false` when no profile had that name.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.profiles.len();
        self.profiles.retain(|profile| profile.name != name);
        if self.is_default(name) {
            self.default_profile = None;
        }
        self.profiles.len() != before
    }
}

/// Display-only join of a profile and its credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileWithCredential {
    pub profile: Profile,
    pub credential: Option<String>,
}

impl ProfileWithCredential {
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}

/// Connection template offered by `setup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub label: &'static str,
    pub base_url: &'static str,
    pub model: &'static str,
    pub env_key_name: &'static str,
    pub model_provider: Option<&'static str>,
}

impl Preset {
    pub fn to_profile(&self, name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            base_url: self.base_url.to_string(),
            model: Some(self.model.to_string()),
            env_key_name: Some(self.env_key_name.to_string()),
            model_provider: self.model_provider.map(str::to_string),
        }
    }
}

pub const PRESETS: &[Preset] = &[
    Preset {
        label: "OpenAI ChatGPT",
        base_url: "https://api.openai.com/v1",
        model: "gpt-4",
        env_key_name: "OPENAI_API_KEY",
        model_provider: None,
    },
    Preset {
        label: "Azure OpenAI",
        base_url: "https://YOUR_RESOURCE.openai.azure.com",
        model: "gpt-4-32k",
        env_key_name: "OPENAI_API_KEY",
        model_provider: None,
    },
    Preset {
        label: "Any Router",
        base_url: "https://anyrouter.top/v1",
        model: "gpt-5-codex",
        env_key_name: "OPENAI_API_KEY",
        model_provider: Some("anyrouter"),
    },
    Preset {
        label: "Kimi (Moonshot)",
        base_url: "https://api.moonshot.cn/v1",
        model: "moonshot-v1-8k",
        env_key_name: "OPENAI_API_KEY",
        model_provider: None,
    },
    Preset {
        label: "Minimax",
        base_url: "https://api.minimax.io/v1",
        model: "MiniMax-M2",
        env_key_name: "MINIMAX_API_KEY",
        model_provider: Some("minimax"),
    },
];
