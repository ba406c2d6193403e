//! Environment preparation for the launched command.
use std::{collections::BTreeMap, ffi::OsString};

use tracing::debug;

use crate::store::{Profile, DEFAULT_ENV_KEY_NAME};

/// Process environment as an explicit value.
pub type EnvMap = BTreeMap<String, String>;

/// Prefix of variables stripped before launch.
pub const SANITIZED_PREFIX: &str = "OPENAI_";
/// Base URL variable set for OpenAI-style credentials.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Base URL that needs no explicit override.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Build an [`EnvMap`] from raw OS pairs, skipping entries that are not UTF-8.
pub fn env_map_from_os<I>(vars: I) -> EnvMap
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                debug!(
                    target: "codex_profiles::launcher",
                    key = ?key,
                    "Skipping non UTF-8 environment variable"
                );
                None
            }
        })
        .collect()
}

/// Snapshot the current process environment.
pub fn capture_process_env() -> EnvMap {
    env_map_from_os(std::env::vars_os())
}

/// Copy of `env` without any `OPENAI_*` variable (case-sensitive prefix).
pub fn sanitize_environment(env: &EnvMap) -> EnvMap {
    env.iter()
        .filter(|(key, _)| !key.starts_with(SANITIZED_PREFIX))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Sanitized environment carrying the profile's credential.
///
/// `OPENAI_BASE_URL` is only set when the credential goes to `OPENAI_API_KEY`
/// and the base URL differs from the OpenAI default; profiles with a custom
/// key name configure their endpoint through `-c` overrides instead.
pub fn prepare_environment(env: &EnvMap, profile: &Profile, credential: &str) -> EnvMap {
    let mut prepared = sanitize_environment(env);
    let key = profile.credential_env_key();
    prepared.insert(key.to_string(), credential.to_string());

    if key == DEFAULT_ENV_KEY_NAME && profile.base_url != DEFAULT_BASE_URL {
        prepared.insert(BASE_URL_ENV.to_string(), profile.base_url.clone());
    }
    prepared
}
