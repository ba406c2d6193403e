//! Which profile a launch uses.
use tracing::debug;

use crate::{
    lib::errors::LauncherError,
    store::{Config, Profile},
};

/// Interactive choice among several profiles.
pub trait ProfileSelector {
    /// Return the chosen profile name. `default` is the suggested entry.
    fn select_profile(
        &self,
        profiles: &[Profile],
        default: Option<&str>,
    ) -> Result<String, LauncherError>;
}

/// How the profile was picked, for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Requested,
    OnlyProfile,
    Selected,
}

/// Resolve the profile for a launch.
///
/// An explicit name must exist. Without one, a single profile is used
/// directly and several are offered to `selector`; its answer is checked
/// against the config again.
pub fn resolve_profile(
    config: &Config,
    requested: Option<&str>,
    selector: &dyn ProfileSelector,
) -> Result<(Profile, Resolution), LauncherError> {
    if let Some(name) = requested {
        let profile = lookup(config, name)?;
        return Ok((profile, Resolution::Requested));
    }

    match config.profiles.as_slice() {
        [] => Err(LauncherError::NoProfiles),
        [only] => Ok((only.clone(), Resolution::OnlyProfile)),
        profiles => {
            let default = config
                .default_profile
                .as_deref()
                .filter(|name| config.contains(name));
            let chosen = selector.select_profile(profiles, default)?;
            debug!(
                target: "codex_profiles::launcher",
                profile = %chosen,
                "Profile selected interactively"
            );
            let profile = lookup(config, &chosen)?;
            Ok((profile, Resolution::Selected))
        }
    }
}

fn lookup(config: &Config, name: &str) -> Result<Profile, LauncherError> {
    config
        .find(name)
        .cloned()
        .ok_or_else(|| LauncherError::ProfileNotFound {
            name: name.to_string(),
        })
}
