//! File helpers for the profile document: atomic replacement and home-directory resolution.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

/// File name of the profile document inside the home directory.
pub const DEFAULT_STORE_FILE_NAME: &str = ".ai-codex-profiles.json";

/// Resolve the user's home directory from explicit environment values.
///
/// Resolution order:
/// 1. `HOME` when set and non-empty.
/// 2. `USERPROFILE` otherwise (Windows shells).
pub fn resolve_home_dir(home: Option<&str>, user_profile: Option<&str>) -> Option<PathBuf> {
    [home, user_profile]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Replace `path` with `content` so readers observe either the old or the new file.
///
/// The content is written to a temporary file in the destination directory
/// and renamed over the target, which keeps the rename on one filesystem.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    if path.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "destination path cannot be empty",
        ));
    }
    if path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("destination path {} is a directory", path.display()),
        ));
    }

    let parent_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let mut temp = NamedTempFile::new_in(parent_dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
