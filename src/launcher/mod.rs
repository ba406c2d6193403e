//! Execution preparer: environment, profile resolution, and command synthesis.
pub mod command;
pub mod env;
pub mod executor;
pub mod resolve;

pub use command::{
    build_command, version_command, CommandRequest, LaunchCommand, Platform, CMD_FLAG,
    DEFAULT_BINARY,
};
pub use env::{
    capture_process_env, env_map_from_os, prepare_environment, sanitize_environment, EnvMap,
    BASE_URL_ENV, DEFAULT_BASE_URL, SANITIZED_PREFIX,
};
pub use executor::{
    execute_with_profile, prepare_launch, spawn_and_wait, std_command, LaunchContext,
    LaunchRequest, PreparedLaunch,
};
pub use resolve::{resolve_profile, ProfileSelector, Resolution};
