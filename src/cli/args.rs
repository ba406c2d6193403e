//! Command-line argument definitions and launch/subcommand routing.
use clap::{Args, Parser, Subcommand};

use crate::launcher::LaunchRequest;

/// Program name used for help output and argv reconstruction.
pub const BIN_NAME: &str = "codex-profiles";

/// First arguments that route to clap instead of a launch.
const CLAP_ENTRY_POINTS: &[&str] = &[
    "setup",
    "list",
    "default",
    "delete",
    "doctor",
    "help",
    "--help",
    "-h",
    "--version",
    "-V",
];

/// Parsed command intent from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Launch(LaunchRequest),
    Cli(CliCommand),
}

/// Profile management subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Create or update a profile.
    Setup,
    /// List all configured profiles.
    List,
    /// Set the default profile.
    Default(DefaultArgs),
    /// Delete a profile and its credential.
    Delete(DeleteArgs),
    /// Check system health.
    Doctor,
}

/// Arguments for `default`.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct DefaultArgs {
    /// Profile name.
    pub name: String,
}

/// Arguments for `delete`.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct DeleteArgs {
    /// Profile name.
    pub name: String,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,
}

/// Command-line arguments for the management surface.
#[derive(Debug, Clone, Parser)]
#[command(
    name = BIN_NAME,
    version,
    about = "Multi-profile launcher for the Codex CLI",
    long_about = None,
    after_help = "Launch: codex-profiles [PROFILE] [--cmd <BINARY>] [ARGS]...\nWithout PROFILE a single profile is used directly; several are offered in a menu."
)]
pub struct LauncherArgs {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Route raw arguments (without the program name) to a launch or a subcommand.
///
/// A first argument that is neither a known subcommand nor a flag names the
/// profile; everything after it is passed through to the launch.
pub fn try_parse_invocation(args: &[String]) -> Result<ParsedCommand, clap::Error> {
    match args.first() {
        Some(first) if CLAP_ENTRY_POINTS.contains(&first.as_str()) => {
            let argv = std::iter::once(BIN_NAME.to_string()).chain(args.iter().cloned());
            let parsed = LauncherArgs::try_parse_from(argv)?;
            Ok(ParsedCommand::Cli(parsed.command))
        }
        Some(first) if !first.starts_with('-') => Ok(ParsedCommand::Launch(LaunchRequest {
            profile: Some(first.clone()),
            args: args[1..].to_vec(),
        })),
        _ => Ok(ParsedCommand::Launch(LaunchRequest {
            profile: None,
            args: args.to_vec(),
        })),
    }
}

/// Like [`try_parse_invocation`], printing clap's help or usage error and exiting.
pub fn parse_invocation(args: &[String]) -> ParsedCommand {
    try_parse_invocation(args).unwrap_or_else(|err| err.exit())
}
