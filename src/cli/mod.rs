//! Command-line surface: argument routing, prompts, subcommands, exit codes.
pub mod args;
pub mod commands;
pub mod exit;
pub mod prompt;
pub mod settings;

pub use args::{
    parse_invocation, try_parse_invocation, CliCommand, DefaultArgs, DeleteArgs, LauncherArgs,
    ParsedCommand, BIN_NAME,
};
pub use commands::{execute_cli_command, CommandContext, BinaryCheck, SystemBinaryCheck};
pub use exit::RuntimeExit;
pub use prompt::{AnswerValidator, Prompter, TerminalPrompter};
pub use settings::{
    CredentialBackendChoice, LauncherSettings, StorePathSource, BINARY_OVERRIDE_ENV,
    CONFIG_PATH_ENV, CREDENTIAL_BACKEND_ENV,
};
