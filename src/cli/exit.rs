//! Exit-code translation at the program boundary.
use std::process::ExitCode;

use anyhow::Error;

use crate::lib::errors::LauncherError;

/// Bundles the message printed on exit with the process exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    message: Option<String>,
    exit_code: ExitCode,
    /// Child code outside `0..=255` (Windows), handed to `process::exit` as is.
    wide_code: Option<i32>,
}

impl RuntimeExit {
    /// Start-up failure (tracing, settings).
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: Some(format!("Error: {err:?}")),
            exit_code: ExitCode::FAILURE,
            wide_code: None,
        }
    }

    /// A launcher failure, printed with its remediation hint.
    pub fn from_launcher(err: LauncherError) -> Self {
        let message = match err.remediation() {
            Some(hint) => format!("Error: {err}\n{hint}"),
            None => format!("Error: {err}"),
        };
        Self {
            message: Some(message),
            exit_code: ExitCode::FAILURE,
            wide_code: None,
        }
    }

    /// The launched child's exit status, passed through without a message.
    pub fn child(code: i32) -> Self {
        let (exit_code, wide_code) = match u8::try_from(code) {
            Ok(code) => (ExitCode::from(code), None),
            Err(_) => (ExitCode::FAILURE, Some(code)),
        };
        Self {
            message: None,
            exit_code,
            wide_code,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }

    /// Child code that `ExitCode` cannot carry.
    pub fn wide_code(&self) -> Option<i32> {
        self.wide_code
    }

    /// Print the message and hand back the exit code. A wide child code ends
    /// the process here with that exact code.
    pub fn report(self) -> ExitCode {
        if let Some(message) = self.message {
            eprintln!("{message}");
        }
        if let Some(code) = self.wide_code {
            std::process::exit(code);
        }
        self.exit_code
    }
}

impl From<LauncherError> for RuntimeExit {
    fn from(value: LauncherError) -> Self {
        Self::from_launcher(value)
    }
}
