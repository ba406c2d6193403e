//! Target binary and argument synthesis.

/// Binary launched when nothing overrides it.
pub const DEFAULT_BINARY: &str = "codex";
/// Flag that substitutes the launched binary.
pub const CMD_FLAG: &str = "--cmd";
const WINDOWS_SCRIPT_SUFFIX: &str = ".cmd";

/// Platform conventions that change how the command is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub const fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Binary plus final argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub binary: String,
    pub args: Vec<String>,
}

/// Inputs of [`build_command`].
#[derive(Debug, Clone, Copy)]
pub struct CommandRequest<'a> {
    /// Binary override from the environment; wins over `--cmd`.
    pub binary_override: Option<&'a str>,
    pub model: Option<&'a str>,
    pub model_provider: Option<&'a str>,
    pub raw_args: &'a [String],
    pub platform: Platform,
}

/// Resolve the binary and rewrite the arguments for the launched command.
pub fn build_command(request: CommandRequest<'_>) -> LaunchCommand {
    let (cmd_value, mut tail) = take_cmd_flag(request.raw_args);

    let mut binary = request
        .binary_override
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or(cmd_value)
        .unwrap_or_else(|| DEFAULT_BINARY.to_string());
    if request.platform == Platform::Windows
        && binary == DEFAULT_BINARY
        && !binary.ends_with(WINDOWS_SCRIPT_SUFFIX)
    {
        binary.push_str(WINDOWS_SCRIPT_SUFFIX);
    }

    let mut injected = Vec::new();
    if let Some(provider) = request.model_provider.filter(|value| !value.is_empty()) {
        injected.push("-c".to_string());
        injected.push(format!("model_provider={provider}"));
    }
    if let Some(model) = request.model.filter(|value| !value.is_empty()) {
        if !has_model_flag(&tail) {
            injected.push("-c".to_string());
            injected.push(format!("model=\"{model}\""));
        }
    }
    injected.append(&mut tail);

    let args = match request.platform {
        Platform::Windows => injected.into_iter().map(quote_for_shell).collect(),
        Platform::Unix => injected,
    };

    LaunchCommand { binary, args }
}

/// Remove the first `--cmd <value>` pair and return its value.
fn take_cmd_flag(raw_args: &[String]) -> (Option<String>, Vec<String>) {
    let Some(index) = raw_args.iter().position(|arg| arg == CMD_FLAG) else {
        return (None, raw_args.to_vec());
    };

    let value = raw_args.get(index + 1).cloned();
    let rest = raw_args
        .iter()
        .enumerate()
        .filter(|(position, _)| *position != index && *position != index + 1)
        .map(|(_, arg)| arg.clone())
        .collect();
    (value, rest)
}

/// `<binary> --version`, spelled the way a launch on `platform` would run it.
pub fn version_command(binary_override: Option<&str>, platform: Platform) -> LaunchCommand {
    build_command(CommandRequest {
        binary_override,
        model: None,
        model_provider: None,
        raw_args: &["--version".to_string()],
        platform,
    })
}

fn has_model_flag(args: &[String]) -> bool {
    args.iter().any(|arg| arg == "--model" || arg == "-m")
}

/// Wrap arguments containing spaces in double quotes unless already quoted.
fn quote_for_shell(arg: String) -> String {
    let already_quoted = arg.len() >= 2 && arg.starts_with('"') && arg.ends_with('"');
    if arg.contains(' ') && !already_quoted {
        format!("\"{arg}\"")
    } else {
        arg
    }
}
