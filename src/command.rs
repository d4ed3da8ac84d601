use crate::config::Settings;
use crate::errors::{InterpreterError, Result};

/// Where and how a code snippet will be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionTarget {
    /// Interactive interpreter on the host, `command` resolved from the
    /// settings override or the platform default.
    Host { command: String },
    /// Interactive interpreter inside an ephemeral container of `image`.
    Container { image: String },
}

/// Decide the execution target from the settings. Pure decision logic.
///
/// Container isolation that is enabled without naming an image is the one
/// fatal configuration error and is raised here, before any subprocess is
/// spawned.
pub fn select_target(settings: &Settings) -> Result<ExecutionTarget> {
    let sandbox = settings.sandbox();
    if sandbox.enabled {
        let image = sandbox
            .container
            .clone()
            .ok_or(InterpreterError::ContainerNameMissing)?;
        return Ok(ExecutionTarget::Container { image });
    }

    let command = settings
        .python_command
        .clone()
        .unwrap_or_else(|| default_python_command().to_string());
    Ok(ExecutionTarget::Host { command })
}

/// Platform-default interpreter command: Windows installs ship an
/// unversioned `python`, everything else uses `python3`.
pub fn default_python_command() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}
