use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InterpreterError>;

/// Errors that propagate out of the interpreter as hard failures.
///
/// Execution failures (nonzero exit codes, crashed interpreters) and file
/// access failures are deliberately NOT represented here. They surface as
/// data (`ExecutionResult` / sentinel strings) so the calling agent always
/// receives a textual result it can relay.
#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error("container name missing from settings")]
    ContainerNameMissing,

    #[error("failed to create workspace directory {path}: {source}")]
    WorkspaceCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
