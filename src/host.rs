use crate::engine::{run_interactive, CodeEngine, ExecutionResult};
use crate::errors::Result;
use crate::workspace::SessionWorkspace;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Interactive interpreter on the host process, no isolation boundary.
///
/// The working directory is the session root, not the data subdirectory:
/// the executed code addresses files through a relative `data/` path, the
/// same convention the agent instructions advertise.
pub struct HostPythonEngine {
    program: PathBuf,
}

impl HostPythonEngine {
    /// Resolve `command` against `PATH`. An unresolvable command is kept
    /// verbatim; the launch itself then fails softly inside `execute`.
    pub fn new(command: &str) -> Self {
        let program = which::which(command).unwrap_or_else(|_| PathBuf::from(command));
        debug!("host interpreter resolved to {}", program.display());
        Self { program }
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }
}

#[async_trait]
impl CodeEngine for HostPythonEngine {
    async fn execute(&self, code: &str, workspace: &SessionWorkspace) -> Result<ExecutionResult> {
        let mut command = Command::new(&self.program);
        command.arg("-i").current_dir(workspace.root());
        Ok(run_interactive(command, code).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::default_python_command;
    use crate::engine::LAUNCH_FAILURE_CODE;

    fn host_python_available() -> bool {
        which::which(default_python_command()).is_ok()
    }

    fn workspace() -> (tempfile::TempDir, SessionWorkspace) {
        let base = tempfile::tempdir().unwrap();
        let workspace = SessionWorkspace::create(base.path(), "host-tests").unwrap();
        (base, workspace)
    }

    #[tokio::test]
    async fn captures_printed_output_with_zero_status() {
        if !host_python_available() {
            return;
        }
        let (_base, workspace) = workspace();
        let engine = HostPythonEngine::new(default_python_command());

        let result = engine.execute("print(2+2)", &workspace).await.unwrap();
        assert_eq!(result.result_code, 0);
        assert!(result.output.contains('4'), "output: {}", result.output);
    }

    #[tokio::test]
    async fn uncaught_exception_yields_nonzero_status_and_trace() {
        if !host_python_available() {
            return;
        }
        let (_base, workspace) = workspace();
        let engine = HostPythonEngine::new(default_python_command());

        let result = engine
            .execute("raise Exception('boom')", &workspace)
            .await
            .unwrap();
        assert_ne!(result.result_code, 0);
        assert!(result.output.contains("Traceback"), "output: {}", result.output);
        assert!(result.output.contains("boom"), "output: {}", result.output);
    }

    #[tokio::test]
    async fn code_runs_with_session_root_as_cwd() {
        if !host_python_available() {
            return;
        }
        let (_base, workspace) = workspace();
        let engine = HostPythonEngine::new(default_python_command());

        let result = engine
            .execute(
                "open('data/out.txt', 'w').write('from-python')",
                &workspace,
            )
            .await
            .unwrap();
        assert_eq!(result.result_code, 0, "output: {}", result.output);
        let written = std::fs::read_to_string(workspace.data_dir().join("out.txt")).unwrap();
        assert_eq!(written, "from-python");
    }

    #[tokio::test]
    async fn shell_metacharacters_stay_inert() {
        if !host_python_available() {
            return;
        }
        let (_base, workspace) = workspace();
        let engine = HostPythonEngine::new(default_python_command());

        let result = engine
            .execute("print('a; echo pwned && rm -rf $HOME')", &workspace)
            .await
            .unwrap();
        assert_eq!(result.result_code, 0);
        assert!(result.output.contains("a; echo pwned && rm -rf $HOME"));
    }

    #[tokio::test]
    async fn missing_interpreter_fails_softly() {
        let (_base, workspace) = workspace();
        let engine = HostPythonEngine::new("no-such-python-interpreter-3e7f");

        let result = engine.execute("print(1)", &workspace).await.unwrap();
        assert_eq!(result.result_code, LAUNCH_FAILURE_CODE);
    }
}
