use crate::errors::Result;
use crate::workspace::SessionWorkspace;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::warn;

/// Result code reported when the interpreter process could not be
/// launched at all (the shell convention for a missing command).
pub const LAUNCH_FAILURE_CODE: i32 = 127;

/// Combined outcome of one code execution: the merged stdout/stderr line
/// stream and the process exit status, passed through uninterpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub output: String,
    pub result_code: i32,
}

/// An execution boundary that can run one code snippet against a session
/// workspace through an interactive interpreter.
#[async_trait]
pub trait CodeEngine: Send + Sync {
    async fn execute(&self, code: &str, workspace: &SessionWorkspace) -> Result<ExecutionResult>;
}

/// Exit-status epilogue appended to the piped stream after the user code.
///
/// A piped interactive session exits 0 even when a statement raised: the
/// REPL prints the traceback, sets `sys.last_value` and keeps reading.
/// The leading blank line closes any open block, then the final statement
/// exits nonzero exactly when an uncaught traceback was printed. An
/// explicit `sys.exit()` in the user code still wins because it ends the
/// session before the epilogue is reached.
const EXIT_STATUS_EPILOGUE: &str =
    "\n\nimport sys as _sys\n_sys.exit(1 if hasattr(_sys, 'last_value') else 0)\n";

/// The full byte stream piped into the interpreter's stdin: the user code
/// verbatim, followed by the exit-status epilogue.
pub(crate) fn interactive_payload(code: &str) -> String {
    format!("{code}{EXIT_STATUS_EPILOGUE}")
}

/// Launch `command` in interactive mode, pipe `code` into its stdin and
/// collect the merged output and exit status.
///
/// The code travels as an opaque byte stream on stdin and the command
/// arguments are a vector, so shell metacharacters in the code have no
/// channel to escape through. Launch failures are not fatal: they come
/// back as `LAUNCH_FAILURE_CODE` with the error text as output.
pub(crate) async fn run_interactive(mut command: Command, code: &str) -> ExecutionResult {
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!("failed to launch interpreter: {}", e);
            return ExecutionResult {
                output: e.to_string(),
                result_code: LAUNCH_FAILURE_CODE,
            };
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        let payload = interactive_payload(code);
        // Feed stdin concurrently with output collection so a chatty
        // snippet cannot wedge both pipes at once.
        tokio::spawn(async move {
            if let Err(e) = stdin.write_all(payload.as_bytes()).await {
                warn!("failed to feed code to interpreter: {}", e);
            }
        });
    }

    match child.wait_with_output().await {
        Ok(output) => ExecutionResult {
            output: merge_streams(&output.stdout, &output.stderr),
            result_code: output.status.code().unwrap_or(-1),
        },
        Err(e) => {
            warn!("failed to collect interpreter output: {}", e);
            ExecutionResult {
                output: e.to_string(),
                result_code: LAUNCH_FAILURE_CODE,
            }
        }
    }
}

/// Merge captured stdout and stderr into one newline-joined line stream,
/// stdout lines first.
pub(crate) fn merge_streams(stdout: &[u8], stderr: &[u8]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for stream in [stdout, stderr] {
        lines.extend(String::from_utf8_lossy(stream).lines().map(str::to_owned));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_ends_with_exit_status_epilogue() {
        let payload = interactive_payload("print(1)");
        assert!(payload.starts_with("print(1)\n\n"));
        assert!(payload.trim_end().ends_with("_sys.exit(1 if hasattr(_sys, 'last_value') else 0)"));
    }

    #[test]
    fn merge_joins_stdout_then_stderr() {
        let merged = merge_streams(b"4\n", b">>> Traceback\n");
        assert_eq!(merged, "4\n>>> Traceback");
    }

    #[test]
    fn merge_tolerates_invalid_utf8() {
        let merged = merge_streams(&[0xff, b'\n', b'o', b'k'], b"");
        assert!(merged.ends_with("ok"));
    }

    #[tokio::test]
    async fn launch_failure_is_reported_as_data() {
        let command = Command::new("definitely-not-a-real-interpreter-41aa");
        let result = run_interactive(command, "print(1)").await;
        assert_eq!(result.result_code, LAUNCH_FAILURE_CODE);
        assert!(!result.output.is_empty());
    }
}
