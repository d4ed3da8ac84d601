//! Per-session code-interpreter sandbox for a conversational agent.
//!
//! The agent delegates two capabilities here: reading files from a
//! private per-session workspace and executing Python code, with the
//! combined interpreter output fed back into the conversation as text.
//! Code runs through an interactive interpreter, either directly on the
//! host or inside an ephemeral container with the workspace data
//! directory bind-mounted in, depending on the session settings.
//!
//! ```no_run
//! use code_interpreter::{CodeInterpreter, Settings};
//!
//! # async fn demo() -> code_interpreter::Result<()> {
//! let interpreter = CodeInterpreter::new("session-42", Settings::default())?;
//! let reply = interpreter.python("print(2+2)").await?;
//! // reply is {"output": "...", "result_code": 0}
//! let head = interpreter.read_file_contents("report.csv", Some(2));
//! # Ok(())
//! # }
//! ```

mod command;
mod config;
mod container;
mod engine;
mod errors;
mod files;
mod host;
mod interpreter;
mod repair;
mod workspace;

pub use command::{default_python_command, select_target, ExecutionTarget};
pub use config::{CodeInterpreterSettings, SandboxSettings, Settings};
pub use container::ContainerPythonEngine;
pub use engine::{CodeEngine, ExecutionResult, LAUNCH_FAILURE_CODE};
pub use errors::{InterpreterError, Result};
pub use files::{read_file_lines, resolve_data_path, ReadOutcome};
pub use host::HostPythonEngine;
pub use interpreter::{function_specs, CodeInterpreter, FunctionSpec, AGENT_INSTRUCTIONS};
pub use repair::repair_code_argument;
pub use workspace::SessionWorkspace;
