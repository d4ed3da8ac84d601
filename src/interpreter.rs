use crate::command::{select_target, ExecutionTarget};
use crate::config::Settings;
use crate::container::ContainerPythonEngine;
use crate::engine::{CodeEngine, ExecutionResult};
use crate::errors::{InterpreterError, Result};
use crate::files::read_file_lines;
use crate::host::HostPythonEngine;
use crate::repair::repair_code_argument;
use crate::workspace::SessionWorkspace;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use tracing::warn;

/// System-prompt text the orchestrator installs for the agent. It
/// advertises the `data/` convention and the print-your-results contract
/// the execution model relies on.
pub const AGENT_INSTRUCTIONS: &str = "You are an AI assistant that can read files and run \
Python code in order to answer the user's question. You can access a folder called 'data/' \
from the Python code to read or write files. Always save visualizations and charts into a \
file. When creating links to files in the data directory in your response, use the format \
[link text](data/filename). When the task requires to process or read user provided data \
from files, always read the file content first, before running Python code. Don't assume \
the contents of files. When processing CSV files, read the file first before writing any \
Python code. You can also use Python code to download files or images from URLs. Note that \
Python code will always be run in an isolated environment, without access to variables from \
previous code. You can include images in your response with the format \
'![image name](data/image_filename.jpg)'. Include visualizations as images in your response.";

/// Registration metadata for one agent-facing function.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// The functions the orchestrator registers with the agent. The
/// `pythoncode` alias is deliberately absent: it exists only to catch
/// calls the upstream model invents, not to be advertised.
pub fn function_specs() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec {
            name: "read_file_contents",
            description: "Read the contents of a file",
            parameters: json!({
                "type": "object",
                "properties": {
                    "filename": {
                        "type": "string",
                        "description": "The name of the file to read"
                    },
                    "line_count": {
                        "type": "integer",
                        "description": "How many lines to read (-1 = all lines)"
                    }
                },
                "required": ["filename"]
            }),
        },
        FunctionSpec {
            name: "python",
            description: "Run python code",
            parameters: json!({
                "type": "object",
                "properties": {
                    "code": {
                        "type": "string",
                        "description": "The code to run. Code must have a print statement \
in the end that prints out the relevant return value"
                    }
                },
                "required": ["code"]
            }),
        },
    ]
}

/// One session's sandbox: the immutable settings plus the workspace the
/// session owns. The workspace teardown runs when this value drops.
pub struct CodeInterpreter {
    settings: Settings,
    workspace: SessionWorkspace,
}

impl CodeInterpreter {
    /// Create the interpreter for a session, with the workspace under the
    /// conventional `data/` base directory.
    pub fn new(session_id: &str, settings: Settings) -> Result<Self> {
        Self::with_base_dir("data", session_id, settings)
    }

    /// Create the interpreter with an explicit workspace base directory.
    pub fn with_base_dir(
        base: impl AsRef<Path>,
        session_id: &str,
        settings: Settings,
    ) -> Result<Self> {
        let workspace = SessionWorkspace::create(base, session_id)?;
        Ok(Self {
            settings,
            workspace,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn workspace(&self) -> &SessionWorkspace {
        &self.workspace
    }

    /// Read a workspace file for the agent. Never fails: missing,
    /// unreadable and empty files come back as sentinel strings.
    pub fn read_file_contents(&self, filename: &str, line_count: Option<i64>) -> String {
        read_file_lines(&self.workspace, filename, line_count).into_text()
    }

    /// Run a code string and report `{"output": ..., "result_code": ...}`
    /// as JSON text. The argument is repaired first when it carries the
    /// known hallucination shape. The only hard failure is the
    /// configuration error; everything the interpreter itself does wrong
    /// is reported inside the JSON.
    pub async fn python(&self, code: &str) -> Result<String> {
        let code = repair_code_argument(code);
        let result = self.run_code(&code).await?;
        Ok(serde_json::to_string(&result)?)
    }

    /// Alias for a function name the upstream model sometimes invents.
    /// Forwards unchanged, but leaves a trace that the alias was used.
    pub async fn pythoncode(&self, code: &str) -> Result<String> {
        warn!("agent invoked hallucinated 'pythoncode' function");
        self.python(code).await
    }

    /// Dispatch one of the agent-facing functions by name with JSON
    /// arguments, the invocation shape the orchestrator uses.
    pub async fn call_function(&self, name: &str, arguments: &Value) -> Result<String> {
        match name {
            "read_file_contents" => {
                let filename = arguments
                    .get("filename")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let line_count = arguments.get("line_count").and_then(Value::as_i64);
                Ok(self.read_file_contents(filename, line_count))
            }
            "python" => self.python(code_argument(arguments)).await,
            "pythoncode" => self.pythoncode(code_argument(arguments)).await,
            other => Err(InterpreterError::UnknownFunction(other.to_string())),
        }
    }

    async fn run_code(&self, code: &str) -> Result<ExecutionResult> {
        let engine: Box<dyn CodeEngine> = match select_target(&self.settings)? {
            ExecutionTarget::Host { command } => Box::new(HostPythonEngine::new(&command)),
            ExecutionTarget::Container { image } => Box::new(ContainerPythonEngine::new(image)),
        };
        engine.execute(code, &self.workspace).await
    }
}

fn code_argument(arguments: &Value) -> &str {
    arguments
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or_default()
}
