//! Line-delimited JSON-over-stdio worker exposing the interpreter's
//! function surface to an external orchestrator process.
//!
//! Requests look like `{"id": 1, "function": "python", "arguments":
//! {"code": "print(2+2)"}}`; responses echo the id with either a `result`
//! string or an `error` string. EOF (or a `shutdown` request) ends the
//! session gracefully so the workspace teardown runs.

use code_interpreter::{CodeInterpreter, Settings};
use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Debug, Clone)]
struct WorkerConfig {
    session_id: String,
    base_dir: String,
    settings: Settings,
}

impl WorkerConfig {
    fn from_env_and_args() -> Self {
        let args: Vec<String> = std::env::args().collect();

        let mut session_id = std::env::var("CODE_INTERPRETER_SESSION").ok();
        let mut base_dir = std::env::var("CODE_INTERPRETER_BASE_DIR")
            .unwrap_or_else(|_| "data".to_string());
        let mut python_command = std::env::var("CODE_INTERPRETER_PYTHON").ok();
        let mut sandbox_image = std::env::var("CODE_INTERPRETER_SANDBOX_IMAGE").ok();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--session" => {
                    if let Some(v) = args.get(i + 1) {
                        session_id = Some(v.clone());
                    }
                    i += 2;
                }
                "--base-dir" => {
                    if let Some(v) = args.get(i + 1) {
                        base_dir = v.clone();
                    }
                    i += 2;
                }
                "--python-command" => {
                    if let Some(v) = args.get(i + 1) {
                        python_command = Some(v.clone());
                    }
                    i += 2;
                }
                "--sandbox-image" => {
                    if let Some(v) = args.get(i + 1) {
                        sandbox_image = Some(v.clone());
                    }
                    i += 2;
                }
                _ => i += 1,
            }
        }

        let mut settings = match sandbox_image {
            Some(image) => Settings::sandboxed(image),
            None => Settings::default(),
        };
        settings.python_command = python_command;

        Self {
            session_id: session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            base_dir,
            settings,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "code_worker=info,code_interpreter=info".to_string()),
        )
        .with_target(false)
        .init();

    let cfg = WorkerConfig::from_env_and_args();
    tracing::info!("code-worker starting (session={})", cfg.session_id);

    let interpreter =
        CodeInterpreter::with_base_dir(&cfg.base_dir, &cfg.session_id, cfg.settings.clone())?;

    let stdin = BufReader::new(io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let request: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("invalid request line: {} | err={}", line, e);
                continue;
            }
        };

        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let function = request
            .get("function")
            .and_then(Value::as_str)
            .unwrap_or("");

        if function == "shutdown" {
            tracing::info!("shutdown requested");
            break;
        }

        let arguments = request.get("arguments").cloned().unwrap_or_else(|| json!({}));
        let response = match interpreter.call_function(function, &arguments).await {
            Ok(result) => json!({ "id": id, "result": result }),
            Err(e) => json!({ "id": id, "error": e.to_string() }),
        };

        let s = serde_json::to_string(&response)?;
        stdout.write_all(s.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    // Dropping the interpreter here runs the workspace teardown.
    drop(interpreter);
    Ok(())
}
