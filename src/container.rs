use crate::engine::{run_interactive, CodeEngine, ExecutionResult};
use crate::errors::Result;
use crate::workspace::SessionWorkspace;
use async_trait::async_trait;
use tokio::process::Command;

/// Where the session data directory lands inside the container. The image
/// is expected to use `/usr/src/app` as its working directory so that the
/// `data/` convention holds on both sides of the boundary.
const CONTAINER_DATA_PATH: &str = "/usr/src/app/data";

/// Interactive interpreter inside an ephemeral, auto-removed container.
///
/// The session's data directory is bind-mounted into the container and
/// the code is piped through the container runtime's stdin into the same
/// interactive-mode invocation the host engine uses.
pub struct ContainerPythonEngine {
    image: String,
}

impl ContainerPythonEngine {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
        }
    }

    fn run_args(&self, workspace: &SessionWorkspace) -> Vec<String> {
        vec![
            "run".to_string(),
            "-i".to_string(),
            "--rm".to_string(),
            "-v".to_string(),
            format!("{}:{}", workspace.data_dir().display(), CONTAINER_DATA_PATH),
            self.image.clone(),
            "python3".to_string(),
            "-i".to_string(),
        ]
    }
}

#[async_trait]
impl CodeEngine for ContainerPythonEngine {
    async fn execute(&self, code: &str, workspace: &SessionWorkspace) -> Result<ExecutionResult> {
        let mut command = Command::new("docker");
        command.args(self.run_args(workspace));
        Ok(run_interactive(command, code).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_args_mount_data_directory_and_auto_remove() {
        let base = tempfile::tempdir().unwrap();
        let workspace = SessionWorkspace::create(base.path(), "container-tests").unwrap();
        let engine = ContainerPythonEngine::new("python-sandbox");

        let args = engine.run_args(&workspace);
        assert_eq!(args[0], "run");
        assert!(args.contains(&"--rm".to_string()));
        assert!(args.contains(&"-i".to_string()));

        let mount = format!(
            "{}:{}",
            workspace.data_dir().display(),
            CONTAINER_DATA_PATH
        );
        assert!(args.contains(&mount));

        // Image name then the interactive interpreter invocation.
        let image_pos = args.iter().position(|a| a == "python-sandbox").unwrap();
        assert_eq!(&args[image_pos + 1..], ["python3", "-i"]);
    }

    #[test]
    fn mount_source_is_absolute() {
        // docker rejects relative bind-mount sources
        let base = tempfile::tempdir().unwrap();
        let workspace = SessionWorkspace::create(base.path(), "container-mount").unwrap();
        let engine = ContainerPythonEngine::new("python-sandbox");

        let args = engine.run_args(&workspace);
        let mount = args.iter().find(|a| a.contains(':')).unwrap();
        let source = mount.split(':').next().unwrap();
        assert!(std::path::Path::new(source).is_absolute());
    }
}
