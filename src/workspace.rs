use crate::errors::{InterpreterError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Per-session workspace directory pair.
///
/// The layout is `<base>/<session_id>` (the session root, used as the
/// working directory for host execution) with a nested `data` directory
/// (the only location code execution and file reads are permitted to
/// touch; bind-mounted into the container when isolation is enabled).
///
/// The data directory is created eagerly at construction and exists for
/// the whole lifetime of this value. Dropping the workspace removes the
/// directories again, but only if the data directory ended up empty:
/// data is sticky once written.
pub struct SessionWorkspace {
    root: PathBuf,
    data: PathBuf,
}

impl SessionWorkspace {
    /// Create the workspace for `session_id` under `base`, including any
    /// missing parent directories. Creation failure is fatal: without a
    /// workspace there is no sandbox.
    pub fn create(base: impl AsRef<Path>, session_id: &str) -> Result<Self> {
        let root = base.as_ref().join(session_id);
        let data = root.join("data");

        fs::create_dir_all(&data).map_err(|source| InterpreterError::WorkspaceCreate {
            path: data.clone(),
            source,
        })?;
        set_permissive_mode(&data);

        // Absolute paths keep teardown and bind mounts stable even if the
        // process working directory changes later.
        let root = root
            .canonicalize()
            .map_err(|source| InterpreterError::WorkspaceCreate {
                path: root.clone(),
                source,
            })?;
        let data = root.join("data");

        info!("created session workspace at {}", root.display());

        Ok(Self { root, data })
    }

    /// The session root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The data subdirectory the agent reads and writes through.
    pub fn data_dir(&self) -> &Path {
        &self.data
    }

    fn data_dir_is_empty(&self) -> std::io::Result<bool> {
        Ok(fs::read_dir(&self.data)?.next().is_none())
    }
}

impl Drop for SessionWorkspace {
    // Best-effort courtesy cleanup, not a guarantee: another process
    // writing into the session between the emptiness check and removal
    // can race, which is acceptable because removal only happens when the
    // directory appeared empty.
    fn drop(&mut self) {
        match self.data_dir_is_empty() {
            Ok(true) => {
                if let Err(e) = fs::remove_dir(&self.data) {
                    warn!("failed to remove {}: {}", self.data.display(), e);
                    return;
                }
                if let Err(e) = fs::remove_dir(&self.root) {
                    warn!("failed to remove {}: {}", self.root.display(), e);
                    return;
                }
                info!("removed empty session workspace {}", self.root.display());
            }
            Ok(false) => {}
            Err(e) => warn!(
                "could not inspect workspace {} during teardown: {}",
                self.data.display(),
                e
            ),
        }
    }
}

#[cfg(unix)]
fn set_permissive_mode(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o777)) {
        warn!("failed to loosen permissions on {}: {}", path.display(), e);
    }
}

#[cfg(not(unix))]
fn set_permissive_mode(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_data_directory_eagerly() {
        let base = tempfile::tempdir().unwrap();
        let workspace = SessionWorkspace::create(base.path(), "session-1").unwrap();

        assert!(workspace.data_dir().is_dir());
        assert!(workspace.root().is_dir());
        assert_eq!(workspace.data_dir(), workspace.root().join("data"));

        // Writable for the executed code.
        fs::write(workspace.data_dir().join("probe.txt"), "ok").unwrap();
    }

    #[test]
    fn drop_removes_empty_workspace() {
        let base = tempfile::tempdir().unwrap();
        let workspace = SessionWorkspace::create(base.path(), "empty-session").unwrap();
        let root = workspace.root().to_path_buf();
        let data = workspace.data_dir().to_path_buf();

        drop(workspace);

        assert!(!data.exists());
        assert!(!root.exists());
    }

    #[test]
    fn drop_keeps_workspace_with_data() {
        let base = tempfile::tempdir().unwrap();
        let workspace = SessionWorkspace::create(base.path(), "sticky-session").unwrap();
        let root = workspace.root().to_path_buf();
        let data = workspace.data_dir().to_path_buf();

        fs::write(data.join("report.csv"), "a,b\n1,2\n").unwrap();
        drop(workspace);

        assert!(data.join("report.csv").exists());
        assert!(root.exists());
    }

    #[test]
    fn nested_session_ids_create_parents() {
        let base = tempfile::tempdir().unwrap();
        let workspace = SessionWorkspace::create(base.path().join("deeper"), "s").unwrap();
        assert!(workspace.data_dir().is_dir());
    }
}
