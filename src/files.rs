use crate::workspace::SessionWorkspace;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

/// Internal outcome of a workspace file read. The boundary renders this
/// to the sentinel strings the calling agent expects instead of raising,
/// so the agent always has something conversational to relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Content(String),
    NotFound,
    NotReadable,
    Unreadable,
    Empty,
}

impl ReadOutcome {
    /// The agent-facing rendering: file content, or one of the four
    /// sentinel strings.
    pub fn into_text(self) -> String {
        match self {
            ReadOutcome::Content(text) => text,
            ReadOutcome::NotFound => "<file not found>".to_string(),
            ReadOutcome::NotReadable => "<file is not readable>".to_string(),
            ReadOutcome::Unreadable => "<unable to read file>".to_string(),
            ReadOutcome::Empty => "<file is empty>".to_string(),
        }
    }
}

/// Resolve a caller-supplied filename against the session root, adding
/// the `data/` prefix when it is missing so that `data/foo.csv` and
/// `foo.csv` name the same file.
///
/// No canonicalization happens here: `..` segments are not rejected.
/// Filenames come from the agent, not from untrusted users, and that
/// trust boundary is a documented limitation of this gateway.
pub fn resolve_data_path(workspace: &SessionWorkspace, filename: &str) -> PathBuf {
    if filename.starts_with("data/") {
        workspace.root().join(filename)
    } else {
        workspace.root().join("data").join(filename)
    }
}

/// Read at most `line_count` lines of a workspace file.
///
/// `None` and the explicit `-1` sentinel both mean the whole file; any
/// non-negative `n` returns at most the first `n` lines, joined by
/// newlines. Content that trims to nothing counts as empty.
pub fn read_file_lines(
    workspace: &SessionWorkspace,
    filename: &str,
    line_count: Option<i64>,
) -> ReadOutcome {
    let path = resolve_data_path(workspace, filename);

    let how_many = match line_count {
        None | Some(-1) => "ALL".to_string(),
        Some(n) => n.to_string(),
    };
    info!("reading {} lines from file: {}", how_many, path.display());

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            return match e.kind() {
                ErrorKind::NotFound => ReadOutcome::NotFound,
                ErrorKind::PermissionDenied => ReadOutcome::NotReadable,
                _ => ReadOutcome::Unreadable,
            }
        }
    };

    let selected = match line_count {
        Some(n) if n >= 0 => contents
            .lines()
            .take(n as usize)
            .collect::<Vec<_>>()
            .join("\n"),
        // None, or any negative value: the whole file.
        _ => contents.lines().collect::<Vec<_>>().join("\n"),
    };

    if selected.trim().is_empty() {
        return ReadOutcome::Empty;
    }

    ReadOutcome::Content(selected)
}
