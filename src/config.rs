use serde::{Deserialize, Serialize};

/// Static settings for one interpreter session.
///
/// Loaded (or built) once at session start and threaded as a read-only
/// value into every component that needs it. Nothing in this crate reads
/// configuration from ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// Override for the host interpreter command. When absent, a platform
    /// default is used (`python3`, or `python` on Windows).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_command: Option<String>,

    #[serde(default)]
    pub code_interpreter: CodeInterpreterSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CodeInterpreterSettings {
    #[serde(default)]
    pub sandbox: SandboxSettings,
}

/// Container isolation settings. When `enabled`, `container` must name the
/// image to run; leaving it unset is the one fatal configuration error.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SandboxSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

impl Settings {
    /// Settings for host execution with an explicit interpreter command.
    pub fn with_python_command(command: impl Into<String>) -> Self {
        Self {
            python_command: Some(command.into()),
            ..Default::default()
        }
    }

    /// Settings for containerized execution with the given image.
    pub fn sandboxed(image: impl Into<String>) -> Self {
        Self {
            code_interpreter: CodeInterpreterSettings {
                sandbox: SandboxSettings {
                    enabled: true,
                    container: Some(image.into()),
                },
            },
            ..Default::default()
        }
    }

    pub(crate) fn sandbox(&self) -> &SandboxSettings {
        &self.code_interpreter.sandbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_host_execution() {
        let settings = Settings::default();
        assert!(!settings.sandbox().enabled);
        assert!(settings.python_command.is_none());
    }

    #[test]
    fn deserializes_nested_sandbox_keys() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "python_command": "python3.12",
                "code_interpreter": {
                    "sandbox": { "enabled": true, "container": "python-sandbox" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.python_command.as_deref(), Some("python3.12"));
        assert!(settings.sandbox().enabled);
        assert_eq!(settings.sandbox().container.as_deref(), Some("python-sandbox"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }
}
