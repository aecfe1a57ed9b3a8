//! Persisted user settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`Settings::api_base_url`].
pub const API_URL_ENV: &str = "OVERVIEW_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the project-management API (without the `/api` prefix).
    pub api_base_url: String,
    /// Base URL of the web client, used to open projects and tasks.
    pub web_base_url: String,
    /// Session cookie sent with every request, e.g. `session=abc123`.
    pub session_cookie: Option<String>,
    pub request_timeout_secs: u64,
    pub cell_width: f32,
    pub cell_height: f32,
    /// Fetch users and projects as soon as the window opens.
    pub fetch_on_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".into(),
            web_base_url: "http://localhost:8080".into(),
            session_cookie: None,
            request_timeout_secs: 15,
            cell_width: 36.0,
            cell_height: 22.0,
            fetch_on_start: true,
        }
    }
}

impl Settings {
    /// Load settings from the config directory, writing defaults on first
    /// run. Any problem falls back to defaults with a warning.
    pub fn load_or_default() -> Self {
        let path = Self::settings_path();
        let mut settings = match Self::load(&path) {
            Ok(Some(s)) => s,
            Ok(None) => {
                let defaults = Self::default();
                if let Err(e) = defaults.save(&path) {
                    tracing::warn!(error = %e, "could not write default settings");
                }
                defaults
            }
            Err(e) => {
                tracing::warn!(error = %e, "using default settings");
                Self::default()
            }
        };
        settings.apply_env(std::env::var(API_URL_ENV).ok());
        settings.sanitize();
        settings
    }

    /// `Ok(None)` when the file does not exist yet.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(write_err)
    }

    fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }

    /// Clamp values that would break the layout or the client.
    fn sanitize(&mut self) {
        let defaults = Self::default();
        if !(self.cell_width.is_finite() && self.cell_width >= 8.0) {
            self.cell_width = defaults.cell_width;
        }
        if !(self.cell_height.is_finite() && self.cell_height >= 8.0) {
            self.cell_height = defaults.cell_height;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = defaults.request_timeout_secs;
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        self.web_base_url = self.web_base_url.trim_end_matches('/').to_string();
    }

    /// Web-client URL of a project page.
    pub fn project_url(&self, project_id: i64) -> String {
        format!("{}/#/project/{}", self.web_base_url, project_id)
    }

    /// Web-client URL of a task.
    pub fn task_url(&self, task_id: i64) -> String {
        format!("{}/#/task/{}", self.web_base_url, task_id)
    }

    pub fn settings_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "TaskOverview") {
            proj_dirs.config_dir().join("settings.json")
        } else {
            PathBuf::from(".").join("settings.json")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"api_base_url": "https://pm.example.com", "cell_width": 40}"#).unwrap();

        let settings = Settings::load(&path).unwrap().unwrap();
        assert_eq!(settings.api_base_url, "https://pm.example.com");
        assert_eq!(settings.cell_width, 40.0);
        assert_eq!(settings.cell_height, Settings::default().cell_height);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(&dir.path().join("nope.json")).unwrap().is_none());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            session_cookie: Some("session=abc".into()),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), Some(settings));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn env_override_and_sanitizing() {
        let mut settings = Settings {
            cell_width: 0.0,
            request_timeout_secs: 0,
            web_base_url: "https://pm.example.com/".into(),
            ..Settings::default()
        };
        settings.apply_env(Some(" https://api.example.com/ ".into()));
        settings.sanitize();
        assert_eq!(settings.api_base_url, "https://api.example.com");
        assert_eq!(settings.cell_width, 36.0);
        assert_eq!(settings.request_timeout_secs, 15);
        assert_eq!(settings.project_url(7), "https://pm.example.com/#/project/7");
        assert_eq!(settings.task_url(70), "https://pm.example.com/#/task/70");
    }
}
