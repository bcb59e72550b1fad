use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_ISSUE_URL_BASE: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Process-wide webhook URL, used when the project has no override.
    pub notifications_endpoint: Option<String>,
    /// Base URL of the tracker, for `<base>/issues/<id>` links.
    pub issue_url_base: String,
    /// Accept invalid TLS certificates. Off unless explicitly set.
    pub ssl_verify_none: bool,
    /// Total time allowed per webhook request, in seconds. Must be non-zero.
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notifications_endpoint: None,
            issue_url_base: DEFAULT_ISSUE_URL_BASE.to_string(),
            ssl_verify_none: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// What a dispatcher needs from the configuration.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub default_endpoint: Option<String>,
    pub issue_url_base: String,
    pub ssl_verify_none: bool,
    pub timeout_secs: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        AppConfig::default().dispatch_settings()
    }
}

impl AppConfig {
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            default_endpoint: self.notifications_endpoint.clone(),
            issue_url_base: self.issue_url_base.clone(),
            ssl_verify_none: self.ssl_verify_none,
            timeout_secs: self.timeout_secs,
        }
    }
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chat-notify")
}

fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    if config.timeout_secs == 0 {
        bail!(
            "Invalid {}: timeout_secs must be at least 1",
            path.display()
        );
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.notifications_endpoint.is_none());
        assert_eq!(config.issue_url_base, DEFAULT_ISSUE_URL_BASE);
        assert!(!config.ssl_verify_none);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "notifications_endpoint = \"https://oapi.example.com/robot/send?access_token=abc\"\n\
             ssl_verify_none = true\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(
            config.notifications_endpoint.as_deref(),
            Some("https://oapi.example.com/robot/send?access_token=abc")
        );
        assert!(config.ssl_verify_none);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);

        let settings = config.dispatch_settings();
        assert_eq!(settings.default_endpoint, config.notifications_endpoint);
        assert!(settings.ssl_verify_none);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = 0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs must be at least 1"));
    }
}
