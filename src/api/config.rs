use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

/// Default API location when neither the rc file nor the environment set one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable that overrides `api.base_url`
pub const BASE_URL_ENV: &str = "CHANGEDESK_API_URL";

/// Client configuration resolved from `~/.changedesk/rc`
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub session_path: PathBuf,
}

impl ClientConfig {
    /// Home directory: `HOME` first, then the platform lookup
    pub fn home_dir() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            if !home.is_empty() {
                return Ok(PathBuf::from(home));
            }
        }
        dirs::home_dir().context("Could not determine home directory")
    }

    /// Directory holding the rc file and the session
    pub fn config_dir() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join(".changedesk"))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("rc"))
    }

    /// Resolve configuration from the rc file, the environment, and defaults
    pub fn resolve() -> Result<Self> {
        let config_path = Self::config_path()?;
        let contents = if config_path.exists() {
            std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {}", config_path.display()))?
        } else {
            String::new()
        };
        let mut config = Self::parse(&contents, &config_path)?;
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        log::debug!("Resolved config: base_url={} session={}", config.base_url, config.session_path.display());
        Ok(config)
    }

    /// Parse `key=value` lines. Relative paths resolve against the rc directory.
    pub fn parse(contents: &str, config_path: &Path) -> Result<Self> {
        let config_dir = config_path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut config = Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_path: config_dir.join("session.json"),
        };

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("Ignoring malformed config line: {}", line);
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "api.base_url" => config.base_url = value.trim_end_matches('/').to_string(),
                "api.timeout_secs" => {
                    config.timeout_secs = value.parse::<u64>()
                        .with_context(|| format!("Invalid api.timeout_secs: '{}'", value))?;
                }
                "session.location" => {
                    let path = PathBuf::from(value);
                    config.session_path = if path.is_relative() {
                        config_dir.join(path)
                    } else {
                        path
                    };
                }
                other => log::warn!("Unknown config key: {}", other),
            }
        }

        Ok(config)
    }
}
