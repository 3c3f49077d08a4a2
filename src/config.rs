//! Configuration file parser for ~/.config/headlines/config.toml.
//!
//! The file is optional: a missing or empty file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `api_base_url` from the file.
pub const API_URL_ENV: &str = "HEADLINES_API_URL";

/// Categories offered when the file does not list its own.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

const KNOWN_KEYS: &[&str] = &[
    "api_base_url",
    "request_timeout_secs",
    "categories",
    "open_links",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

/// Top-level application configuration.
///
/// Any subset of keys may be given; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the news service.
    pub api_base_url: String,

    /// Per-request timeout in seconds. 0 falls back to the default.
    pub request_timeout_secs: u64,

    /// Category tabs, in display order.
    pub categories: Vec<String>,

    /// Whether Enter opens the article in the system browser.
    pub open_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5001".to_string(),
            request_timeout_secs: 30,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            open_links: true,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
                tracing::warn!(key = %key, "Unknown key in config file, ignoring");
            }
        }

        let mut config: Config = toml::from_str(content)?;
        config.categories = normalize_categories(config.categories);
        tracing::info!(
            path = %path.display(),
            api_base_url = %config.api_base_url,
            categories = config.categories.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => crate::api::DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }

    /// Pick the base URL: command-line flag, then environment, then file.
    pub fn resolve_base_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        [flag, env]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(self.api_base_url.as_str())
            .to_string()
    }
}

/// Lowercase, trim and de-duplicate; an empty list falls back to defaults.
fn normalize_categories(categories: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(categories.len());
    for name in categories {
        let name = name.trim().to_lowercase();
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    if out.is_empty() {
        tracing::warn!("No usable categories in config file, using defaults");
        return Config::default().categories;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("headlines_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:5001");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.categories.len(), 7);
        assert_eq!(config.categories[0], "business");
        assert!(config.open_links);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/headlines_test_nonexistent_config.toml");
        assert_eq!(Config::load(path).unwrap(), Config::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let path = write_config("blank", "  \n\t\n");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let path = write_config("partial", "api_base_url = \"https://news.example.com\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://news.example.com");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.open_links);
    }

    #[test]
    fn test_full_config() {
        let path = write_config(
            "full",
            r#"
api_base_url = "https://news.example.com/v1"
request_timeout_secs = 5
categories = ["Sports", " health ", "sports", ""]
open_links = false
"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(
            config,
            Config {
                api_base_url: "https://news.example.com/v1".to_string(),
                request_timeout_secs: 5,
                categories: vec!["sports".to_string(), "health".to_string()],
                open_links: false,
            }
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_empty_category_list_falls_back() {
        let path = write_config("nocats", "categories = []\n");
        assert_eq!(Config::load(&path).unwrap().categories, Config::default().categories);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "api_base_url = \n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let path = write_config("wrongtype", "open_links = \"yes\"\n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config("unknown", "theme = \"dark\"\nopen_links = false\n");
        let config = Config::load(&path).unwrap();
        assert!(!config.open_links);
    }

    #[test]
    fn test_too_large_file_rejected() {
        let padding = "#".repeat(Config::MAX_FILE_SIZE as usize + 1);
        let path = write_config("toolarge", &padding);
        assert!(matches!(Config::load(&path), Err(ConfigError::TooLarge(_))));
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), crate::api::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_base_url_precedence() {
        let config = Config::default();
        assert_eq!(
            config.resolve_base_url(Some("https://flag.example"), Some("https://env.example")),
            "https://flag.example"
        );
        assert_eq!(
            config.resolve_base_url(None, Some("https://env.example")),
            "https://env.example"
        );
        assert_eq!(config.resolve_base_url(None, Some("  ")), "http://127.0.0.1:5001");
        assert_eq!(config.resolve_base_url(None, None), "http://127.0.0.1:5001");
    }
}
