//! Startup configuration for the trivia API.
//!
//! # Responsibility
//! - Hold storage location, page size, logging and CORS settings in one
//!   explicit struct handed to the boundary at startup.
//! - Layer a JSON file and `TRIVIA_*` environment variables over defaults.
//!
//! # Invariants
//! - `page_size` is at least 1.
//! - Environment values override file values, which override defaults.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use trivia_core::{default_log_level, DEFAULT_PAGE_SIZE};

const DEFAULT_DB_FILE_NAME: &str = "trivia.sqlite3";

pub const ENV_DB_PATH: &str = "TRIVIA_DB_PATH";
pub const ENV_PAGE_SIZE: &str = "TRIVIA_PAGE_SIZE";
pub const ENV_LOG_LEVEL: &str = "TRIVIA_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TRIVIA_LOG_DIR";
pub const ENV_CORS_ALLOW_ORIGIN: &str = "TRIVIA_CORS_ALLOW_ORIGIN";

/// Cross-origin headers attached to every response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CorsPolicy {
    pub allow_origin: String,
    pub allow_headers: String,
    pub allow_methods: String,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_headers: "Content-Type,Authorization,true".to_string(),
            allow_methods: "GET,PUT,POST,DELETE,OPTIONS".to_string(),
        }
    }
}

impl CorsPolicy {
    /// Header name/value pairs in a stable order.
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            ("Access-Control-Allow-Origin", self.allow_origin.clone()),
            ("Access-Control-Allow-Headers", self.allow_headers.clone()),
            ("Access-Control-Allow-Methods", self.allow_methods.clone()),
        ]
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TriviaConfig {
    /// SQLite database file holding questions and categories.
    pub db_path: PathBuf,
    pub page_size: usize,
    pub log_level: String,
    /// Absolute directory for rolling logs. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub cors: CorsPolicy,
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: default_log_level().to_string(),
            log_dir: None,
            cors: CorsPolicy::default(),
        }
    }
}

/// Configuration loading failure.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    InvalidValue { key: &'static str, value: String, reason: &'static str },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "cannot parse config `{}`: {source}", path.display())
            }
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid `{key}` value `{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl TriviaConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads a JSON config file; missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validated()
    }

    /// Applies `TRIVIA_*` overrides resolved through `lookup`.
    ///
    /// Blank values are treated as unset.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(ENV_DB_PATH) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(raw) = read(ENV_PAGE_SIZE) {
            self.page_size = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_PAGE_SIZE,
                value: raw.clone(),
                reason: "expected a positive integer",
            })?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(origin) = read(ENV_CORS_ALLOW_ORIGIN) {
            self.cors.allow_origin = origin;
        }

        self.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                value: "0".to_string(),
                reason: "page size must be at least 1",
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, TriviaConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_PAGE_SIZE};
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_page_by_ten_with_permissive_cors() {
        let config = TriviaConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.cors.allow_origin, "*");
        assert_eq!(config.cors.allow_methods, "GET,PUT,POST,DELETE,OPTIONS");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn overrides_replace_defaults_and_ignore_blank_values() {
        let config = TriviaConfig::default()
            .with_overrides(lookup(&[
                (ENV_DB_PATH, "/var/lib/trivia/db.sqlite3"),
                (ENV_PAGE_SIZE, " 25 "),
                (ENV_LOG_DIR, "   "),
            ]))
            .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/trivia/db.sqlite3"));
        assert_eq!(config.page_size, 25);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn invalid_page_size_is_rejected() {
        let err = TriviaConfig::default()
            .with_overrides(lookup(&[(ENV_PAGE_SIZE, "ten")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_PAGE_SIZE, .. }));

        let zero = TriviaConfig::default()
            .with_overrides(lookup(&[(ENV_PAGE_SIZE, "0")]))
            .unwrap_err();
        assert!(zero.to_string().contains("at least 1"));
    }

    #[test]
    fn json_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"page_size": 5, "cors": {{"allow_origin": "https://quiz.example"}}}}"#
        )
        .unwrap();

        let config = TriviaConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.cors.allow_origin, "https://quiz.example");
        assert_eq!(config.cors.allow_headers, "Content-Type,Authorization,true");
    }

    #[test]
    fn unreadable_or_malformed_file_is_reported() {
        let missing = TriviaConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let malformed = TriviaConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(malformed, ConfigError::Parse { .. }));
    }
}
