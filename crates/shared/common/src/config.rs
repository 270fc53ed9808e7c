//! Archive configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use domain::{DEFAULT_LOGIN_DELAY_MS, DEFAULT_RECENT_WINDOW_DAYS};

/// Default directory for the file storage backend
pub const DEFAULT_STORAGE_DIR: &str = ".arsip";

/// Default log level when `RUST_LOG` is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Which durable storage backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// One JSON document per key under `storage_dir`
    #[default]
    File,
    /// In-process only, lost on exit
    Memory,
}

impl From<&str> for StorageBackend {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            _ => StorageBackend::File,
        }
    }
}

/// Archive configuration.
#[derive(Debug, Clone)]
pub struct ArsipConfig {
    /// Storage backend selection
    pub storage_backend: StorageBackend,
    /// Directory used by the file backend
    pub storage_dir: PathBuf,
    /// Simulated login delay in milliseconds
    pub login_delay_ms: u64,
    /// Persist letters under `app_letters` instead of resetting to the seed set
    pub persist_letters: bool,
    /// Dashboard recency window in days
    pub recent_window_days: i64,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
}

impl ArsipConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            storage_backend: env::var("ARSIP_STORAGE")
                .map(|v| StorageBackend::from(v.as_str()))
                .unwrap_or_default(),
            storage_dir: env::var("ARSIP_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR)),
            login_delay_ms: env::var("ARSIP_LOGIN_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LOGIN_DELAY_MS),
            persist_letters: env::var("ARSIP_PERSIST_LETTERS")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
            recent_window_days: env::var("ARSIP_RECENT_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|days: &i64| *days >= 0)
                .unwrap_or(DEFAULT_RECENT_WINDOW_DAYS),
            log_level: env::var("ARSIP_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// In-memory configuration with no login delay (tests, previews).
    pub fn ephemeral() -> Self {
        Self {
            storage_backend: StorageBackend::Memory,
            login_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Login delay as a duration.
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

impl Default for ArsipConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::File,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            login_delay_ms: DEFAULT_LOGIN_DELAY_MS,
            persist_letters: true,
            recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = ArsipConfig::default();
        assert_eq!(config.login_delay(), Duration::from_secs(1));
        assert_eq!(config.storage_backend, StorageBackend::File);
        assert!(config.persist_letters);
    }

    #[test]
    fn ephemeral_uses_memory_without_delay() {
        let config = ArsipConfig::ephemeral();
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.login_delay(), Duration::ZERO);
    }

    #[test]
    fn flags_and_backends_parse_leniently() {
        assert_eq!(parse_flag(" Off "), Some(false));
        assert_eq!(parse_flag("yes"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(StorageBackend::from("MEMORY"), StorageBackend::Memory);
        assert_eq!(StorageBackend::from("anything"), StorageBackend::File);
    }
}
