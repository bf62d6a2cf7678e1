use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Loupe application.
///
/// Loaded from `~/.loupe/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoupeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub table: TableConfig,
}

impl LoupeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LoupeConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Query backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the query execution backend.
    pub base_url: String,
    /// Health check deadline in seconds.
    pub health_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            health_timeout_secs: 5,
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Answer questions from the local sample catalog instead of the
    /// backend. Also selected automatically when the backend is down.
    pub use_mock: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { use_mock: false }
    }
}

/// Result table presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per displayed page.
    pub rows_per_page: usize,
    /// Display cap on the working row set, applied before pagination.
    pub max_rows: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows_per_page: 10,
            max_rows: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoupeConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.backend.base_url, "http://localhost:8080");
        assert_eq!(config.backend.health_timeout_secs, 5);
        assert!(!config.chat.use_mock);
        assert_eq!(config.table.rows_per_page, 10);
        assert_eq!(config.table.max_rows, 100);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = LoupeConfig::default();
        config.backend.base_url = "http://analytics.internal:9000".to_string();
        config.chat.use_mock = true;
        config.table.rows_per_page = 25;
        config.save(&path).unwrap();

        let loaded = LoupeConfig::load(&path).unwrap();
        assert_eq!(loaded.backend.base_url, "http://analytics.internal:9000");
        assert!(loaded.chat.use_mock);
        assert_eq!(loaded.table.rows_per_page, 25);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");
        assert!(LoupeConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");
        let config = LoupeConfig::load_or_default(&path);
        assert_eq!(config.backend.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_load_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backend]\nbase_url = \"http://10.0.0.5:8080\"\n").unwrap();

        let config = LoupeConfig::load(&path).unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:8080");
        // Untouched sections keep their defaults.
        assert_eq!(config.backend.health_timeout_secs, 5);
        assert_eq!(config.table.rows_per_page, 10);
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not toml =").unwrap();
        assert!(LoupeConfig::load(&path).is_err());
    }
}
