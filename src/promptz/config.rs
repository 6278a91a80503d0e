use crate::error::{PromptzError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Name of the database object kept on the remote drive.
pub const DEFAULT_REMOTE_FILE: &str = "prompt_manager_db.json";

const DEFAULT_FILE_DEBOUNCE_MS: i64 = 2000;
const DEFAULT_REMOTE_DEBOUNCE_MS: i64 = 2500;
const DEFAULT_POLL_INTERVAL_MS: i64 = 5000;
const DEFAULT_TRASH_RETENTION_DAYS: i64 = 60;

const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const DEFAULT_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const DEFAULT_REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";

/// Configuration for promptz, stored in the data directory as config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptzConfig {
    /// Quiet period before an edit is written to the bound file
    #[serde(default = "default_file_debounce_ms")]
    pub file_debounce_ms: i64,

    /// Quiet period before an edit is uploaded to the remote drive
    #[serde(default = "default_remote_debounce_ms")]
    pub remote_debounce_ms: i64,

    /// How often watch mode polls the bound file for outside changes
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: i64,

    /// Days a prompt sits in Trash before purge removes it
    #[serde(default = "default_trash_retention_days")]
    pub trash_retention_days: i64,

    /// Name of the database object on the remote drive
    #[serde(default = "default_remote_file")]
    pub remote_file: String,

    /// Drive API endpoints; overridable for self-hosted proxies and tests
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_upload_base")]
    pub upload_base: String,

    #[serde(default = "default_revoke_url")]
    pub revoke_url: String,
}

fn default_file_debounce_ms() -> i64 {
    DEFAULT_FILE_DEBOUNCE_MS
}

fn default_remote_debounce_ms() -> i64 {
    DEFAULT_REMOTE_DEBOUNCE_MS
}

fn default_poll_interval_ms() -> i64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_trash_retention_days() -> i64 {
    DEFAULT_TRASH_RETENTION_DAYS
}

fn default_remote_file() -> String {
    DEFAULT_REMOTE_FILE.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_upload_base() -> String {
    DEFAULT_UPLOAD_BASE.to_string()
}

fn default_revoke_url() -> String {
    DEFAULT_REVOKE_URL.to_string()
}

impl Default for PromptzConfig {
    fn default() -> Self {
        Self {
            file_debounce_ms: DEFAULT_FILE_DEBOUNCE_MS,
            remote_debounce_ms: DEFAULT_REMOTE_DEBOUNCE_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            trash_retention_days: DEFAULT_TRASH_RETENTION_DAYS,
            remote_file: DEFAULT_REMOTE_FILE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
            revoke_url: DEFAULT_REVOKE_URL.to_string(),
        }
    }
}

impl PromptzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PromptzError::Io)?;
        let config: PromptzConfig =
            serde_json::from_str(&content).map_err(PromptzError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(PromptzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(PromptzError::Serialization)?;
        fs::write(config_path, content).map_err(PromptzError::Io)?;
        Ok(())
    }

    pub fn trash_retention_ms(&self) -> i64 {
        self.trash_retention_days * 86_400_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PromptzConfig::default();
        assert_eq!(config.file_debounce_ms, 2000);
        assert_eq!(config.remote_debounce_ms, 2500);
        assert_eq!(config.poll_interval_ms, 5000);
        assert_eq!(config.remote_file, "prompt_manager_db.json");
        assert_eq!(config.trash_retention_ms(), 60 * 86_400_000);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = PromptzConfig::load(temp_dir.path().join("nope")).unwrap();
        assert_eq!(config, PromptzConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = PromptzConfig::default();
        config.poll_interval_ms = 250;
        config.save(temp_dir.path()).unwrap();

        let loaded = PromptzConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.poll_interval_ms, 250);
        assert_eq!(loaded.file_debounce_ms, 2000);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.json"),
            r#"{ "remote_file": "alt.json" }"#,
        )
        .unwrap();

        let loaded = PromptzConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.remote_file, "alt.json");
        assert_eq!(loaded.remote_debounce_ms, 2500);
    }
}
