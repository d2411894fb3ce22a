//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Gemini API key.
    pub api_key: Option<String>,
    /// Gemini model name.
    pub model: String,
    /// Base URL of the generative-language API.
    pub api_base_url: String,
    /// Minutes without a new entry before `dl remind` speaks up.
    pub reminder_threshold_minutes: u32,
    /// Minutes between checks in `dl remind --watch`.
    pub reminder_interval_minutes: u32,
    /// Days of history sent along with AI requests.
    pub history_days: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field(
                "reminder_threshold_minutes",
                &self.reminder_threshold_minutes,
            )
            .field("reminder_interval_minutes", &self.reminder_interval_minutes)
            .field("history_days", &self.history_days)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("dl.db"),
            api_key: None,
            model: dl_llm::DEFAULT_MODEL.to_string(),
            api_base_url: dl_llm::DEFAULT_BASE_URL.to_string(),
            reminder_threshold_minutes: dl_core::reminder::DEFAULT_THRESHOLD_MINUTES,
            reminder_interval_minutes: 30,
            history_days: 7,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // The conventional Gemini variable, overridden by DL_API_KEY below
        figment = figment.merge(
            Env::raw()
                .only(&["GEMINI_API_KEY"])
                .map(|_| "api_key".into()),
        );

        // Load from environment variables (DL_*)
        figment = figment.merge(Env::prefixed("DL_"));

        figment.extract()
    }

    /// The API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Returns the platform-specific config directory for dl.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dl"))
}

/// Returns the platform-specific data directory for dl.
///
/// On Linux: `~/.local/share/dl`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("dl"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_dl() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "dl");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("dl.db"));
        assert_eq!(config.reminder_threshold_minutes, 60);
        assert_eq!(config.reminder_interval_minutes, 30);
        assert_eq!(config.history_days, 7);
        assert_eq!(config.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "database_path = \"/tmp/custom.db\"\nhistory_days = 14\nmodel = \"gemini-pro\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.history_days, 14);
        assert_eq!(config.model, "gemini-pro");
    }

    #[test]
    fn test_api_key_ignores_blank_values() {
        let mut config = Config::default();
        config.api_key = Some("   ".to_string());
        assert_eq!(config.api_key(), None);
        config.api_key = Some(" key ".to_string());
        assert_eq!(config.api_key(), Some("key"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = Config::default();
        config.api_key = Some("super-secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
