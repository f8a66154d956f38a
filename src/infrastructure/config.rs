//! Configuration infrastructure
//!
//! Settings are stored as one JSON file in the user's config directory and
//! grouped by concern: extraction engine, wiki access, and logging.

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extraction: ExtractionConfig,
    pub wiki: WikiConfig,
    pub logging: LoggingConfig,
}

/// Extraction engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Run rules on a worker pool instead of one after another
    pub parallel: bool,

    /// Worker pool size; 0 lets rayon pick one thread per core
    pub worker_threads: usize,

    /// CSS selector of the article content element
    pub content_root_selector: String,
}

/// Wiki access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// MediaWiki `action=parse` URL, `{}` is replaced with the page title
    pub api_url_template: String,

    /// Item display name -> wiki page title, for items whose page is disambiguated
    pub item_aliases: HashMap<String, String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output (stderr)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log file name inside the log directory
    pub file_name: String,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Enable automatic log cleanup on startup
    pub auto_cleanup_logs: bool,

    /// Module-specific log level filters (e.g., "scraper": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            parallel: defaults::PARALLEL,
            worker_threads: defaults::WORKER_THREADS,
            content_root_selector: defaults::CONTENT_ROOT_SELECTOR.to_string(),
        }
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url_template: defaults::API_URL_TEMPLATE.to_string(),
            item_aliases: defaults::ITEM_ALIASES
                .iter()
                .map(|name| (name.to_string(), format!("{} (Item)", name)))
                .collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            max_files: defaults::LOG_MAX_FILES,
            auto_cleanup_logs: defaults::LOG_AUTO_CLEANUP,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("selectors".to_string(), "warn".to_string());
                filters.insert("tokio".to_string(), "info".to_string());
                filters.insert("wiki_loot_extract".to_string(), "info".to_string());
                filters
            },
        }
    }
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Read from an existing file
    Loaded,
    /// No file existed; defaults were written
    CreatedDefault,
    /// The file could not be parsed and was replaced with defaults
    ResetCorrupted {
        reason: String,
        backup: Option<PathBuf>,
    },
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Manager for the default config file location
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::with_path(config_dir.join(defaults::CONFIG_FILE_NAME)))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        self.load_config_with_origin()
            .await
            .map(|(config, _origin)| config)
    }

    /// Like [`Self::load_config`], also reporting where the settings came from.
    /// Callers that load config before logging is up can log the origin afterwards.
    pub async fn load_config_with_origin(&self) -> Result<(AppConfig, ConfigOrigin)> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok((default_config, ConfigOrigin::CreatedDefault));
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok((config, ConfigOrigin::Loaded))
            }
            Err(parse_error) => {
                warn!("Configuration file is unreadable: {}", parse_error);
                warn!("Resetting to default configuration");

                let backup_path = self.config_path.with_extension("json.corrupted");
                let backup = match fs::copy(&self.config_path, &backup_path).await {
                    Ok(_) => {
                        info!("Backed up corrupted config to: {:?}", backup_path);
                        Some(backup_path)
                    }
                    Err(e) => {
                        warn!("Failed to create backup of corrupted config: {}", e);
                        None
                    }
                };

                let config = self
                    .reset_to_defaults()
                    .await
                    .context("Failed to save default configuration")?;

                Ok((
                    config,
                    ConfigOrigin::ResetCorrupted {
                        reason: parse_error.to_string(),
                        backup,
                    },
                ))
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Reset configuration to defaults (useful for troubleshooting)
    pub async fn reset_to_defaults(&self) -> Result<AppConfig> {
        let default_config = AppConfig::default();
        self.save_config(&default_config).await?;

        info!("Configuration reset to defaults");
        Ok(default_config)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Default configuration values
pub mod defaults {
    pub const APP_DIR_NAME: &str = "wiki-loot-extract";
    pub const CONFIG_FILE_NAME: &str = "config.json";

    pub const PARALLEL: bool = true;
    pub const WORKER_THREADS: usize = 4;

    /// Article body as rendered by MediaWiki
    pub const CONTENT_ROOT_SELECTOR: &str = "div.mw-parser-output";

    pub const API_URL_TEMPLATE: &str =
        "https://ffxiv.consolegameswiki.com/mediawiki/api.php?action=parse&format=json&page={}";

    /// Items sharing a name with another page; their item page carries an " (Item)" suffix
    pub const ITEM_ALIASES: &[&str] = &["Blue Cheese", "Gelatin", "Leather", "Morel"];

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "wiki-loot-extract.log";
    pub const LOG_MAX_FILES: u32 = 5;
    pub const LOG_AUTO_CLEANUP: bool = true;
}

/// URL building helper functions
pub mod utils {
    use anyhow::{Context, Result};
    use url::Url;

    use super::WikiConfig;

    /// Parse-API URL for an item's page. Spaces become underscores, the rest is
    /// percent-encoded.
    pub fn page_url(config: &WikiConfig, item_name: &str) -> Result<Url> {
        let title = item_name.trim().replace(' ', "_");
        let (base, query) = config
            .api_url_template
            .split_once('?')
            .context("API URL template has no query string")?;

        let mut url = Url::parse(base)
            .with_context(|| format!("Invalid API URL template: {}", config.api_url_template))?;

        {
            let mut pairs = url.query_pairs_mut();
            for pair in query.split('&').filter(|pair| !pair.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                if value == "{}" {
                    pairs.append_pair(key, &title);
                } else {
                    pairs.append_pair(key, value);
                }
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.extraction.parallel);
        assert_eq!(config.extraction.worker_threads, 4);
        assert_eq!(config.extraction.content_root_selector, "div.mw-parser-output");
        assert_eq!(
            config.wiki.item_aliases.get("Morel").map(String::as_str),
            Some("Morel (Item)")
        );
        assert_eq!(config.wiki.item_aliases.len(), 4);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"extraction":{"parallel":false}}"#).unwrap();
        assert!(!config.extraction.parallel);
        assert_eq!(config.extraction.worker_threads, defaults::WORKER_THREADS);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_page_url() {
        let url = utils::page_url(&WikiConfig::default(), "Goblin Cup").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ffxiv.consolegameswiki.com/mediawiki/api.php?action=parse&format=json&page=Goblin_Cup"
        );

        let url = utils::page_url(&WikiConfig::default(), "Morel (Item)").unwrap();
        assert!(url.as_str().ends_with("page=Morel_%28Item%29"));
    }

    #[test]
    fn test_page_url_requires_query() {
        let config = WikiConfig {
            api_url_template: "https://example.org/api.php".to_string(),
            ..WikiConfig::default()
        };
        assert!(utils::page_url(&config, "Copper Ore").is_err());
    }
}
