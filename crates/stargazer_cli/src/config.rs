//! Configuration file support for stargazer.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Plain environment variables (`GITHUB_TOKEN`, `NOTION_TOKEN`,
//!    `NOTION_DATABASE_ID`, `GITHUB_USERNAME`)
//! 3. Environment variables prefixed with `STARGAZER_`
//! 4. Config file (~/.config/stargazer/config.toml or ./stargazer.toml)
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."      # or use GITHUB_TOKEN env var
//! username = "octocat"   # optional; defaults to the authenticated user
//!
//! [notion]
//! token = "secret_..."   # or use NOTION_TOKEN env var
//! database_id = "..."    # or use NOTION_DATABASE_ID env var
//!
//! [sync]
//! strategy = "upsert"    # "upsert" or "wipe"
//! translate = true
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use stargazer::ReconcileStrategy;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// Notion configuration.
    pub notion: NotionConfig,
    /// Default sync options.
    pub sync: SyncConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub personal access token.
    pub token: Option<String>,
    /// Sync this user's stars instead of the authenticated user's.
    pub username: Option<String>,
}

/// Notion configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    /// Notion integration token.
    pub token: Option<String>,
    /// Target database id.
    pub database_id: Option<String>,
}

/// Default sync options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Reconciliation strategy: "upsert" or "wipe".
    pub strategy: String,
    /// Whether to translate descriptions when the database supports it.
    pub translate: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            strategy: "upsert".to_string(),
            translate: true,
        }
    }
}

/// A configuration problem that should abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting `{setting}` (set it in the config file or via {env})")]
    Missing {
        setting: &'static str,
        env: &'static str,
    },

    #[error("Invalid value for `sync.strategy`: {0}")]
    InvalidStrategy(String),
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. XDG config file (~/.config/stargazer/config.toml)
    /// 2. Local config file (./stargazer.toml)
    /// 3. Environment variables with STARGAZER_ prefix
    /// 4. Plain environment variables (GITHUB_TOKEN, NOTION_TOKEN, ...)
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "stargazer") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("stargazer.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./stargazer.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("STARGAZER")
                .separator("_")
                .try_parsing(true),
        );

        let mut config = match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        };

        config.apply_plain_env();
        config
    }

    /// Overlay the plain (unprefixed) environment variables.
    fn apply_plain_env(&mut self) {
        if self.github.token.is_none()
            && let Ok(value) = std::env::var("GITHUB_TOKEN")
        {
            self.github.token = Some(value);
        }
        if self.github.username.is_none()
            && let Ok(value) = std::env::var("GITHUB_USERNAME")
        {
            self.github.username = Some(value);
        }
        if self.notion.token.is_none()
            && let Ok(value) = std::env::var("NOTION_TOKEN")
        {
            self.notion.token = Some(value);
        }
        if self.notion.database_id.is_none()
            && let Ok(value) = std::env::var("NOTION_DATABASE_ID")
        {
            self.notion.database_id = Some(value);
        }
    }

    /// Get the GitHub token, or a descriptive startup error.
    pub fn github_token(&self) -> Result<String, ConfigError> {
        self.github
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing {
                setting: "github.token",
                env: "GITHUB_TOKEN",
            })
    }

    /// Get the Notion token, or a descriptive startup error.
    pub fn notion_token(&self) -> Result<String, ConfigError> {
        self.notion
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing {
                setting: "notion.token",
                env: "NOTION_TOKEN",
            })
    }

    /// Get the Notion database id, or a descriptive startup error.
    pub fn notion_database_id(&self) -> Result<String, ConfigError> {
        self.notion
            .database_id
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing {
                setting: "notion.database_id",
                env: "NOTION_DATABASE_ID",
            })
    }

    /// Get the configured GitHub username, if any.
    pub fn github_username(&self) -> Option<String> {
        self.github.username.clone().filter(|u| !u.is_empty())
    }

    /// Parse the configured reconcile strategy.
    pub fn strategy(&self) -> Result<ReconcileStrategy, ConfigError> {
        self.sync
            .strategy
            .parse()
            .map_err(ConfigError::InvalidStrategy)
    }

    /// Whether translation is enabled.
    pub fn translate(&self) -> bool {
        self.sync.translate
    }
}
