//! Configuration storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::demo::PlayerOptions;

const DEFAULT_API_VERSION: &str = "v21.0";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Contact name shown in the chat header
    pub contact_name: String,
    /// Subtitle under the contact name
    pub business_account: String,
    /// Show the prev/next arrows
    pub show_navigation: bool,
    /// Show the scenario dots
    pub show_dots: bool,
    /// Show the scenario title under the phone
    pub show_caption: bool,
    /// Token expected in the webhook subscription handshake
    pub verify_token: Option<String>,
    /// Graph API version used when formatting endpoints
    pub api_version: String,
    /// Business phone number id used when formatting endpoints
    pub phone_number_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let player = PlayerOptions::default();
        Self {
            contact_name: player.contact_name,
            business_account: player.business_account,
            show_navigation: player.show_navigation,
            show_dots: player.show_dots,
            show_caption: player.show_caption,
            verify_token: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            phone_number_id: None,
        }
    }
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "wa-flow", "wa-flow")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    /// Parse configuration text; missing keys take their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir).context("Failed to create config directory")?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;

        // Verify token is a shared secret
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }

    /// Player display options from this config
    pub fn player_options(&self) -> PlayerOptions {
        PlayerOptions {
            contact_name: self.contact_name.clone(),
            business_account: self.business_account.clone(),
            show_navigation: self.show_navigation,
            show_dots: self.show_dots,
            show_caption: self.show_caption,
        }
    }
}
