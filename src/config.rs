//! Application configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! includes the API base URL and the last used username. The auth endpoint
//! is derived from the API base URL rather than hardcoded, so staging and
//! self-hosted deployments work without a rebuild.
//!
//! Configuration is stored at `~/.config/stockgate/config.json`; the
//! `STOCKGATE_API_URL` environment variable (or a `.env` entry) overrides
//! the stored API base URL.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "stockgate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured API base URL
const API_URL_ENV: &str = "STOCKGATE_API_URL";

/// Path suffix appended to the API origin to reach the auth service.
/// The business API lives under its own prefix on the same server; auth
/// is always `{origin}/api/auth`.
const AUTH_PATH: &str = "/api/auth";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Pick up a .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                config.api_base_url = Some(url);
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Base URL for the auth service, derived from the configured API base.
    pub fn auth_base_url(&self) -> Result<String> {
        let base = self
            .api_base_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("API base URL not configured"))?;
        derive_auth_base_url(base)
    }

    /// Directory holding the credential store.
    pub fn store_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

/// Reduce an API base URL to its origin and append the auth path.
/// `https://shop.example/wp-json/ims/v1` becomes `https://shop.example/api/auth`.
pub fn derive_auth_base_url(api_base_url: &str) -> Result<String> {
    let url = reqwest::Url::parse(api_base_url)
        .with_context(|| format!("Invalid API base URL: {}", api_base_url))?;
    let origin = url.origin();
    anyhow::ensure!(
        origin.is_tuple(),
        "API base URL has no usable origin: {}",
        api_base_url
    );
    Ok(format!("{}{}", origin.ascii_serialization(), AUTH_PATH))
}
