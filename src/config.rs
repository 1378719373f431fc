// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Client configuration
//!
//! The default credential and base URL live here, built explicitly by the
//! caller from code, the environment or a TOML file. Nothing is global.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use url::Url;

use crate::constants::{api, env_vars};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL relative API paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Default bearer credential, used when a call does not pass one
    #[serde(default)]
    pub access_token: Option<String>,
    /// Request timeout; unset leaves the HTTP client's default in place
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// OAuth application settings, only needed for token exchange
    #[serde(default)]
    pub oauth: Option<OAuthSettings>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Token endpoint override; Strava's endpoint when unset
    #[serde(default)]
    pub token_url: Option<String>,
}

fn default_base_url() -> String {
    api::STRAVA_API_BASE.to_owned()
}

fn default_scopes() -> Vec<String> {
    api::DEFAULT_SCOPES.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_secs: None,
            user_agent: None,
            oauth: None,
        }
    }
}

impl ClientConfig {
    /// Default configuration with the given credential
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            access_token,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read the `STRAVA_*` variables, loading `.env` first if present
    ///
    /// # Errors
    ///
    /// Fails when `STRAVA_TIMEOUT_SECS` is not a number.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        let oauth = match (
            env::var(env_vars::CLIENT_ID),
            env::var(env_vars::CLIENT_SECRET),
        ) {
            (Ok(client_id), Ok(client_secret)) => Some(OAuthSettings {
                client_id,
                client_secret,
                redirect_uri: env::var(env_vars::REDIRECT_URI).ok(),
                scopes: env::var(env_vars::SCOPES)
                    .map(|s| parse_scopes(&s))
                    .unwrap_or_else(|_| default_scopes()),
                token_url: None,
            }),
            _ => None,
        };

        let timeout_secs = match env::var(env_vars::TIMEOUT_SECS) {
            Ok(value) => Some(
                value
                    .parse::<u64>()
                    .with_context(|| format!("Invalid {} value", env_vars::TIMEOUT_SECS))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            base_url: env::var(env_vars::API_BASE_URL).unwrap_or_else(|_| default_base_url()),
            access_token: env::var(env_vars::ACCESS_TOKEN).ok(),
            timeout_secs,
            user_agent: None,
            oauth,
        })
    }

    /// Load from a TOML file, falling back to the environment when the file is absent
    ///
    /// Without an explicit path the file is looked up at
    /// `<config dir>/strava-client/config.toml`.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load(path: Option<String>) -> Result<Self> {
        let config_path = path.unwrap_or_else(default_config_path);

        if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
            let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
            debug!("Loaded client configuration from {}", config_path);
            Ok(config)
        } else {
            Self::from_env()
        }
    }

    /// Write the configuration as TOML, creating parent directories
    ///
    /// # Errors
    ///
    /// Fails on I/O or serialization errors.
    pub fn save(&self, path: Option<String>) -> Result<()> {
        let config_path = path.unwrap_or_else(default_config_path);

        let parent = Path::new(&config_path)
            .parent()
            .context("Invalid config path")?;
        fs::create_dir_all(parent)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Check the base URL and timeout
    ///
    /// # Errors
    ///
    /// Fails when the base URL is not an absolute http(s) URL or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base URL '{}'", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("Base URL must use http or https, got '{}'", url.scheme()));
        }

        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }

        if let Some(oauth) = &self.oauth {
            if oauth.redirect_uri.is_none() {
                warn!("OAuth settings present without a redirect_uri");
            }
        }

        if self.access_token.is_none() {
            debug!("No default access token configured; calls must pass one explicitly");
        }
        Ok(())
    }

    /// One-line summary without secrets
    pub fn summary(&self) -> String {
        format!(
            "base_url={}, default_token={}, timeout={}, oauth={}",
            self.base_url,
            if self.access_token.is_some() { "set" } else { "unset" },
            self.timeout_secs
                .map_or_else(|| "client default".to_owned(), |s| format!("{s}s")),
            if self.oauth.is_some() { "configured" } else { "unconfigured" }
        )
    }
}

fn default_config_path() -> String {
    dirs::config_dir()
        .map(|p| p.join("strava-client/config.toml"))
        .unwrap_or_else(|| "config.toml".into())
        .to_string_lossy()
        .to_string()
}

/// Parse comma-separated scopes
fn parse_scopes(scopes: &str) -> Vec<String> {
    scopes
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}
