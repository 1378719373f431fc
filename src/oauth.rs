// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! OAuth2 helpers for obtaining the bearer credential
//!
//! Builds the authorization URL, exchanges the returned code and refreshes
//! expired tokens. Refreshing is never done implicitly by the dispatcher.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::config::OAuthSettings;
use crate::constants::{api, tokens};
use crate::errors::{Result, StravaError};
use crate::logging::ApiLogger;
use crate::models::SummaryAthlete;
use crate::request::parse_error_payload;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
}

impl OAuthConfig {
    /// Strava endpoints with the given application credentials
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: api::DEFAULT_SCOPES.iter().map(|s| (*s).to_owned()).collect(),
            auth_url: api::STRAVA_AUTH_URL.to_owned(),
            token_url: api::STRAVA_TOKEN_URL.to_owned(),
        }
    }

    /// Build from the settings section of a client configuration
    pub fn from_settings(settings: &OAuthSettings) -> Self {
        let mut config = Self::new(
            settings.client_id.clone(),
            settings.client_secret.clone(),
            settings.redirect_uri.clone().unwrap_or_default(),
        );
        config.scopes.clone_from(&settings.scopes);
        if let Some(token_url) = &settings.token_url {
            config.token_url.clone_from(token_url);
        }
        config
    }
}

/// Whether Strava shows the consent screen to athletes who already approved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApprovalPrompt {
    #[default]
    Auto,
    Force,
}

impl ApprovalPrompt {
    fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Force => "force",
        }
    }
}

/// Token endpoint answer for both code exchange and refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp
    pub expires_at: i64,
    /// Seconds until expiry at the time of issue
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Only present on the initial code exchange
    #[serde(default)]
    pub athlete: Option<SummaryAthlete>,
}

impl TokenResponse {
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.expires_at, 0).unwrap_or_else(Utc::now)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at_utc() <= Utc::now()
    }

    pub fn will_expire_soon(&self) -> bool {
        self.expires_at_utc() <= Utc::now() + Duration::seconds(tokens::EXPIRY_MARGIN_SECS)
    }
}

pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Reuse an existing HTTP client and its connection pool
    pub fn with_client(config: OAuthConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// URL to send the athlete to for consent
    ///
    /// # Errors
    ///
    /// Returns [`StravaError::InvalidUrl`] if the configured auth URL does not parse.
    pub fn authorization_url(&self, state: &str, approval_prompt: ApprovalPrompt) -> Result<Url> {
        let mut url =
            Url::parse(&self.config.auth_url).map_err(|source| StravaError::InvalidUrl {
                url: self.config.auth_url.clone(),
                source,
            })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("approval_prompt", approval_prompt.as_str())
            .append_pair("scope", &self.config.scopes.join(","))
            .append_pair("state", state);

        Ok(url)
    }

    /// Exchange the authorization code for tokens
    ///
    /// # Errors
    ///
    /// [`StravaError::Api`] on a non-2xx answer, [`StravaError::Transport`]
    /// when the token endpoint is unreachable, [`StravaError::Decode`] on an
    /// unexpected body.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ];
        self.post_token_form("exchange_code", &params).await
    }

    /// Trade a refresh token for a fresh access token
    ///
    /// # Errors
    ///
    /// Same as [`OAuthClient::exchange_code`].
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        self.post_token_form("refresh_token", &params).await
    }

    async fn post_token_form(&self, event: &str, params: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            ApiLogger::log_oauth_event(event, false);
            warn!(http.status = status.as_u16(), "Strava token endpoint rejected {event}");
            return Err(StravaError::Api {
                status: status.as_u16(),
                payload: parse_error_payload(text),
            });
        }

        let token = serde_json::from_str(&text)
            .map_err(|source| StravaError::Decode { source, body: text })?;
        ApiLogger::log_oauth_event(event, true);
        Ok(token)
    }
}
