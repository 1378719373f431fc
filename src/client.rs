// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use tracing::info;

use crate::config::ClientConfig;
use crate::errors::{Result, StravaError};
use crate::oauth::{OAuthClient, OAuthConfig};
use crate::request::Request;
use crate::resources::Activities;

/// Entry point owning the dispatcher and handing out resource modules
#[derive(Debug, Clone)]
pub struct StravaClient {
    request: Request,
    config: ClientConfig,
}

impl StravaClient {
    /// Build a client from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`StravaError::Config`] when `config` fails
    /// [`ClientConfig::validate`] and [`StravaError::Transport`] if the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| StravaError::Config(format!("{e:#}")))?;
        let request = Request::from_config(&config)?;
        info!("Strava client ready: {}", config.summary());
        Ok(Self { request, config })
    }

    /// Client with default settings and the given default credential
    ///
    /// # Errors
    ///
    /// Same as [`StravaClient::new`].
    pub fn with_token(access_token: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(Some(access_token.into())))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The shared dispatcher, for endpoints without a resource wrapper
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn activities(&self) -> Activities<'_> {
        Activities::new(&self.request)
    }

    /// OAuth helper built from the `oauth` section of the configuration
    ///
    /// It shares the dispatcher's HTTP client, so the configured user agent
    /// and timeout apply to token requests too.
    pub fn oauth(&self) -> Option<OAuthClient> {
        self.config.oauth.as_ref().map(|settings| {
            OAuthClient::with_client(
                OAuthConfig::from_settings(settings),
                self.request.http_client().clone(),
            )
        })
    }
}
