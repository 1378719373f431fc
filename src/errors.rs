// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types returned by every API call
//!
//! A call either reaches the server and gets a non-2xx answer
//! ([`StravaError::Api`]) or never obtains a response
//! ([`StravaError::Transport`]). The remaining variants cover local
//! failures while building the request or decoding a successful response.
//! Nothing here is retried; callers decide.

use crate::models::Fault;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, StravaError>;

/// Errors produced while dispatching a request to the Strava API
#[derive(Debug, thiserror::Error)]
pub enum StravaError {
    /// The server answered with a non-2xx status
    #[error("Strava API returned {status}: {payload}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Parsed error body, or the raw text as a JSON string when the body is not JSON
        payload: serde_json::Value,
    },

    /// No response was obtained (DNS, connect, timeout, reset, body read)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx body did not match the expected shape
    #[error("Failed to decode response body: {source}")]
    Decode {
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
        /// Raw response body
        body: String,
    },

    /// A query or body value could not be serialized
    #[error("Serialization failed for {context}")]
    Serialization {
        /// What was being serialized
        context: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Base URL joined with the path is not a valid URL
    #[error("Invalid URL '{url}'")]
    InvalidUrl {
        /// The URL that failed to parse
        url: String,
        /// Underlying parse error
        #[source]
        source: url::ParseError,
    },

    /// A query parameter value is not a primitive
    #[error("Invalid query parameter '{key}': {reason}")]
    InvalidQuery {
        /// Offending parameter name
        key: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// A request parameter holds a value the API does not accept
    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter {
        /// Offending field name
        field: &'static str,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The client configuration failed validation
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl StravaError {
    /// HTTP status for [`StravaError::Api`], or the status attached to a transport error
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Parsed error payload for [`StravaError::Api`]
    #[must_use]
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Api { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Strava's structured fault, when the payload has the `{message, errors}` shape
    #[must_use]
    pub fn fault(&self) -> Option<Fault> {
        self.payload()
            .and_then(|payload| serde_json::from_value(payload.clone()).ok())
    }

    /// True for a 404 answer
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// True for a 401 answer
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True for a 429 answer
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}
