// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shared request dispatcher
//!
//! Every resource method ends up in [`Request::make_api_request`]: it joins
//! the relative path onto the base URL, flattens the query, attaches the
//! bearer credential, sends exactly one HTTP request and decodes the JSON
//! answer into the caller's type. Non-2xx answers and transport failures are
//! normalized into [`StravaError`] and returned as-is.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::constants::{api, logging as log_limits};
use crate::errors::{Result, StravaError};
use crate::logging::ApiLogger;

/// HTTP verbs the API is called with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Upper-case verb name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered query parameters
///
/// Entries may be absent (`None`); absent entries never reach the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Option<String>)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, keeping it only if `value` is present
    #[must_use]
    pub fn with<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a parameter in place
    pub fn insert<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) {
        self.entries
            .push((key.into(), value.map(|v| v.to_string())));
    }

    /// Flatten a serializable struct or map into query parameters
    ///
    /// Strings are used as-is, numbers and booleans through their JSON
    /// text, nulls are dropped. Keys follow `serde_json`'s map order.
    /// Arrays and objects cannot be expressed as a single query value and
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StravaError::Serialization`] when `value` fails to
    /// serialize and [`StravaError::InvalidQuery`] when it is not a flat
    /// object of primitives.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(|source| StravaError::Serialization {
            context: "query parameters",
            source,
        })?;

        let object = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(object) => object,
            _ => {
                return Err(StravaError::InvalidQuery {
                    key: String::new(),
                    reason: "query parameters must serialize to an object",
                })
            }
        };

        let mut params = Self::new();
        for (key, value) in object {
            let value = match value {
                Value::Null => None,
                Value::String(s) => Some(s),
                Value::Bool(b) => Some(b.to_string()),
                Value::Number(n) => Some(n.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(StravaError::InvalidQuery {
                        key,
                        reason: "nested values are not supported",
                    })
                }
            };
            params.entries.push((key, value));
        }
        Ok(params)
    }

    /// Present entries in order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    /// True when no entry has a value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }
}

/// Per-call options: query, body and credential override
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: QueryParams,
    /// JSON payload, sent for every verb except GET
    pub body: Option<Value>,
    /// Overrides the dispatcher's default credential for this call
    pub access_token: Option<String>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` and attach it
    ///
    /// # Errors
    ///
    /// Returns [`StravaError::Serialization`] if `body` cannot be encoded.
    pub fn with_json_body<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        let body = serde_json::to_value(body).map_err(|source| StravaError::Serialization {
            context: "request body",
            source,
        })?;
        Ok(self.with_body(body))
    }

    #[must_use]
    pub fn with_access_token(mut self, access_token: Option<String>) -> Self {
        self.access_token = access_token;
        self
    }
}

/// The request dispatcher shared by every resource module
#[derive(Debug, Clone)]
pub struct Request {
    client: Client,
    base_url: String,
    default_token: Option<String>,
}

impl Request {
    /// Create a dispatcher around an existing HTTP client
    pub fn new(client: Client, base_url: impl Into<String>, default_token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client,
            base_url,
            default_token,
        }
    }

    /// Build the HTTP client and dispatcher described by `config`
    ///
    /// # Errors
    ///
    /// Returns [`StravaError::Transport`] if the HTTP client cannot be built
    /// (for example when no TLS backend is available).
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_deref().unwrap_or(api::USER_AGENT));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self::new(
            client,
            config.base_url.clone(),
            config.access_token.clone(),
        ))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client, shared with the OAuth helper
    #[must_use]
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Join `path` onto the base URL and append the present query entries
    ///
    /// # Errors
    ///
    /// Returns [`StravaError::InvalidUrl`] if the result does not parse.
    pub fn build_url(&self, path: &str, query: &QueryParams) -> Result<Url> {
        let raw = if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };

        let mut url = Url::parse(&raw).map_err(|source| StravaError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;

        // Touching query_pairs_mut with nothing to add would leave a bare '?'.
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        Ok(url)
    }

    /// Explicit token wins over the default credential
    fn resolve_token<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit.or(self.default_token.as_deref())
    }

    /// Issue one request and decode the JSON answer as `T`
    ///
    /// An empty 2xx body decodes as JSON `null`, so `T` may be `()`,
    /// `Option<_>` or [`Value`] for bodiless responses.
    ///
    /// # Errors
    ///
    /// - [`StravaError::Api`] when the server answers with a non-2xx status
    /// - [`StravaError::Transport`] when no response could be obtained
    /// - [`StravaError::Decode`] when a 2xx body does not match `T`
    /// - [`StravaError::InvalidUrl`] when the path does not form a valid URL
    pub async fn make_api_request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let url = self.build_url(path, &options.query)?;
        let token = self.resolve_token(options.access_token.as_deref());

        debug!(
            http.method = %method,
            http.path = %path,
            has_query = !options.query.is_empty(),
            authenticated = token.is_some(),
            "Dispatching Strava API request"
        );

        let mut builder = self.client.request(method.to_reqwest(), url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if method != HttpMethod::Get {
            if let Some(body) = &options.body {
                builder = builder.json(body);
            }
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            error!(http.method = %method, http.path = %path, "Strava API request failed: {e}");
            StravaError::Transport(e)
        })?;

        let status = response.status();
        let text = response.text().await?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        ApiLogger::log_api_request(method.as_str(), path, status.as_u16(), elapsed_ms);

        if !status.is_success() {
            warn!(
                http.status = status.as_u16(),
                http.path = %path,
                "Strava API error response: {}",
                truncate_for_log(&text)
            );
            return Err(StravaError::Api {
                status: status.as_u16(),
                payload: parse_error_payload(text),
            });
        }

        decode_body(text)
    }
}

fn decode_body<T: DeserializeOwned>(text: String) -> Result<T> {
    let decoded = if text.trim().is_empty() {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_str(&text)
    };
    decoded.map_err(|source| StravaError::Decode { source, body: text })
}

/// Error body as JSON, the raw text as a JSON string, or `null` when empty
pub(crate) fn parse_error_payload(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn truncate_for_log(text: &str) -> &str {
    if text.len() <= log_limits::MAX_ERROR_BODY_LOG_SIZE {
        return text;
    }
    let mut end = log_limits::MAX_ERROR_BODY_LOG_SIZE;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
