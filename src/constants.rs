// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Fixed API endpoints and the names of the environment variables the
//! client reads.

/// Strava API endpoints
pub mod api {
    /// Base URL every relative API path is appended to
    pub const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";

    /// OAuth authorization page
    pub const STRAVA_AUTH_URL: &str = "https://www.strava.com/oauth/authorize";

    /// OAuth token exchange and refresh endpoint
    pub const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

    /// Default scopes requested during authorization
    pub const DEFAULT_SCOPES: &[&str] = &["read", "activity:read_all"];

    /// User agent sent with every request unless overridden
    pub const USER_AGENT: &str = concat!("strava-client/", env!("CARGO_PKG_VERSION"));
}

/// Environment variable names
pub mod env_vars {
    /// Default bearer credential used when a call does not pass one
    pub const ACCESS_TOKEN: &str = "STRAVA_ACCESS_TOKEN";

    /// Base URL override
    pub const API_BASE_URL: &str = "STRAVA_API_BASE_URL";

    /// OAuth application client ID
    pub const CLIENT_ID: &str = "STRAVA_CLIENT_ID";

    /// OAuth application client secret
    pub const CLIENT_SECRET: &str = "STRAVA_CLIENT_SECRET";

    /// OAuth redirect URI
    pub const REDIRECT_URI: &str = "STRAVA_REDIRECT_URI";

    /// Comma-separated OAuth scopes
    pub const SCOPES: &str = "STRAVA_SCOPES";

    /// Request timeout in seconds
    pub const TIMEOUT_SECS: &str = "STRAVA_TIMEOUT_SECS";
}

/// Token lifetime handling
pub mod tokens {
    /// A token expiring within this many seconds is reported as expiring soon
    pub const EXPIRY_MARGIN_SECS: i64 = 300;
}

/// Logging limits
pub mod logging {
    /// Error bodies longer than this are truncated in log output
    pub const MAX_ERROR_BODY_LOG_SIZE: usize = 500;
}
