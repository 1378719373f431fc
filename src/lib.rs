// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Strava Client
//!
//! A typed async client for the Strava v3 REST API.
//!
//! ## Features
//!
//! - **Typed models**: activities, comments, athletes, laps, zones and photos
//!   decode straight from the API's JSON
//! - **One dispatcher**: every call goes through a single [`Request`] that
//!   handles the bearer credential, query and body encoding, and error
//!   normalization
//! - **Explicit configuration**: the default credential comes from a
//!   [`ClientConfig`] built in code, from the environment or from a TOML file
//! - **OAuth2 helpers**: authorization URL, code exchange and token refresh
//!
//! ## Architecture
//!
//! - **Request**: the shared dispatcher
//! - **Resources**: thin wrappers mapping methods to verb + path + params
//! - **Models / Enums**: response records
//! - **Errors**: `Api` for non-2xx answers, `Transport` when no answer came back
//! - **Config / Logging**: ambient setup for applications embedding the client
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use strava_client::{ClientConfig, StravaClient};
//! use strava_client::resources::activities::GetActivityByIdRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::load(None)?;
//!     let client = StravaClient::new(config)?;
//!
//!     let activity = client
//!         .activities()
//!         .get_activity_by_id(&GetActivityByIdRequest { id: 123, ..Default::default() }, None)
//!         .await?;
//!     println!("Activity: {:?}", activity.summary.name);
//!
//!     Ok(())
//! }
//! ```

/// Client facade owning the dispatcher
pub mod client;

/// Client configuration and the default credential
pub mod config;

/// API endpoints and environment variable names
pub mod constants;

/// String-valued API enumerations
pub mod enums;

/// Error types
pub mod errors;

/// Logging setup and structured log helpers
pub mod logging;

/// Response records
pub mod models;

/// OAuth2 token acquisition
pub mod oauth;

/// Shared request dispatcher
pub mod request;

/// Resource modules grouping API operations
pub mod resources;

pub use client::StravaClient;
pub use config::ClientConfig;
pub use errors::{Result, StravaError};
pub use request::{HttpMethod, QueryParams, Request, RequestOptions};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard, PoisonError};

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Serializes tests that read or write process environment variables
    pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
        ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
