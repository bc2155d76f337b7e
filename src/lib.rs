//! OneLogin SDK
//!
//! Client for the OneLogin identity-management API.
//!
//! # Features
//!
//! - **Client credentials**: access tokens are acquired on first use, cached,
//!   and refreshed in place once expired
//! - **Single-flight refresh**: concurrent callers share one token request
//! - **Uniform CRUD**: one repository for every REST resource, with
//!   transparent aggregation of cursor-paginated lists
//! - **Swappable transport**: anything implementing [`HttpClient`] can sit
//!   under the SDK
//!
//! # Example
//!
//! ```no_run
//! use onelogin_sdk::{Client, ClientConfig, Region};
//!
//! # async fn example() -> onelogin_sdk::Result<()> {
//! let client = Client::new(ClientConfig::new("client-id", "client-secret", Region::Us))?;
//!
//! if let Some(apps) = client.apps().list_apps().await {
//!     println!("{}", apps.data);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod oauth;
pub mod repository;
pub mod resources;
pub mod transport;

pub use client::Client;
pub use config::{ClientConfig, Region};
pub use error::{Error, Result};
pub use oauth::OneLoginClient;
pub use repository::HttpRepository;
pub use transport::{HttpClient, HttpRequest, HttpResponse, Method};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    let result = match format {
        Some("json") => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}
