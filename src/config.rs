//! Client configuration

use std::{env, fmt, path::Path, str::FromStr, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Domain every regional API host lives under
pub const PROVIDER_DOMAIN: &str = "onelogin.com";

/// Environment variable prefix recognised by [`ClientConfig::load`]
pub const ENV_PREFIX: &str = "ONELOGIN_";

/// OneLogin data-center region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// United States (`api.us.onelogin.com`)
    Us,
    /// Europe (`api.eu.onelogin.com`)
    Eu,
}

impl Region {
    /// Lower-case region slug used in host names
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Eu => "eu",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "eu" => Ok(Self::Eu),
            other => Err(Error::Config(format!("Unknown region: {other}"))),
        }
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Connection and credential settings for a OneLogin client
///
/// Immutable once handed to [`crate::oauth::OneLoginClient`].
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// OAuth2 client ID (supports `env:VAR_NAME`)
    pub client_id: String,

    /// OAuth2 client secret (supports `env:VAR_NAME`)
    pub client_secret: String,

    /// Region used to template the API host
    #[serde(default)]
    pub region: Option<Region>,

    /// Explicit API host, overrides `region`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Timeout forwarded to the transport
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("region", &self.region)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config for a region with the default timeout
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>, region: Region) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            region: Some(region),
            base_url: None,
            timeout: default_timeout(),
        }
    }

    /// Override the API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the transport timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from an optional YAML file and `ONELOGIN_*` env vars
    ///
    /// Environment variables win over the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let mut config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        config.client_id = resolve_env_ref(&config.client_id);
        config.client_secret = resolve_env_ref(&config.client_secret);

        config.validate()?;
        Ok(config)
    }

    /// Check credentials and host resolution
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::Config("client_id is required".to_string()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(Error::Config("client_secret is required".to_string()));
        }
        resolve_base_url(self.region, self.base_url.as_deref()).map(|_| ())
    }

    /// Final API host for this configuration
    pub fn resolved_base_url(&self) -> Result<String> {
        resolve_base_url(self.region, self.base_url.as_deref())
    }
}

/// Resolve the API host from a region and an optional explicit base URL
///
/// An explicit, non-empty base URL wins and gets `https://` prepended when it
/// has no scheme. Otherwise the host is templated from the region.
pub fn resolve_base_url(region: Option<Region>, base_url: Option<&str>) -> Result<String> {
    if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
        let url = url.trim_end_matches('/');
        if has_scheme(url) {
            return Ok(url.to_string());
        }
        return Ok(format!("https://{url}"));
    }

    match region {
        Some(region) => Ok(format!("https://api.{region}.{PROVIDER_DOMAIN}")),
        None => Err(Error::Config(
            "either region or base_url must be set".to_string(),
        )),
    }
}

/// True if `url` already carries an `http://` or `https://` scheme
pub(crate) fn has_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

/// Expand an `env:VAR_NAME` reference, leaving other values untouched
fn resolve_env_ref(value: &str) -> String {
    match value.strip_prefix("env:") {
        Some(var_name) => env::var(var_name).unwrap_or_default(),
        None => value.to_string(),
    }
}

/// Human-readable serde format for [`Duration`]
pub mod humantime_serde {
    use std::time::Duration;

    use serde::{self, Deserialize, Deserializer, Serializer};

    /// Serialize Duration to human-readable string (e.g., "30s", "500ms")
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the serializer fails.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    /// Deserialize human-readable duration string (e.g., "30s", "5m", "100ms")
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if the string cannot be parsed as a duration.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Secs(u64),
            Text(String),
        }

        let s = match Raw::deserialize(deserializer)? {
            Raw::Secs(secs) => return Ok(Duration::from_secs(secs)),
            Raw::Text(s) => s,
        };

        // "ms" must be checked before "s" and "m"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.parse::<u64>()
                .map(Duration::from_millis)
                .map_err(serde::de::Error::custom)
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(serde::de::Error::custom)
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(serde::de::Error::custom)
        } else {
            // Assume seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(serde::de::Error::custom)
        }
    }
}
