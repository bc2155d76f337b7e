//! Access token state

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Body returned by the token endpoint
///
/// Only `access_token`, `created_at` and `expires_in` drive the token
/// lifecycle; the rest is accepted so provider additions don't break parsing.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub account_id: Option<Value>,
}

/// A cached client-credentials access token
#[derive(Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// Bearer credential
    pub access_token: String,

    /// Token type (usually "bearer")
    pub token_type: String,

    /// Instant after which the token must not be sent
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenInfo")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl TokenInfo {
    /// Build token state from a token endpoint body
    ///
    /// `expires_at = created_at + expires_in`, with `now` standing in for a
    /// missing `created_at`. A missing `expires_in` yields a token that is
    /// already due for refresh. An empty `access_token` is rejected.
    pub(crate) fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Result<Self> {
        if response.access_token.is_empty() {
            return Err(Error::Authentication(
                "Token response carried an empty access_token".to_string(),
            ));
        }

        let created_at = response.created_at.unwrap_or(now);
        let expires_in = response.expires_in.unwrap_or(0);

        let expires_at = TimeDelta::try_seconds(expires_in)
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                Error::Authentication(format!("Token lifetime out of range: {expires_in}s"))
            })?;

        Ok(Self {
            access_token: response.access_token,
            token_type: response.token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_at,
        })
    }

    /// True while `now` is strictly before the expiry instant
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && now < self.expires_at
    }

    /// True if the token can still be sent right now
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Time until expiration
    #[must_use]
    pub fn time_until_expiry(&self) -> Option<Duration> {
        (self.expires_at - Utc::now()).to_std().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: Value) -> TokenResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn expiry_is_created_at_plus_expires_in() {
        let body = parse(serde_json::json!({
            "access_token": "valid token",
            "created_at": "2024-01-01T00:00:00Z",
            "expires_in": 36000,
            "refresh_token": "r",
            "token_type": "bearer",
            "account_id": 111_111
        }));
        let token = TokenInfo::from_response(body, Utc::now()).unwrap();
        assert_eq!(token.expires_at.to_rfc3339(), "2024-01-01T10:00:00+00:00");
        assert_eq!(token.token_type, "bearer");
    }

    #[test]
    fn empty_access_token_is_rejected() {
        let body = parse(serde_json::json!({ "access_token": "", "expires_in": 36000 }));
        let err = TokenInfo::from_response(body, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn historical_token_is_expired() {
        let body = parse(serde_json::json!({
            "access_token": "expired token",
            "created_at": "1975-11-06T03:53:41.981Z",
            "expires_in": 36000
        }));
        let token = TokenInfo::from_response(body, Utc::now()).unwrap();
        assert!(!token.is_valid());
        assert_eq!(token.time_until_expiry(), None);
    }

    #[test]
    fn missing_created_at_uses_now() {
        let now = Utc::now();
        let body = parse(serde_json::json!({"access_token": "t", "expires_in": 60}));
        let token = TokenInfo::from_response(body, now).unwrap();
        assert_eq!(token.expires_at, now + TimeDelta::seconds(60));
        assert!(token.is_valid_at(now));
        assert!(!token.is_valid_at(now + TimeDelta::seconds(60)));
    }

    #[test]
    fn missing_expires_in_is_immediately_stale() {
        let now = Utc::now();
        let body = parse(serde_json::json!({"access_token": "t"}));
        let token = TokenInfo::from_response(body, now).unwrap();
        assert!(!token.is_valid_at(now));
    }

    #[test]
    fn absurd_lifetime_is_rejected() {
        let body = parse(serde_json::json!({"access_token": "t", "expires_in": i64::MAX}));
        assert!(matches!(
            TokenInfo::from_response(body, Utc::now()),
            Err(Error::Authentication(_))
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let body = parse(serde_json::json!({"access_token": "s3cr3t", "expires_in": 60}));
        let token = TokenInfo::from_response(body, Utc::now()).unwrap();
        assert!(!format!("{token:?}").contains("s3cr3t"));
    }
}
