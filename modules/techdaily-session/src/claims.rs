use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried in the bearer token payload.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
    Editor,
    /// Any role string this build does not know about.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("Token has no payload segment")]
    MissingPayload,
    #[error("Token payload is not base64url: {0}")]
    Base64(String),
    #[error("Token payload is not valid claims JSON: {0}")]
    Json(String),
}

impl TokenClaims {
    /// Expiry test at millisecond resolution. A token expiring in the
    /// current second still counts as live. `exp` is whatever the token
    /// says, so the scale to milliseconds must not wrap on huge values.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp.saturating_mul(1000) < now.timestamp_millis()
    }
}

/// Decode the claims out of a JWT without verifying its signature. The
/// backend is the only party holding the signing secret; callers here only
/// need to read what the token says about itself.
pub fn decode_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or(ClaimsError::MissingPayload)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ClaimsError::Base64(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ClaimsError::Json(e.to_string()))
}
