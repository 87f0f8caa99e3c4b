//! Unverified claim decoding for bearer credentials.
//!
//! The gate reads the middle (claims) segment of a three-segment credential
//! and nothing else. There is **no signature verification here**: the
//! credential rides a same-origin HttpOnly cookie whose integrity the
//! transport provides, and every API call is re-authorized by the backend.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Claims carried in the middle segment of a bearer credential.
///
/// Reconstructed fresh for every request; never cached or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Role granted to the bearer. Absent claims default to the basic role.
    #[serde(default)]
    pub role: Role,

    /// Expiry as Unix seconds. Tokens without an expiry never expire here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Claims the gate does not interpret (subject, issue time, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TokenClaims {
    /// Whether the `exp` claim places this token in the past.
    ///
    /// `exp` is compared at millisecond resolution against `now`; a token
    /// expiring this very second is already expired once the second has
    /// fractionally elapsed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) => exp.saturating_mul(1000) < now.timestamp_millis(),
            None => false,
        }
    }
}

/// Why a credential's claims segment could not be decoded.
///
/// The variants exist for diagnostics only: the decision layer collapses
/// every decode failure into the missing-credential outcome, so a malformed
/// payload is never partially trusted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("credential must have three dot-separated segments")]
    SegmentCount,

    #[error("claims segment is not valid base64url")]
    Base64,

    #[error("claims segment is not a JSON claims object")]
    Json,
}

/// Decode the claims segment of a credential.
///
/// Splits on `.`, base64url-decodes the middle segment, and parses it as a
/// JSON object. Issuers differ on padding, so trailing `=` is tolerated.
/// Total: every malformed input returns `Err`, nothing panics.
pub fn decode_claims(token: &str) -> Result<TokenClaims, DecodeError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeError::SegmentCount);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| DecodeError::Base64)?;

    serde_json::from_slice(&bytes).map_err(|_| DecodeError::Json)
}
