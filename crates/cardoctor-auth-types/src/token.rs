//! JWT session-token issuing and validation.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifetime of a session token (24 hours).
pub const SESSION_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Claim names written by the codec itself; callers may not supply them.
pub const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// Caller-supplied identity attributes carried inside a token.
///
/// Opaque to the codec apart from [`IdentityClaims::email`], which handlers
/// use for ownership checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityClaims(Map<String, Value>);

impl IdentityClaims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for IdentityClaims {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

/// A verified token: the original claims plus the codec's timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub claims: IdentityClaims,
    /// Issued-at, seconds since UNIX epoch.
    pub issued_at: u64,
    /// Expiry, seconds since UNIX epoch.
    pub expires_at: u64,
}

/// Errors returned by [`issue`].
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("claim `{0}` is reserved")]
    ReservedClaim(String),
    #[error("failed to sign token")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

/// Errors returned by [`verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    BadSignature,
}

#[derive(Serialize)]
struct SignedClaims<'a> {
    #[serde(flatten)]
    identity: &'a IdentityClaims,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct DecodedClaims {
    #[serde(flatten)]
    identity: Map<String, Value>,
    #[serde(default)]
    iat: u64,
    exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Sign `claims` with `secret`, valid for `ttl` from now.
pub fn issue(
    claims: &IdentityClaims,
    secret: &str,
    ttl: Duration,
) -> Result<String, EncodingError> {
    issue_at(claims, secret, ttl, now_secs())
}

/// Sign `claims` as if issued at `issued_at` (seconds since epoch).
///
/// Deterministic: the same inputs always produce the same token.
pub fn issue_at(
    claims: &IdentityClaims,
    secret: &str,
    ttl: Duration,
    issued_at: u64,
) -> Result<String, EncodingError> {
    if let Some(reserved) = RESERVED_CLAIMS
        .iter()
        .find(|name| claims.as_map().contains_key(**name))
    {
        return Err(EncodingError::ReservedClaim((*reserved).to_owned()));
    }

    let signed = SignedClaims {
        identity: claims,
        iat: issued_at,
        exp: issued_at.saturating_add(ttl.as_secs()),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &signed,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Validate a token against `secret`, returning its claims.
///
/// HS256 only, `exp` required, no leeway: a token is rejected from the second
/// after its expiry. Other registered claims (`aud`, `iss`, `sub`, `nbf`) are
/// identity data supplied at login and are returned unchecked.
pub fn verify(token: &str, secret: &str) -> Result<TokenInfo, VerificationError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.validate_aud = false;
    validation.validate_nbf = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<DecodedClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => VerificationError::Expired,
        ErrorKind::InvalidSignature => VerificationError::BadSignature,
        _ => VerificationError::Malformed,
    })?;

    Ok(TokenInfo {
        claims: IdentityClaims(data.claims.identity),
        issued_at: data.claims.iat,
        expires_at: data.claims.exp,
    })
}
