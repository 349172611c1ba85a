//! Signed session cookies for tests.
//!
//! Gated routes read the `token` cookie, so tests mint a real token with the
//! same secret the router under test was built with.

use axum::http::{HeaderValue, header::COOKIE};
use serde_json::{Map, Value};

use cardoctor_auth_types::cookie::TOKEN_COOKIE;
use cardoctor_auth_types::token::{IdentityClaims, SESSION_TOKEN_TTL, issue};

/// A caller identity that can sign its own session cookie.
pub struct MockAuth {
    pub claims: IdentityClaims,
    pub secret: String,
}

impl MockAuth {
    /// Identity carrying only an `email` claim.
    pub fn with_email(email: &str, secret: &str) -> Self {
        let mut claims = Map::new();
        claims.insert("email".to_owned(), Value::String(email.to_owned()));
        Self {
            claims: IdentityClaims::new(claims),
            secret: secret.to_owned(),
        }
    }

    /// A freshly issued session token.
    pub fn token(&self) -> String {
        issue(&self.claims, &self.secret, SESSION_TOKEN_TTL).unwrap()
    }

    /// Value for a request `Cookie` header, as a browser would send it.
    pub fn cookie_header(&self) -> (axum::http::HeaderName, HeaderValue) {
        let value = format!("{TOKEN_COOKIE}={}", self.token());
        (COOKIE, HeaderValue::from_str(&value).unwrap())
    }
}
