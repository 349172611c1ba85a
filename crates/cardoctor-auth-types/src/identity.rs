//! Auth gate middleware and the identity it attaches to requests.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use http::HeaderMap;
use http::request::Parts;

use cardoctor_core::error::AppError;

use crate::cookie::extract_token;
use crate::token::{IdentityClaims, verify};

/// Verifies session cookies. Cheap to clone; holds only the signing secret.
#[derive(Clone)]
pub struct AuthGate {
    secret: Arc<str>,
}

impl AuthGate {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Resolve the caller's identity from request headers.
    ///
    /// Missing cookie and any verification failure are both
    /// [`AppError::Unauthorized`]; the reason is only logged.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<IdentityClaims, AppError> {
        let jar = CookieJar::from_headers(headers);
        let Some(token) = extract_token(&jar) else {
            tracing::debug!("rejecting request: no session token");
            return Err(AppError::Unauthorized);
        };

        match verify(&token, &self.secret) {
            Ok(info) => Ok(info.claims),
            Err(reason) => {
                tracing::debug!(%reason, "rejecting request: token verification failed");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// Middleware that admits only requests carrying a valid session cookie.
///
/// On success the decoded claims are stored as a [`RequestIdentity`] request
/// extension before the next stage runs. Install per route with
/// `route_layer(axum::middleware::from_fn_with_state(gate, require_token))`.
pub async fn require_token(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = gate.authenticate(request.headers())?;
    request.extensions_mut().insert(RequestIdentity(claims));
    Ok(next.run(request).await)
}

/// Identity of a caller admitted by [`require_token`].
///
/// Extracting it on a route without the gate yields 401.
#[derive(Debug, Clone)]
pub struct RequestIdentity(pub IdentityClaims);

impl RequestIdentity {
    pub fn email(&self) -> Option<&str> {
        self.0.email()
    }
}

impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // Read synchronously and hand back a 'static future; see axum-core 0.5's
    // `fn -> impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parts.extensions.get::<RequestIdentity>().cloned();
        async move { identity.ok_or(AppError::Unauthorized) }
    }
}
