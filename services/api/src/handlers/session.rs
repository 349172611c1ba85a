use axum::{Json, body::Bytes, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use cardoctor_auth_types::cookie::{attach_token, clear_token};
use cardoctor_auth_types::token::{EncodingError, IdentityClaims, SESSION_TOKEN_TTL, issue};
use cardoctor_core::error::AppError;

use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionResponse {
    pub success: bool,
}

const SUCCESS: SessionResponse = SessionResponse { success: true };

fn encoding_error(e: EncodingError) -> AppError {
    match e {
        EncodingError::ReservedClaim(name) => {
            AppError::InvalidClaims(format!("claim `{name}` is reserved"))
        }
        EncodingError::Sign(e) => {
            AppError::Internal(anyhow::Error::new(e).context("sign session token"))
        }
    }
}

// ── POST /jwt ─────────────────────────────────────────────────────────────────

/// Sign the posted claims into a session token and set it as the `token` cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(claims): Json<Map<String, Value>>,
) -> Result<impl IntoResponse, AppError> {
    let claims = IdentityClaims::new(claims);
    let token = issue(&claims, &state.token_secret, SESSION_TOKEN_TTL).map_err(encoding_error)?;

    info!(email = ?claims.email(), "session token issued");
    Ok((attach_token(jar, token), Json(SUCCESS)))
}

// ── POST /logout ──────────────────────────────────────────────────────────────

/// Clear the `token` cookie. The body is optional and only logged.
pub async fn logout(jar: CookieJar, body: Bytes) -> impl IntoResponse {
    let email = serde_json::from_slice::<Map<String, Value>>(&body)
        .ok()
        .and_then(|claims| claims.get("email").and_then(Value::as_str).map(str::to_owned));

    info!(?email, "session cleared");
    (clear_token(jar), Json(SUCCESS))
}
