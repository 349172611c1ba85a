//! Cookie transport for the session token.
//!
//! The token travels in a single `token` cookie. Browser clients call the API
//! cross-site with credentials, so the cookie is `SameSite=None` and therefore
//! must also be `Secure`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

/// Cookie name carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

fn token_cookie(value: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build()
}

/// Set the session cookie on the jar.
///
/// No `Max-Age`: the cookie lives for the browser session and the token's
/// embedded expiry bounds it server-side.
///
/// ```
/// use axum_extra::extract::cookie::{CookieJar, SameSite};
/// use cardoctor_auth_types::cookie::{attach_token, TOKEN_COOKIE};
///
/// let jar = attach_token(CookieJar::new(), "signed.jwt.value".to_string());
/// let cookie = jar.get(TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "signed.jwt.value");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), None);
/// assert_eq!(cookie.same_site(), Some(SameSite::None));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn attach_token(jar: CookieJar, token: String) -> CookieJar {
    jar.add(token_cookie(token))
}

/// Overwrite the session cookie with an empty, already-expired one.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use cardoctor_auth_types::cookie::{attach_token, clear_token, TOKEN_COOKIE};
///
/// let jar = attach_token(CookieJar::new(), "signed.jwt.value".to_string());
/// let jar = clear_token(jar);
/// let cookie = jar.get(TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_token(jar: CookieJar) -> CookieJar {
    let mut cookie = token_cookie(String::new());
    cookie.set_max_age(Duration::ZERO);
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    jar.add(cookie)
}

/// Read the session token, if any. An empty value counts as absent.
pub fn extract_token(jar: &CookieJar) -> Option<String> {
    jar.get(TOKEN_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
