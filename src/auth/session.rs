use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};

use crate::error::VaultError;

const SESSION_COOKIE: &str = "session";

/// Bind `username` to the client by issuing the session cookie.
/// The jar encrypts and authenticates the value, so the cookie is the
/// whole session: there is no server-side session table.
pub fn issue(jar: PrivateCookieJar, username: &str, secure: bool) -> PrivateCookieJar {
    jar.add(build_cookie(username.to_owned(), secure))
}

/// Extract the authenticated username, if the request carries a valid
/// session cookie. Tampered or missing cookies yield `None`.
pub fn current(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Clear the session binding.
pub fn revoke(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

fn build_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Extractor for API routes: yields the session's username or rejects
/// with a 401 JSON error.
#[derive(Debug, Clone)]
pub struct SessionUser(pub String);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = VaultError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| VaultError::NotAuthenticated)?;
        current(&jar).map(Self).ok_or(VaultError::NotAuthenticated)
    }
}
