use axum::Form;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::auth::session;
use crate::error::VaultError;
use crate::router::VaultState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET / -> wallet page for the session's user, or a redirect to the
/// login form for anonymous clients.
pub async fn index(
    State(state): State<VaultState>,
    jar: PrivateCookieJar,
) -> Result<Response, VaultError> {
    let Some(username) = session::current(&jar) else {
        return Ok(found("/login").into_response());
    };
    let doc = state.storage.wallet_data(&username).await?;
    Ok(Html(render_index(&username, &doc)).into_response())
}

pub async fn login_form() -> Html<String> {
    Html(render_login(None))
}

/// POST /login -> issue a session cookie and redirect home on valid
/// credentials; re-render the form with an error line otherwise.
pub async fn login(
    State(state): State<VaultState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, VaultError> {
    if state
        .storage
        .verify_user(&form.username, &form.password)
        .await?
    {
        info!(username = %form.username, "login succeeded");
        let jar = session::issue(jar, &form.username, state.secure_cookies);
        Ok((jar, found("/")).into_response())
    } else {
        info!(username = %form.username, "login rejected");
        Ok(Html(render_login(Some("Invalid username or password"))).into_response())
    }
}

/// GET /logout -> clear the session cookie and bounce to the form.
pub async fn logout(jar: PrivateCookieJar) -> Response {
    let jar = session::revoke(jar);
    (jar, found("/login")).into_response()
}

// axum's Redirect constructors emit 303/307/308; the login flow uses a
// plain 302 Found, so build it by hand.
fn found(location: &str) -> impl IntoResponse {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
}

fn render_index(username: &str, doc: &Value) -> String {
    let doc = serde_json::to_string_pretty(doc).unwrap_or_else(|_| "{}".to_string());
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Wallet</title></head>\n<body>\n\
         <h1>Wallet</h1>\n\
         <p>Signed in as <strong>{username}</strong> &mdash; <a href=\"/logout\">log out</a></p>\n\
         <pre id=\"wallet-data\">{doc}</pre>\n\
         </body>\n</html>\n"
    )
}

fn render_login(error: Option<&str>) -> String {
    let error_line = match error {
        Some(msg) => format!("<p class=\"error\">{msg}</p>\n"),
        None => String::new(),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Login</title></head>\n<body>\n\
         <h1>Login</h1>\n{error_line}\
         <form method=\"post\" action=\"/login\">\n\
         <input name=\"username\" placeholder=\"Username\" required>\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\" required>\n\
         <button type=\"submit\">Sign in</button>\n\
         </form>\n\
         </body>\n</html>\n"
    )
}
