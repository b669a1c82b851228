use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

use phantom_vault::db::{AccountStorage, default_wallet_data};
use phantom_vault::router::{VaultState, vault_router};

async fn test_app(tag: &str) -> (Router, AccountStorage, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "phantom-vault-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let storage = AccountStorage::connect(&database_url)
        .await
        .expect("failed to open test database");

    let state = VaultState::new(storage.clone(), "test_session_secret", true);
    (vault_router(state), storage, temp_path)
}

async fn post_login(app: &Router, username: &str, password: &str) -> Response<axum::body::Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={username}&password={password}"
                )))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed")
}

fn session_cookie(resp: &Response<axum::body::Body>) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("no set-cookie header")
        .to_str()
        .expect("set-cookie was not utf-8")
        .split(';')
        .next()
        .expect("empty set-cookie header")
        .to_string()
}

async fn body_json(resp: Response<axum::body::Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

async fn body_string(resp: Response<axum::body::Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}

#[tokio::test]
async fn anonymous_api_calls_return_401() {
    let (app, _storage, temp_path) = test_app("anon-401").await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/wallet-data")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp).await,
        json!({ "error": "Not authenticated" })
    );

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/save-wallet-data")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"balance":1}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn login_issues_302_and_serves_default_document() {
    let (app, storage, temp_path) = test_app("login-default").await;
    storage.create_user("alice", "secret123").await.unwrap();

    let resp = post_login(&app, "alice", "secret123").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    let cookie = session_cookie(&resp);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/wallet-data")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, default_wallet_data());

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn save_replaces_document_wholesale() {
    let (app, storage, temp_path) = test_app("save-replace").await;
    storage.create_user("alice", "secret123").await.unwrap();

    let cookie = session_cookie(&post_login(&app, "alice", "secret123").await);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/save-wallet-data")
                .header(header::COOKIE, cookie.clone())
                .header("content-type", "application/json")
                .body(Body::from(r#"{"balance":500}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "status": "success" }));

    // Old fields are gone: a save is a full replace, not a merge.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/wallet-data")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, json!({ "balance": 500 }));

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn wrong_password_rerenders_login_without_cookie() {
    let (app, storage, temp_path) = test_app("bad-password").await;
    storage.create_user("alice", "secret123").await.unwrap();

    let resp = post_login(&app, "alice", "wrong").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let body = body_string(resp).await;
    assert!(body.contains("Invalid username or password"));

    let resp = post_login(&app, "nobody", "secret123").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn index_redirects_anonymous_to_login() {
    let (app, _storage, temp_path) = test_app("index-redirect").await;

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn index_renders_wallet_page_for_session_user() {
    let (app, storage, temp_path) = test_app("index-page").await;
    storage.create_user("alice", "secret123").await.unwrap();

    let cookie = session_cookie(&post_login(&app, "alice", "secret123").await);
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("alice"));
    assert!(body.contains("solPrice"));

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn logout_clears_session_cookie() {
    let (app, storage, temp_path) = test_app("logout").await;
    storage.create_user("alice", "secret123").await.unwrap();

    let cookie = session_cookie(&post_login(&app, "alice", "secret123").await);
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/logout")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
    // Removal cookie: empty value, immediate expiry.
    let removal = session_cookie(&resp);
    assert_eq!(removal, "session=");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn forged_session_cookie_is_rejected() {
    let (app, storage, temp_path) = test_app("forged-cookie").await;
    storage.create_user("alice", "secret123").await.unwrap();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/wallet-data")
                .header(header::COOKIE, "session=alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn malformed_save_body_returns_500() {
    let (app, storage, temp_path) = test_app("bad-body").await;
    storage.create_user("alice", "secret123").await.unwrap();

    let cookie = session_cookie(&post_login(&app, "alice", "secret123").await);
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/save-wallet-data")
                .header(header::COOKIE, cookie)
                .body(Body::from("this is not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert!(body.get("error").is_some());

    let _ = fs::remove_file(&temp_path);
}
