use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha256};

use crate::db::AccountStorage;
use crate::handlers;

/// Shared state for every route handler: the storage layer plus the
/// key the private cookie jar encrypts session cookies with.
#[derive(Clone)]
pub struct VaultState {
    pub storage: AccountStorage,
    key: Key,
    pub secure_cookies: bool,
}

impl VaultState {
    pub fn new(storage: AccountStorage, session_secret: &str, insecure_cookie: bool) -> Self {
        // Key::derive_from wants at least 32 bytes of master key; the
        // configured secret may be shorter, so stretch it first.
        let digest = Sha256::digest(session_secret.as_bytes());
        Self {
            storage,
            key: Key::derive_from(digest.as_slice()),
            secure_cookies: !insecure_cookie,
        }
    }
}

impl FromRef<VaultState> for Key {
    fn from_ref(state: &VaultState) -> Key {
        state.key.clone()
    }
}

pub fn vault_router(state: VaultState) -> Router {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route(
            "/login",
            get(handlers::pages::login_form).post(handlers::pages::login),
        )
        .route("/logout", get(handlers::pages::logout))
        .route("/api/wallet-data", get(handlers::wallet::wallet_data))
        .route(
            "/api/save-wallet-data",
            post(handlers::wallet::save_wallet_data),
        )
        .with_state(state)
}
