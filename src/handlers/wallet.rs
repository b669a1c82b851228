use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::{Value, json};

use crate::auth::SessionUser;
use crate::error::VaultError;
use crate::router::VaultState;

/// GET /api/wallet-data -> the session user's wallet document.
pub async fn wallet_data(
    State(state): State<VaultState>,
    SessionUser(username): SessionUser,
) -> Result<Json<Value>, VaultError> {
    let doc = state.storage.wallet_data(&username).await?;
    Ok(Json(doc))
}

/// POST /api/save-wallet-data -> replace the stored document wholesale.
/// The body is taken raw so a malformed payload surfaces as a 500 JSON
/// error instead of an extractor rejection.
pub async fn save_wallet_data(
    State(state): State<VaultState>,
    SessionUser(username): SessionUser,
    body: Bytes,
) -> Result<Json<Value>, VaultError> {
    let doc: Value = serde_json::from_slice(&body)?;
    state.storage.save_wallet_data(&username, &doc).await?;
    Ok(Json(json!({ "status": "success" })))
}
