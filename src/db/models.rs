use serde::Serialize;
use sqlx::FromRow;

/// The subset of a user row exposed outside the storage layer.
/// The password hash and wallet document never leave `sqlite.rs`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
}
