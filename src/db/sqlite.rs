use std::str::FromStr;

use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::auth::password;
use crate::db::models::UserRow;
use crate::db::schema::SQLITE_INIT;
use crate::error::VaultError;

pub type SqlitePool = Pool<Sqlite>;

/// Outcome of a user creation attempt. Duplicates are an expected
/// condition, not an error, and never touch the existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateUser {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteUser {
    Deleted,
    NotFound,
}

#[derive(Clone)]
pub struct AccountStorage {
    pool: SqlitePool,
}

impl AccountStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open (creating the file if needed) and initialize the schema.
    pub async fn connect(database_url: &str) -> Result<Self, VaultError> {
        let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), VaultError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Check that `username` exists and `password` matches its hash.
    /// An absent user and a wrong password are indistinguishable.
    pub async fn verify_user(&self, username: &str, pass: &str) -> Result<bool, VaultError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT password FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match row {
            Some((hash,)) => password::verify(pass, &hash),
            None => false,
        })
    }

    /// Insert a new user with a freshly salted password hash.
    pub async fn create_user(&self, username: &str, pass: &str) -> Result<CreateUser, VaultError> {
        let hash = password::hash(pass)?;
        let res = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(hash)
            .execute(&self.pool)
            .await;
        match res {
            Ok(_) => Ok(CreateUser::Created),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(CreateUser::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_user(&self, username: &str) -> Result<DeleteUser, VaultError> {
        let res = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() > 0 {
            Ok(DeleteUser::Deleted)
        } else {
            Ok(DeleteUser::NotFound)
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserRow>, VaultError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT id, username FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Fetch the stored wallet document for `username`. A user that has
    /// never saved one (missing row, NULL, or the empty `{}` the column
    /// defaults to) gets the default document; it is not persisted here.
    pub async fn wallet_data(&self, username: &str) -> Result<Value, VaultError> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT wallet_data FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        match row.and_then(|(doc,)| doc) {
            Some(raw) if !raw.trim().is_empty() => {
                let doc: Value = serde_json::from_str(&raw)?;
                match doc.as_object() {
                    Some(map) if map.is_empty() => Ok(default_wallet_data()),
                    _ => Ok(doc),
                }
            }
            _ => Ok(default_wallet_data()),
        }
    }

    /// Replace the stored wallet document wholesale. No schema
    /// validation; the document is opaque to the store.
    pub async fn save_wallet_data(&self, username: &str, doc: &Value) -> Result<(), VaultError> {
        let raw = serde_json::to_string(doc)?;
        sqlx::query("UPDATE users SET wallet_data = ? WHERE username = ?")
            .bind(raw)
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// The document served before a user has saved anything.
pub fn default_wallet_data() -> Value {
    serde_json::json!({
        "balance": 0,
        "solBalance": 0,
        "solPrice": 200,
        "refreshCount": 0,
        "refreshGoal": 3,
        "newBalance": 1000,
        "previousBalance": 0
    })
}
