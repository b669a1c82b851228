//! SQL DDL for initializing the account storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `username` UNIQUE (creates an index implicitly)
/// - `password` holds an Argon2 PHC string, never plaintext
/// - `wallet_data` is an opaque JSON document serialized as text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    wallet_data TEXT DEFAULT '{}'
);
"#;
