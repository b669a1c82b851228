use std::sync::LazyLock;

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Runtime configuration, resolved once at startup.
/// Every field can be overridden through a `VAULT_`-prefixed
/// environment variable (e.g. `VAULT_DATABASE_URL`, `VAULT_PORT`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Secret the session cookie key is derived from. The default
    /// mirrors the legacy deployment and should be overridden via
    /// `VAULT_SESSION_SECRET` anywhere that matters.
    pub session_secret: String,
    /// Drop the `Secure` attribute on the session cookie, for plain
    /// HTTP deployments behind no TLS terminator.
    pub insecure_cookie: bool,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:accs.db".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            session_secret: "phantom_secret_key_123".to_string(),
            insecure_cookie: false,
            loglevel: "info".to_string(),
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("VAULT_"))
        .extract()
        .expect("invalid configuration")
});
