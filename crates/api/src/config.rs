use pioneer_events::NotifierConfig;

use crate::auth::jwt::JwtConfig;

/// Configuration of the notifier backend: the subscription API and the
/// indexer polling loop that runs next to it.
///
/// Everything has a local-development default except `JWT_SECRET`. The
/// notifier only runs when `INDEXER_URL` is set.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Origins of the forum front end allowed to call the subscription API.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for the notifier to stop, in seconds (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Verification of member bearer tokens.
    pub jwt: JwtConfig,
    /// Indexer polling; `None` when `INDEXER_URL` is unset.
    pub notifier: Option<NotifierConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:8080` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `5`                     |
    /// | `JWT_SECRET`                  | (required)              |
    /// | `JWT_EXPIRY_DAYS`             | `90`                    |
    /// | `INDEXER_URL`                 | (notifier disabled)     |
    /// | `NOTIFIER_POLL_INTERVAL_SECS` | `60`                    |
    /// | `NOTIFIER_START_BLOCK`        | `0`                     |
    /// | `NOTIFIER_PAGE_SIZE`          | `100`                   |
    ///
    /// # Panics
    ///
    /// Panics on unparseable numeric values so misconfiguration fails at
    /// startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8080".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            notifier: NotifierConfig::from_env(),
        }
    }
}
