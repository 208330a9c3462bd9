use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings shared by the server and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    /// Default `EnvFilter` directive when `RUST_LOG` is not set.
    pub log_level: String,
    /// Upper bound for a single page fetch, including the body download.
    pub render_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Backoff before the n-th retry is `retry_backoff_base_secs * 2^(n-1)`.
    pub retry_backoff_base_secs: u64,
    /// Server-wide cap on in-flight page fetches. Always at least 1.
    pub max_concurrent_renders: usize,
}
