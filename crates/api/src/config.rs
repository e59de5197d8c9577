use crate::auth::jwt::JwtConfig;

/// Runtime configuration, read once at startup.
///
/// Every knob has a local-development default; production overrides them via
/// the environment. Malformed values panic during startup rather than being
/// silently replaced.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default `0.0.0.0`).
    pub host: String,
    /// Bind port (default `3000`).
    pub port: u16,
    /// Allowed CORS origins, comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds (default `30`).
    pub request_timeout_secs: u64,
    /// Token signing secret and lifetimes.
    pub jwt: JwtConfig,
    /// Chat provider; `None` disables the assistant endpoint.
    pub chat: Option<ChatConfig>,
}

/// Connection details for the OpenAI-compatible chat provider.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Provider base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token sent with every provider request.
    pub api_key: String,
    /// Model name passed in the completion request.
    pub model: String,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `CHAT_API_KEY`         | unset (chat disabled)      |
    /// | `CHAT_API_BASE_URL`    | `https://api.openai.com/v1`|
    /// | `CHAT_MODEL`           | `gpt-4o-mini`              |
    pub fn from_env() -> Self {
        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");
        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            chat: ChatConfig::from_env(),
        }
    }
}

impl ChatConfig {
    /// `None` when `CHAT_API_KEY` is unset, so deployments without a provider
    /// simply run with the assistant disabled.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("CHAT_API_KEY").ok()?;
        Some(Self {
            base_url: env_or("CHAT_API_BASE_URL", "https://api.openai.com/v1"),
            api_key,
            model: env_or("CHAT_MODEL", "gpt-4o-mini"),
        })
    }
}
