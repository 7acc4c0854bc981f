use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory where generated profile pages are written and served from.
    pub profiles_dir: PathBuf,
    /// Path to the profile page HTML template.
    pub profile_template_path: PathBuf,
    /// Discord webhook URL for moderation notifications, if configured.
    pub discord_webhook_url: Option<String>,
    /// Max public submissions per client IP per window.
    pub rate_limit_max_per_window: u32,
    /// Length of the submission rate-limit window in seconds.
    pub rate_limit_window_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `HOST`                      | `0.0.0.0`                  |
    /// | `PORT`                      | `3000`                     |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `PROFILES_DIR`              | `profiles`                 |
    /// | `PROFILE_TEMPLATE_PATH`     | `templates/profile.html`   |
    /// | `DISCORD_WEBHOOK_URL`       | unset (delivery disabled)  |
    /// | `RATE_LIMIT_MAX_PER_WINDOW` | `5`                        |
    /// | `RATE_LIMIT_WINDOW_SECS`    | `3600`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let profiles_dir =
            PathBuf::from(std::env::var("PROFILES_DIR").unwrap_or_else(|_| "profiles".into()));

        let profile_template_path = PathBuf::from(
            std::env::var("PROFILE_TEMPLATE_PATH")
                .unwrap_or_else(|_| "templates/profile.html".into()),
        );

        let discord_webhook_url = std::env::var("DISCORD_WEBHOOK_URL")
            .ok()
            .filter(|s| !s.is_empty());

        let rate_limit_max_per_window: u32 = std::env::var("RATE_LIMIT_MAX_PER_WINDOW")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("RATE_LIMIT_MAX_PER_WINDOW must be a valid u32");

        let rate_limit_window_secs: u64 = std::env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("RATE_LIMIT_WINDOW_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            profiles_dir,
            profile_template_path,
            discord_webhook_url,
            rate_limit_max_per_window,
            rate_limit_window_secs,
            jwt,
        }
    }
}
