use serde::Deserialize;

/// Upper bound for `QR_TOKEN_TTL_SECS`: 30 days.
pub const MAX_QR_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL (e.g. sqlite://tapcard.db?mode=rwc, postgres://...)
    pub database_url: String,

    /// Shared secret used to verify identity tokens (HS256)
    pub jwt_secret: String,

    /// Lifetime in hours of identity tokens minted by [`crate::auth::create_token`] (default: 24)
    pub jwt_expiry_hours: u64,

    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 3000)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,

    /// How long an issued QR token stays valid, in seconds (default: 3600)
    pub qr_token_ttl_secs: u64,

    /// Emails promoted to admin on login.
    pub admin_emails: Vec<String>,

    /// Log output format: "text" (default) or "json"
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://tapcard.db?mode=rwc".to_string()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "tapcard-dev-secret-change-me".to_string()),
            jwt_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            qr_token_ttl_secs: std::env::var("QR_TOKEN_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600),
            admin_emails: parse_admin_emails(&std::env::var("ADMIN_EMAILS").unwrap_or_default()),
            log_format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
        })
    }

    /// Configuration used by the test harness: in-memory SQLite, fixed secret.
    pub fn for_tests() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret-key-for-testing".to_string(),
            jwt_expiry_hours: 24,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            environment: "test".to_string(),
            qr_token_ttl_secs: 3600,
            admin_emails: vec!["admin@tapcard.test".to_string()],
            log_format: "text".to_string(),
        }
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Check if logs should be emitted as JSON.
    pub fn is_json_logging(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Whether `email` is listed in `ADMIN_EMAILS` (case-insensitive).
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email.trim()))
    }

    /// QR token lifetime, clamped to `1..=MAX_QR_TOKEN_TTL_SECS` seconds.
    pub fn qr_token_ttl(&self) -> chrono::Duration {
        let secs = self.qr_token_ttl_secs.clamp(1, MAX_QR_TOKEN_TTL_SECS);
        chrono::Duration::seconds(secs as i64)
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Split a comma-separated email list, dropping blanks.
pub fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}
