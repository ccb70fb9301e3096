// Authentication configuration loaded from environment variables
// Decision: Missing JWT_SECRET falls back to a random per-process secret with a
// warning - safe for local development, useless for production (tokens do not
// survive a restart)

use std::time::Duration;

const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_EMAIL: &str = "admin@medical.com";
// change in production!
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens. Rotating it invalidates every
    /// outstanding token.
    pub secret: String,
    /// Token lifetime
    pub token_lifetime: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .finish()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
        }
    }
}

/// Default admin account ensured at startup
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            email: DEFAULT_ADMIN_EMAIL.to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!(
                    "JWT_SECRET not set; using a random per-process secret \
                     (tokens will not survive a restart)"
                );
                use rand::Rng;
                let bytes: [u8; 32] = rand::thread_rng().gen();
                hex::encode(bytes)
            });

        let token_lifetime = std::env::var("AUTH_TOKEN_LIFETIME_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);

        let admin = AdminConfig {
            username: std::env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string()),
            email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
            password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
        };

        Self {
            jwt: JwtConfig {
                secret,
                token_lifetime,
            },
            admin,
        }
    }
}
