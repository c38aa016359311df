/// Configuration management for vidtube-service
///
/// All settings load from environment variables with development defaults,
/// grouped into per-concern sections.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Access-token verification
    pub auth: AuthConfig,
    /// External media store (S3)
    pub storage: StorageConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// Connection acquisition timeout
    pub acquire_timeout_secs: u64,
}

/// Access-token verification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider
    pub access_token_secret: String,
}

/// External media store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket name
    pub bucket: String,
    /// Optional custom endpoint (MinIO / localstack)
    pub endpoint: Option<String>,
    /// Public base URL for stored objects
    pub public_base_url: String,
    /// Upper bound on any single store round-trip
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let access_token_secret = match std::env::var("ACCESS_TOKEN_SECRET") {
            Ok(value) if !value.trim().is_empty() => value,
            _ if app_env.eq_ignore_ascii_case("production") => {
                return Err("ACCESS_TOKEN_SECRET must be set in production".to_string())
            }
            _ => "dev-access-token-secret".to_string(),
        };

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("VIDTUBE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("VIDTUBE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/vidtube".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
                acquire_timeout_secs: std::env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            auth: AuthConfig {
                access_token_secret,
            },
            storage: StorageConfig {
                bucket: std::env::var("MEDIA_BUCKET")
                    .unwrap_or_else(|_| "vidtube-media".to_string()),
                endpoint: std::env::var("MEDIA_ENDPOINT").ok(),
                public_base_url: std::env::var("MEDIA_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "https://vidtube-media.s3.amazonaws.com".to_string()),
                request_timeout_secs: std::env::var("MEDIA_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            },
        })
    }
}
