use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub github: GithubConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    // Keep-alive duration in seconds
    pub keep_alive_seconds: u64,
    // Client timeout for reading payload/body in seconds
    pub client_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: i64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Service token sent as `Authorization: token <...>`; unset means
    /// unauthenticated requests (lower rate limit, still functional).
    pub token: Option<String>,
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                workers: env::var("WORKERS")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse()
                    .expect("WORKERS must be a valid number"),
                keep_alive_seconds: env::var("KEEP_ALIVE_SECONDS")
                    .unwrap_or_else(|_| "75".to_string())
                    .parse()
                    .expect("KEEP_ALIVE_SECONDS must be a valid number"),
                client_timeout_seconds: env::var("CLIENT_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("CLIENT_TIMEOUT_SECONDS must be a valid number"),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
                jwt_expiration_seconds: env::var("JWT_EXPIRATION_SECONDS")
                    .unwrap_or_else(|_| "360000".to_string())
                    .parse()
                    .expect("JWT_EXPIRATION_SECONDS must be a valid number"),
                bcrypt_cost: env::var("BCRYPT_COST")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("BCRYPT_COST must be a valid number"),
            },
            github: GithubConfig {
                token: env::var("GITHUB_TOKEN").ok(),
                api_base_url: env::var("GITHUB_API_BASE_URL")
                    .unwrap_or_else(|_| "https://api.github.com".to_string()),
                request_timeout_seconds: env::var("GITHUB_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("GITHUB_TIMEOUT_SECONDS must be a valid number"),
            },
            security: SecurityConfig {
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            logging: LoggingConfig {
                level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
        })
    }
}
