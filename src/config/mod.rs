use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub jwt: JwtConfig,
    pub store: StoreConfig,
    pub rate_limit: RateLimitConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub capacity: u32,
    pub refill_per_sec: u32,
    pub sweep_interval_secs: u64,
    pub idle_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // JWT overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.jwt.issuer = v;
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.jwt.audience = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.jwt.expiry_hours = v.parse().unwrap_or(self.jwt.expiry_hours);
        }

        // Store overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.store.url = v;
        }
        if let Ok(v) = env::var("STORE_MAX_CONNECTIONS") {
            self.store.max_connections = v.parse().unwrap_or(self.store.max_connections);
        }

        // Rate limit overrides
        if let Ok(v) = env::var("RATE_LIMIT_CAPACITY") {
            self.rate_limit.capacity = v.parse().unwrap_or(self.rate_limit.capacity);
        }
        if let Ok(v) = env::var("RATE_LIMIT_REFILL_PER_SEC") {
            self.rate_limit.refill_per_sec = v.parse().unwrap_or(self.rate_limit.refill_per_sec);
        }
        if let Ok(v) = env::var("RATE_LIMIT_SWEEP_INTERVAL_SECS") {
            self.rate_limit.sweep_interval_secs =
                v.parse().unwrap_or(self.rate_limit.sweep_interval_secs);
        }
        if let Ok(v) = env::var("RATE_LIMIT_IDLE_SECS") {
            self.rate_limit.idle_secs = v.parse().unwrap_or(self.rate_limit.idle_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            jwt: JwtConfig {
                secret: "dev-secret-change-me".to_string(),
                issuer: "estate-api".to_string(),
                audience: "estate-web".to_string(),
                expiry_hours: 2,
            },
            store: StoreConfig {
                url: "postgres://localhost/estate_db".to_string(),
                max_connections: 10,
            },
            rate_limit: RateLimitConfig {
                capacity: 100,
                refill_per_sec: 10,
                sweep_interval_secs: 60,
                idle_secs: 15 * 60,
            },
            security: SecurityConfig {
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            jwt: JwtConfig {
                // No baked-in secret outside development; must come from JWT_SECRET
                secret: String::new(),
                issuer: "estate-api".to_string(),
                audience: "estate-web".to_string(),
                expiry_hours: 2,
            },
            store: StoreConfig {
                url: String::new(),
                max_connections: 20,
            },
            rate_limit: RateLimitConfig {
                capacity: 100,
                refill_per_sec: 10,
                sweep_interval_secs: 60,
                idle_secs: 15 * 60,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            jwt: JwtConfig {
                secret: String::new(),
                issuer: "estate-api".to_string(),
                audience: "estate-web".to_string(),
                expiry_hours: 2,
            },
            store: StoreConfig {
                url: String::new(),
                max_connections: 50,
            },
            rate_limit: RateLimitConfig {
                capacity: 100,
                refill_per_sec: 10,
                sweep_interval_secs: 60,
                idle_secs: 15 * 60,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.rate_limit.capacity, 100);
        assert_eq!(config.rate_limit.refill_per_sec, 10);
        assert!(!config.jwt.secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.jwt.secret.is_empty());
        assert_eq!(config.jwt.expiry_hours, 2);
        assert_eq!(config.api.max_request_size_bytes, 2 * 1024 * 1024);
    }
}
