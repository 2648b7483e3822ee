/*!
 * Configuration Module
 *
 * Handles application configuration loading from environment variables
 * and provides structured access to configuration values.
 */

use std::time::Duration;

use chrono_tz::Tz;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Booking engine configuration
    pub booking: BookingConfig,
    /// Platform operator credentials
    pub super_admin: SuperAdminConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
    /// Environment (development, production)
    pub environment: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection acquire timeout
    pub acquire_timeout: Duration,
    /// Idle connection timeout
    pub idle_timeout: Duration,
    /// Maximum connection lifetime
    pub max_lifetime: Duration,
}

/// Booking engine configuration
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Step of the candidate-slot grid in minutes
    pub slot_grid_minutes: u32,
    /// Business timezone assigned to newly created salons
    pub default_timezone: Tz,
}

/// Platform operator (super-admin) credentials.
/// SECURITY: loaded from environment variables only, never persisted.
#[derive(Clone)]
pub struct SuperAdminConfig {
    /// Super-admin login name
    pub username: String,
    /// Super-admin password
    password: String,
}

impl SuperAdminConfig {
    /// Build the credential pair (used at load time and by test harnesses)
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Get the super-admin password
    /// This method exists to make password access explicit and auditable
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Custom Debug implementation to prevent password leakage in logs
impl std::fmt::Debug for SuperAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperAdminConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing
    /// or contain invalid values.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let default_timezone: Tz = std::env::var("DEFAULT_TIMEZONE")
            .unwrap_or_else(|_| "Europe/Moscow".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("DEFAULT_TIMEZONE is not a valid IANA zone: {}", e))?;

        let config = Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .unwrap_or(8000),
                environment: std::env::var("ENVIRONMENT")
                    .unwrap_or_else(|_| "development".to_string()),
            },

            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .unwrap_or(20),
                min_connections: std::env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                acquire_timeout: Duration::from_secs(
                    std::env::var("DATABASE_CONNECT_TIMEOUT")
                        .unwrap_or_else(|_| "30".to_string())
                        .parse()
                        .unwrap_or(30),
                ),
                idle_timeout: Duration::from_secs(
                    std::env::var("DATABASE_IDLE_TIMEOUT")
                        .unwrap_or_else(|_| "600".to_string())
                        .parse()
                        .unwrap_or(600),
                ),
                max_lifetime: Duration::from_secs(
                    std::env::var("DATABASE_MAX_LIFETIME")
                        .unwrap_or_else(|_| "1800".to_string())
                        .parse()
                        .unwrap_or(1800),
                ),
            },

            booking: BookingConfig {
                slot_grid_minutes: std::env::var("SLOT_GRID_MINUTES")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .unwrap_or(15)
                    .max(1),
                default_timezone,
            },

            super_admin: SuperAdminConfig::new(
                std::env::var("SUPER_ADMIN_USERNAME")
                    .map_err(|_| anyhow::anyhow!("SUPER_ADMIN_USERNAME must be set"))?,
                std::env::var("SUPER_ADMIN_PASSWORD")
                    .map_err(|_| anyhow::anyhow!("SUPER_ADMIN_PASSWORD must be set"))?,
            ),
        };

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_debug_redacts_password() {
        let cfg = SuperAdminConfig::new("root", "hunter2");
        let rendered = format!("{:?}", cfg);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_default_timezone_parses() {
        let tz: Tz = "Europe/Moscow".parse().unwrap();
        assert_eq!(tz.name(), "Europe/Moscow");
    }
}
