use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server configuration
    pub server_port: u16,
    pub cors_allowed_origins: Vec<String>,

    // Database configuration
    pub database_server: String,
    pub database_port: u16,
    pub database_name: String,
    pub database_user: String,
    pub database_password: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connection_timeout_secs: u64,

    // Lock-wait budget for a transfer's own transaction (spec §4.3/§5:
    // exceeding this on the counter or lot row is `Contention`).
    pub transfer_lock_wait_ms: u64,

    // Logging
    pub enable_request_logging: bool,
    pub log_level: String,

    // Application info
    pub app_name: String,
    pub app_version: String,
    pub company_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Self {
            // Server configuration
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "7075".to_string())
                .parse()
                .expect("SERVER_PORT must be a valid port number"),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:6060,http://localhost:6061".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),

            // Database configuration
            database_server: env::var("DATABASE_SERVER")?,
            database_port: env::var("DATABASE_PORT")
                .unwrap_or_else(|_| "49381".to_string())
                .parse()
                .expect("DATABASE_PORT must be a valid port number"),
            database_name: env::var("DATABASE_NAME")?,
            database_user: env::var("DATABASE_USER")?,
            database_password: env::var("DATABASE_PASSWORD")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("DATABASE_MAX_CONNECTIONS must be a valid number"),
            database_min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .expect("DATABASE_MIN_CONNECTIONS must be a valid number"),
            database_connection_timeout_secs: env::var("DATABASE_CONNECTION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("DATABASE_CONNECTION_TIMEOUT_SECS must be a valid number"),

            transfer_lock_wait_ms: env::var("TRANSFER_LOCK_WAIT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("TRANSFER_LOCK_WAIT_MS must be a valid number"),

            // Logging
            enable_request_logging: env::var("ENABLE_REQUEST_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            // Application info
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "Bin Transfer Engine".to_string()),
            app_version: env::var("APP_VERSION").unwrap_or_else(|_| "1.0.0".to_string()),
            company_name: env::var("COMPANY_NAME")
                .unwrap_or_else(|_| "Newly Weds Foods Thailand".to_string()),
        })
    }

    pub fn database_connection_string(&self) -> String {
        format!(
            "server=tcp:{},{};database={};user={};password={};TrustServerCertificate=true",
            self.database_server,
            self.database_port,
            self.database_name,
            self.database_user,
            self.database_password
        )
    }
}
