//! Configuration management for the directory API.
//!
//! All settings come from command-line arguments, with environment variable
//! fallbacks. The database variables keep the names used by the App Engine
//! deployment.
//!
//! # Environment Variables
//!
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 8080)
//! - `CLOUDSQL_CONNECTION_NAME` - Cloud SQL instance `project:region:instance`
//! - `CLOUDSQL_USER` - Database user
//! - `CLOUDSQL_PASSWORD` - Database password (may be empty)
//! - `CLOUDSQL_SOCKET_PREFIX` - Directory holding Cloud SQL sockets (default: /cloudsql)
//! - `CLOUDSQL_DB_NAME` - Database name (default: antivirus)
//! - `DATABASE_URL` - `mysql://` URL, replaces the socket settings when set
//! - `ADMIN_USER` / `ADMIN_PASSWORD` - Basic credentials for `/getOrg`
//! - `CORS_CREDENTIALED_ORIGINS` - Origins allowed to send credentials (comma-separated)
//! - `REDACT_FIELDS` - Fields hidden when an organization hides its contact details

use std::time::Duration;

use clap::Parser;

use crate::directory::{RedactField, RedactionPolicy};
use crate::server::auth::DEFAULT_REALM;
use crate::store::{DEFAULT_MAX_CONNECTIONS, DEFAULT_QUERY_TIMEOUT};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default directory containing Cloud SQL unix sockets.
pub const DEFAULT_SOCKET_PREFIX: &str = "/cloudsql";

/// Default database name.
pub const DEFAULT_DB_NAME: &str = "antivirus";

/// Fields redacted by default.
pub const DEFAULT_REDACT_FIELDS: &str = "address,coordinates";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Antivirus directory API.
///
/// Serves verified organizations and quarantine buildings from Cloud SQL.
#[derive(Parser, Debug, Clone)]
#[command(name = "antivirus-api")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Database Configuration
    // =========================================================================
    /// Cloud SQL instance connection name (`project:region:instance`).
    #[arg(long, env = "CLOUDSQL_CONNECTION_NAME")]
    pub connection_name: Option<String>,

    /// Database user.
    #[arg(long, env = "CLOUDSQL_USER")]
    pub db_user: Option<String>,

    /// Database password. May be empty.
    #[arg(long, default_value = "", env = "CLOUDSQL_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Directory containing the Cloud SQL unix sockets.
    #[arg(long, default_value = DEFAULT_SOCKET_PREFIX, env = "CLOUDSQL_SOCKET_PREFIX")]
    pub socket_prefix: String,

    /// Database name.
    #[arg(long, default_value = DEFAULT_DB_NAME, env = "CLOUDSQL_DB_NAME")]
    pub db_name: String,

    /// MySQL URL for TCP connections (local development).
    ///
    /// When set, the Cloud SQL socket settings are ignored.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS, env = "DB_MAX_CONNECTIONS")]
    pub max_connections: u32,

    /// Per-query timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_QUERY_TIMEOUT.as_secs(), env = "DB_QUERY_TIMEOUT_SECS")]
    pub query_timeout_secs: u64,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// User name accepted on the organization endpoint.
    #[arg(long, env = "ADMIN_USER")]
    pub admin_user: String,

    /// Password accepted on the organization endpoint.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// Realm sent in the Basic authentication challenge.
    #[arg(long, default_value = DEFAULT_REALM, env = "AUTH_REALM")]
    pub auth_realm: String,

    // =========================================================================
    // Response Configuration
    // =========================================================================
    /// Origins allowed to send credentialed cross-origin requests (comma-separated).
    ///
    /// Every origin may send plain cross-origin requests.
    #[arg(long, env = "CORS_CREDENTIALED_ORIGINS", value_delimiter = ',')]
    pub cors_credentialed_origins: Vec<String>,

    /// Fields hidden on organizations that hide their contact details
    /// (comma-separated: address, coordinates, contact-person, email).
    #[arg(
        long,
        env = "REDACT_FIELDS",
        value_delimiter = ',',
        default_value = DEFAULT_REDACT_FIELDS
    )]
    pub redact_fields: Vec<RedactField>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_none() {
            if self.connection_name.as_deref().map_or(true, str::is_empty) {
                return Err(
                    "Cloud SQL connection name is required. \
                     Set --connection-name or CLOUDSQL_CONNECTION_NAME, or use --database-url"
                        .to_string(),
                );
            }
            if self.db_user.as_deref().map_or(true, str::is_empty) {
                return Err(
                    "Database user is required. Set --db-user or CLOUDSQL_USER, or use --database-url"
                        .to_string(),
                );
            }
        }

        if self.admin_user.is_empty() || self.admin_password.is_empty() {
            return Err(
                "Admin credentials must not be empty. Set ADMIN_USER and ADMIN_PASSWORD"
                    .to_string(),
            );
        }

        if self.max_connections == 0 {
            return Err("max_connections must be greater than 0".to_string());
        }

        if self.query_timeout_secs == 0 {
            return Err("query_timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn redaction_policy(&self) -> RedactionPolicy {
        RedactionPolicy::new(self.redact_fields.iter().copied())
    }

    /// Describe the database target for logs. Never includes the password.
    pub fn database_target(&self) -> String {
        match &self.database_url {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!(
                "{}/{} (db: {}, user: {})",
                self.socket_prefix.trim_end_matches('/'),
                self.connection_name.as_deref().unwrap_or(""),
                self.db_name,
                self.db_user.as_deref().unwrap_or("")
            ),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
