//! Configuration handling for the MySQL MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment
//! variables. The `MYSQL_*` variables match the ones used by existing MySQL MCP
//! deployments so the binary can be dropped into the same client configuration.

use clap::{Parser, ValueEnum};
use sqlx::mysql::MySqlConnectOptions;
use std::time::Duration;

pub const DEFAULT_MYSQL_HOST: &str = "localhost";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_MYSQL_USER: &str = "root";

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

// Pool configuration defaults
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Connection pool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout_secs: u64,
    /// How long a request waits for a free connection before failing
    pub acquire_timeout_secs: u64,
    pub test_before_acquire: bool,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            test_before_acquire: true,
        }
    }
}

impl PoolOptions {
    /// Validate pool options and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("max_connections must be greater than 0".to_string());
        }
        if self.min_connections > self.max_connections {
            return Err(format!(
                "min_connections ({}) cannot exceed max_connections ({})",
                self.min_connections, self.max_connections
            ));
        }
        if self.acquire_timeout_secs == 0 {
            return Err("acquire_timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Configuration for the MySQL MCP Server.
#[derive(Clone, Parser)]
#[command(
    name = "mysql-mcp-server",
    about = "MCP server exposing MySQL query and schema tools to AI assistants",
    version,
    author
)]
pub struct Config {
    /// MySQL server host
    #[arg(long, default_value = DEFAULT_MYSQL_HOST, env = "MYSQL_HOST")]
    pub host: String,

    /// MySQL server port
    #[arg(long, default_value_t = DEFAULT_MYSQL_PORT, env = "MYSQL_PORT")]
    pub port: u16,

    /// MySQL user name
    #[arg(short, long, default_value = DEFAULT_MYSQL_USER, env = "MYSQL_USER")]
    pub user: String,

    /// MySQL password
    #[arg(long, default_value = "", env = "MYSQL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Default database. Unqualified statements and list_tables/describe_table
    /// without a `database` argument run against it.
    #[arg(short, long, env = "MYSQL_DATABASE")]
    pub database: Option<String>,

    /// Maximum connections in the pool
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS, env = "MYSQL_MAX_CONNECTIONS")]
    pub max_connections: u32,

    /// Connections kept open while idle
    #[arg(long, default_value_t = DEFAULT_MIN_CONNECTIONS, env = "MYSQL_MIN_CONNECTIONS")]
    pub min_connections: u32,

    /// Seconds to wait for a free pooled connection
    #[arg(long, default_value_t = DEFAULT_ACQUIRE_TIMEOUT_SECS, env = "MYSQL_ACQUIRE_TIMEOUT")]
    pub acquire_timeout: u64,

    /// Seconds before an idle pooled connection is closed
    #[arg(long, default_value_t = DEFAULT_IDLE_TIMEOUT_SECS, env = "MYSQL_IDLE_TIMEOUT")]
    pub idle_timeout: u64,

    /// Query timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_QUERY_TIMEOUT_SECS,
        env = "MCP_QUERY_TIMEOUT"
    )]
    pub query_timeout: u64,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output (disabled by default to avoid interfering with stdio transport)
    #[arg(long, env = "MCP_ENABLE_LOGS")]
    pub enable_logs: bool,
}

// Hand-written so the password never reaches logs or panic messages.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("pool_options", &self.pool_options())
            .field("query_timeout", &self.query_timeout)
            .field("transport", &self.transport)
            .field("http_host", &self.http_host)
            .field("http_port", &self.http_port)
            .field("mcp_endpoint", &self.mcp_endpoint)
            .field("log_level", &self.log_level)
            .field("json_logs", &self.json_logs)
            .field("enable_logs", &self.enable_logs)
            .finish()
    }
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            host: DEFAULT_MYSQL_HOST.to_string(),
            port: DEFAULT_MYSQL_PORT,
            user: DEFAULT_MYSQL_USER.to_string(),
            password: String::new(),
            database: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            idle_timeout: DEFAULT_IDLE_TIMEOUT_SECS,
            query_timeout: DEFAULT_QUERY_TIMEOUT_SECS,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            enable_logs: false,
        }
    }

    /// Default database, with an empty value treated as "none".
    pub fn default_database(&self) -> Option<&str> {
        self.database
            .as_deref()
            .map(str::trim)
            .filter(|db| !db.is_empty())
    }

    /// Pool options assembled from the individual flags.
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            idle_timeout_secs: self.idle_timeout,
            acquire_timeout_secs: self.acquire_timeout,
            test_before_acquire: true,
        }
    }

    /// Validate the configuration before anything connects.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.user.is_empty() {
            return Err("user must not be empty".to_string());
        }
        if self.query_timeout == 0 {
            return Err("query_timeout must be greater than 0".to_string());
        }
        self.pool_options().validate()
    }

    /// Build the driver connect options. The password is passed through
    /// unmodified and never rendered into a URL.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .charset("utf8mb4");
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }
        if let Some(db) = self.default_database() {
            options = options.database(db);
        }
        options
    }

    /// Get the query timeout as a Duration.
    pub fn query_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }

    /// `host:port` for log lines and error messages.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.host, DEFAULT_MYSQL_HOST);
        assert_eq!(config.port, 3306);
        assert_eq!(config.user, "root");
        assert_eq!(config.transport, TransportMode::Stdio);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_from_args() {
        let config = Config::try_parse_from([
            "mysql-mcp-server",
            "--host",
            "db.internal",
            "--port",
            "3307",
            "--user",
            "app",
            "--database",
            "shop",
            "--max-connections",
            "4",
        ])
        .unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 3307);
        assert_eq!(config.user, "app");
        assert_eq!(config.default_database(), Some("shop"));
        assert_eq!(config.pool_options().max_connections, 4);
    }

    #[test]
    fn test_empty_database_treated_as_none() {
        let config = Config {
            database: Some("  ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.default_database(), None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config {
            password: "hunter2".to_string(),
            ..Config::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_query_timeout_duration() {
        let config = Config {
            query_timeout: 60,
            ..Config::default()
        };
        assert_eq!(config.query_timeout_duration(), Duration::from_secs(60));
    }

    #[test]
    fn test_validate_rejects_zero_query_timeout() {
        let config = Config {
            query_timeout: 0,
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().contains("query_timeout"));
    }

    #[test]
    fn test_pool_options_defaults() {
        let opts = PoolOptions::default();
        assert_eq!(opts.max_connections, 10);
        assert_eq!(opts.min_connections, 1);
        assert_eq!(opts.idle_timeout(), Duration::from_secs(600));
        assert_eq!(opts.acquire_timeout(), Duration::from_secs(30));
        assert!(opts.test_before_acquire);
    }

    #[test]
    fn test_pool_options_validation_max_zero() {
        let opts = PoolOptions {
            max_connections: 0,
            min_connections: 0,
            ..PoolOptions::default()
        };
        assert!(opts.validate().unwrap_err().contains("max_connections"));
    }

    #[test]
    fn test_pool_options_validation_min_exceeds_max() {
        let opts = PoolOptions {
            max_connections: 5,
            min_connections: 10,
            ..PoolOptions::default()
        };
        let err = opts.validate().unwrap_err();
        assert!(err.contains("min_connections"));
        assert!(err.contains("cannot exceed"));
    }
}
