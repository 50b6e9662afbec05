// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub resolver: ResolverConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub backlog: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            backlog: DEFAULT_BACKLOG,
        }
    }
}

/// Pending connection queue length for the listening socket
pub const DEFAULT_BACKLOG: i32 = 128;

/// Module resolution configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ResolverConfig {
    /// Trusted root every resolved file must stay within
    pub root: String,
    /// Name of the cookie carrying the module context
    pub context_cookie: String,
    /// Document root served as-is before module resolution kicks in
    pub public_dir: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root: "node_modules".to_string(),
            context_cookie: "module_context".to_string(),
            public_dir: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Event log file path (optional, stdout if not set)
    pub file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub server_name: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
        }
    }
}

pub fn default_server_name() -> String {
    format!("modserve/{}", env!("CARGO_PKG_VERSION"))
}
