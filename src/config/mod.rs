// Configuration module entry point
// Loads the static process configuration and builds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ResolverConfig, ServerConfig,
};

/// Config file looked up when no path is passed on the command line
pub const DEFAULT_CONFIG_PATH: &str = "modserve";

impl Config {
    /// Load configuration using the first CLI argument as the file path
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional)
    ///
    /// Environment variables prefixed with `MODSERVE_` override file values,
    /// using `__` between section and key (`MODSERVE_RESOLVER__ROOT`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("MODSERVE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.backlog", types::DEFAULT_BACKLOG)?
            .set_default("resolver.root", "node_modules")?
            .set_default("resolver.context_cookie", "module_context")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", types::default_server_name())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/modserve-test-config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.resolver.root, "node_modules");
        assert_eq!(cfg.resolver.context_cookie, "module_context");
        assert!(cfg.resolver.public_dir.is_none());
        assert!(cfg.logging.file.is_none());
        assert!(cfg.http.server_name.starts_with("modserve/"));
        assert_eq!(cfg.server.backlog, types::DEFAULT_BACKLOG);
        assert_eq!(cfg.server.backlog, ServerConfig::default().backlog);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9001\n\n[resolver]\nroot = \"/srv/deps\"\ncontext_cookie = \"ctx\"\npublic_dir = \"www\"\n\n[logging]\nfile = \"logs/events.log\""
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.resolver.root, "/srv/deps");
        assert_eq!(cfg.resolver.context_cookie, "ctx");
        assert_eq!(cfg.resolver.public_dir.as_deref(), Some("www"));
        assert_eq!(cfg.logging.file.as_deref(), Some("logs/events.log"));
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::default();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);

        let mut bad = Config::default();
        bad.server.host = "not an address".to_string();
        assert!(bad.get_socket_addr().is_err());
    }
}
