// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, HttpConfig, LogLevel};

/// Config file used when no path is given on the command line (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `SKILLHUB_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "SKILLHUB";

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

impl Config {
    /// Load configuration from the given file path (extension optional),
    /// falling back to built-in defaults for anything it does not set.
    /// Environment variables override both.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Built-in defaults only, no file or environment sources
    #[cfg(test)]
    pub fn defaults() -> Result<Self, config::ConfigError> {
        with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn with_defaults(builder: Builder) -> Result<Builder, config::ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("storage.skills_dir", "skills")?
        .set_default("storage.skill_file", "SKILL.md")?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default(
            "http.server_name",
            concat!("skillhub/", env!("CARGO_PKG_VERSION")),
        )?
        .set_default("http.enable_cors", true)?
        .set_default("http.max_body_size", 10_485_760) // 10MB
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.storage.skills_dir, Path::new("skills"));
        assert_eq!(cfg.storage.skill_file, "SKILL.md");
        assert_eq!(cfg.logging.level, LogLevel::Info);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert!(cfg.http.server_name.starts_with("skillhub/"));
        assert_eq!(cfg.performance.max_connections, None);
        assert_eq!(cfg.ui.dir, None);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("skillhub.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9123
workers = 2

[storage]
skills_dir = "/srv/skills"

[logging]
level = "debug"
access_log_format = "json"

[performance]
max_connections = 64

[ui]
dir = "dist"
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9123);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.storage.skills_dir, Path::new("/srv/skills"));
        assert_eq!(cfg.storage.skill_file, "SKILL.md");
        assert_eq!(cfg.logging.level, LogLevel::Debug);
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.performance.max_connections, Some(64));
        assert_eq!(cfg.ui.dir.as_deref(), Some(Path::new("dist")));
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:9123".parse().unwrap()
        );
    }

    #[test]
    fn test_environment_overrides_file() {
        // Keys no other loading test asserts on, since the environment is process-wide
        const SERVER_NAME_VAR: &str = "SKILLHUB_HTTP__SERVER_NAME";
        const READ_TIMEOUT_VAR: &str = "SKILLHUB_PERFORMANCE__READ_TIMEOUT";

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("env.toml");
        std::fs::write(
            &path,
            "[http]\nserver_name = \"from-file\"\n\n[performance]\nread_timeout = 5\n",
        )
        .unwrap();

        std::env::set_var(SERVER_NAME_VAR, "from-env/2.0");
        std::env::set_var(READ_TIMEOUT_VAR, "12");
        let loaded = Config::load_from(path.to_str().unwrap());
        std::env::remove_var(SERVER_NAME_VAR);
        std::env::remove_var(READ_TIMEOUT_VAR);

        let cfg = loaded.unwrap();
        assert_eq!(cfg.http.server_name, "from-env/2.0");
        assert_eq!(cfg.performance.read_timeout, 12);
        assert_eq!(cfg.performance.write_timeout, 30);
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[logging]\nlevel = \"chatty\"\n").unwrap();

        assert!(Config::load_from(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_invalid_host_is_reported() {
        let mut cfg = Config::defaults().unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
