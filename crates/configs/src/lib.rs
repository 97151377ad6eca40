use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3031,
            worker_threads: Some(4),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Filesystem path of the SQLite store. Resolution order: config file,
    /// then `DATABASE_PATH`, then `./database.sqlite`.
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    30
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Fill the store path from the environment when the config file left it
    /// empty, then fall back to the default location.
    pub fn normalize_from_env(&mut self) {
        if self.path.trim().is_empty() {
            if let Ok(path) = std::env::var("DATABASE_PATH") {
                self.path = path;
            }
        }
        if self.path.trim().is_empty() {
            self.path = "./database.sqlite".to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!(
                "database.path is empty; set it in config.toml or via DATABASE_PATH"
            ));
        }
        if self.max_connections == 0 {
            return Err(anyhow!("database.max_connections must be >= 1"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!("database.connect_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }

    /// SQLx connection URL for the store. `mode=rwc` matches the original
    /// driver behavior of creating the file when it does not exist.
    pub fn connection_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().expect("defaults should validate");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 3031);
        assert!(!cfg.database.path.is_empty());
    }

    #[test]
    fn toml_values_override_defaults() {
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            path = "data/store.sqlite"
            max_connections = 2
            "#,
        )
        .expect("parse");
        cfg.normalize_and_validate().expect("validate");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.max_connections, 2);
        assert_eq!(
            cfg.database.connection_url(),
            "sqlite://data/store.sqlite?mode=rwc"
        );
    }

    #[test]
    fn rejects_port_zero() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_zero_max_connections() {
        let cfg = DatabaseConfig {
            path: "store.sqlite".into(),
            max_connections: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
