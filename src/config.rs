use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use crate::error::BootstrapError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:blog.db";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Unprefixed environment keys picked up by [`Config::figment`].
const ENV_KEYS: &[&str] = &[
    "database_url",
    "port",
    "loglevel",
    "admin_username",
    "admin_password",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    /// Read from `BLOG_HOST`; a bare `HOST` is often a hostname set by the platform.
    pub host: String,
    /// Kept raw so only `serve` rejects a malformed value. No default.
    pub port: Option<Value>,
    pub loglevel: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: None,
            loglevel: "info".to_string(),
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the optional TOML file, then the process environment.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::raw().only(ENV_KEYS))
            .merge(Env::prefixed("BLOG_").only(&["host"]))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BootstrapError> {
        Ok(Self::figment(path).extract()?)
    }

    /// Validate `host` and `port` for the server. Provisioning never calls this.
    pub fn listen_addr(&self) -> Result<SocketAddr, BootstrapError> {
        let raw = self.port.as_ref().ok_or(BootstrapError::MissingPort)?;
        let port = parse_port(raw).ok_or_else(|| BootstrapError::InvalidPort(describe(raw)))?;
        let host: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| BootstrapError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(host, port))
    }

    pub fn uses_default_admin_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

/// Env and TOML numbers arrive as numbers, quoted values as strings.
fn parse_port(raw: &Value) -> Option<u16> {
    match raw {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn describe(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_env_or_file() {
        Jail::expect_with(|_jail| {
            let cfg: Config = Config::figment("blog.toml").extract()?;
            assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
            assert_eq!(cfg.host, DEFAULT_HOST);
            assert_eq!(cfg.port, None);
            assert_eq!(cfg.admin_username, "admin");
            assert!(cfg.uses_default_admin_password());
            Ok(())
        });
    }

    #[test]
    fn port_is_read_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "8080");
            let cfg: Config = Config::figment("blog.toml").extract()?;
            let addr = cfg.listen_addr().expect("port is set");
            assert_eq!(addr.to_string(), "0.0.0.0:8080");
            Ok(())
        });
    }

    #[test]
    fn non_numeric_port_loads_but_cannot_listen() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "not-a-port");
            let cfg: Config = Config::figment("blog.toml").extract()?;
            match cfg.listen_addr() {
                Err(BootstrapError::InvalidPort(raw)) => assert_eq!(raw, "not-a-port"),
                other => panic!("expected invalid port, got {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn out_of_range_port_cannot_listen() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "70000");
            let cfg: Config = Config::figment("blog.toml").extract()?;
            assert!(matches!(
                cfg.listen_addr(),
                Err(BootstrapError::InvalidPort(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn missing_port_is_reported() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.listen_addr(),
            Err(BootstrapError::MissingPort)
        ));
    }

    #[test]
    fn quoted_port_in_toml_is_accepted() {
        let cfg = Config {
            port: Some(Value::from("3000")),
            ..Config::default()
        };
        assert_eq!(cfg.listen_addr().expect("valid port").port(), 3000);
    }

    #[test]
    fn platform_host_variable_is_ignored() {
        Jail::expect_with(|jail| {
            jail.set_env("HOST", "web-1.internal");
            jail.set_env("PORT", "8080");
            let cfg: Config = Config::figment("blog.toml").extract()?;
            assert_eq!(cfg.host, DEFAULT_HOST);
            assert!(cfg.listen_addr().is_ok());
            Ok(())
        });
    }

    #[test]
    fn blog_host_must_be_an_ip_address() {
        Jail::expect_with(|jail| {
            jail.set_env("BLOG_HOST", "127.0.0.1");
            jail.set_env("PORT", "8080");
            let cfg: Config = Config::figment("blog.toml").extract()?;
            assert_eq!(cfg.listen_addr().expect("valid").to_string(), "127.0.0.1:8080");

            jail.set_env("BLOG_HOST", "web-1.internal");
            let cfg: Config = Config::figment("blog.toml").extract()?;
            assert!(matches!(
                cfg.listen_addr(),
                Err(BootstrapError::InvalidHost(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "blog.toml",
                r#"
                database_url = "sqlite:from-file.db"
                port = 3000
                admin_password = "s3cret"
                "#,
            )?;
            jail.set_env("PORT", "4000");
            let cfg: Config = Config::figment("blog.toml").extract()?;
            assert_eq!(cfg.database_url, "sqlite:from-file.db");
            assert_eq!(cfg.listen_addr().expect("valid port").port(), 4000);
            assert!(!cfg.uses_default_admin_password());
            Ok(())
        });
    }
}
