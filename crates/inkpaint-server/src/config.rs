//! Environment configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Secret used when `JWT_SECRET` is not set. Fine for local development only.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT {0:?}")]
    InvalidPort(String),
}

/// Server settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub database_url: String,
    /// Directory served for non-API paths; `None` disables static serving.
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            database_url: "sqlite://inkpaint.db".to_string(),
            static_dir: Some(PathBuf::from("public")),
        }
    }
}

impl Config {
    /// Read `HOST`, `PORT`, `JWT_SECRET`, `DATABASE_URL` and `STATIC_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(secret) = get("JWT_SECRET").filter(|s| !s.is_empty()) {
            config.jwt_secret = secret;
        }
        if let Some(url) = get("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(dir) = get("STATIC_DIR") {
            config.static_dir = (!dir.is_empty()).then(|| PathBuf::from(dir));
        }
        Ok(config)
    }

    /// `host:port` to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.database_url, "sqlite://inkpaint.db");
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
        assert!(config.uses_default_secret());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("JWT_SECRET", "s3cret"),
            ("STATIC_DIR", ""),
        ]))
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.jwt_secret, "s3cret");
        assert!(config.static_dir.is_none());
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "eighty"));
    }
}
