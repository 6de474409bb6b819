//! Node configuration, populated from environment variables.

use std::net::SocketAddr;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("AMITY_BIND must be a valid socket address (e.g. 0.0.0.0:8080), got {0:?}")]
    InvalidBind(String),
}

/// Runtime configuration for an Amity node.
///
/// All fields are populated from environment variables with sensible
/// defaults, so a node can be started with zero configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `AMITY_BIND` | `0.0.0.0:8080` | TCP socket address to listen on |
/// | `AMITY_DB` | (absent = in-memory) | Path to the SQLite database file |
/// | `AMITY_SEED_USERS` | (absent) | Comma-separated emails registered at startup |
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Path to the SQLite database file.
    /// `None` means use an in-memory store (data is lost on restart).
    pub db_path: Option<String>,

    /// Emails to register before serving requests.
    pub seed_users: Vec<String>,
}

impl NodeConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("AMITY_BIND").unwrap_or_else(|| "0.0.0.0:8080".into());
        let bind_addr: SocketAddr = bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind.clone()))?;

        let seed_users = lookup("AMITY_SEED_USERS")
            .map(|v| parse_list(&v))
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            db_path: lookup("AMITY_DB").filter(|p| !p.is_empty()),
            seed_users,
        })
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<NodeConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert!(c.db_path.is_none());
        assert!(c.seed_users.is_empty());
    }

    #[test]
    fn reads_all_variables() {
        let c = config(&[
            ("AMITY_BIND", "127.0.0.1:9000"),
            ("AMITY_DB", "/tmp/amity.db"),
            ("AMITY_SEED_USERS", " andy@example.com, ,john@example.com "),
        ])
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.db_path.as_deref(), Some("/tmp/amity.db"));
        assert_eq!(c.seed_users, vec!["andy@example.com", "john@example.com"]);
    }

    #[test]
    fn invalid_bind_is_an_error() {
        let err = config(&[("AMITY_BIND", "not-an-addr")]).unwrap_err();
        assert!(err.to_string().contains("not-an-addr"));
    }
}
