//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const BIND_ADDR_ENV: &str = "INSIGHTMAP_BIND_ADDR";
pub const MAX_BATCH_ENV: &str = "INSIGHTMAP_MAX_BATCH";
pub const MODEL_DIR_ENV: &str = "INSIGHTMAP_MODEL_DIR";

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: SocketAddr,
    /// Maximum patients accepted by one `/batch_predict` call
    pub max_batch: usize,
    /// Directory searched for trained model artifacts
    pub model_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            max_batch: 1000,
            model_dir: None,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by environment variables. Invalid values are ignored.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(BIND_ADDR_ENV) {
            if let Ok(addr) = v.trim().parse::<SocketAddr>() {
                cfg.bind_addr = addr;
            }
        }

        if let Ok(v) = std::env::var(MAX_BATCH_ENV) {
            if let Ok(n) = v.trim().parse::<usize>() {
                if n > 0 {
                    cfg.max_batch = n;
                }
            }
        }

        if let Ok(v) = std::env::var(MODEL_DIR_ENV) {
            let v = v.trim();
            if !v.is_empty() {
                cfg.model_dir = Some(PathBuf::from(v));
            }
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind_addr.port(), 5000);
        assert_eq!(cfg.max_batch, 1000);
        assert!(cfg.model_dir.is_none());
    }
}
