use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use sub_recoded_types::{ProxyError, ProxyResult};
use tracing::{info, warn};

use super::fetch::FetchConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::types::LogLevel;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub server: ServerConfig,
    pub fetch: FetchConfig,
    pub logging: LoggingConfig,
}

impl ProxyConfig {
    pub fn load(path: impl AsRef<Path>) -> ProxyResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| ProxyError::Config(format!("Failed to read config: {}", e)))?;

            toml::from_str(&contents)
                .map_err(|e| ProxyError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            info!("Config file {:?} not found, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Defaults plus environment overrides, for runs without a config file.
    pub fn from_env() -> ProxyResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ProxyResult<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ProxyError::Config(format!("Failed to create config dir: {}", e))
                })?;
            }
        }

        std::fs::write(path.as_ref(), contents)
            .map_err(|e| ProxyError::Config(format!("Failed to write config: {}", e)))?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    pub fn to_toml(&self) -> ProxyResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ProxyError::Config(format!("Failed to serialize config: {}", e)))
    }

    pub fn listen_addr(&self) -> SocketAddr {
        self.server.listen_addr()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Plain PORT first so the namespaced variable wins.
        for key in ["PORT", "SUB_RECODED_PORT"] {
            if let Some(port) = lookup(key) {
                match port.trim().parse() {
                    Ok(p) => self.server.port = p,
                    Err(_) => warn!("Ignoring invalid {}={}", key, port),
                }
            }
        }

        if let Some(bind) = lookup("SUB_RECODED_BIND") {
            match bind.trim().parse::<IpAddr>() {
                Ok(addr) => self.server.bind_address = addr,
                Err(_) => warn!("Ignoring invalid SUB_RECODED_BIND={}", bind),
            }
        }

        if let Some(level) = lookup("SUB_RECODED_LOG_LEVEL") {
            self.logging.level = LogLevel::parse_lossy(&level);
        }

        if lookup("SUB_RECODED_LOG_JSON").is_some() {
            self.logging.json = true;
        }

        if let Some(timeout) = lookup("SUB_RECODED_FETCH_TIMEOUT") {
            match timeout.trim().parse() {
                Ok(secs) => self.fetch.timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid SUB_RECODED_FETCH_TIMEOUT={}", timeout),
            }
        }
    }

    pub fn validate(&self) -> ProxyResult<()> {
        if self.server.port == 0 {
            return Err(ProxyError::Config("Listen port cannot be 0".into()));
        }

        if !matches!(self.server.public_scheme.as_str(), "http" | "https") {
            return Err(ProxyError::Config(format!(
                "public_scheme must be 'http' or 'https', got '{}'",
                self.server.public_scheme
            )));
        }

        if self.fetch.timeout_secs == 0 {
            return Err(ProxyError::Config("Fetch timeout cannot be 0".into()));
        }

        if self.fetch.user_agent.trim().is_empty() {
            return Err(ProxyError::Config("User agent cannot be empty".into()));
        }

        Ok(())
    }
}
