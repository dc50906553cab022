mod fetch;
mod logging;
mod proxy;
mod server;
mod types;

pub use fetch::FetchConfig;
pub use logging::LoggingConfig;
pub use proxy::ProxyConfig;
pub use server::ServerConfig;
pub use types::LogLevel;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::{IpAddr, Ipv4Addr};

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_validation() {
        let config = ProxyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 7777);
        assert_eq!(config.fetch.timeout_secs, 15);
        assert_eq!(config.fetch.user_agent, "SUB-Recoded-Proxy/1.0 (+https://example.com)");
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ProxyConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_scheme() {
        let mut config = ProxyConfig::default();
        config.server.public_scheme = "ftp".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = ProxyConfig::default();
        config.fetch.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ProxyConfig::default();
        config.apply_overrides_from(overrides(&[
            ("PORT", "8080"),
            ("SUB_RECODED_BIND", "127.0.0.1"),
            ("SUB_RECODED_LOG_LEVEL", "DEBUG"),
            ("SUB_RECODED_LOG_JSON", "1"),
            ("SUB_RECODED_FETCH_TIMEOUT", "5"),
        ]));

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.logging.json);
        assert_eq!(config.fetch.timeout_secs, 5);
    }

    #[test]
    fn test_prefixed_port_wins_over_port() {
        let mut config = ProxyConfig::default();
        config.apply_overrides_from(overrides(&[("PORT", "8080"), ("SUB_RECODED_PORT", "9090")]));
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let mut config = ProxyConfig::default();
        config.apply_overrides_from(overrides(&[
            ("PORT", "not-a-port"),
            ("SUB_RECODED_BIND", "nowhere"),
        ]));
        assert_eq!(config.server.port, 7777);
        assert_eq!(config.server.bind_address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_partial_toml() {
        let config: ProxyConfig = toml::from_str("[server]\nport = 9000\n").expect("parse");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.public_scheme, "http");
        assert_eq!(config.fetch.timeout_secs, 15);
    }

    #[test]
    fn test_config_serialization() {
        let config = ProxyConfig::default();
        let toml_str = config.to_toml().expect("Failed to serialize");
        let parsed: ProxyConfig = toml::from_str(&toml_str).expect("Failed to parse");
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.logging.level, config.logging.level);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::parse_lossy("trace"), LogLevel::Trace);
        assert_eq!(LogLevel::parse_lossy(" Warn "), LogLevel::Warn);
        assert_eq!(LogLevel::parse_lossy("loud"), LogLevel::Info);
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("sub-recoded-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = ProxyConfig::default();
        config.server.port = 9191;
        config.save(&path).expect("save");

        let loaded = ProxyConfig::load(&path).expect("load");
        let _ = std::fs::remove_dir_all(&dir);
        // The environment may carry PORT; only compare when it does not.
        if std::env::var("PORT").is_err() && std::env::var("SUB_RECODED_PORT").is_err() {
            assert_eq!(loaded.server.port, 9191);
        }
    }
}
