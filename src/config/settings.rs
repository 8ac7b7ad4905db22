use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub vapid: VapidConfig,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub cooldown: CooldownConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// VAPID application server identity (RFC 8292)
#[derive(Debug, Clone, Deserialize)]
pub struct VapidConfig {
    /// Uncompressed P-256 public key, base64url. Handed to browsers as `applicationServerKey`.
    #[serde(default)]
    pub public_key: String,
    /// Raw 32-byte P-256 private scalar, base64url
    #[serde(default)]
    pub private_key: String,
    /// Contact address sent as the `sub` claim
    #[serde(default = "default_subject")]
    pub subject: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    /// How long the push service should hold an undelivered message (seconds)
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u32,
    /// Timeout for a single request to a push service (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CooldownConfig {
    /// Minimum time between two broadcasts of the same notification (seconds)
    #[serde(default = "default_cooldown_window")]
    pub window_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Upper bound on in-flight push sends within one broadcast
    #[serde(default = "default_max_concurrent_sends")]
    pub max_concurrent_sends: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_subject() -> String {
    "mailto:admin@example.com".to_string()
}

fn default_ttl_seconds() -> u32 {
    86400 // 24 hours
}

fn default_request_timeout() -> u64 {
    30
}

fn default_cooldown_window() -> u64 {
    5
}

fn default_max_concurrent_sends() -> usize {
    100
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("vapid.subject", default_subject())?
            .set_default("push.ttl_seconds", default_ttl_seconds() as i64)?
            .set_default("push.request_timeout_seconds", default_request_timeout() as i64)?
            .set_default("cooldown.window_seconds", default_cooldown_window() as i64)?
            .set_default("dispatch.max_concurrent_sends", default_max_concurrent_sends() as i64)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SERVER__PORT, VAPID__PRIVATE_KEY, COOLDOWN__WINDOW_SECONDS, ...
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            // Conventional flat names used by web-push deployments
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("vapid.public_key", env::var("VAPID_PUBLIC_KEY").ok())?
            .set_override_option("vapid.private_key", env::var("VAPID_PRIVATE_KEY").ok())?
            .set_override_option("vapid.subject", env::var("VAPID_SUBJECT").ok())?;

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

impl Default for VapidConfig {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            private_key: String::new(),
            subject: default_subject(),
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_cooldown_window(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sends: default_max_concurrent_sends(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.cooldown.window_seconds, 5);
        assert_eq!(settings.dispatch.max_concurrent_sends, 100);
        assert_eq!(settings.push.ttl_seconds, 86400);
        assert!(settings.vapid.private_key.is_empty());
    }

    #[test]
    fn test_server_addr() {
        let settings = Settings::default();
        assert_eq!(settings.server_addr(), "0.0.0.0:3000");
    }
}
