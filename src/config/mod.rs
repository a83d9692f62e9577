//! Configuration module

use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub netatmo: NetatmoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Vendor account and client settings
#[derive(Clone, Deserialize)]
pub struct NetatmoConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Overrides the union of all API group scopes
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_expiry_margin_secs")]
    pub token_expiry_margin_secs: u64,
}

// Secrets stay out of logs.
impl std::fmt::Debug for NetatmoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetatmoConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("username", &self.username)
            .field("password", &"***")
            .field("scope", &self.scope)
            .field("timeout_secs", &self.timeout_secs)
            .field("token_expiry_margin_secs", &self.token_expiry_margin_secs)
            .finish()
    }
}

impl NetatmoConfig {
    /// Every credential field must be set before the first token request.
    pub fn validate(&self) -> Result<(), AppError> {
        let missing: Vec<&str> = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::ConfigError(format!(
                "missing netatmo credentials: {}",
                missing.join(", ")
            )));
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| AppError::ConfigError(format!("invalid base_url {}: {}", self.base_url, e)))?;

        Ok(())
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_base_url() -> String {
    "https://api.netatmo.com/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_expiry_margin_secs() -> u64 {
    60
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("NETATMO_GATEWAY").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.netatmo.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn netatmo_config() -> NetatmoConfig {
        NetatmoConfig {
            base_url: default_base_url(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            username: "user@example.com".to_string(),
            password: "pw".to_string(),
            scope: None,
            timeout_secs: default_timeout_secs(),
            token_expiry_margin_secs: default_expiry_margin_secs(),
        }
    }

    #[test]
    fn test_validate_complete() {
        assert!(netatmo_config().validate().is_ok());
    }

    #[test]
    fn test_validate_lists_missing_credentials() {
        let mut cfg = netatmo_config();
        cfg.client_secret = String::new();
        cfg.password = "  ".to_string();

        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("client_secret"));
        assert!(err.contains("password"));
        assert!(!err.contains("client_id"));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut cfg = netatmo_config();
        cfg.base_url = "not a url".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", netatmo_config());
        assert!(!rendered.contains("secret\""));
        assert!(!rendered.contains("\"pw\""));
        assert!(rendered.contains("user@example.com"));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let settings = config::Config::builder()
            .set_override("netatmo.client_id", "id")
            .unwrap()
            .build()
            .unwrap();
        let cfg: Config = settings.try_deserialize().unwrap();

        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.netatmo.base_url, "https://api.netatmo.com/");
        assert_eq!(cfg.netatmo.timeout_secs, 30);
        assert!(cfg.netatmo.scope.is_none());
    }
}
