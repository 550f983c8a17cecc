#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::model::ServerDescriptor;
use crate::utils::error::{Result, UnblockError};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

const SESSION_ENDPOINT: &str = "http://api-manga.crunchyroll.com/cr_start_session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default = "default_servers")]
    pub servers: Vec<ServerDescriptor>,
    #[serde(default)]
    pub login: LoginConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub device_id: String,
    pub api_version: String,
    pub request_timeout_seconds: u64,
    pub skip_expired_auth: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub title: String,
    pub icon: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            device_id: "a".to_string(),
            api_version: "1.0".to_string(),
            request_timeout_seconds: 15,
            skip_expired_auth: true,
        }
    }
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.crunchyroll.com/login.0.json".to_string(),
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            host: "crunchyroll".to_string(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: "CR-Unblocker has encountered an error".to_string(),
            icon: "icons/Crunchyroll-128.png".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            servers: default_servers(),
            login: LoginConfig::default(),
            cookies: CookieConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

fn default_servers() -> Vec<ServerDescriptor> {
    [
        ("com.crunchyroll.manga.android", "FLpcfZH4CbW4muO"),
        ("com.crunchyroll.iphone", "QWjz212GspMHH9h"),
        ("com.crunchyroll.windows.desktop", "LNDJgOit5yaRIWN"),
    ]
    .into_iter()
    .map(|(device_type, access_token)| ServerDescriptor {
        endpoint: SESSION_ENDPOINT.to_string(),
        device_type: device_type.to_string(),
        access_token: access_token.to_string(),
    })
    .collect()
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(UnblockError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| UnblockError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ACCESS_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| UnblockError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.session.request_timeout_seconds)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        if self.servers.is_empty() {
            return Err(UnblockError::MissingConfigError {
                field: "servers".to_string(),
            });
        }

        for (index, server) in self.servers.iter().enumerate() {
            validate_url(&format!("servers[{}].endpoint", index), &server.endpoint)?;
            validate_non_empty_string(&format!("servers[{}].device_type", index), &server.device_type)?;
            validate_non_empty_string(
                &format!("servers[{}].access_token", index),
                &server.access_token,
            )?;
        }

        validate_non_empty_string("session.device_id", &self.session.device_id)?;
        validate_non_empty_string("session.api_version", &self.session.api_version)?;
        validate_range(
            "session.request_timeout_seconds",
            self.session.request_timeout_seconds,
            1,
            300,
        )?;
        validate_url("login.endpoint", &self.login.endpoint)?;
        validate_non_empty_string("cookies.host", &self.cookies.host)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_production_servers() {
        let config = AppConfig::default();
        assert_eq!(config.servers.len(), 3);
        assert!(config.servers.iter().all(|s| s.endpoint == SESSION_ENDPOINT));
        assert_eq!(config.servers[1].device_type, "com.crunchyroll.iphone");
        assert_eq!(config.session.device_id, "a");
        assert_eq!(config.session.api_version, "1.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_custom_servers() {
        let content = r#"
[session]
request_timeout_seconds = 5

[[servers]]
endpoint = "https://backup.example.com/start_session"
device_type = "com.example.tv"
access_token = "token-1"

[cookies]
host = "example"
"#;
        let config = AppConfig::from_toml_str(content).unwrap();
        assert_eq!(config.servers.len(), 1);
        assert_eq!(config.servers[0].device_type, "com.example.tv");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.session.device_id, "a");
        assert_eq!(config.cookies.host, "example");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CR_UNBLOCKER_TEST_TOKEN", "from-env");
        let content = r#"
[[servers]]
endpoint = "https://backup.example.com/start_session"
device_type = "com.example.tv"
access_token = "${CR_UNBLOCKER_TEST_TOKEN}"
"#;
        let config = AppConfig::from_toml_str(content).unwrap();
        assert_eq!(config.servers[0].access_token, "from-env");

        let untouched = AppConfig::substitute_env_vars("${CR_UNBLOCKER_MISSING_VAR}").unwrap();
        assert_eq!(untouched, "${CR_UNBLOCKER_MISSING_VAR}");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.servers.clear();
        assert!(matches!(
            config.validate(),
            Err(UnblockError::MissingConfigError { .. })
        ));

        let mut config = AppConfig::default();
        config.login.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.session.request_timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.servers[0].access_token = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = AppConfig::from_toml_str("servers = 12");
        assert!(matches!(result, Err(UnblockError::ConfigError { .. })));
    }
}
