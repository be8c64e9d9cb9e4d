//! cPanel manage2 configuration

use crate::error::ProvisionError;
use crate::providers::flags::loose_bool;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::{Validate, ValidationError};

/// Default manage2 API location.
pub const DEFAULT_BASE_URL: &str = "https://manage2.cpanel.net";

/// Reseller credentials for the manage2 API.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_password"))]
pub struct CpanelConfiguration {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,
    /// Group new licenses are added to
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,
    /// Log request parameters and response bodies
    #[serde(default, deserialize_with = "loose_bool")]
    pub debug: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn validate_password(configuration: &CpanelConfiguration) -> Result<(), ValidationError> {
    if configuration.password.expose_secret().is_empty() {
        return Err(ValidationError::new("required").with_message("password is required".into()));
    }
    Ok(())
}

impl CpanelConfiguration {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            group_id: None,
            base_url: default_base_url(),
            debug: false,
        }
    }

    /// Build from a JSON object of configuration keys.
    pub fn from_value(value: Value) -> Result<Self, ProvisionError> {
        let configuration: Self = serde_json::from_value(value)
            .map_err(|e| ProvisionError::Configuration(e.to_string()))?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn with_group_id(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// URL of a manage2 command.
    pub fn command_url(&self, command: &str) -> String {
        format!("{}/{command}.cgi", self.base_url.trim_end_matches('/'))
    }
}
