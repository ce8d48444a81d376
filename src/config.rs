//! Configuration types.

use crate::error::ConfigError;

/// Wizard service configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Address the REST server binds to.
    pub bind_addr: String,
    /// Port the REST server binds to.
    pub port: u16,
    /// Whether to serve permissive CORS headers (for a local front-end).
    pub enable_cors: bool,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

impl WizardConfig {
    /// Load the configuration from the environment, falling back to
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr =
            std::env::var("KYC_WIZARD_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let port = match std::env::var("KYC_WIZARD_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "KYC_WIZARD_PORT".to_string(),
                message: format!("not a valid port: {raw}"),
            })?,
            Err(_) => defaults.port,
        };

        let enable_cors = match std::env::var("KYC_WIZARD_CORS") {
            Ok(raw) => raw == "1" || raw.eq_ignore_ascii_case("true"),
            Err(_) => defaults.enable_cors,
        };

        Ok(Self {
            bind_addr,
            port,
            enable_cors,
        })
    }
}
