//! Configuration types for the Sure Petcare client
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default vendor API base URL (no trailing slash)
pub const DEFAULT_API_BASE: &str = "https://app.api.surehub.io";

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurepetConfig {
    /// Account credentials
    pub credentials: Credentials,

    /// Client device id sent with the login request
    ///
    /// The vendor derives this from hardware identifiers by a convention of
    /// its own; it is treated here as an opaque caller-supplied string.
    pub device_id: String,

    /// Household to operate on; the first household returned by the API is
    /// used when unset
    #[serde(default)]
    pub household_id: Option<i64>,

    /// API endpoint settings
    #[serde(default)]
    pub api: ApiConfig,
}

impl SurepetConfig {
    /// Create a configuration with the given credentials and device id
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials {
                email: email.into(),
                password: password.into(),
            },
            device_id: device_id.into(),
            household_id: None,
            api: ApiConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.credentials.validate()?;

        if self.device_id.is_empty() {
            return Err(crate::Error::config("Device id cannot be empty"));
        }

        self.api.validate()?;

        Ok(())
    }
}

/// Account credentials
///
/// The Debug implementation intentionally does NOT expose the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email address
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Validate the credentials
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.email.is_empty() {
            return Err(crate::Error::config("Email address cannot be empty"));
        }
        if !self.email.contains('@') {
            return Err(crate::Error::config(format!(
                "Email address looks invalid: {}",
                self.email
            )));
        }
        if self.password.is_empty() {
            return Err(crate::Error::config("Password cannot be empty"));
        }

        // Catch obvious placeholder credentials (common mistake)
        let password_lower = self.password.to_lowercase();
        if password_lower.contains("your_password")
            || password_lower.contains("replace_me")
            || password_lower == "password"
        {
            return Err(crate::Error::config(
                "Password appears to be a placeholder. Use your account password.",
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// API endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the vendor API
    #[serde(default = "default_api_base")]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Validate the API settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "API base URL must use HTTP or HTTPS. Got: {}",
                self.base_url
            )));
        }
        if self.base_url.ends_with('/') {
            return Err(crate::Error::config(
                "API base URL must not end with a slash",
            ));
        }
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "Timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
