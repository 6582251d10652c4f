//! Jenkins connection configuration.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Configuration for reaching the Jenkins instance.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Clone, Deserialize)]
pub struct JenkinsConfig {
    /// Base URL of Jenkins (e.g., "http://jenkins.devops.svc:8080").
    address: String,
    /// User the service authenticates as.
    user: String,
    /// API token (or password) of `user`.
    password: String,
    /// Per-request timeout in seconds.
    /// Default: 30
    #[serde(default = "default_request_timeout_seconds")]
    request_timeout_seconds: u64,
}

fn default_request_timeout_seconds() -> u64 {
    30
}

impl JenkinsConfig {
    /// Creates a configuration with defaults for optional fields.
    #[must_use]
    pub fn new(address: String, user: String, password: String) -> Self {
        Self {
            address,
            user,
            password,
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_seconds = timeout.as_secs();
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the user name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the API token.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl fmt::Debug for JenkinsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JenkinsConfig")
            .field("address", &self.address)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}
