//! Error types for the Jenkins client.

use std::fmt;

/// Status reported when Jenkins could not be reached or answered garbage.
const BAD_GATEWAY: u16 = 502;

/// Errors from Jenkins credential operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JenkinsError {
    /// Jenkins answered with a non-success status.
    Status { status: u16, body: String },
    /// The request never produced a response.
    Transport { reason: String },
    /// The response body could not be decoded.
    Decode { reason: String },
    /// The client is misconfigured (e.g. an unparsable address).
    Configuration { reason: String },
}

impl JenkinsError {
    /// HTTP status to relay to our own caller.
    ///
    /// Jenkins' own status passes through; failures without one are a bad
    /// gateway, and misconfiguration is an internal error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            Self::Transport { .. } | Self::Decode { .. } => BAD_GATEWAY,
            Self::Configuration { .. } => 500,
        }
    }

    /// Returns true if Jenkins reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl fmt::Display for JenkinsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, body } => {
                if body.is_empty() {
                    write!(f, "jenkins responded with status {status}")
                } else {
                    write!(f, "jenkins responded with status {status}: {body}")
                }
            }
            Self::Transport { reason } => write!(f, "jenkins request failed: {reason}"),
            Self::Decode { reason } => write!(f, "invalid jenkins response: {reason}"),
            Self::Configuration { reason } => write!(f, "jenkins client misconfigured: {reason}"),
        }
    }
}

impl std::error::Error for JenkinsError {}

impl From<reqwest::Error> for JenkinsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode {
                reason: e.to_string(),
            }
        } else {
            Self::Transport {
                reason: e.to_string(),
            }
        }
    }
}
