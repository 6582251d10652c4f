//! Error types for the HTTP surface and server startup.
//!
//! Handler failures are collected in [`ApiError`], which renders as a JSON
//! body `{"Error": "<message>"}` with the matching status code. Startup
//! failures are [`StartupError`] contexts carried in a `rootcause` report.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use devops_credentials_access::AuthorizationError;
use devops_credentials_jenkins::JenkinsError;
use serde::Serialize;
use std::fmt;

/// Errors returned by credential handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request body, query or path could not be decoded.
    Decode { details: String },
    /// The credential type tag (or remote type) is not supported.
    UnsupportedType { kind: String },
    /// No operator identity accompanied the request.
    Unauthenticated,
    /// The operator lacks the required project role.
    Forbidden { details: String },
    /// A credential with the requested id already exists.
    Conflict { id: String },
    /// Jenkins rejected or failed the call.
    Remote(JenkinsError),
    /// The ownership store failed.
    Store { details: String },
    /// Any other server-side failure.
    Internal { details: String },
}

impl ApiError {
    /// HTTP status this error is answered with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Decode { .. } | Self::UnsupportedType { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Remote(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Store { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { details } => write!(f, "invalid request: {details}"),
            Self::UnsupportedType { kind } => {
                write!(f, "unsupported credential type '{kind}'")
            }
            Self::Unauthenticated => write!(f, "missing operator identity"),
            Self::Forbidden { details } => write!(f, "{details}"),
            Self::Conflict { id } => write!(f, "credential id [{id}] has been used"),
            Self::Remote(e) => write!(f, "{e}"),
            Self::Store { details } => write!(f, "credential store error: {details}"),
            Self::Internal { details } => write!(f, "internal error: {details}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<JenkinsError> for ApiError {
    fn from(e: JenkinsError) -> Self {
        Self::Remote(e)
    }
}

impl From<AuthorizationError> for ApiError {
    fn from(e: AuthorizationError) -> Self {
        if e.is_denied() {
            Self::Forbidden {
                details: e.to_string(),
            }
        } else {
            Self::Internal {
                details: e.to_string(),
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Store {
            details: e.to_string(),
        }
    }
}

/// Wire shape of an error response.
#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "Error")]
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Errors that prevent the server from starting.
#[derive(Debug)]
pub enum StartupError {
    /// Configuration could not be loaded.
    Configuration { details: String },
    /// The database could not be reached or migrated.
    Database { details: String },
    /// The Jenkins client could not be built.
    Jenkins { details: String },
    /// The listener could not bind or serve.
    Listener { addr: String, details: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { details } => write!(f, "invalid configuration: {details}"),
            Self::Database { details } => write!(f, "database unavailable: {details}"),
            Self::Jenkins { details } => write!(f, "jenkins client unavailable: {details}"),
            Self::Listener { addr, details } => {
                write!(f, "listener on '{addr}' failed: {details}")
            }
        }
    }
}

impl std::error::Error for StartupError {}

#[cfg(test)]
mod tests {
    use super::*;
    use devops_credentials_access::{ProjectRole, RoleSet};

    #[test]
    fn remote_status_passes_through() {
        let err = ApiError::from(JenkinsError::Status {
            status: 404,
            body: String::new(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn remote_without_status_is_bad_gateway() {
        let err = ApiError::from(JenkinsError::Transport {
            reason: "connection refused".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn denied_authorization_is_forbidden() {
        let err = ApiError::from(AuthorizationError::RoleNotAllowed {
            username: "dev".to_string(),
            project: "app".parse().expect("valid project id"),
            role: ProjectRole::Developer,
            allowed: RoleSet::managers(),
        });
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn failed_authorization_check_is_internal() {
        let err = ApiError::from(AuthorizationError::CheckFailed {
            reason: "pool timed out".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn conflict_message_names_the_id() {
        let err = ApiError::Conflict {
            id: "deploy-key".to_string(),
        };
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "credential id [deploy-key] has been used");
    }

    #[tokio::test]
    async fn body_uses_error_key() {
        let response = ApiError::UnsupportedType {
            kind: "certificate".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(
            body,
            serde_json::json!({ "Error": "unsupported credential type 'certificate'" })
        );
    }
}
