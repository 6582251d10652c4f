//! Error types for the access crate.

use crate::role::{ProjectRole, RoleSet};
use devops_credentials_core::ProjectId;
use std::fmt;

/// Errors from project authorization checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The user is not a member of the project.
    NotMember { username: String, project: ProjectId },
    /// The user is a member, but their role is not allowed.
    RoleNotAllowed {
        username: String,
        project: ProjectId,
        role: ProjectRole,
        allowed: RoleSet,
    },
    /// The membership lookup itself failed.
    CheckFailed { reason: String },
}

impl AuthorizationError {
    /// Returns true if the caller was denied, as opposed to the check failing.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        !matches!(self, Self::CheckFailed { .. })
    }
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMember { username, project } => {
                write!(f, "user '{username}' is not a member of project '{project}'")
            }
            Self::RoleNotAllowed {
                username,
                project,
                role,
                allowed,
            } => {
                write!(
                    f,
                    "user '{username}' has role '{role}' in project '{project}', requires one of {allowed}"
                )
            }
            Self::CheckFailed { reason } => {
                write!(f, "authorization check failed: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthorizationError {}
