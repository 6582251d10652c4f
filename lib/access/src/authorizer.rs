//! Role checks against project membership.

use crate::error::AuthorizationError;
use crate::role::{ProjectRole, RoleSet};
use async_trait::async_trait;
use devops_credentials_core::ProjectId;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Lookup of a user's role in a project.
///
/// Membership is owned by the wider platform; implementations only read it.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Returns the user's role in the project, or `None` if they are not a member.
    ///
    /// # Errors
    ///
    /// Returns `AuthorizationError::CheckFailed` if the lookup fails.
    async fn role_of(
        &self,
        username: &str,
        project: &ProjectId,
    ) -> Result<Option<ProjectRole>, AuthorizationError>;
}

/// Decides whether an operator may act on a project.
#[derive(Clone)]
pub struct ProjectAuthorizer {
    store: Arc<dyn MembershipStore>,
}

impl ProjectAuthorizer {
    /// Creates an authorizer over a membership store.
    pub fn new(store: Arc<dyn MembershipStore>) -> Self {
        Self { store }
    }

    /// Checks that `username` holds one of `allowed` in `project`.
    ///
    /// Returns the role the user holds.
    #[instrument(skip(self, allowed), fields(allowed = %allowed))]
    pub async fn require_role(
        &self,
        username: &str,
        project: &ProjectId,
        allowed: &RoleSet,
    ) -> Result<ProjectRole, AuthorizationError> {
        let role = self
            .store
            .role_of(username, project)
            .await?
            .ok_or_else(|| AuthorizationError::NotMember {
                username: username.to_string(),
                project: project.clone(),
            })?;

        if !allowed.allows(role) {
            return Err(AuthorizationError::RoleNotAllowed {
                username: username.to_string(),
                project: project.clone(),
                role,
                allowed: allowed.clone(),
            });
        }

        debug!(%role, "project role check passed");
        Ok(role)
    }
}
