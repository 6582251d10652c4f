//! Read access to the platform's project membership table.

use async_trait::async_trait;
use devops_credentials_access::{AuthorizationError, MembershipStore, ProjectRole};
use devops_credentials_core::ProjectId;
use sqlx::PgPool;

/// PostgreSQL-backed [`MembershipStore`].
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn role_of(
        &self,
        username: &str,
        project: &ProjectId,
    ) -> Result<Option<ProjectRole>, AuthorizationError> {
        let role: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT role
            FROM project_membership
            WHERE project_id = $1 AND username = $2
            "#,
        )
        .bind(project.as_str())
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthorizationError::CheckFailed {
            reason: format!("membership lookup failed: {e}"),
        })?;

        role.map(|(role,)| {
            role.parse::<ProjectRole>()
                .map_err(|e| AuthorizationError::CheckFailed {
                    reason: e.to_string(),
                })
        })
        .transpose()
    }
}
