//! Ownership records linking Jenkins credentials to projects.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devops_credentials_core::{CredentialId, Domain, ProjectId};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// A credential created through the service on behalf of a project.
///
/// The row is keyed by (project, credential, domain); the credential itself
/// lives in Jenkins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCredential {
    /// Project (Jenkins folder) the credential belongs to.
    pub project_id: ProjectId,
    /// Jenkins credential id.
    pub credential_id: CredentialId,
    /// Credential domain, `_` for the global domain.
    pub domain: Domain,
    /// Username of the operator who created the credential.
    pub creator: String,
    /// When the credential was created.
    pub create_time: DateTime<Utc>,
}

impl ProjectCredential {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        credential_id: CredentialId,
        domain: Domain,
        creator: String,
    ) -> Self {
        Self {
            project_id,
            credential_id,
            domain,
            creator,
            create_time: Utc::now(),
        }
    }
}

/// Persistence of project credential ownership.
#[async_trait]
pub trait ProjectCredentialStore: Send + Sync {
    /// Records a newly created credential.
    async fn insert(&self, record: &ProjectCredential) -> Result<(), sqlx::Error>;

    /// Finds the record for one credential.
    async fn find(
        &self,
        project: &ProjectId,
        credential: &CredentialId,
        domain: &Domain,
    ) -> Result<Option<ProjectCredential>, sqlx::Error>;

    /// Lists the records of a project, optionally restricted to one domain.
    async fn list(
        &self,
        project: &ProjectId,
        domain: Option<&Domain>,
    ) -> Result<Vec<ProjectCredential>, sqlx::Error>;

    /// Deletes the record for one credential, returning whether it existed.
    async fn delete(
        &self,
        project: &ProjectId,
        credential: &CredentialId,
        domain: &Domain,
    ) -> Result<bool, sqlx::Error>;
}

/// Row type for project credential queries.
#[derive(FromRow)]
struct ProjectCredentialRow {
    project_id: String,
    credential_id: String,
    domain: String,
    creator: String,
    create_time: DateTime<Utc>,
}

fn invalid_column(column: &str, value: &str, reason: impl std::fmt::Display) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("invalid {column} '{value}': {reason}"),
    )))
}

impl ProjectCredentialRow {
    fn try_into_record(self) -> Result<ProjectCredential, sqlx::Error> {
        let project_id = ProjectId::from_str(&self.project_id)
            .map_err(|e| invalid_column("project id", &self.project_id, e))?;
        let credential_id = CredentialId::from_str(&self.credential_id)
            .map_err(|e| invalid_column("credential id", &self.credential_id, e))?;

        Ok(ProjectCredential {
            project_id,
            credential_id,
            domain: Domain::new(self.domain),
            creator: self.creator,
            create_time: self.create_time,
        })
    }
}

/// PostgreSQL repository for project credential records.
pub struct ProjectCredentialRepository {
    pool: PgPool,
}

impl ProjectCredentialRepository {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectCredentialStore for ProjectCredentialRepository {
    async fn insert(&self, record: &ProjectCredential) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO project_credential
                (project_id, credential_id, domain, creator, create_time)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.project_id.as_str())
        .bind(record.credential_id.as_str())
        .bind(record.domain.as_str())
        .bind(&record.creator)
        .bind(record.create_time)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(
        &self,
        project: &ProjectId,
        credential: &CredentialId,
        domain: &Domain,
    ) -> Result<Option<ProjectCredential>, sqlx::Error> {
        let row: Option<ProjectCredentialRow> = sqlx::query_as(
            r#"
            SELECT project_id, credential_id, domain, creator, create_time
            FROM project_credential
            WHERE project_id = $1 AND credential_id = $2 AND domain = $3
            "#,
        )
        .bind(project.as_str())
        .bind(credential.as_str())
        .bind(domain.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProjectCredentialRow::try_into_record).transpose()
    }

    async fn list(
        &self,
        project: &ProjectId,
        domain: Option<&Domain>,
    ) -> Result<Vec<ProjectCredential>, sqlx::Error> {
        let rows: Vec<ProjectCredentialRow> = sqlx::query_as(
            r#"
            SELECT project_id, credential_id, domain, creator, create_time
            FROM project_credential
            WHERE project_id = $1 AND ($2::TEXT IS NULL OR domain = $2)
            ORDER BY create_time ASC
            "#,
        )
        .bind(project.as_str())
        .bind(domain.map(Domain::as_str))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into_record()).collect()
    }

    async fn delete(
        &self,
        project: &ProjectId,
        credential: &CredentialId,
        domain: &Domain,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM project_credential
            WHERE project_id = $1 AND credential_id = $2 AND domain = $3
            "#,
        )
        .bind(project.as_str())
        .bind(credential.as_str())
        .bind(domain.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
