//! The credential operations the service needs from Jenkins.

use crate::error::JenkinsError;
use crate::types::{CredentialPayload, CredentialResponse};
use async_trait::async_trait;
use devops_credentials_core::{CredentialId, Domain, ProjectId};

/// Folder-scoped credential management.
///
/// `folder` is always the owning project; each project maps to one Jenkins
/// folder whose credential store holds the project's credentials.
#[async_trait]
pub trait CredentialApi: Send + Sync {
    /// Fetches one credential.
    ///
    /// # Errors
    ///
    /// Returns `JenkinsError::Status` with 404 if the credential does not exist.
    async fn get_credential(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
    ) -> Result<CredentialResponse, JenkinsError>;

    /// Lists credentials of one domain, or of every domain when `domain` is `None`.
    async fn list_credentials(
        &self,
        domain: Option<&Domain>,
        folder: &ProjectId,
    ) -> Result<Vec<CredentialResponse>, JenkinsError>;

    /// Creates a credential, returning its id.
    async fn create_credential(
        &self,
        domain: &Domain,
        folder: &ProjectId,
        payload: &CredentialPayload,
    ) -> Result<CredentialId, JenkinsError>;

    /// Replaces an existing credential, returning its id.
    async fn update_credential(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
        payload: &CredentialPayload,
    ) -> Result<CredentialId, JenkinsError>;

    /// Deletes a credential, returning its id.
    async fn delete_credential(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
    ) -> Result<CredentialId, JenkinsError>;

    /// Fetches the HTML configuration page of a credential.
    async fn credential_content(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
    ) -> Result<String, JenkinsError>;
}
