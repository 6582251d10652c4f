//! Shared application state.

use crate::db::ProjectCredentialStore;
use devops_credentials_access::ProjectAuthorizer;
use devops_credentials_jenkins::CredentialApi;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    /// Jenkins credentials API.
    pub jenkins: Arc<dyn CredentialApi>,
    /// Ownership records of project credentials.
    pub credentials: Arc<dyn ProjectCredentialStore>,
    /// Project role checks.
    pub authorizer: ProjectAuthorizer,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        jenkins: Arc<dyn CredentialApi>,
        credentials: Arc<dyn ProjectCredentialStore>,
        authorizer: ProjectAuthorizer,
    ) -> Self {
        Self {
            jenkins,
            credentials,
            authorizer,
        }
    }
}
