//! Database repositories for the credentials service.
//!
//! This module provides data access for:
//! - Ownership records of credentials created per project
//! - Project membership roles (read-only)

pub mod membership;
pub mod project_credential;

pub use membership::MembershipRepository;
pub use project_credential::{
    ProjectCredential, ProjectCredentialRepository, ProjectCredentialStore,
};
