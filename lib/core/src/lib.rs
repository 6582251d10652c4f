//! Core domain types and utilities for devops-credentials.
//!
//! This crate provides the identifiers, the credential kind tag and the
//! error handling foundation shared by the access, Jenkins and server crates.

pub mod error;
pub mod id;
pub mod kind;

pub use error::Result;
pub use id::{CredentialId, Domain, ParseIdError, ProjectId};
pub use kind::{CredentialKind, ParseKindError};
