//! Project access control for devops-credentials.
//!
//! Credentials belong to projects, and only project members holding a
//! managing role may touch them. This crate provides:
//! - Project roles (`ProjectRole`, `RoleSet`)
//! - The `MembershipStore` seam for looking up a user's role in a project
//! - `ProjectAuthorizer`, which turns a lookup into an allow/deny decision
//!
//! # Example
//!
//! ```
//! use devops_credentials_access::{ProjectRole, RoleSet};
//!
//! let managers = RoleSet::managers();
//! assert!(managers.allows(ProjectRole::Owner));
//! assert!(!managers.allows(ProjectRole::Developer));
//! ```

pub mod authorizer;
pub mod error;
pub mod role;

pub use authorizer::{MembershipStore, ProjectAuthorizer};
pub use error::AuthorizationError;
pub use role::{ParseRoleError, ProjectRole, RoleSet};
