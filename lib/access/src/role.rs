//! Project roles.
//!
//! Every project member holds exactly one role. Credential management is
//! restricted to the managing roles (owner and maintainer).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A member's role within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    /// Owns the project; full control.
    Owner,
    /// Maintains pipelines and credentials.
    Maintainer,
    /// Runs and edits pipelines.
    Developer,
    /// Read-only access.
    Reporter,
}

impl ProjectRole {
    /// Returns the stored name of this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Maintainer => "maintainer",
            Self::Developer => "developer",
            Self::Reporter => "reporter",
        }
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    /// The unrecognised role name.
    pub role: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown project role '{}'", self.role)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for ProjectRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "maintainer" => Ok(Self::Maintainer),
            "developer" => Ok(Self::Developer),
            "reporter" => Ok(Self::Reporter),
            other => Err(ParseRoleError {
                role: other.to_string(),
            }),
        }
    }
}

/// Set of roles allowed to perform an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    roles: Vec<ProjectRole>,
}

impl RoleSet {
    /// Creates a role set from explicit roles.
    #[must_use]
    pub fn of(roles: &[ProjectRole]) -> Self {
        let mut deduped = Vec::with_capacity(roles.len());
        for role in roles {
            if !deduped.contains(role) {
                deduped.push(*role);
            }
        }
        Self { roles: deduped }
    }

    /// The roles that may manage project credentials.
    #[must_use]
    pub fn managers() -> Self {
        Self::of(&[ProjectRole::Owner, ProjectRole::Maintainer])
    }

    /// Returns true if `role` is in the set.
    #[must_use]
    pub fn allows(&self, role: ProjectRole) -> bool {
        self.roles.contains(&role)
    }

    /// Returns the roles as a slice.
    #[must_use]
    pub fn roles(&self) -> &[ProjectRole] {
        &self.roles
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.roles.iter().map(ProjectRole::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
