//! Strongly-typed identifiers for projects, credentials and credential domains.
//!
//! Project and credential ids are chosen by callers (the platform and the
//! credential author respectively), so they wrap validated strings rather
//! than generated values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to generate a validated string ID wrapper.
///
/// `$forbidden` lists characters that may not appear in the id on top of
/// whitespace.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $forbidden:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the id, returning the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        reason: "must not be empty".to_string(),
                    });
                }
                if let Some(c) = s
                    .chars()
                    .find(|c| c.is_whitespace() || $forbidden.contains(c))
                {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        reason: format!("contains forbidden character {c:?}"),
                    });
                }
                Ok(Self(s.to_string()))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a project. Doubles as the name of the project's Jenkins folder.
    ///
    /// Nested folders are written with `/` separators.
    ProjectId,
    ['?', '#']
);

define_id!(
    /// Identifier of a credential inside a domain.
    CredentialId,
    ['/', '?', '#']
);

/// A Jenkins credential domain.
///
/// The empty domain and `_` both denote the global domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// Name Jenkins uses for the global domain.
    pub const GLOBAL: &'static str = "_";

    /// Returns the global domain.
    #[must_use]
    pub fn global() -> Self {
        Self(Self::GLOBAL.to_string())
    }

    /// Creates a domain, mapping blank names to the global domain.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            Self::global()
        } else if trimmed.len() == name.len() {
            Self(name)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Interprets an optional filter value: blank or missing means "every domain".
    #[must_use]
    pub fn filter(name: Option<&str>) -> Option<Self> {
        name.filter(|n| !n.trim().is_empty()).map(Self::new)
    }

    /// Returns true for the global domain.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.0 == Self::GLOBAL
    }

    /// Returns the domain name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Domain {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Domain {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl<'de> Deserialize<'de> for Domain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)
            .map(|name| name.map(Self::new).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_id_accepts_nested_folders() {
        let id: ProjectId = "team/project-a1".parse().expect("should parse");
        assert_eq!(id.as_str(), "team/project-a1");
    }

    #[test]
    fn credential_id_rejects_slash() {
        let err = "a/b".parse::<CredentialId>().unwrap_err();
        assert_eq!(err.id_type, "CredentialId");
        assert!(err.reason.contains("'/'"));
    }

    #[test]
    fn ids_reject_empty_and_whitespace() {
        assert!("".parse::<ProjectId>().is_err());
        assert!("with space".parse::<CredentialId>().is_err());
    }

    #[test]
    fn credential_id_deserialize_validates() {
        let ok: CredentialId = serde_json::from_str("\"github\"").expect("deserialize");
        assert_eq!(ok.to_string(), "github");

        let err = serde_json::from_str::<CredentialId>("\"\"");
        assert!(err.is_err());
    }

    #[test]
    fn blank_domain_is_global() {
        assert!(Domain::new("").is_global());
        assert!(Domain::new("  ").is_global());
        assert_eq!(Domain::new(" dev ").as_str(), "dev");
        assert_eq!(Domain::default().as_str(), "_");
    }

    #[test]
    fn domain_filter_treats_blank_as_all() {
        assert_eq!(Domain::filter(None), None);
        assert_eq!(Domain::filter(Some("")), None);
        assert_eq!(Domain::filter(Some("_")), Some(Domain::global()));
    }

    #[test]
    fn domain_deserializes_null_and_empty_as_global() {
        let d: Domain = serde_json::from_str("null").expect("deserialize");
        assert!(d.is_global());
        let d: Domain = serde_json::from_str("\"\"").expect("deserialize");
        assert!(d.is_global());
        let d: Domain = serde_json::from_str("\"staging\"").expect("deserialize");
        assert_eq!(d.as_str(), "staging");
    }
}
