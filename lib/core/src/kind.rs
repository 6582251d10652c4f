//! The credential kinds managed on behalf of projects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag identifying the shape of a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Username and password pair.
    UsernamePassword,
    /// SSH username with a directly entered private key.
    Ssh,
    /// A single opaque secret string.
    SecretText,
    /// A kubeconfig document.
    Kubeconfig,
}

impl CredentialKind {
    /// All supported kinds.
    pub const ALL: [Self; 4] = [
        Self::UsernamePassword,
        Self::Ssh,
        Self::SecretText,
        Self::Kubeconfig,
    ];

    /// Returns the wire tag for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsernamePassword => "username_password",
            Self::Ssh => "ssh",
            Self::SecretText => "secret_text",
            Self::Kubeconfig => "kubeconfig",
        }
    }

    /// Returns the display name Jenkins reports as `typeName` for this kind.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::UsernamePassword => "Username with password",
            Self::Ssh => "SSH Username with private key",
            Self::SecretText => "Secret text",
            Self::Kubeconfig => "Kubernetes configuration (kubeconfig)",
        }
    }

    /// Maps a Jenkins `typeName` back to a kind.
    #[must_use]
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == type_name)
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown credential type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError {
    /// The tag that was not recognised.
    pub tag: String,
}

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported credential type '{}'", self.tag)
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for CredentialKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ParseKindError { tag: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back() {
        for kind in CredentialKind::ALL {
            assert_eq!(kind.as_str().parse::<CredentialKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "certificate".parse::<CredentialKind>().unwrap_err();
        assert!(err.to_string().contains("certificate"));
    }

    #[test]
    fn jenkins_type_names_map_to_kinds() {
        assert_eq!(
            CredentialKind::from_type_name("SSH Username with private key"),
            Some(CredentialKind::Ssh)
        );
        assert_eq!(
            CredentialKind::from_type_name("Kubernetes configuration (kubeconfig)"),
            Some(CredentialKind::Kubeconfig)
        );
        assert_eq!(CredentialKind::from_type_name("Certificate"), None);
    }

    #[test]
    fn serde_uses_wire_tags() {
        let json = serde_json::to_string(&CredentialKind::SecretText).expect("serialize");
        assert_eq!(json, "\"secret_text\"");
        let json = serde_json::to_string(&CredentialKind::Kubeconfig).expect("serialize");
        assert_eq!(json, "\"kubeconfig\"");
    }
}
