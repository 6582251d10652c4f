//! Request and response documents of the Jenkins credentials plugin.
//!
//! Jenkins binds submitted JSON to plugin classes through the
//! `stapler-class` key, so every payload names the class it instantiates.

use devops_credentials_core::{CredentialId, CredentialKind, Domain};
use serde::{Deserialize, Serialize};

/// Scope every managed credential is created with.
pub const GLOBAL_SCOPE: &str = "GLOBAL";

/// Stapler class of username/password credentials.
pub const USERNAME_PASSWORD_CLASS: &str =
    "com.cloudbees.plugins.credentials.impl.UsernamePasswordCredentialsImpl";
/// Stapler class of SSH private key credentials.
pub const SSH_CLASS: &str = "com.cloudbees.jenkins.plugins.sshcredentials.impl.BasicSSHUserPrivateKey";
/// Stapler class of a directly entered SSH private key.
pub const SSH_DIRECT_KEY_CLASS: &str = "com.cloudbees.jenkins.plugins.sshcredentials.impl.BasicSSHUserPrivateKey$DirectEntryPrivateKeySource";
/// Stapler class of secret text credentials.
pub const SECRET_TEXT_CLASS: &str = "org.jenkinsci.plugins.plaincredentials.impl.StringCredentialsImpl";
/// Stapler class of kubeconfig credentials.
pub const KUBECONFIG_CLASS: &str = "com.microsoft.jenkins.kubernetes.credentials.KubeconfigCredentials";
/// Stapler class of a directly entered kubeconfig.
pub const KUBECONFIG_DIRECT_CLASS: &str =
    "com.microsoft.jenkins.kubernetes.credentials.KubeconfigCredentials$DirectEntryKubeconfigSource";

/// Username/password credential document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsernamePasswordCredential {
    pub scope: &'static str,
    pub id: CredentialId,
    pub username: String,
    pub password: String,
    pub description: String,
    #[serde(rename = "stapler-class")]
    pub stapler_class: &'static str,
}

/// Source of an SSH private key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivateKeySource {
    #[serde(rename = "stapler-class")]
    pub stapler_class: &'static str,
    #[serde(rename = "privateKey")]
    pub private_key: String,
}

/// SSH private key credential document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SshCredential {
    pub scope: &'static str,
    pub id: CredentialId,
    pub username: String,
    pub passphrase: String,
    #[serde(rename = "privateKeySource")]
    pub key_source: PrivateKeySource,
    pub description: String,
    #[serde(rename = "stapler-class")]
    pub stapler_class: &'static str,
}

/// Secret text credential document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretTextCredential {
    pub scope: &'static str,
    pub id: CredentialId,
    pub secret: String,
    pub description: String,
    #[serde(rename = "stapler-class")]
    pub stapler_class: &'static str,
}

/// Source of a kubeconfig document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KubeconfigSource {
    #[serde(rename = "stapler-class")]
    pub stapler_class: &'static str,
    pub content: String,
}

/// Kubeconfig credential document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KubeconfigCredential {
    pub scope: &'static str,
    pub id: CredentialId,
    pub description: String,
    #[serde(rename = "kubeconfigSource")]
    pub kubeconfig_source: KubeconfigSource,
    #[serde(rename = "stapler-class")]
    pub stapler_class: &'static str,
}

/// A credential document ready to submit to Jenkins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CredentialPayload {
    UsernamePassword(UsernamePasswordCredential),
    Ssh(SshCredential),
    SecretText(SecretTextCredential),
    Kubeconfig(KubeconfigCredential),
}

impl CredentialPayload {
    /// Builds a username/password credential.
    #[must_use]
    pub fn username_password(
        id: CredentialId,
        username: impl Into<String>,
        password: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::UsernamePassword(UsernamePasswordCredential {
            scope: GLOBAL_SCOPE,
            id,
            username: username.into(),
            password: password.into(),
            description: description.into(),
            stapler_class: USERNAME_PASSWORD_CLASS,
        })
    }

    /// Builds an SSH credential with a directly entered private key.
    #[must_use]
    pub fn ssh(
        id: CredentialId,
        username: impl Into<String>,
        passphrase: impl Into<String>,
        private_key: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::Ssh(SshCredential {
            scope: GLOBAL_SCOPE,
            id,
            username: username.into(),
            passphrase: passphrase.into(),
            key_source: PrivateKeySource {
                stapler_class: SSH_DIRECT_KEY_CLASS,
                private_key: private_key.into(),
            },
            description: description.into(),
            stapler_class: SSH_CLASS,
        })
    }

    /// Builds a secret text credential.
    #[must_use]
    pub fn secret_text(
        id: CredentialId,
        secret: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::SecretText(SecretTextCredential {
            scope: GLOBAL_SCOPE,
            id,
            secret: secret.into(),
            description: description.into(),
            stapler_class: SECRET_TEXT_CLASS,
        })
    }

    /// Builds a kubeconfig credential with directly entered content.
    #[must_use]
    pub fn kubeconfig(
        id: CredentialId,
        content: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::Kubeconfig(KubeconfigCredential {
            scope: GLOBAL_SCOPE,
            id,
            description: description.into(),
            kubeconfig_source: KubeconfigSource {
                stapler_class: KUBECONFIG_DIRECT_CLASS,
                content: content.into(),
            },
            stapler_class: KUBECONFIG_CLASS,
        })
    }

    /// Returns the credential id carried by the document.
    #[must_use]
    pub fn id(&self) -> &CredentialId {
        match self {
            Self::UsernamePassword(c) => &c.id,
            Self::Ssh(c) => &c.id,
            Self::SecretText(c) => &c.id,
            Self::Kubeconfig(c) => &c.id,
        }
    }

    /// Returns the kind of credential the document describes.
    #[must_use]
    pub fn kind(&self) -> CredentialKind {
        match self {
            Self::UsernamePassword(_) => CredentialKind::UsernamePassword,
            Self::Ssh(_) => CredentialKind::Ssh,
            Self::SecretText(_) => CredentialKind::SecretText,
            Self::Kubeconfig(_) => CredentialKind::Kubeconfig,
        }
    }
}

/// Envelope `createCredentials` expects around a credential document.
#[derive(Debug, Serialize)]
pub(crate) struct CreateCredentialEnvelope<'a> {
    pub credentials: &'a CredentialPayload,
}

/// A credential as reported by the Jenkins JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    pub id: String,
    #[serde(default)]
    pub type_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fingerprint: Option<Fingerprint>,
    /// Not part of the Jenkins document; filled from the store it was read from.
    #[serde(skip, default)]
    pub domain: Domain,
}

impl CredentialResponse {
    /// Returns the credential kind, if Jenkins reported a supported type.
    #[must_use]
    pub fn kind(&self) -> Option<CredentialKind> {
        CredentialKind::from_type_name(&self.type_name)
    }
}

/// Fingerprint Jenkins keeps of where a credential has been used.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub usage: Vec<FingerprintUsage>,
}

/// Usage of a credential by one job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct FingerprintUsage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ranges: UsageRanges,
}

/// Build ranges of a fingerprint usage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UsageRanges {
    #[serde(default)]
    pub ranges: Vec<UsageRange>,
}

/// A range of build numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct UsageRange {
    pub start: i64,
    pub end: i64,
}

/// Credentials of a single domain store.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DomainCredentials {
    #[serde(default)]
    pub credentials: Vec<CredentialResponse>,
}

/// Credentials of every domain in a folder store, keyed by domain name.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FolderCredentials {
    #[serde(default)]
    pub domains: std::collections::BTreeMap<String, DomainCredentials>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(raw: &str) -> CredentialId {
        raw.parse().expect("valid credential id")
    }

    #[test]
    fn username_password_document_shape() {
        let payload = CredentialPayload::username_password(id("gh"), "bot", "s3cret", "GitHub");
        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(
            value,
            json!({
                "scope": "GLOBAL",
                "id": "gh",
                "username": "bot",
                "password": "s3cret",
                "description": "GitHub",
                "stapler-class": USERNAME_PASSWORD_CLASS,
            })
        );
    }

    #[test]
    fn ssh_document_nests_key_source() {
        let payload = CredentialPayload::ssh(id("deploy"), "git", "", "-----BEGIN KEY-----", "");
        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(value["stapler-class"], SSH_CLASS);
        assert_eq!(value["privateKeySource"]["stapler-class"], SSH_DIRECT_KEY_CLASS);
        assert_eq!(value["privateKeySource"]["privateKey"], "-----BEGIN KEY-----");
        assert_eq!(payload.kind(), CredentialKind::Ssh);
    }

    #[test]
    fn kubeconfig_document_nests_source() {
        let payload = CredentialPayload::kubeconfig(id("kube"), "apiVersion: v1", "cluster");
        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(value["kubeconfigSource"]["content"], "apiVersion: v1");
        assert_eq!(
            value["kubeconfigSource"]["stapler-class"],
            KUBECONFIG_DIRECT_CLASS
        );
        assert_eq!(payload.id().as_str(), "kube");
    }

    #[test]
    fn create_envelope_wraps_credentials() {
        let payload = CredentialPayload::secret_text(id("token"), "abc", "");
        let value = serde_json::to_value(CreateCredentialEnvelope {
            credentials: &payload,
        })
        .expect("serialize");
        assert_eq!(value["credentials"]["secret"], "abc");
        assert_eq!(value["credentials"]["stapler-class"], SECRET_TEXT_CLASS);
    }

    #[test]
    fn credential_response_parses_fingerprint() {
        let raw = json!({
            "_class": "com.cloudbees.plugins.credentials.CredentialsStoreAction$CredentialsWrapper",
            "id": "gh",
            "typeName": "Username with password",
            "displayName": "bot/******",
            "description": "GitHub",
            "fingerprint": {
                "fileName": "gh",
                "hash": "1f3870be274f6c49b3e31a0c6728957f",
                "usage": [
                    { "name": "project-a/build", "ranges": { "ranges": [{ "start": 1, "end": 4 }] } }
                ]
            }
        });
        let response: CredentialResponse = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(response.kind(), Some(CredentialKind::UsernamePassword));
        assert!(response.domain.is_global());
        let fingerprint = response.fingerprint.expect("fingerprint");
        assert_eq!(fingerprint.usage[0].ranges.ranges[0], UsageRange { start: 1, end: 4 });
    }

    #[test]
    fn credential_response_tolerates_null_fingerprint() {
        let raw = json!({ "id": "x", "typeName": "Certificate", "fingerprint": null });
        let response: CredentialResponse = serde_json::from_value(raw).expect("deserialize");
        assert!(response.fingerprint.is_none());
        assert_eq!(response.kind(), None);
    }

    #[test]
    fn folder_listing_groups_by_domain() {
        let raw = json!({
            "domains": {
                "_": { "credentials": [{ "id": "a" }] },
                "staging": { "credentials": [{ "id": "b" }, { "id": "c" }] }
            }
        });
        let listing: FolderCredentials = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(listing.domains["staging"].credentials.len(), 2);
    }
}
