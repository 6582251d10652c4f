//! Request and response documents of the credentials API.

use crate::db::ProjectCredential;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use devops_credentials_core::{CredentialId, CredentialKind, Domain};
use devops_credentials_jenkins::{
    CredentialContent, CredentialPayload, CredentialResponse, Fingerprint,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of create and update requests.
#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    /// Credential type tag; ignored on update.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub domain: Domain,
    /// Type-specific fields, decoded once the type is known.
    #[serde(default)]
    pub content: Value,
}

/// Optional body of delete requests.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteCredentialRequest {
    #[serde(default)]
    pub domain: Domain,
}

/// Query of the get endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct GetCredentialQuery {
    pub domain: Option<String>,
    /// Any non-empty value asks for the scraped content.
    pub content: Option<String>,
}

impl GetCredentialQuery {
    pub fn wants_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Query of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListCredentialsQuery {
    pub domain: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UsernamePasswordContent {
    id: String,
    username: String,
    password: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SshContent {
    id: String,
    username: String,
    passphrase: String,
    private_key: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SecretTextContent {
    id: String,
    secret: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KubeconfigContent {
    id: String,
    content: String,
    description: String,
}

fn decode_content<T: DeserializeOwned + Default>(content: Value) -> Result<T, ApiError> {
    if content.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(content).map_err(|e| ApiError::Decode {
        details: format!("invalid credential content: {e}"),
    })
}

/// Picks the credential id: `fixed` when given, otherwise the content's own id.
fn resolve_id(fixed: Option<&CredentialId>, content_id: &str) -> Result<CredentialId, ApiError> {
    if let Some(id) = fixed {
        return Ok(id.clone());
    }
    if content_id.trim().is_empty() {
        return Err(ApiError::Decode {
            details: "credential id must not be empty".to_string(),
        });
    }
    content_id.parse().map_err(|e| ApiError::Decode {
        details: format!("{e}"),
    })
}

/// Decodes `content` as the fields of `kind` and builds the Jenkins document.
///
/// On update `fixed_id` is the id from the path and overrides any id in the
/// content.
pub fn build_payload(
    kind: CredentialKind,
    content: Value,
    fixed_id: Option<&CredentialId>,
) -> Result<CredentialPayload, ApiError> {
    let payload = match kind {
        CredentialKind::UsernamePassword => {
            let c: UsernamePasswordContent = decode_content(content)?;
            CredentialPayload::username_password(
                resolve_id(fixed_id, &c.id)?,
                c.username,
                c.password,
                c.description,
            )
        }
        CredentialKind::Ssh => {
            let c: SshContent = decode_content(content)?;
            CredentialPayload::ssh(
                resolve_id(fixed_id, &c.id)?,
                c.username,
                c.passphrase,
                c.private_key,
                c.description,
            )
        }
        CredentialKind::SecretText => {
            let c: SecretTextContent = decode_content(content)?;
            CredentialPayload::secret_text(resolve_id(fixed_id, &c.id)?, c.secret, c.description)
        }
        CredentialKind::Kubeconfig => {
            let c: KubeconfigContent = decode_content(content)?;
            CredentialPayload::kubeconfig(resolve_id(fixed_id, &c.id)?, c.content, c.description)
        }
    };
    Ok(payload)
}

/// Response carrying only a credential id.
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: String,
}

impl From<CredentialId> for IdResponse {
    fn from(id: CredentialId) -> Self {
        Self {
            id: id.into_inner(),
        }
    }
}

/// A credential as returned to API callers.
#[derive(Debug, Serialize)]
pub struct CredentialView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<FingerprintView>,
    pub description: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    pub content: Option<CredentialContent>,
}

#[derive(Debug, Serialize)]
pub struct FingerprintView {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hash: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub usage: Vec<UsageView>,
}

#[derive(Debug, Serialize)]
pub struct UsageView {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub ranges: RangesView,
}

#[derive(Debug, Serialize)]
pub struct RangesView {
    pub ranges: Vec<RangeView>,
}

#[derive(Debug, Serialize)]
pub struct RangeView {
    pub start: i64,
    pub end: i64,
}

impl From<Fingerprint> for FingerprintView {
    fn from(fingerprint: Fingerprint) -> Self {
        Self {
            file_name: fingerprint.file_name,
            hash: fingerprint.hash,
            usage: fingerprint
                .usage
                .into_iter()
                .map(|u| UsageView {
                    name: u.name,
                    ranges: RangesView {
                        ranges: u
                            .ranges
                            .ranges
                            .into_iter()
                            .map(|r| RangeView {
                                start: r.start,
                                end: r.end,
                            })
                            .collect(),
                    },
                })
                .collect(),
        }
    }
}

impl CredentialView {
    /// Merges a Jenkins credential with its ownership record, if any.
    pub fn new(remote: CredentialResponse, ownership: Option<&ProjectCredential>) -> Self {
        let fingerprint = remote
            .fingerprint
            .filter(|f| !f.hash.is_empty())
            .map(FingerprintView::from);

        Self {
            id: remote.id,
            kind: remote.type_name,
            display_name: remote.display_name,
            fingerprint,
            description: remote.description,
            domain: remote.domain.to_string(),
            create_time: ownership.map(|o| o.create_time),
            creator: ownership.map(|o| o.creator.clone()),
            content: None,
        }
    }
}

/// Joins listed credentials with the project's ownership records on (id, domain).
pub fn join_ownership(
    remote: Vec<CredentialResponse>,
    records: &[ProjectCredential],
) -> Vec<CredentialView> {
    remote
        .into_iter()
        .map(|credential| {
            let ownership = records.iter().find(|r| {
                r.credential_id.as_str() == credential.id && r.domain == credential.domain
            });
            CredentialView::new(credential, ownership)
        })
        .collect()
}
