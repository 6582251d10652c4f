//! `reqwest` implementation of [`CredentialApi`].

use crate::api::CredentialApi;
use crate::config::JenkinsConfig;
use crate::error::JenkinsError;
use crate::path;
use crate::types::{
    CreateCredentialEnvelope, CredentialPayload, CredentialResponse, DomainCredentials,
    FolderCredentials,
};
use async_trait::async_trait;
use devops_credentials_core::{CredentialId, Domain, ProjectId};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// CSRF crumb advertised by `crumbIssuer`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Crumb {
    crumb: String,
    crumb_request_field: String,
}

/// Jenkins credentials-plugin client.
#[derive(Clone)]
pub struct JenkinsClient {
    http: Client,
    base: Url,
    user: String,
    password: String,
}

impl JenkinsClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `JenkinsError::Configuration` if the address is not a usable
    /// base URL or the HTTP client cannot be built.
    pub fn new(config: &JenkinsConfig) -> Result<Self, JenkinsError> {
        let base = Url::parse(config.address()).map_err(|e| JenkinsError::Configuration {
            reason: format!("invalid address '{}': {e}", config.address()),
        })?;
        if base.cannot_be_a_base() {
            return Err(JenkinsError::Configuration {
                reason: format!("address '{}' cannot be a base URL", config.address()),
            });
        }

        // Crumbs are bound to the session cookie handed out with them.
        let http = Client::builder()
            .timeout(config.request_timeout())
            .cookie_store(true)
            .build()
            .map_err(|e| JenkinsError::Configuration {
                reason: format!("HTTP client error: {e}"),
            })?;

        Ok(Self {
            http,
            base,
            user: config.user().to_string(),
            password: config.password().to_string(),
        })
    }

    /// Resolves path segments against the base URL, percent-encoding each one.
    fn url(&self, segments: &[String]) -> Result<Url, JenkinsError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| JenkinsError::Configuration {
                reason: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.user, Some(&self.password))
    }

    /// Turns non-success responses into `JenkinsError::Status`.
    async fn check(response: Response) -> Result<Response, JenkinsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Err(JenkinsError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_text(
        &self,
        segments: &[String],
        query: &[(&str, &str)],
    ) -> Result<String, JenkinsError> {
        let url = self.url(segments)?;
        let response = self
            .authenticated(self.http.get(url))
            .query(query)
            .send()
            .await?;
        Ok(Self::check(response).await?.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[String],
        query: &[(&str, &str)],
    ) -> Result<T, JenkinsError> {
        let body = self.get_text(segments, query).await?;
        serde_json::from_str(&body).map_err(|e| JenkinsError::Decode {
            reason: e.to_string(),
        })
    }

    /// Fetches a CSRF crumb; `None` when CSRF protection is disabled.
    async fn crumb(&self) -> Result<Option<Crumb>, JenkinsError> {
        let segments = path::join(Vec::new(), &["crumbIssuer", "api", "json"]);
        match self.get_json::<Crumb>(&segments, &[]).await {
            Ok(crumb) => Ok(Some(crumb)),
            Err(e) if e.is_not_found() => {
                debug!("crumb issuer disabled");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn post_form(
        &self,
        segments: &[String],
        form: &[(&str, String)],
    ) -> Result<(), JenkinsError> {
        let url = self.url(segments)?;
        let mut request = self.authenticated(self.http.post(url)).form(form);
        if let Some(crumb) = self.crumb().await? {
            request = request.header(crumb.crumb_request_field, crumb.crumb);
        }
        Self::check(request.send().await?).await?;
        Ok(())
    }

    fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, JenkinsError> {
        serde_json::to_string(value).map_err(|e| JenkinsError::Decode {
            reason: format!("failed to encode credential document: {e}"),
        })
    }
}

#[async_trait]
impl CredentialApi for JenkinsClient {
    #[instrument(skip_all, fields(folder = %folder, domain = %domain, id = %id))]
    async fn get_credential(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
    ) -> Result<CredentialResponse, JenkinsError> {
        let segments = path::join(path::credential(folder, domain, id), &["api", "json"]);
        let mut credential: CredentialResponse =
            self.get_json(&segments, &[("depth", "1")]).await?;
        credential.domain = domain.clone();
        Ok(credential)
    }

    #[instrument(skip_all, fields(folder = %folder, domain = ?domain))]
    async fn list_credentials(
        &self,
        domain: Option<&Domain>,
        folder: &ProjectId,
    ) -> Result<Vec<CredentialResponse>, JenkinsError> {
        let query = [("depth", "2")];
        let credentials = match domain {
            Some(domain) => {
                let segments = path::join(path::domain(folder, domain), &["api", "json"]);
                let listing: DomainCredentials = self.get_json(&segments, &query).await?;
                listing
                    .credentials
                    .into_iter()
                    .map(|mut c| {
                        c.domain = domain.clone();
                        c
                    })
                    .collect::<Vec<_>>()
            }
            None => {
                let segments = path::join(path::store(folder), &["api", "json"]);
                let listing: FolderCredentials = self.get_json(&segments, &query).await?;
                listing
                    .domains
                    .into_iter()
                    .flat_map(|(name, store)| {
                        let domain = Domain::new(name);
                        store.credentials.into_iter().map(move |mut c| {
                            c.domain = domain.clone();
                            c
                        })
                    })
                    .collect()
            }
        };
        debug!(count = credentials.len(), "listed credentials");
        Ok(credentials)
    }

    #[instrument(skip_all, fields(folder = %folder, domain = %domain, id = %payload.id(), kind = %payload.kind()))]
    async fn create_credential(
        &self,
        domain: &Domain,
        folder: &ProjectId,
        payload: &CredentialPayload,
    ) -> Result<CredentialId, JenkinsError> {
        let segments = path::join(path::domain(folder, domain), &["createCredentials"]);
        let json = Self::encode_json(&CreateCredentialEnvelope {
            credentials: payload,
        })?;
        self.post_form(&segments, &[("json", json)]).await?;
        debug!("credential created");
        Ok(payload.id().clone())
    }

    #[instrument(skip_all, fields(folder = %folder, domain = %domain, id = %id, kind = %payload.kind()))]
    async fn update_credential(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
        payload: &CredentialPayload,
    ) -> Result<CredentialId, JenkinsError> {
        let segments = path::join(path::credential(folder, domain, id), &["updateSubmit"]);
        let json = Self::encode_json(payload)?;
        self.post_form(&segments, &[("json", json)]).await?;
        debug!("credential updated");
        Ok(id.clone())
    }

    #[instrument(skip_all, fields(folder = %folder, domain = %domain, id = %id))]
    async fn delete_credential(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
    ) -> Result<CredentialId, JenkinsError> {
        let segments = path::join(path::credential(folder, domain, id), &["doDelete"]);
        self.post_form(&segments, &[]).await?;
        debug!("credential deleted");
        Ok(id.clone())
    }

    #[instrument(skip_all, fields(folder = %folder, domain = %domain, id = %id))]
    async fn credential_content(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
    ) -> Result<String, JenkinsError> {
        let segments = path::join(path::credential(folder, domain, id), &["update"]);
        self.get_text(&segments, &[]).await
    }
}
