//! In-memory stand-ins for Jenkins, the ownership store and membership.

use crate::db::{ProjectCredential, ProjectCredentialStore};
use crate::state::AppState;
use async_trait::async_trait;
use devops_credentials_access::{
    AuthorizationError, MembershipStore, ProjectAuthorizer, ProjectRole,
};
use devops_credentials_core::{CredentialId, Domain, ProjectId};
use devops_credentials_jenkins::{
    CredentialApi, CredentialPayload, CredentialResponse, Fingerprint, JenkinsError,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Key = (String, String, String);

fn key(folder: &ProjectId, domain: &Domain, id: &CredentialId) -> Key {
    (
        folder.to_string(),
        domain.to_string(),
        id.to_string(),
    )
}

fn not_found() -> JenkinsError {
    JenkinsError::Status {
        status: 404,
        body: String::new(),
    }
}

/// Jenkins fake keyed by (folder, domain, id).
#[derive(Default)]
pub struct FakeJenkins {
    credentials: Mutex<BTreeMap<Key, CredentialPayload>>,
    /// Documents reported as-is, for types no payload describes.
    reported: Mutex<BTreeMap<Key, CredentialResponse>>,
    /// Error returned by every call when set.
    failure: Mutex<Option<JenkinsError>>,
    /// Number of mutating calls received.
    mutations: AtomicUsize,
    /// Number of configuration pages served.
    page_fetches: AtomicUsize,
}

impl FakeJenkins {
    pub fn seed(&self, folder: &str, domain: &str, payload: CredentialPayload) {
        let folder: ProjectId = folder.parse().expect("valid project id");
        let key = key(&folder, &Domain::new(domain), payload.id());
        self.credentials
            .lock()
            .expect("lock")
            .insert(key, payload);
    }

    pub fn seed_reported(&self, folder: &str, response: CredentialResponse) {
        let key = (
            folder.to_string(),
            response.domain.to_string(),
            response.id.clone(),
        );
        self.reported
            .lock()
            .expect("lock")
            .insert(key, response);
    }

    pub fn fail_with(&self, error: JenkinsError) {
        *self.failure.lock().expect("lock") = Some(error);
    }

    pub fn stored(&self, folder: &str, domain: &str, id: &str) -> Option<CredentialPayload> {
        let key = (folder.to_string(), domain.to_string(), id.to_string());
        self.credentials.lock().expect("lock").get(&key).cloned()
    }

    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), JenkinsError> {
        match self.failure.lock().expect("lock").clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn describe(domain: &Domain, payload: &CredentialPayload) -> CredentialResponse {
        CredentialResponse {
            id: payload.id().to_string(),
            type_name: payload.kind().type_name().to_string(),
            display_name: format!("{} ({})", payload.id(), payload.kind()),
            description: String::new(),
            fingerprint: Some(Fingerprint::default()),
            domain: domain.clone(),
        }
    }

    /// Renders the form fields Jenkins would show for `payload`.
    fn page(payload: &CredentialPayload) -> String {
        let document = serde_json::to_value(payload).expect("payload serializes");
        let field = |name: &str| {
            document
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let mut html = format!(
            r#"<form><input name="_.id" type="text" value="{}"><input name="_.description" type="text" value="{}">"#,
            field("id"),
            field("description")
        );
        if !field("username").is_empty() {
            html.push_str(&format!(
                r#"<input name="_.username" type="text" value="{}">"#,
                field("username")
            ));
        }
        if let Some(key) = document["privateKeySource"]["privateKey"].as_str() {
            html.push_str(&format!(r#"<textarea name="_.privateKey">{key}</textarea>"#));
        }
        if let Some(content) = document["kubeconfigSource"]["content"].as_str() {
            html.push_str(&format!(r#"<textarea name="_.content">{content}</textarea>"#));
        }
        html.push_str("</form>");
        html
    }
}

#[async_trait]
impl CredentialApi for FakeJenkins {
    async fn get_credential(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
    ) -> Result<CredentialResponse, JenkinsError> {
        self.check()?;
        let key = key(folder, domain, id);
        if let Some(response) = self.reported.lock().expect("lock").get(&key) {
            return Ok(response.clone());
        }
        self.credentials
            .lock()
            .expect("lock")
            .get(&key)
            .map(|p| Self::describe(domain, p))
            .ok_or_else(not_found)
    }

    async fn list_credentials(
        &self,
        domain: Option<&Domain>,
        folder: &ProjectId,
    ) -> Result<Vec<CredentialResponse>, JenkinsError> {
        self.check()?;
        Ok(self
            .credentials
            .lock()
            .expect("lock")
            .iter()
            .filter(|((f, d, _), _)| {
                f == folder.as_str() && domain.is_none_or(|domain| d == domain.as_str())
            })
            .map(|((_, d, _), p)| Self::describe(&Domain::new(d.as_str()), p))
            .collect())
    }

    async fn create_credential(
        &self,
        domain: &Domain,
        folder: &ProjectId,
        payload: &CredentialPayload,
    ) -> Result<CredentialId, JenkinsError> {
        self.check()?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.credentials
            .lock()
            .expect("lock")
            .insert(key(folder, domain, payload.id()), payload.clone());
        Ok(payload.id().clone())
    }

    async fn update_credential(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
        payload: &CredentialPayload,
    ) -> Result<CredentialId, JenkinsError> {
        self.check()?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut credentials = self.credentials.lock().expect("lock");
        let entry = credentials
            .get_mut(&key(folder, domain, id))
            .ok_or_else(not_found)?;
        *entry = payload.clone();
        Ok(id.clone())
    }

    async fn delete_credential(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
    ) -> Result<CredentialId, JenkinsError> {
        self.check()?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.credentials
            .lock()
            .expect("lock")
            .remove(&key(folder, domain, id))
            .map(|_| id.clone())
            .ok_or_else(not_found)
    }

    async fn credential_content(
        &self,
        domain: &Domain,
        id: &CredentialId,
        folder: &ProjectId,
    ) -> Result<String, JenkinsError> {
        self.check()?;
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        self.credentials
            .lock()
            .expect("lock")
            .get(&key(folder, domain, id))
            .map(Self::page)
            .ok_or_else(not_found)
    }
}

/// Ownership store fake.
#[derive(Default)]
pub struct MemoryCredentialStore {
    records: Mutex<Vec<ProjectCredential>>,
    failing: AtomicBool,
}

impl MemoryCredentialStore {
    pub fn records(&self) -> Vec<ProjectCredential> {
        self.records.lock().expect("lock").clone()
    }

    pub fn push(&self, record: ProjectCredential) {
        self.records.lock().expect("lock").push(record);
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.failing.load(Ordering::SeqCst) {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProjectCredentialStore for MemoryCredentialStore {
    async fn insert(&self, record: &ProjectCredential) -> Result<(), sqlx::Error> {
        self.check()?;
        self.push(record.clone());
        Ok(())
    }

    async fn find(
        &self,
        project: &ProjectId,
        credential: &CredentialId,
        domain: &Domain,
    ) -> Result<Option<ProjectCredential>, sqlx::Error> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .expect("lock")
            .iter()
            .find(|r| {
                &r.project_id == project && &r.credential_id == credential && &r.domain == domain
            })
            .cloned())
    }

    async fn list(
        &self,
        project: &ProjectId,
        domain: Option<&Domain>,
    ) -> Result<Vec<ProjectCredential>, sqlx::Error> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .expect("lock")
            .iter()
            .filter(|r| &r.project_id == project && domain.is_none_or(|d| &r.domain == d))
            .cloned()
            .collect())
    }

    async fn delete(
        &self,
        project: &ProjectId,
        credential: &CredentialId,
        domain: &Domain,
    ) -> Result<bool, sqlx::Error> {
        self.check()?;
        let mut records = self.records.lock().expect("lock");
        let before = records.len();
        records.retain(|r| {
            !(&r.project_id == project && &r.credential_id == credential && &r.domain == domain)
        });
        Ok(records.len() != before)
    }
}

/// Membership fake keyed by (username, project).
#[derive(Default)]
pub struct StaticMembership(HashMap<(String, String), ProjectRole>);

impl StaticMembership {
    pub fn with(mut self, username: &str, project: &str, role: ProjectRole) -> Self {
        self.0
            .insert((username.to_string(), project.to_string()), role);
        self
    }
}

#[async_trait]
impl MembershipStore for StaticMembership {
    async fn role_of(
        &self,
        username: &str,
        project: &ProjectId,
    ) -> Result<Option<ProjectRole>, AuthorizationError> {
        Ok(self
            .0
            .get(&(username.to_string(), project.to_string()))
            .copied())
    }
}

/// Membership lookup whose backend is unreachable.
pub struct UnreachableMembership;

#[async_trait]
impl MembershipStore for UnreachableMembership {
    async fn role_of(
        &self,
        _username: &str,
        _project: &ProjectId,
    ) -> Result<Option<ProjectRole>, AuthorizationError> {
        Err(AuthorizationError::CheckFailed {
            reason: "membership backend unreachable".to_string(),
        })
    }
}

/// A wired application over fakes, with handles to inspect them.
pub struct Harness {
    pub jenkins: Arc<FakeJenkins>,
    pub store: Arc<MemoryCredentialStore>,
    pub state: Arc<AppState>,
}

impl Harness {
    pub fn new(membership: impl MembershipStore + 'static) -> Self {
        let jenkins = Arc::new(FakeJenkins::default());
        let store = Arc::new(MemoryCredentialStore::default());
        let state = Arc::new(AppState::new(
            jenkins.clone(),
            store.clone(),
            ProjectAuthorizer::new(Arc::new(membership)),
        ));
        Self {
            jenkins,
            store,
            state,
        }
    }
}
