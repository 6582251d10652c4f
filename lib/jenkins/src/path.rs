//! URL paths of folder-scoped credential stores.
//!
//! Paths are produced as segment lists so the client can percent-encode each
//! segment on its own.

use devops_credentials_core::{CredentialId, Domain, ProjectId};

/// Segments of a project's folder, e.g. `team/app` becomes `job/team/job/app`.
#[must_use]
pub fn folder(project: &ProjectId) -> Vec<String> {
    project
        .as_str()
        .split('/')
        .filter(|part| !part.is_empty())
        .flat_map(|part| ["job".to_string(), part.to_string()])
        .collect()
}

/// Segments of a project's folder credential store.
#[must_use]
pub fn store(project: &ProjectId) -> Vec<String> {
    let mut segments = folder(project);
    segments.extend(["credentials", "store", "folder"].map(String::from));
    segments
}

/// Segments of one domain inside a project's credential store.
#[must_use]
pub fn domain(project: &ProjectId, domain: &Domain) -> Vec<String> {
    let mut segments = store(project);
    segments.push("domain".to_string());
    segments.push(domain.as_str().to_string());
    segments
}

/// Segments of one credential.
#[must_use]
pub fn credential(project: &ProjectId, domain_name: &Domain, id: &CredentialId) -> Vec<String> {
    let mut segments = domain(project, domain_name);
    segments.push("credential".to_string());
    segments.push(id.as_str().to_string());
    segments
}

/// Appends trailing segments to a base path.
#[must_use]
pub fn join(mut base: Vec<String>, tail: &[&str]) -> Vec<String> {
    base.extend(tail.iter().map(|s| (*s).to_string()));
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(raw: &str) -> ProjectId {
        raw.parse().expect("valid project id")
    }

    #[test]
    fn nested_folders_expand() {
        assert_eq!(folder(&project("team/app")).join("/"), "job/team/job/app");
        assert_eq!(folder(&project("app")).join("/"), "job/app");
    }

    #[test]
    fn credential_path() {
        let id: CredentialId = "gh".parse().expect("valid credential id");
        let path = credential(&project("app"), &Domain::global(), &id);
        assert_eq!(
            path.join("/"),
            "job/app/credentials/store/folder/domain/_/credential/gh"
        );
        assert_eq!(
            join(path, &["api", "json"]).join("/"),
            "job/app/credentials/store/folder/domain/_/credential/gh/api/json"
        );
    }

    #[test]
    fn store_path() {
        assert_eq!(
            store(&project("app")).join("/"),
            "job/app/credentials/store/folder"
        );
    }
}
