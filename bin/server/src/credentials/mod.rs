//! Handlers for project credentials.
//!
//! Every operation requires the operator to be an owner or maintainer of the
//! project. Credentials themselves live in the project's Jenkins folder; the
//! service additionally records who created each one.

pub mod types;


use crate::db::ProjectCredential;
use crate::error::ApiError;
use crate::extract::{JsonBody, Operator, PathParams};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use devops_credentials_access::RoleSet;
use devops_credentials_core::{CredentialId, CredentialKind, Domain, ProjectId};
use devops_credentials_jenkins::scrape_content;
use std::sync::Arc;
use types::{
    CredentialRequest, CredentialView, DeleteCredentialRequest, GetCredentialQuery, IdResponse,
    ListCredentialsQuery, build_payload, join_ownership,
};

fn parse_project(raw: &str) -> Result<ProjectId, ApiError> {
    raw.parse().map_err(|e| ApiError::Decode {
        details: format!("{e}"),
    })
}

fn parse_credential(raw: &str) -> Result<CredentialId, ApiError> {
    raw.parse().map_err(|e| ApiError::Decode {
        details: format!("{e}"),
    })
}

/// Requires the operator to manage `project`.
async fn authorize(state: &AppState, operator: &str, project: &ProjectId) -> Result<(), ApiError> {
    state
        .authorizer
        .require_role(operator, project, &RoleSet::managers())
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, operator = %operator, project = %project, "credential access denied");
            ApiError::from(e)
        })?;
    Ok(())
}

/// Creates a credential in the project's folder and records its creator.
pub async fn create_credential(
    State(state): State<Arc<AppState>>,
    PathParams(project_id): PathParams<String>,
    Operator(operator): Operator,
    JsonBody(request): JsonBody<CredentialRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let project = parse_project(&project_id)?;
    authorize(&state, &operator, &project).await?;

    let kind: CredentialKind = request
        .kind
        .parse()
        .map_err(|_| ApiError::UnsupportedType {
            kind: request.kind.clone(),
        })?;
    let payload = build_payload(kind, request.content, None)?;
    let domain = request.domain;

    match state
        .jenkins
        .get_credential(&domain, payload.id(), &project)
        .await
    {
        Ok(existing) => {
            tracing::debug!(id = %existing.id, project = %project, "credential id already in use");
            return Err(ApiError::Conflict { id: existing.id });
        }
        Err(e) if e.is_not_found() => {}
        Err(e) => {
            tracing::warn!(error = %e, project = %project, "credential existence check failed");
            return Err(e.into());
        }
    }

    let id = state
        .jenkins
        .create_credential(&domain, &project, &payload)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, project = %project, "credential creation failed");
            ApiError::from(e)
        })?;

    let record = ProjectCredential::new(project.clone(), id.clone(), domain, operator);
    state.credentials.insert(&record).await.map_err(|e| {
        tracing::error!(
            error = %e,
            project = %project,
            id = %id,
            "credential created in jenkins but ownership record was not stored"
        );
        ApiError::from(e)
    })?;

    tracing::info!(project = %project, id = %id, %kind, creator = %record.creator, "credential created");
    Ok(Json(id.into()))
}

/// Updates a credential; its type is whatever Jenkins already has.
pub async fn update_credential(
    State(state): State<Arc<AppState>>,
    PathParams((project_id, credential_id)): PathParams<(String, String)>,
    Operator(operator): Operator,
    JsonBody(request): JsonBody<CredentialRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let project = parse_project(&project_id)?;
    let id = parse_credential(&credential_id)?;
    authorize(&state, &operator, &project).await?;

    let domain = request.domain;
    let existing = state
        .jenkins
        .get_credential(&domain, &id, &project)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, project = %project, id = %id, "credential lookup failed");
            ApiError::from(e)
        })?;
    let kind = existing.kind().ok_or_else(|| ApiError::UnsupportedType {
        kind: existing.type_name.clone(),
    })?;

    let payload = build_payload(kind, request.content, Some(&id))?;
    let id = state
        .jenkins
        .update_credential(&domain, &id, &project, &payload)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, project = %project, id = %id, "credential update failed");
            ApiError::from(e)
        })?;

    tracing::info!(project = %project, id = %id, %kind, operator = %operator, "credential updated");
    Ok(Json(id.into()))
}

/// Returns one credential, with its scraped content when requested.
pub async fn get_credential(
    State(state): State<Arc<AppState>>,
    PathParams((project_id, credential_id)): PathParams<(String, String)>,
    Query(query): Query<GetCredentialQuery>,
    Operator(operator): Operator,
) -> Result<Json<CredentialView>, ApiError> {
    let project = parse_project(&project_id)?;
    let id = parse_credential(&credential_id)?;
    authorize(&state, &operator, &project).await?;

    let domain = Domain::new(query.domain.clone().unwrap_or_default());
    let remote = state
        .jenkins
        .get_credential(&domain, &id, &project)
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, project = %project, id = %id, "credential lookup failed");
            ApiError::from(e)
        })?;
    let kind = remote.kind();

    let ownership = state
        .credentials
        .find(&project, &id, &domain)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, project = %project, id = %id, "ownership lookup failed");
            ApiError::from(e)
        })?;

    let mut view = CredentialView::new(remote, ownership.as_ref());
    if let Some(kind) = kind.filter(|_| query.wants_content()) {
        let html = state
            .jenkins
            .credential_content(&domain, &id, &project)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, project = %project, id = %id, "credential page fetch failed");
                ApiError::from(e)
            })?;
        view.content = Some(scrape_content(&html, kind));
    }

    Ok(Json(view))
}

/// Lists the project's credentials in one domain or all of them.
pub async fn list_credentials(
    State(state): State<Arc<AppState>>,
    PathParams(project_id): PathParams<String>,
    Query(query): Query<ListCredentialsQuery>,
    Operator(operator): Operator,
) -> Result<Json<Vec<CredentialView>>, ApiError> {
    let project = parse_project(&project_id)?;
    authorize(&state, &operator, &project).await?;

    let domain = Domain::filter(query.domain.as_deref());
    let remote = state
        .jenkins
        .list_credentials(domain.as_ref(), &project)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, project = %project, "credential listing failed");
            ApiError::from(e)
        })?;

    let records = state
        .credentials
        .list(&project, domain.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, project = %project, "ownership listing failed");
            ApiError::from(e)
        })?;

    Ok(Json(join_ownership(remote, &records)))
}

/// Deletes a credential and its ownership record.
pub async fn delete_credential(
    State(state): State<Arc<AppState>>,
    PathParams((project_id, credential_id)): PathParams<(String, String)>,
    Operator(operator): Operator,
    JsonBody(request): JsonBody<Option<DeleteCredentialRequest>>,
) -> Result<Json<IdResponse>, ApiError> {
    let project = parse_project(&project_id)?;
    let id = parse_credential(&credential_id)?;
    let domain = request.unwrap_or_default().domain;
    authorize(&state, &operator, &project).await?;

    let id = state
        .jenkins
        .delete_credential(&domain, &id, &project)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, project = %project, id = %id, "credential deletion failed");
            ApiError::from(e)
        })?;

    let existed = state
        .credentials
        .delete(&project, &id, &domain)
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                project = %project,
                id = %id,
                "credential deleted in jenkins but ownership record was not removed"
            );
            ApiError::from(e)
        })?;
    if !existed {
        tracing::debug!(project = %project, id = %id, "no ownership record to remove");
    }

    tracing::info!(project = %project, id = %id, operator = %operator, "credential deleted");
    Ok(Json(id.into()))
}
