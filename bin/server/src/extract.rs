//! Request extractors for Axum.

use crate::error::ApiError;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// Header the gateway sets to the authenticated username.
pub const OPERATOR_HEADER: &str = "X-Token-Username";

/// Extractor for the operator performing the request.
///
/// Rejects with 401 when the identity header is absent or blank.
#[derive(Debug, Clone)]
pub struct Operator(pub String);

impl<S> FromRequestParts<S> for Operator
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(OPERATOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::Unauthenticated)?;

        Ok(Operator(username.to_string()))
    }
}

/// Path parameter extractor whose failures are answered as `ApiError::Decode`.
#[derive(Debug)]
pub struct PathParams<T>(pub T);

impl<T, S> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::Decode {
                details: e.body_text(),
            })?;
        Ok(PathParams(params))
    }
}

/// JSON body extractor whose failures are answered as `ApiError::Decode`.
///
/// An empty body decodes as JSON `null`, so `JsonBody<Option<T>>` accepts a
/// missing body. The `Content-Type` header is not checked.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Decode {
                details: e.body_text(),
            })?;

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };

        serde_json::from_slice(body)
            .map(JsonBody)
            .map_err(|e| ApiError::Decode {
                details: e.to_string(),
            })
    }
}
