/// Request extractors
///
/// - [`ValidatedJson`]: JSON body that has passed its `validator` rules
/// - [`Path`], [`Query`]: axum's extractors with rejections rendered as
///   `{"error": ...}` instead of plain text
/// - [`parse_id`]: rejects non-positive path ids

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body deserialized and validated before the handler runs
///
/// Malformed JSON and failed rules both become a 400 with the usual
/// `{"error": ...}` body.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Path parameters; a segment that does not parse is a JSON 400
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// Query string; undecodable parameters are a JSON 400
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// Ids in paths and bodies must be positive
pub fn parse_id(id: i64, name: &str) -> Result<i64, ApiError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ApiError::BadRequest(format!("{} must be a positive integer", name)))
    }
}
