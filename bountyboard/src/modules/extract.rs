use crate::modules::error::ApiError;
use axum::{async_trait, extract::FromRequestParts};
use http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query string deserialized with `serde_urlencoded` and checked with `validator`.
/// Both failures are rejected with 400.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = serde_urlencoded::from_str(query).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            ApiError::BadRequest(format!("invalid format query string: [{}]", rejection))
        })?;

        value.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            ApiError::BadRequest(format!("Validation error: [{}]", rejection).replace('\n', ", "))
        })?;

        Ok(ValidatedQuery(value))
    }
}
