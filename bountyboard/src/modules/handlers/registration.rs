use crate::modules::{
    error::ApiError,
    registration::{RegistrationClient, RegistrationEndpoint},
};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

type Payload = Result<Json<Value>, JsonRejection>;

/// Availability of the upstream service is checked before the body, so an unconfigured
/// deployment answers 503 whatever was posted.
async fn relay(
    client: Option<Extension<Arc<RegistrationClient>>>,
    endpoint: RegistrationEndpoint,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Some(Extension(client)) = client else {
        tracing::warn!("{} requested but REGISTRATION_API_URL is not set", endpoint);
        return Err(ApiError::Unavailable);
    };

    let Json(payload) = payload.map_err(|rejection| {
        tracing::error!("invalid {} request body: {}", endpoint, rejection);
        ApiError::BadRequest(format!("invalid request body: [{}]", rejection))
    })?;

    match client.forward(endpoint, &payload).await {
        Ok((status, body)) => Ok((status, Json(body))),
        Err(e) => {
            tracing::error!("failed to forward {} request cause: {:?}", endpoint, e);
            Err(ApiError::Upstream(e.to_string()))
        }
    }
}

/// `POST /api/register`
pub async fn register(
    client: Option<Extension<Arc<RegistrationClient>>>,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    relay(client, RegistrationEndpoint::Register, payload).await
}

/// `POST /api/verify-otp`
pub async fn verify_otp(
    client: Option<Extension<Arc<RegistrationClient>>>,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    relay(client, RegistrationEndpoint::VerifyOtp, payload).await
}
