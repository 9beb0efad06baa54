use crate::modules::database::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bountyboard_libs::api::MessageResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("Account does not exist")]
    AccountNotFound,
    #[error("repository {0} not found")]
    RepositoryNotFound(String),
    #[error("registration service is not configured")]
    Unavailable,
    #[error("registration service request failed: {0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::AccountNotFound => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RepositoryNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AccountNotFound => ApiError::AccountNotFound,
            StoreError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageResponse::new(self))).into_response()
    }
}
