pub mod badge;
pub mod leaderboard;
pub mod registration;
pub mod repository;
pub mod user;

use crate::modules::{catalog::Catalog, database::SharedContributorStore};
use axum::{extract::Extension, http::StatusCode};
use std::sync::Arc;

pub async fn liveness(Extension(store): Extension<SharedContributorStore>) -> StatusCode {
    match store.ping().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("database ping failed cause: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub async fn readiness(
    Extension(store): Extension<SharedContributorStore>,
    Extension(catalog): Extension<Arc<Catalog>>,
) -> StatusCode {
    if let Err(e) = store.ping().await {
        tracing::error!("database ping failed cause: {:?}", e);
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    if catalog.is_empty() {
        tracing::error!("catalog has no repositories");
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

#[cfg(test)]
mod test {
    use crate::modules::testing::{send, TestApp};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_liveness() {
        let app = TestApp::new();
        let (status, _) = send(app.router(), "GET", "/api/liveness", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let app = TestApp::new().failing("connection refused");
        let (status, _) = send(app.router(), "GET", "/api/liveness", None, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_readiness() {
        let app = TestApp::new();
        let (status, _) = send(app.router(), "GET", "/api/readiness", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_with_unreachable_database() {
        let app = TestApp::new().failing("connection refused");
        let (status, _) = send(app.router(), "GET", "/api/readiness", None, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_readiness_with_empty_catalog() {
        let app = TestApp::new().without_repositories();
        let (status, _) = send(app.router(), "GET", "/api/readiness", None, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = send(app.router(), "GET", "/api/liveness", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
