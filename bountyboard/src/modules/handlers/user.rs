use crate::modules::{
    database::SharedContributorStore, error::ApiError, extract::ValidatedQuery,
    session::AuthenticatedSession,
};
use axum::{extract::Extension, Json};
use bountyboard_libs::{api::USERNAME_PATTERN, summary::UserSummary};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct UserSummaryParameter {
    #[validate(regex = "USERNAME_PATTERN")]
    pub username: String,
}

/// `GET /api/user?username=<name>`
///
/// The session is checked before the query string, so an anonymous request is
/// answered with 403 whatever its parameters are.
pub async fn user_summary(
    AuthenticatedSession(session): AuthenticatedSession,
    ValidatedQuery(params): ValidatedQuery<UserSummaryParameter>,
    Extension(store): Extension<SharedContributorStore>,
) -> Result<Json<UserSummary>, ApiError> {
    let start_process = Instant::now();

    let summary = match store.user_summary(&params.username).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(
                "failed to build summary of {} requested by {} cause: {:?}",
                params.username,
                session.username,
                e
            );
            return Err(e.into());
        }
    };

    let time: u32 = Instant::now().duration_since(start_process).as_millis() as u32;
    tracing::info!(
        target: "querylog",
        "elapsed_time={} username={} completed={} incomplete={}",
        time, summary.username, summary.completed_count, summary.incomplete_count
    );

    Ok(Json(summary))
}
