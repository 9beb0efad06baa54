use crate::modules::{
    database::SharedContributorStore, error::ApiError, extract::ValidatedQuery,
    session::AuthenticatedSession,
};
use axum::{extract::Extension, Json};
use bountyboard_libs::leaderboard::{self, AvatarUrlTemplate, LeaderboardEntry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, PartialEq, Eq, Default)]
pub struct LeaderboardParameter {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub count: usize,
    pub items: Vec<LeaderboardEntry>,
}

pub async fn leaderboard(
    _session: AuthenticatedSession,
    ValidatedQuery(params): ValidatedQuery<LeaderboardParameter>,
    Extension(store): Extension<SharedContributorStore>,
    Extension(avatar): Extension<Arc<AvatarUrlTemplate>>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let limit = params.limit.unwrap_or(10);

    let standings = store.standings(limit).await.map_err(|e| {
        tracing::error!("failed to read standings cause: {:?}", e);
        ApiError::from(e)
    })?;
    let items = leaderboard::rank(standings, &avatar);

    Ok(Json(LeaderboardResponse {
        count: items.len(),
        items,
    }))
}
