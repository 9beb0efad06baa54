use crate::modules::{catalog::Catalog, session::AuthenticatedSession};
use axum::{extract::Extension, Json};
use bountyboard_libs::badge::BadgeGraph;
use std::sync::Arc;

pub async fn badges(
    _session: AuthenticatedSession,
    Extension(catalog): Extension<Arc<Catalog>>,
) -> Json<BadgeGraph> {
    Json(catalog.badges().clone())
}
