use crate::modules::{
    catalog::Catalog, error::ApiError, extract::ValidatedQuery, session::AuthenticatedSession,
};
use axum::{
    extract::{Extension, Path},
    Json,
};
use bountyboard_libs::listing::{
    IssueFilter, IssueListing, IssueQuery, IssueSort, RepositorySummary,
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use std::sync::Arc;
use validator::Validate;

/// An empty `filter=` or `sort=` means no filter and the default order.
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Validate, PartialEq, Eq, Default)]
pub struct IssueListParameter {
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub filter: Option<IssueFilter>,
    #[validate(length(max = 200))]
    pub search: Option<String>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub sort: Option<IssueSort>,
}

impl From<IssueListParameter> for IssueQuery {
    fn from(params: IssueListParameter) -> Self {
        IssueQuery {
            filter: params.filter,
            search: params.search,
            sort: params.sort.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RepositoryListResponse {
    pub count: usize,
    pub items: Vec<RepositorySummary>,
}

#[derive(Debug, Serialize)]
pub struct IssueListResponse {
    pub repository: RepositorySummary,
    pub total: usize,
    pub count: usize,
    pub items: Vec<IssueListing>,
}

pub async fn list_repositories(
    _session: AuthenticatedSession,
    Extension(catalog): Extension<Arc<Catalog>>,
) -> Json<RepositoryListResponse> {
    let items: Vec<RepositorySummary> = catalog
        .repositories()
        .iter()
        .map(|repository| repository.summary())
        .collect();

    Json(RepositoryListResponse {
        count: items.len(),
        items,
    })
}

pub async fn list_issues(
    _session: AuthenticatedSession,
    Path(repo_id): Path<String>,
    ValidatedQuery(params): ValidatedQuery<IssueListParameter>,
    Extension(catalog): Extension<Arc<Catalog>>,
) -> Result<Json<IssueListResponse>, ApiError> {
    let repository = catalog.repository(&repo_id).ok_or_else(|| {
        tracing::warn!("issues requested for unknown repository {}", repo_id);
        ApiError::RepositoryNotFound(repo_id.clone())
    })?;

    let query = IssueQuery::from(params);
    let items = query.apply(&repository.issues);

    Ok(Json(IssueListResponse {
        repository: repository.summary(),
        total: repository.issues.len(),
        count: items.len(),
        items,
    }))
}
