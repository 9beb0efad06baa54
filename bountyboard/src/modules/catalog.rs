use bountyboard_libs::{
    badge::{Badge, BadgeGraph, BadgeGraphError},
    listing::RepositoryFixture,
};
use std::collections::HashSet;
use thiserror::Error;

static REPOSITORIES_JSON: &str = include_str!("../../fixtures/repositories.json");
static BADGES_JSON: &str = include_str!("../../fixtures/badges.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse {0} fixture")]
    ParseError(&'static str, #[source] serde_json::Error),
    #[error("repository id {0} is defined more than once")]
    DuplicateRepository(String),
    #[error("invalid badge fixture: {0}")]
    BadgeError(#[from] BadgeGraphError),
}

/// Read-only repository, issue and badge data served to the dashboard.
#[derive(Debug)]
pub struct Catalog {
    repositories: Vec<RepositoryFixture>,
    badges: BadgeGraph,
}

impl Catalog {
    pub fn new(
        repositories: Vec<RepositoryFixture>,
        badges: Vec<Badge>,
    ) -> Result<Self, CatalogError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for repository in repositories.iter() {
            if !seen.insert(repository.id.as_str()) {
                return Err(CatalogError::DuplicateRepository(repository.id.clone()));
            }
        }

        let badges = BadgeGraph::build(badges)?;

        Ok(Self {
            repositories,
            badges,
        })
    }

    pub fn from_json(repositories: &str, badges: &str) -> Result<Self, CatalogError> {
        let repositories: Vec<RepositoryFixture> = serde_json::from_str(repositories)
            .map_err(|e| CatalogError::ParseError("repository", e))?;
        let badges: Vec<Badge> =
            serde_json::from_str(badges).map_err(|e| CatalogError::ParseError("badge", e))?;

        Self::new(repositories, badges)
    }

    /// The catalog compiled into the binary from `fixtures/`.
    pub fn embedded() -> Result<Self, CatalogError> {
        let catalog = Self::from_json(REPOSITORIES_JSON, BADGES_JSON)?;
        tracing::info!(
            "catalog loaded with {} repositories and {} badges",
            catalog.repositories.len(),
            catalog.badges.badge_count()
        );
        Ok(catalog)
    }

    pub fn repositories(&self) -> &[RepositoryFixture] {
        &self.repositories
    }

    pub fn repository(&self, id: &str) -> Option<&RepositoryFixture> {
        self.repositories
            .iter()
            .find(|repository| repository.id == id)
    }

    pub fn badges(&self) -> &BadgeGraph {
        &self.badges
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
