use crate::types::tables::{Issue, Participant, Solution};
use async_trait::async_trait;
use bountyboard_libs::{
    leaderboard::Standing,
    summary::{self, ClaimedIssue, SolutionRef, UserSummary},
    FieldList,
};
use sqlx::{postgres::Postgres, Pool};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Account does not exist")]
    AccountNotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ContributorStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    /// Summary of an active participant's claimed issues and merged solutions.
    async fn user_summary(&self, username: &str) -> Result<UserSummary, StoreError>;

    /// Active participants, highest bounty first.
    async fn standings(&self, limit: u32) -> Result<Vec<Standing>, StoreError>;
}

pub type SharedContributorStore = Arc<dyn ContributorStore>;

pub struct PgContributorStore {
    pool: Pool<Postgres>,
}

impl PgContributorStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContributorStore for PgContributorStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// The three reads share one read-only snapshot, so the issue list and the solution
    /// counts always describe the same state of the tables.
    async fn user_summary(&self, username: &str) -> Result<UserSummary, StoreError> {
        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::error!("failed to start transaction cause: {:?}", e);
                return Err(e.into());
            }
        };

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut tx)
            .await?;

        let query = format!(
            r#"SELECT {} FROM "participants" WHERE "username" = $1 AND "is_active" = TRUE"#,
            Participant::field_list()
        );
        let participant: Option<Participant> = sqlx::query_as(&query)
            .bind(username)
            .fetch_optional(&mut tx)
            .await?;
        let participant = match participant {
            Some(participant) => participant,
            None => {
                tracing::info!("active participant {} not found", username);
                tx.rollback().await?;
                return Err(StoreError::AccountNotFound);
            }
        };

        let query = format!(
            r#"SELECT {} FROM "issues" WHERE "claimant" = $1 ORDER BY "id""#,
            Issue::field_list()
        );
        let issues: Vec<Issue> = sqlx::query_as(&query)
            .bind(username)
            .fetch_all(&mut tx)
            .await?;

        let query = format!(
            r#"SELECT {} FROM "solutions" WHERE "username" = $1"#,
            Solution::field_list()
        );
        let solutions: Vec<Solution> = sqlx::query_as(&query)
            .bind(username)
            .fetch_all(&mut tx)
            .await?;

        tx.commit().await?;

        let issues: Vec<ClaimedIssue> = issues.into_iter().map(ClaimedIssue::from).collect();
        let solutions: Vec<SolutionRef> = solutions.into_iter().map(SolutionRef::from).collect();

        Ok(summary::summarize(participant.into(), issues, &solutions))
    }

    async fn standings(&self, limit: u32) -> Result<Vec<Standing>, StoreError> {
        let query = format!(
            r#"
            SELECT {}
            FROM "participants"
            WHERE "is_active" = TRUE
            ORDER BY "bounty" DESC, "username" ASC
            LIMIT $1
            "#,
            Participant::field_list()
        );
        let participants: Vec<Participant> = sqlx::query_as(&query)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(participants.into_iter().map(Standing::from).collect())
    }
}
