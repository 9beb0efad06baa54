use bountyboard_libs::{
    leaderboard::Standing,
    summary::{ClaimedIssue, ParticipantProfile, SolutionRef},
    FieldList,
};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, FieldList)]
pub struct Participant {
    pub username: String,
    pub full_name: String,
    pub roll_number: String,
    pub is_active: bool,
    pub bounty: i64,
}

#[derive(Debug, Clone, FromRow, FieldList)]
pub struct Issue {
    pub id: i64,
    pub repo_id: i64,
    pub url: String,
    #[sqlx(rename = "issue_status")]
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, FromRow, FieldList)]
pub struct Solution {
    pub repo_id: i64,
}

#[derive(Debug, Clone, FromRow, FieldList)]
pub struct SessionRow {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Participant> for ParticipantProfile {
    fn from(participant: Participant) -> Self {
        ParticipantProfile {
            username: participant.username,
            full_name: participant.full_name,
            roll_number: participant.roll_number,
            bounty: participant.bounty,
        }
    }
}

impl From<Participant> for Standing {
    fn from(participant: Participant) -> Self {
        Standing {
            username: participant.username,
            full_name: participant.full_name,
            bounty: participant.bounty,
        }
    }
}

impl From<Issue> for ClaimedIssue {
    fn from(issue: Issue) -> Self {
        ClaimedIssue {
            id: issue.id,
            repo_id: issue.repo_id,
            url: issue.url,
            completed: issue.completed,
        }
    }
}

impl From<Solution> for SolutionRef {
    fn from(solution: Solution) -> Self {
        SolutionRef {
            repo_id: solution.repo_id,
        }
    }
}
