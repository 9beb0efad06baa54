//! Per-participant summary of claimed issues and merged solutions.
//!
//! The summary is assembled from three reads (participant, claimed issues, solutions)
//! that the caller performs inside one transaction. Everything here is pure.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantProfile {
    pub username: String,
    pub full_name: String,
    pub roll_number: String,
    pub bounty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedIssue {
    pub id: i64,
    pub repo_id: i64,
    pub url: String,
    pub completed: bool,
}

/// A merged pull request. Only the repository is known, not the issue it solves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionRef {
    pub repo_id: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub id: i64,
    pub repo_id: i64,
    pub url: String,
    pub issue_status: bool,
    pub pr_count: u32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub username: String,
    pub full_name: String,
    pub roll_number: String,
    pub bounty: i64,
    pub completed_issues: Vec<IssueSummary>,
    pub incomplete_issues: Vec<IssueSummary>,
    pub completed_count: usize,
    pub incomplete_count: usize,
}

/// Counts solutions per repository.
pub fn count_by_repository(solutions: &[SolutionRef]) -> HashMap<i64, u32> {
    solutions
        .iter()
        .fold(HashMap::new(), |mut counts, solution| {
            *counts.entry(solution.repo_id).or_insert(0) += 1;
            counts
        })
}

/// Joins the claimed issues with the solution counts of their repository and splits
/// them by status. Issue order is preserved inside each partition.
///
/// `pr_count` is repository-level: every issue of a repository gets the same count.
pub fn summarize(
    participant: ParticipantProfile,
    issues: Vec<ClaimedIssue>,
    solutions: &[SolutionRef],
) -> UserSummary {
    let counts = count_by_repository(solutions);

    let (completed_issues, incomplete_issues): (Vec<IssueSummary>, Vec<IssueSummary>) = issues
        .into_iter()
        .map(|issue| IssueSummary {
            pr_count: counts.get(&issue.repo_id).copied().unwrap_or(0),
            id: issue.id,
            repo_id: issue.repo_id,
            url: issue.url,
            issue_status: issue.completed,
        })
        .partition(|issue| issue.issue_status);

    UserSummary {
        username: participant.username,
        full_name: participant.full_name,
        roll_number: participant.roll_number,
        bounty: participant.bounty,
        completed_count: completed_issues.len(),
        incomplete_count: incomplete_issues.len(),
        completed_issues,
        incomplete_issues,
    }
}
