use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::{cmp::Ordering, fmt, str::FromStr};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

fn default_multiplier() -> f64 {
    1.0
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IssueListing {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub languages: Vec<String>,
    pub bounty: u32,
    #[serde(default)]
    pub multiplier_active: bool,
    #[serde(default = "default_multiplier")]
    pub multiplier_value: f64,
    #[serde(default)]
    pub is_claimed: bool,
    #[serde(default)]
    pub is_completed: bool,
    pub claimed_by: Option<String>,
}

impl IssueListing {
    /// Bounty after the promotional multiplier, when one is running.
    pub fn effective_bounty(&self) -> f64 {
        if self.multiplier_active {
            f64::from(self.bounty) * self.multiplier_value
        } else {
            f64::from(self.bounty)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryFixture {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub issues: Vec<IssueListing>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub languages: Vec<String>,
    pub issue_count: usize,
    pub open_issue_count: usize,
    pub total_bounty: f64,
}

impl RepositoryFixture {
    pub fn summary(&self) -> RepositorySummary {
        RepositorySummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            languages: self.languages.clone(),
            issue_count: self.issues.len(),
            open_issue_count: self.issues.iter().filter(|issue| !issue.is_claimed).count(),
            total_bounty: self.issues.iter().map(IssueListing::effective_bounty).sum(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum IssueFilter {
    Claimed,
    Unclaimed,
    Completed,
    /// Not completed yet, claimed or not.
    Active,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownOptionError {
    kind: &'static str,
    value: String,
}

impl IssueFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueFilter::Claimed => "claimed",
            IssueFilter::Unclaimed => "unclaimed",
            IssueFilter::Completed => "completed",
            IssueFilter::Active => "active",
        }
    }

    pub fn matches(&self, issue: &IssueListing) -> bool {
        match self {
            IssueFilter::Claimed => issue.is_claimed,
            IssueFilter::Unclaimed => !issue.is_claimed,
            IssueFilter::Completed => issue.is_completed,
            IssueFilter::Active => !issue.is_completed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IssueSort {
    #[default]
    Newest,
    Oldest,
    BountyLow,
    BountyHigh,
}

impl FromStr for IssueFilter {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            IssueFilter::Claimed,
            IssueFilter::Unclaimed,
            IssueFilter::Completed,
            IssueFilter::Active,
        ]
        .into_iter()
        .find(|filter| filter.as_str() == s)
        .ok_or_else(|| UnknownOptionError {
            kind: "filter",
            value: s.to_string(),
        })
    }
}

impl fmt::Display for IssueFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl IssueSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSort::Newest => "newest",
            IssueSort::Oldest => "oldest",
            IssueSort::BountyLow => "bounty-low",
            IssueSort::BountyHigh => "bounty-high",
        }
    }

    fn compare(&self, a: &IssueListing, b: &IssueListing) -> Ordering {
        match self {
            IssueSort::Newest => b.id.cmp(&a.id),
            IssueSort::Oldest => a.id.cmp(&b.id),
            IssueSort::BountyLow => a.effective_bounty().total_cmp(&b.effective_bounty()),
            IssueSort::BountyHigh => b.effective_bounty().total_cmp(&a.effective_bounty()),
        }
    }
}

impl FromStr for IssueSort {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            IssueSort::Newest,
            IssueSort::Oldest,
            IssueSort::BountyLow,
            IssueSort::BountyHigh,
        ]
        .into_iter()
        .find(|sort| sort.as_str() == s)
        .ok_or_else(|| UnknownOptionError {
            kind: "sort",
            value: s.to_string(),
        })
    }
}

impl fmt::Display for IssueSort {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct IssueQuery {
    pub filter: Option<IssueFilter>,
    pub search: Option<String>,
    pub sort: IssueSort,
}

fn normalize(s: &str) -> String {
    s.nfkc().collect::<String>().to_lowercase()
}

impl IssueQuery {
    fn matches_search(&self, needle: &str, issue: &IssueListing) -> bool {
        normalize(&issue.title).contains(needle)
            || issue
                .languages
                .iter()
                .any(|language| normalize(language).contains(needle))
    }

    /// Filters, searches and sorts a repository's issues. The sort is stable so equal
    /// keys keep the fixture order.
    pub fn apply(&self, issues: &[IssueListing]) -> Vec<IssueListing> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(normalize);

        let mut selected: Vec<IssueListing> = issues
            .iter()
            .filter(|issue| self.filter.map_or(true, |filter| filter.matches(issue)))
            .filter(|issue| {
                needle
                    .as_deref()
                    .map_or(true, |needle| self.matches_search(needle, issue))
            })
            .cloned()
            .collect();

        selected.sort_by(|a, b| self.sort.compare(a, b));
        selected
    }
}
