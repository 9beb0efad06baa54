use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub const MAX_BADGES: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BadgeGraphError {
    #[error("at most 32 badges are supported, got {0}")]
    TooManyBadges(usize),
    #[error("badge id {0} is defined more than once")]
    DuplicateBadge(String),
    #[error("badge {badge} requires unknown badge {prerequisite}")]
    UnknownPrerequisite { badge: String, prerequisite: String },
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub tier: BadgeTier,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub requires: Vec<String>,
}

/// Connector drawn from a prerequisite to the badge that needs it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RequirementEdge {
    pub from: String,
    pub to: String,
    pub satisfied: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BadgeCategory {
    pub name: String,
    pub unlocked_count: usize,
    pub badges: Vec<Badge>,
    pub edges: Vec<RequirementEdge>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BadgeGraph {
    pub categories: Vec<BadgeCategory>,
}

impl BadgeGraph {
    /// Groups the badges by category, in order of first appearance, and derives the
    /// requirement edges of each category. Prerequisites living in another category
    /// are valid but produce no edge.
    pub fn build(badges: Vec<Badge>) -> Result<Self, BadgeGraphError> {
        if badges.len() > MAX_BADGES {
            return Err(BadgeGraphError::TooManyBadges(badges.len()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for badge in badges.iter() {
            if !seen.insert(badge.id.as_str()) {
                return Err(BadgeGraphError::DuplicateBadge(badge.id.clone()));
            }
        }

        let lookup: HashMap<&str, &Badge> = badges
            .iter()
            .map(|badge| (badge.id.as_str(), badge))
            .collect();
        for badge in badges.iter() {
            if let Some(prerequisite) = badge
                .requires
                .iter()
                .find(|prerequisite| !lookup.contains_key(prerequisite.as_str()))
            {
                return Err(BadgeGraphError::UnknownPrerequisite {
                    badge: badge.id.clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }

        let lookup = &lookup;
        let edges_of = |category: &str| -> Vec<RequirementEdge> {
            badges
                .iter()
                .filter(|badge| badge.category == category)
                .flat_map(move |badge| {
                    badge.requires.iter().filter_map(move |prerequisite| {
                        let prerequisite = lookup[prerequisite.as_str()];
                        (prerequisite.category == category).then(|| RequirementEdge {
                            from: prerequisite.id.clone(),
                            to: badge.id.clone(),
                            satisfied: prerequisite.unlocked && badge.unlocked,
                        })
                    })
                })
                .collect()
        };

        let category_names: Vec<String> = badges
            .iter()
            .map(|badge| badge.category.clone())
            .unique()
            .collect();

        let categories = category_names
            .into_iter()
            .map(|name| {
                let edges = edges_of(&name);
                let members: Vec<Badge> = badges
                    .iter()
                    .filter(|badge| badge.category == name)
                    .cloned()
                    .collect();
                BadgeCategory {
                    unlocked_count: members.iter().filter(|badge| badge.unlocked).count(),
                    badges: members,
                    edges,
                    name,
                }
            })
            .collect();

        Ok(Self { categories })
    }

    pub fn badge_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.badges.len())
            .sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn badge(id: &str, category: &str, unlocked: bool, requires: &[&str]) -> Badge {
        Badge {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: format!("{} badge", id),
            category: category.to_string(),
            tier: BadgeTier::Bronze,
            unlocked,
            requires: requires.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[test]
    fn test_edges_within_category() {
        let graph = BadgeGraph::build(vec![
            badge("first-pr", "contribution", true, &[]),
            badge("ten-prs", "contribution", true, &["first-pr"]),
            badge("fifty-prs", "contribution", false, &["ten-prs"]),
        ])
        .unwrap();

        assert_eq!(graph.categories.len(), 1);
        let category = &graph.categories[0];
        assert_eq!(category.unlocked_count, 2);
        assert_eq!(
            category.edges,
            vec![
                RequirementEdge {
                    from: String::from("first-pr"),
                    to: String::from("ten-prs"),
                    satisfied: true,
                },
                RequirementEdge {
                    from: String::from("ten-prs"),
                    to: String::from("fifty-prs"),
                    satisfied: false,
                },
            ]
        );
    }

    #[test]
    fn test_cross_category_prerequisites_have_no_edge() {
        let graph = BadgeGraph::build(vec![
            badge("first-pr", "contribution", true, &[]),
            badge("reviewer", "community", true, &["first-pr"]),
            badge("mentor", "community", false, &["reviewer", "first-pr"]),
        ])
        .unwrap();

        let names: Vec<&str> = graph
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .collect();
        assert_eq!(names, vec!["contribution", "community"]);
        assert!(graph.categories[0].edges.is_empty());
        assert_eq!(
            graph.categories[1].edges,
            vec![RequirementEdge {
                from: String::from("reviewer"),
                to: String::from("mentor"),
                satisfied: false,
            }]
        );
        assert_eq!(graph.badge_count(), 3);
    }

    #[test]
    fn test_edge_needs_both_endpoints_unlocked() {
        let graph = BadgeGraph::build(vec![
            badge("locked-root", "streak", false, &[]),
            badge("unlocked-leaf", "streak", true, &["locked-root"]),
        ])
        .unwrap();

        assert!(!graph.categories[0].edges[0].satisfied);
    }

    #[test]
    fn test_invalid_catalogs() {
        let too_many = (0..=MAX_BADGES)
            .map(|i| badge(&format!("b{}", i), "bulk", false, &[]))
            .collect();
        assert_eq!(
            BadgeGraph::build(too_many),
            Err(BadgeGraphError::TooManyBadges(MAX_BADGES + 1))
        );

        assert_eq!(
            BadgeGraph::build(vec![badge("a", "x", false, &[]), badge("a", "y", false, &[])]),
            Err(BadgeGraphError::DuplicateBadge(String::from("a")))
        );

        assert_eq!(
            BadgeGraph::build(vec![badge("a", "x", false, &["ghost"])]),
            Err(BadgeGraphError::UnknownPrerequisite {
                badge: String::from("a"),
                prerequisite: String::from("ghost"),
            })
        );
    }
}
