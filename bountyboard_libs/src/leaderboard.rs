use serde::{Deserialize, Serialize};

pub const DEFAULT_AVATAR_URL_TEMPLATE: &str = "https://github.com/{username}.png";

/// URL template for participant avatars; `{username}` is substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUrlTemplate(String);

impl AvatarUrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        if !template.contains("{username}") {
            tracing::warn!(
                "avatar url template {} has no {{username}} placeholder, every participant will share one avatar",
                template
            );
        }
        Self(template)
    }

    pub fn render(&self, username: &str) -> String {
        self.0.replace("{username}", username)
    }
}

impl Default for AvatarUrlTemplate {
    fn default() -> Self {
        Self(DEFAULT_AVATAR_URL_TEMPLATE.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub username: String,
    pub full_name: String,
    pub bounty: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub full_name: String,
    pub bounty: i64,
    pub avatar_url: String,
}

/// Orders by bounty, highest first, and assigns competition ranks: participants with
/// equal bounty share a rank and the next rank skips accordingly (1, 2, 2, 4).
pub fn rank(mut standings: Vec<Standing>, avatar: &AvatarUrlTemplate) -> Vec<LeaderboardEntry> {
    standings.sort_by(|a, b| b.bounty.cmp(&a.bounty));

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(standings.len());
    for (position, standing) in standings.into_iter().enumerate() {
        let rank = match entries.last() {
            Some(previous) if previous.bounty == standing.bounty => previous.rank,
            _ => position as u32 + 1,
        };
        entries.push(LeaderboardEntry {
            rank,
            avatar_url: avatar.render(&standing.username),
            username: standing.username,
            full_name: standing.full_name,
            bounty: standing.bounty,
        });
    }

    entries
}
