use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub trait FieldList {
    fn field_list() -> &'static str;
}

/// Usernames are the GitHub handles of the participants.
pub static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("username pattern must compile"));

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_PATTERN.is_match(username)
}

/// Body of every non-successful API response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
