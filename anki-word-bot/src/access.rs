//! Authorization gate: which Telegram users may use the bot.

use std::collections::HashSet;
use std::num::ParseIntError;

/// Set of allowed user ids. An empty set means open access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    users: HashSet<i64>,
}

impl AllowList {
    pub fn new(users: impl IntoIterator<Item = i64>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }

    /// Allow list that admits everybody.
    pub fn open() -> Self {
        Self::default()
    }

    /// Parses a comma-separated id list such as `"123, 456"`. Blank entries are skipped; any
    /// non-integer entry is an error.
    pub fn parse(value: &str) -> Result<Self, ParseIntError> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<i64>)
            .collect::<Result<HashSet<_>, _>>()
            .map(|users| Self { users })
    }

    pub fn is_open(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn is_authorized(&self, user_id: i64) -> bool {
        self.users.is_empty() || self.users.contains(&user_id)
    }
}
