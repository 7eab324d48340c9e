//! User identity type for core messages.

use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// Username for log lines; `"unknown"` when the user has none.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("unknown")
    }
}
