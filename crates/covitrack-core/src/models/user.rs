//! User and role models.

use serde::{Deserialize, Serialize};

/// Role granted to a user, gating which workflow transitions they may run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Lab staff: picks up initiated requests and records lab results
    Tester,
    /// Medical staff: picks up tested requests and records consultations
    Doctor,
    /// Read-only oversight of all requests and their flow log
    Admin,
}

impl Role {
    /// Wire/store representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tester => "TESTER",
            Role::Doctor => "DOCTOR",
            Role::Admin => "ADMIN",
        }
    }

    /// Parse the store representation.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "TESTER" => Some(Role::Tester),
            "DOCTOR" => Some(Role::Doctor),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// A user known to the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique user ID
    pub id: String,
    /// Login name
    pub user_name: String,
    /// Granted role
    pub role: Role,
    /// Creation timestamp
    pub created_at: String,
}

impl User {
    /// Create a new user with a fresh ID.
    pub fn new(user_name: String, role: Role) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_name,
            role,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
