//! Data models for Centra console storage.

use serde::{Deserialize, Serialize};

/// Rank from which an operator is shown as project director.
pub const DIRECTOR_RANK: i64 = 8;

/// A stored operator account. Never serialized: it carries the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub rank: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn rank_title(&self) -> String {
        rank_title(self.rank)
    }
}

/// The user object handed back on successful authentication. The UI keeps it
/// as its session for the rest of the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub rank: i64,
    pub profile_image: Option<String>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            rank: user.rank,
            profile_image: user.profile_image.clone(),
        }
    }
}

/// Display title for a rank tier.
pub fn rank_title(rank: i64) -> String {
    if rank >= DIRECTOR_RANK {
        "Project Director".to_string()
    } else {
        format!("Rank {rank}")
    }
}

/// One audit-log row, joined with the acting operator's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BotLogEntry {
    pub id: i64,
    pub action: String,
    pub details: Option<String>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VdsMetricSample {
    pub id: i64,
    pub cpu_usage: Option<f64>,
    pub ram_usage: Option<f64>,
    pub fps: Option<f64>,
    pub network_status: Option<String>,
    pub timestamp: i64,
}
