//! Database queries for the Centra console backend.

use centra_core::db::{DatabaseError, unix_timestamp};

use super::db::ConsoleDatabase;
use super::models::{BotLogEntry, User};

/// Optional profile columns, written together by `update_profile`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileFields<'a> {
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub profile_image: Option<&'a str>,
}

impl ConsoleDatabase {
    // =========================================================================
    // User queries
    // =========================================================================

    /// Create a new user and return the stored row.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        rank: i64,
        profile: ProfileFields<'_>,
    ) -> Result<User, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, email, phone, profile_image, rank, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(profile.email)
        .bind(profile.phone)
        .bind(profile.profile_image)
        .bind(rank)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_user(result.last_insert_rowid()).await
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: i64) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {id}")))
    }

    /// Find a user by exact username.
    pub async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool())
            .await?;

        Ok(user)
    }

    /// Overwrite the optional profile columns. Returns `false` when no user
    /// has that ID.
    pub async fn update_profile(
        &self,
        id: i64,
        profile: ProfileFields<'_>,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET email = ?, phone = ?, profile_image = ?, updated_at = ? WHERE id = ?",
        )
        .bind(profile.email)
        .bind(profile.phone)
        .bind(profile.profile_image)
        .bind(unix_timestamp())
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace a password hash, guarded by the hash the caller verified.
    ///
    /// Returns `false` when the row is missing or its hash changed since it
    /// was read.
    pub async fn replace_password_hash(
        &self,
        id: i64,
        expected_hash: &str,
        new_hash: &str,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ? AND password_hash = ?",
        )
        .bind(new_hash)
        .bind(unix_timestamp())
        .bind(id)
        .bind(expected_hash)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    // =========================================================================
    // Audit log queries
    // =========================================================================

    /// Append one row to the bot audit log.
    pub async fn append_bot_log(
        &self,
        action: &str,
        details: &str,
        user_id: Option<i64>,
    ) -> Result<i64, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO bot_logs (action, details, user_id, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(action)
        .bind(details)
        .bind(user_id)
        .bind(unix_timestamp())
        .execute(self.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Most recent audit-log rows, newest first.
    pub async fn recent_bot_logs(&self, limit: u32) -> Result<Vec<BotLogEntry>, DatabaseError> {
        let logs = sqlx::query_as::<_, BotLogEntry>(
            "SELECT l.id, l.action, l.details, l.user_id, u.username, l.timestamp \
             FROM bot_logs l LEFT JOIN users u ON u.id = l.user_id \
             ORDER BY l.timestamp DESC, l.id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(logs)
    }

    // =========================================================================
    // VDS metric samples
    // =========================================================================

    /// Store one VDS metric sample.
    pub async fn insert_vds_sample(
        &self,
        cpu_usage: f64,
        ram_usage: f64,
        fps: f64,
        network_status: &str,
    ) -> Result<i64, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO vds_metrics (cpu_usage, ram_usage, fps, network_status, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(cpu_usage)
        .bind(ram_usage)
        .bind(fps)
        .bind(network_status)
        .bind(unix_timestamp())
        .execute(self.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }
}
