//! Console backend: executes one request against storage or telemetry.
//!
//! Every operation folds its failures into the response shape. Storage
//! errors are logged here and never reach the UI as raw errors.

use tracing::{error, info, instrument, warn};

use super::types::{
    AuthResponse, BotAction, BotLogsResponse, Credentials, LogQuery, MSG_COMMAND_ERROR,
    MSG_DATABASE_ERROR, MSG_EMPTY_NEW_PASSWORD, MSG_INVALID_CREDENTIALS, MSG_PASSWORD_UPDATE,
    MSG_PASSWORD_VERIFICATION, MSG_USER_NOT_FOUND, MSG_WRONG_CURRENT_PASSWORD, Outcome,
    PasswordChange, ProfileUpdate, Request, Response,
};
use crate::auth::password::{self, PasswordError};
use crate::storage::{ConsoleDatabase, DatabaseError, ProfileFields, SessionUser};
use crate::telemetry::{BotStatus, MockTelemetry, TelemetrySource, VdsMetrics};

pub struct ConsoleBackend<T = MockTelemetry> {
    db: ConsoleDatabase,
    telemetry: T,
    persist_vds_samples: bool,
}

impl<T: TelemetrySource> ConsoleBackend<T> {
    pub const fn new(db: ConsoleDatabase, telemetry: T) -> Self {
        Self {
            db,
            telemetry,
            persist_vds_samples: false,
        }
    }

    /// Also store every VDS sample handed out in `vds_metrics`.
    #[must_use]
    pub fn with_sample_persistence(mut self, enabled: bool) -> Self {
        self.persist_vds_samples = enabled;
        self
    }

    pub const fn database(&self) -> &ConsoleDatabase {
        &self.db
    }

    /// Dispatch a request to its operation.
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::Authenticate(creds) => Response::Auth(self.authenticate(&creds).await),
            Request::GetVdsMetrics => Response::VdsMetrics(self.vds_metrics().await),
            Request::GetBotStatus => Response::BotStatus(self.bot_status().await),
            Request::UpdateProfile(update) => Response::Outcome(self.update_profile(&update).await),
            Request::UpdatePassword(change) => {
                Response::Outcome(self.update_password(&change).await)
            }
            Request::ControlBot(action) => Response::Outcome(self.control_bot(&action).await),
            Request::GetBotLogs(query) => Response::BotLogs(self.bot_logs(query).await),
        }
    }

    #[instrument(skip(self, creds), fields(request = "authenticate", username = %creds.username))]
    pub async fn authenticate(&self, creds: &Credentials) -> AuthResponse {
        let user = match self.db.find_user_by_username(&creds.username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                password::verify_dummy(&creds.password);
                warn!("Failed login attempt: unknown user");
                return AuthResponse::fail(MSG_INVALID_CREDENTIALS);
            }
            Err(e) => {
                error!(error = %e, "Authentication error");
                return AuthResponse::fail(MSG_DATABASE_ERROR);
            }
        };

        match password::verify_password(&creds.password, &user.password_hash) {
            Ok(true) => {
                info!(user_id = user.id, rank = user.rank, "User logged in");
                AuthResponse::ok(SessionUser::from(&user))
            }
            Ok(false) => {
                warn!(user_id = user.id, "Failed login attempt: wrong password");
                AuthResponse::fail(MSG_INVALID_CREDENTIALS)
            }
            Err(e) => {
                error!(user_id = user.id, error = %e, "Password verification failed");
                AuthResponse::fail(MSG_PASSWORD_VERIFICATION)
            }
        }
    }

    #[instrument(skip(self), fields(request = "getVdsMetrics"))]
    pub async fn vds_metrics(&self) -> Option<VdsMetrics> {
        let metrics = match self.telemetry.vds_metrics().await {
            Ok(m) => m,
            Err(e) => {
                error!(error = %e, "Error fetching VDS metrics");
                return None;
            }
        };

        if self.persist_vds_samples {
            if let Err(e) = self
                .db
                .insert_vds_sample(
                    f64::from(metrics.cpu),
                    f64::from(metrics.ram),
                    f64::from(metrics.fps),
                    &metrics.network,
                )
                .await
            {
                warn!(error = %e, "Failed to persist VDS sample");
            }
        }

        Some(metrics)
    }

    #[instrument(skip(self), fields(request = "getBotStatus"))]
    pub async fn bot_status(&self) -> Option<BotStatus> {
        match self.telemetry.bot_status().await {
            Ok(status) => Some(status),
            Err(e) => {
                error!(error = %e, "Error fetching bot status");
                None
            }
        }
    }

    #[instrument(skip(self, update), fields(request = "updateProfile", user_id = update.id))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Outcome {
        let fields = ProfileFields {
            email: update.email.as_deref(),
            phone: update.phone.as_deref(),
            profile_image: update.profile_image.as_deref(),
        };

        match self.db.update_profile(update.id, fields).await {
            Ok(true) => {
                info!("Profile updated");
                Outcome::ok()
            }
            Ok(false) => {
                warn!("Profile update for unknown user");
                Outcome::fail(MSG_USER_NOT_FOUND)
            }
            Err(e) => {
                error!(error = %e, "Error updating profile");
                Outcome::fail(MSG_DATABASE_ERROR)
            }
        }
    }

    #[instrument(skip(self, change), fields(request = "updatePassword", user_id = change.user_id))]
    pub async fn update_password(&self, change: &PasswordChange) -> Outcome {
        if change.new_password.is_empty() {
            return Outcome::fail(MSG_EMPTY_NEW_PASSWORD);
        }

        let user = match self.db.get_user(change.user_id).await {
            Ok(user) => user,
            Err(DatabaseError::NotFound(_)) => {
                password::verify_dummy(&change.current_password);
                warn!("Password change for unknown user");
                return Outcome::fail(MSG_WRONG_CURRENT_PASSWORD);
            }
            Err(e) => {
                error!(error = %e, "Error updating password");
                return Outcome::fail(MSG_DATABASE_ERROR);
            }
        };

        match password::verify_password(&change.current_password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                warn!("Password change rejected: wrong current password");
                return Outcome::fail(MSG_WRONG_CURRENT_PASSWORD);
            }
            Err(e) => {
                error!(error = %e, "Password verification failed");
                return Outcome::fail(MSG_PASSWORD_VERIFICATION);
            }
        }

        let new_hash = match password::hash_password(&change.new_password) {
            Ok(hash) => hash,
            Err(PasswordError::Empty) => return Outcome::fail(MSG_EMPTY_NEW_PASSWORD),
            Err(e) => {
                error!(error = %e, "Password hashing failed");
                return Outcome::fail(MSG_PASSWORD_UPDATE);
            }
        };

        match self
            .db
            .replace_password_hash(user.id, &user.password_hash, &new_hash)
            .await
        {
            Ok(true) => {
                info!("Password updated");
                Outcome::ok()
            }
            Ok(false) => {
                warn!("Password changed concurrently; update not applied");
                Outcome::fail(MSG_WRONG_CURRENT_PASSWORD)
            }
            Err(e) => {
                error!(error = %e, "Error updating password");
                Outcome::fail(MSG_DATABASE_ERROR)
            }
        }
    }

    #[instrument(skip(self, action), fields(request = "controlBot", action = %action.action_type, user_id = ?action.user_id))]
    pub async fn control_bot(&self, action: &BotAction) -> Outcome {
        let details = match serde_json::to_string(action) {
            Ok(details) => details,
            Err(e) => {
                error!(error = %e, "Failed to serialize bot action");
                return Outcome::fail(MSG_COMMAND_ERROR);
            }
        };

        match self
            .db
            .append_bot_log(&action.action_type, &details, action.user_id)
            .await
        {
            Ok(log_id) => {
                info!(log_id, "Bot control action recorded");
                Outcome::ok_with(format!(
                    "Bot {} command executed successfully",
                    action.action_type
                ))
            }
            Err(e) => {
                error!(error = %e, "Error controlling bot");
                Outcome::fail(MSG_COMMAND_ERROR)
            }
        }
    }

    #[instrument(skip(self), fields(request = "getBotLogs"))]
    pub async fn bot_logs(&self, query: LogQuery) -> BotLogsResponse {
        match self.db.recent_bot_logs(query.effective_limit()).await {
            Ok(logs) => BotLogsResponse::ok(logs),
            Err(e) => {
                error!(error = %e, "Error fetching bot logs");
                BotLogsResponse::fail(MSG_DATABASE_ERROR)
            }
        }
    }
}
