//! Request and response shapes exchanged between the UI and the backend.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::{BotLogEntry, SessionUser};
use crate::telemetry::{BotStatus, VdsMetrics};

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MSG_DATABASE_ERROR: &str = "Database error";
pub const MSG_USER_NOT_FOUND: &str = "User not found";
pub const MSG_WRONG_CURRENT_PASSWORD: &str = "Current password is incorrect";
pub const MSG_EMPTY_NEW_PASSWORD: &str = "New password must not be empty";
pub const MSG_PASSWORD_VERIFICATION: &str = "Password verification failed";
pub const MSG_PASSWORD_UPDATE: &str = "Password update failed";
pub const MSG_COMMAND_ERROR: &str = "Error executing command";

/// Request names as they appear on the wire.
pub mod names {
    pub const AUTHENTICATE: &str = "authenticate";
    pub const GET_VDS_METRICS: &str = "getVdsMetrics";
    pub const GET_BOT_STATUS: &str = "getBotStatus";
    pub const UPDATE_PROFILE: &str = "updateProfile";
    pub const UPDATE_PASSWORD: &str = "updatePassword";
    pub const CONTROL_BOT: &str = "controlBot";
    pub const GET_BOT_LOGS: &str = "getBotLogs";
}

/// A named console operation with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Authenticate(Credentials),
    GetVdsMetrics,
    GetBotStatus,
    UpdateProfile(ProfileUpdate),
    UpdatePassword(PasswordChange),
    ControlBot(BotAction),
    GetBotLogs(LogQuery),
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Unknown request: {0}")]
    Unknown(String),

    #[error("Invalid payload for {request}: {source}")]
    InvalidPayload {
        request: &'static str,
        source: serde_json::Error,
    },
}

impl Request {
    /// Build a request from its wire name and JSON payload. A missing
    /// (`null`) payload counts as an empty object.
    pub fn parse(name: &str, payload: Value) -> Result<Self, RequestError> {
        let payload = if payload.is_null() {
            Value::Object(Map::new())
        } else {
            payload
        };

        match name {
            names::AUTHENTICATE => decode(names::AUTHENTICATE, payload).map(Self::Authenticate),
            names::GET_VDS_METRICS => Ok(Self::GetVdsMetrics),
            names::GET_BOT_STATUS => Ok(Self::GetBotStatus),
            names::UPDATE_PROFILE => decode(names::UPDATE_PROFILE, payload).map(Self::UpdateProfile),
            names::UPDATE_PASSWORD => {
                decode(names::UPDATE_PASSWORD, payload).map(Self::UpdatePassword)
            }
            names::CONTROL_BOT => decode(names::CONTROL_BOT, payload).map(Self::ControlBot),
            names::GET_BOT_LOGS => decode(names::GET_BOT_LOGS, payload).map(Self::GetBotLogs),
            other => Err(RequestError::Unknown(other.to_string())),
        }
    }

    /// Wire name of this request.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Authenticate(_) => names::AUTHENTICATE,
            Self::GetVdsMetrics => names::GET_VDS_METRICS,
            Self::GetBotStatus => names::GET_BOT_STATUS,
            Self::UpdateProfile(_) => names::UPDATE_PROFILE,
            Self::UpdatePassword(_) => names::UPDATE_PASSWORD,
            Self::ControlBot(_) => names::CONTROL_BOT,
            Self::GetBotLogs(_) => names::GET_BOT_LOGS,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    request: &'static str,
    payload: Value,
) -> Result<T, RequestError> {
    serde_json::from_value(payload).map_err(|source| RequestError::InvalidPayload { request, source })
}

// =========================================================================
// Payloads
// =========================================================================

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub user_id: i64,
    pub current_password: String,
    pub new_password: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// A bot control action. Fields beyond `type` and `userId` (channel,
/// message content, ...) are kept verbatim for the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotAction {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub limit: Option<u32>,
}

impl LogQuery {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 200;

    pub fn effective_limit(self) -> u32 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

// =========================================================================
// Responses
// =========================================================================

/// Any response the backend can produce. Serializes to the bare inner shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Auth(AuthResponse),
    Outcome(Outcome),
    VdsMetrics(Option<VdsMetrics>),
    BotStatus(Option<BotStatus>),
    BotLogs(BotLogsResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    pub const fn ok(user: SessionUser) -> Self {
        Self {
            success: true,
            user: Some(user),
            message: None,
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            success: false,
            user: None,
            message: Some(message.to_string()),
        }
    }
}

/// `{success}` / `{success, message}` result of a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Outcome {
    pub const fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub const fn ok_with(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotLogsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<BotLogEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BotLogsResponse {
    pub const fn ok(logs: Vec<BotLogEntry>) -> Self {
        Self {
            success: true,
            logs: Some(logs),
            message: None,
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            success: false,
            logs: None,
            message: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_every_request_name() {
        let cases = [
            (names::AUTHENTICATE, json!({"username": "admin", "password": "x"})),
            (names::GET_VDS_METRICS, Value::Null),
            (names::GET_BOT_STATUS, json!({})),
            (names::UPDATE_PROFILE, json!({"id": 1, "email": "a@b.c", "phone": null, "profile_image": "p.png"})),
            (names::UPDATE_PASSWORD, json!({"userId": 1, "currentPassword": "a", "newPassword": "b"})),
            (names::CONTROL_BOT, json!({"type": "restart", "userId": 1})),
            (names::GET_BOT_LOGS, Value::Null),
        ];

        for (name, payload) in cases {
            let request = Request::parse(name, payload).unwrap();
            assert_eq!(request.name(), name);
        }
    }

    #[test]
    fn unknown_request_is_rejected() {
        let err = Request::parse("dropTables", Value::Null).unwrap_err();
        assert!(matches!(err, RequestError::Unknown(name) if name == "dropTables"));
    }

    #[test]
    fn missing_fields_are_invalid_payloads() {
        let err = Request::parse(names::AUTHENTICATE, json!({"username": "admin"})).unwrap_err();
        assert!(matches!(
            err,
            RequestError::InvalidPayload { request: names::AUTHENTICATE, .. }
        ));
    }

    #[test]
    fn bot_action_keeps_extra_fields() {
        let payload = json!({
            "type": "message",
            "userId": 3,
            "channelId": "general",
            "content": "Server restart in 5 minutes"
        });
        let Request::ControlBot(action) = Request::parse(names::CONTROL_BOT, payload.clone()).unwrap()
        else {
            panic!("expected controlBot");
        };

        assert_eq!(action.action_type, "message");
        assert_eq!(action.user_id, Some(3));
        assert_eq!(action.extra["channelId"], "general");
        assert_eq!(serde_json::to_value(&action).unwrap(), payload);
    }

    #[test]
    fn bot_action_keeps_null_user_id() {
        let payload = json!({"type": "start", "userId": null});
        let Request::ControlBot(action) = Request::parse(names::CONTROL_BOT, payload.clone()).unwrap()
        else {
            panic!("expected controlBot");
        };

        assert_eq!(action.user_id, None);
        assert_eq!(serde_json::to_value(&action).unwrap(), payload);
    }

    #[test]
    fn log_limit_is_clamped() {
        assert_eq!(LogQuery::default().effective_limit(), 20);
        assert_eq!(LogQuery { limit: Some(0) }.effective_limit(), 1);
        assert_eq!(LogQuery { limit: Some(5000) }.effective_limit(), 200);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials {
            username: "admin".into(),
            password: "admin123".into(),
        };
        assert!(!format!("{creds:?}").contains("admin123"));
    }

    #[test]
    fn responses_serialize_to_bare_shapes() {
        let failed = Response::Auth(AuthResponse::fail(MSG_INVALID_CREDENTIALS));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"success": false, "message": "Invalid credentials"})
        );

        let ok = Response::Outcome(Outcome::ok());
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"success": true}));

        let unavailable = Response::VdsMetrics(None);
        assert_eq!(serde_json::to_value(&unavailable).unwrap(), Value::Null);
    }
}
