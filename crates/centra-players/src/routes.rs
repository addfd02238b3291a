use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::counter::PlayerCount;

/// Shared application state.
#[derive(Clone, Default)]
pub struct AppState {
    pub players: PlayerCount,
}

#[derive(Debug, Serialize)]
struct CountBody {
    count: u64,
}

#[derive(Debug, Serialize)]
struct UpdatedBody {
    success: bool,
    count: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

const INVALID_COUNT: &str = "Invalid player count";

/// Build the relay router. Cross-origin requests are allowed from anywhere.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/players", get(get_players).post(post_players))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /api/players`
pub async fn get_players(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.players.get();
    debug!(count, "Player count read");
    Json(CountBody { count })
}

/// `POST /api/players`, called by the game server script.
pub async fn post_players(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let count = match body {
        Ok(Json(value)) => parse_count(&value),
        Err(rejection) => {
            warn!(error = %rejection, "Rejected player count body");
            None
        }
    };

    let Some(count) = count else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: INVALID_COUNT,
            }),
        )
            .into_response();
    };

    let previous = state.players.set(count);
    info!(count, previous, "Player count updated");
    Json(UpdatedBody {
        success: true,
        count,
    })
    .into_response()
}

/// Extract a valid count from `{"count": number}`.
///
/// Accepts non-negative whole numbers that fit in `u64`, including ones
/// written with a fractional part of zero (`12.0`). Strings, booleans,
/// negatives, fractions and out-of-range values are rejected.
///
/// `u64::MAX as f64` rounds up to 2^64, so the float bound is exclusive.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
pub fn parse_count(body: &Value) -> Option<u64> {
    let raw = body.get("count")?;
    if let Some(n) = raw.as_u64() {
        return Some(n);
    }
    let f = raw.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
