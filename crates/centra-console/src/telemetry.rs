//! Operational telemetry for the console dashboard.
//!
//! The response shapes are fixed; where the numbers come from sits behind
//! [`TelemetrySource`]. The only source today is [`MockTelemetry`], which
//! draws random values in the ranges the dashboard expects.

use std::future::Future;

use rand::RngExt;
use serde::{Deserialize, Serialize};

/// Virtual-server load snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VdsMetrics {
    /// CPU usage, percent.
    pub cpu: u32,
    /// RAM usage, percent.
    pub ram: u32,
    /// Game server frames per second.
    pub fps: u32,
    pub network: String,
}

/// Community bot health snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotStatus {
    pub status: String,
    /// Seconds since the bot started.
    pub uptime: u32,
    /// Load, percent.
    pub load: u32,
    pub api_status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("telemetry unavailable: {0}")]
    Unavailable(String),
}

/// Where dashboard metrics come from.
pub trait TelemetrySource: Send + Sync {
    fn vds_metrics(&self) -> impl Future<Output = Result<VdsMetrics, TelemetryError>> + Send;

    fn bot_status(&self) -> impl Future<Output = Result<BotStatus, TelemetryError>> + Send;
}

pub const NETWORK_ONLINE: &str = "Online";
pub const NETWORK_ISSUES: &str = "Issues Detected";
pub const BOT_ONLINE: &str = "Online";
pub const BOT_OFFLINE: &str = "Offline";
pub const API_OPERATIONAL: &str = "Operational";
pub const API_DEGRADED: &str = "Degraded";

/// Probability that a mock sample reports the healthy state.
const HEALTHY_PROBABILITY: f64 = 0.9;

/// Random stand-in for real VDS and bot monitoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockTelemetry;

impl MockTelemetry {
    pub fn sample_vds() -> VdsMetrics {
        let mut rng = rand::rng();
        VdsMetrics {
            cpu: rng.random_range(0..100),
            ram: rng.random_range(0..100),
            fps: rng.random_range(60..120),
            network: if rng.random_bool(HEALTHY_PROBABILITY) {
                NETWORK_ONLINE
            } else {
                NETWORK_ISSUES
            }
            .to_string(),
        }
    }

    pub fn sample_bot() -> BotStatus {
        let mut rng = rand::rng();
        BotStatus {
            status: if rng.random_bool(HEALTHY_PROBABILITY) {
                BOT_ONLINE
            } else {
                BOT_OFFLINE
            }
            .to_string(),
            uptime: rng.random_range(0..10_000),
            load: rng.random_range(0..100),
            api_status: if rng.random_bool(HEALTHY_PROBABILITY) {
                API_OPERATIONAL
            } else {
                API_DEGRADED
            }
            .to_string(),
        }
    }
}

impl TelemetrySource for MockTelemetry {
    fn vds_metrics(&self) -> impl Future<Output = Result<VdsMetrics, TelemetryError>> + Send {
        std::future::ready(Ok(Self::sample_vds()))
    }

    fn bot_status(&self) -> impl Future<Output = Result<BotStatus, TelemetryError>> + Send {
        std::future::ready(Ok(Self::sample_bot()))
    }
}
