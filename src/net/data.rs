//! Widget content: defensive coercion of external payloads and the refresh
//! poller.
//!
//! ERROR HANDLING
//! ==============
//! Payloads of an unexpected shape coerce to empty values with a warning.
//! Poll failures keep the last good snapshot; stale content is acceptable.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::{DashboardData, LayoutStore};

#[cfg(test)]
#[path = "data_test.rs"]
mod tests;

// =============================================================================
// COERCION
// =============================================================================

/// Turn a `/dashboard/data` payload into per-widget content. Anything other
/// than a JSON object becomes an empty map.
#[must_use]
pub fn coerce_dashboard_data(value: serde_json::Value) -> DashboardData {
    match value {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        other => {
            warn!(kind = json_kind(&other), "dashboard data payload is not an object");
            DashboardData::new()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "closed" => Some(Self::Closed),
            "open" => Some(Self::Open),
            "half_open" => Some(Self::HalfOpen),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half-open",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitBreaker {
    pub name: String,
    pub state: BreakerState,
    pub failure_count: u64,
}

/// Parse a circuit-breaker payload: either an array of breakers or an object
/// with a `breakers` array. Entries missing a name or with an unknown state
/// are dropped.
#[must_use]
pub fn coerce_circuit_breakers(value: &serde_json::Value) -> Vec<CircuitBreaker> {
    let entries = match value {
        serde_json::Value::Array(items) => items.as_slice(),
        serde_json::Value::Object(map) => match map.get("breakers") {
            Some(serde_json::Value::Array(items)) => items.as_slice(),
            _ => {
                warn!("circuit breaker payload has no breakers array");
                return Vec::new();
            }
        },
        other => {
            warn!(kind = json_kind(other), "circuit breaker payload has unexpected shape");
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get("name")?.as_str()?.to_owned();
            let Some(state) = entry.get("state").and_then(serde_json::Value::as_str).and_then(BreakerState::parse)
            else {
                warn!(%name, "circuit breaker with unknown state skipped");
                return None;
            };
            let failure_count = entry
                .get("failure_count")
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(0);
            Some(CircuitBreaker { name, state, failure_count })
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// =============================================================================
// POLLER
// =============================================================================

/// Shortest accepted poll period; `tokio::time::interval` rejects zero.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Poll `/dashboard/data` every `interval` and publish each good snapshot.
/// The first poll happens immediately. A zero interval is raised to 1ms.
pub fn spawn_data_poller(
    store: Arc<dyn LayoutStore>,
    interval: Duration,
) -> (JoinHandle<()>, watch::Receiver<DashboardData>) {
    let interval = interval.max(MIN_POLL_INTERVAL);
    let (tx, rx) = watch::channel(DashboardData::new());
    info!(?interval, "dashboard data poller configured");

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match store.dashboard_data().await {
                Ok(data) => {
                    if tx.send(data).is_err() {
                        // Every receiver is gone.
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, code = e.error_code(), "dashboard data refresh failed; keeping stale data");
                }
            }
        }
    });

    (handle, rx)
}
