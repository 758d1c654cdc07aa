//! Persistence API client.
//!
//! DESIGN
//! ======
//! [`LayoutStore`] is the seam between the editor and the dashboard backend.
//! [`http::HttpLayoutStore`] talks to the real endpoints; tests swap in an
//! in-memory store. Wire parsing lives in plain functions so it can be tested
//! without a server.
//!
//! ERROR HANDLING
//! ==============
//! Loads degrade to "absent" so the editor can fall back to its default
//! layout. Saves surface a [`PersistenceError`] whose `user_message` feeds
//! the save-status indicator.

pub mod data;
pub mod http;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout::{DashboardLayout, PositionHint, Widget};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Shown when the server gives no usable failure message.
pub const GENERIC_SAVE_FAILURE: &str = "Failed to save dashboard layout";

/// Widget content keyed by widget id.
pub type DashboardData = HashMap<String, serde_json::Value>;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Response { status: u16, message: Option<String> },

    /// The response body could not be parsed.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The operation did not finish in time.
    #[error("timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

impl PersistenceError {
    /// Grepable code for logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_REQUEST",
            Self::Response { .. } => "E_RESPONSE",
            Self::Parse(_) => "E_PARSE",
            Self::Timeout { .. } => "E_TIMEOUT",
        }
    }

    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::Request(_) | Self::Timeout { .. } | Self::Response { status: 408 | 429 | 500..=599, .. }
        )
    }

    /// Text for the save-status indicator: the server's message when it sent
    /// one, otherwise a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Response { message: Some(message), .. } => message.clone(),
            Self::Timeout { .. } => format!("{GENERIC_SAVE_FAILURE}: the server did not respond in time"),
            _ => GENERIC_SAVE_FAILURE.to_owned(),
        }
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// An addable widget from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDefinition {
    pub id: String,
    pub name: String,
}

#[async_trait::async_trait]
pub trait LayoutStore: Send + Sync {
    /// Saved layout for `user_id`, or `None` when the user has none.
    async fn load_layout(&self, user_id: &str) -> Result<Option<DashboardLayout>, PersistenceError>;

    async fn save_layout(&self, user_id: &str, layout: &DashboardLayout) -> Result<(), PersistenceError>;

    /// Widgets offered by the "add widget" picker.
    async fn widget_catalog(&self) -> Result<Vec<WidgetDefinition>, PersistenceError>;

    /// Current content for every widget.
    async fn dashboard_data(&self) -> Result<DashboardData, PersistenceError>;
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
pub(crate) struct SaveLayoutRequest<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) layout: WireLayout<'a>,
}

#[derive(Serialize)]
pub(crate) struct WireLayout<'a> {
    pub(crate) widgets: Vec<WireWidget<'a>>,
}

#[derive(Serialize)]
pub(crate) struct WireWidget<'a> {
    pub(crate) id: &'a str,
    pub(crate) position: PositionHint,
}

impl<'a> SaveLayoutRequest<'a> {
    pub(crate) fn new(user_id: &'a str, layout: &'a DashboardLayout) -> Self {
        let widgets = layout
            .widgets
            .iter()
            .map(|w| WireWidget { id: &w.id, position: w.position })
            .collect();
        Self { user_id, layout: WireLayout { widgets } }
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a `GET /dashboard/layouts` body. Empty, `null` and bodies without a
/// `widgets` array mean "no saved layout". Entries without a string `id` are
/// skipped; a missing or malformed position becomes the default hint.
pub(crate) fn parse_layout_body(body: &str) -> Result<Option<DashboardLayout>, PersistenceError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| PersistenceError::Parse(e.to_string()))?;
    let Some(entries) = value.get("widgets").and_then(serde_json::Value::as_array) else {
        return Ok(None);
    };

    let widgets = entries
        .iter()
        .filter_map(|entry| {
            let Some(id) = entry.get("id").and_then(serde_json::Value::as_str) else {
                warn!(?entry, "layout entry without id skipped");
                return None;
            };
            let position = entry
                .get("position")
                .and_then(|p| serde_json::from_value::<PositionHint>(p.clone()).ok())
                .unwrap_or_default();
            Some(Widget::new(id, position))
        })
        .collect();
    Ok(Some(DashboardLayout::new(widgets)))
}

/// Parse a `GET /dashboard/widgets` body, skipping malformed entries.
pub(crate) fn parse_catalog_body(body: &str) -> Result<Vec<WidgetDefinition>, PersistenceError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| PersistenceError::Parse(e.to_string()))?;
    let Some(entries) = value.as_array() else {
        warn!("widget catalog payload is not an array");
        return Ok(Vec::new());
    };
    Ok(entries
        .iter()
        .filter_map(|entry| serde_json::from_value::<WidgetDefinition>(entry.clone()).ok())
        .collect())
}

/// Pull a human-readable message out of an error body, if there is one.
pub(crate) fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

// =============================================================================
// TEST HELPERS
// =============================================================================
