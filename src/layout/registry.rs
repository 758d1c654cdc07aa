//! Widget id to renderer lookup.
//!
//! DESIGN
//! ======
//! Renderers are trait objects keyed by widget id. Lookup never fails: an id
//! without a renderer resolves to [`Resolved::Placeholder`], which renders the
//! id and a warning so a stale saved layout still displays.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use super::{DashboardLayout, PositionHint};
use crate::net::DashboardData;
use crate::net::data::coerce_circuit_breakers;

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

// =============================================================================
// RENDERERS
// =============================================================================

pub trait WidgetRenderer: Send + Sync {
    fn title(&self) -> &str;

    /// Body text for the widget. `data` is the widget's entry in the
    /// dashboard data payload, if any.
    fn render(&self, data: Option<&serde_json::Value>) -> String;
}

pub enum Resolved<'a> {
    Registered(&'a dyn WidgetRenderer),
    Placeholder,
}

/// What the host draws for one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedWidget {
    pub widget_id: String,
    pub title: String,
    pub body: String,
    pub placeholder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub position: PositionHint,
}

#[derive(Default)]
pub struct WidgetRegistry {
    renderers: HashMap<String, Box<dyn WidgetRenderer>>,
}

impl WidgetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with renderers for every id in the default layout.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("system-health", MetricRenderer::new("System health"));
        registry.register("tenant-usage", MetricRenderer::new("Tenant usage"));
        registry.register("circuit-breakers", CircuitBreakerRenderer);
        registry.register("recent-activity", ActivityRenderer);
        registry
    }

    /// Register `renderer` under `id`, replacing any previous one.
    pub fn register(&mut self, id: impl Into<String>, renderer: impl WidgetRenderer + 'static) {
        self.renderers.insert(id.into(), Box::new(renderer));
    }

    #[must_use]
    pub fn resolve(&self, id: &str) -> Resolved<'_> {
        match self.renderers.get(id) {
            Some(renderer) => Resolved::Registered(renderer.as_ref()),
            None => Resolved::Placeholder,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Render every widget in layout order.
    #[must_use]
    pub fn render_layout(&self, layout: &DashboardLayout, data: &DashboardData) -> Vec<RenderedWidget> {
        layout
            .widgets
            .iter()
            .map(|widget| match self.resolve(&widget.id) {
                Resolved::Registered(renderer) => RenderedWidget {
                    widget_id: widget.id.clone(),
                    title: renderer.title().to_owned(),
                    body: renderer.render(data.get(&widget.id)),
                    placeholder: false,
                    warning: None,
                    position: widget.position,
                },
                Resolved::Placeholder => {
                    warn!(widget_id = %widget.id, "no renderer registered; showing placeholder");
                    RenderedWidget {
                        widget_id: widget.id.clone(),
                        title: widget.id.clone(),
                        body: String::new(),
                        placeholder: true,
                        warning: Some(format!("Unknown widget \"{}\"", widget.id)),
                        position: widget.position,
                    }
                }
            })
            .collect()
    }
}

// =============================================================================
// BUILT-IN RENDERERS
// =============================================================================

const NO_DATA: &str = "No data";

/// Flat object of metrics rendered as sorted `key: value` lines.
pub struct MetricRenderer {
    title: String,
}

impl MetricRenderer {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl WidgetRenderer for MetricRenderer {
    fn title(&self) -> &str {
        &self.title
    }

    fn render(&self, data: Option<&serde_json::Value>) -> String {
        let Some(map) = data.and_then(serde_json::Value::as_object) else {
            return NO_DATA.to_owned();
        };
        if map.is_empty() {
            return NO_DATA.to_owned();
        }
        let mut lines: Vec<String> = map
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => format!("{key}: {s}"),
                other => format!("{key}: {other}"),
            })
            .collect();
        lines.sort();
        lines.join("\n")
    }
}

pub struct CircuitBreakerRenderer;

impl WidgetRenderer for CircuitBreakerRenderer {
    fn title(&self) -> &str {
        "Circuit breakers"
    }

    fn render(&self, data: Option<&serde_json::Value>) -> String {
        let breakers = data.map(coerce_circuit_breakers).unwrap_or_default();
        if breakers.is_empty() {
            return NO_DATA.to_owned();
        }
        breakers
            .iter()
            .map(|b| format!("{} [{}] failures={}", b.name, b.state.as_str(), b.failure_count))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Newest-first list of activity strings. Objects contribute their
/// `message` field.
pub struct ActivityRenderer;

impl WidgetRenderer for ActivityRenderer {
    fn title(&self) -> &str {
        "Recent activity"
    }

    fn render(&self, data: Option<&serde_json::Value>) -> String {
        let Some(items) = data.and_then(serde_json::Value::as_array) else {
            return NO_DATA.to_owned();
        };
        let lines: Vec<&str> = items
            .iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s.as_str()),
                other => other.get("message").and_then(serde_json::Value::as_str),
            })
            .collect();
        if lines.is_empty() {
            return NO_DATA.to_owned();
        }
        lines.join("\n")
    }
}
