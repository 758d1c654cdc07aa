//! Dashboard layout model and editing.
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | Mutations, history, edit mode and autosave |
//! | [`keys`] | Undo/redo keyboard chords |
//! | [`registry`] | Widget id to renderer lookup |
//!
//! Widget ids are unique within a layout. [`DashboardLayout::new`] drops
//! later duplicates and the editor refuses to add an id that is already
//! present.

pub mod editor;
pub mod keys;
pub mod registry;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Columns in the dashboard grid.
pub const GRID_COLUMNS: u32 = 12;
pub const DEFAULT_WIDGET_WIDTH: u32 = 6;
pub const DEFAULT_WIDGET_HEIGHT: u32 = 4;

/// Ids of the built-in layout used on first load and by "reset".
pub const DEFAULT_WIDGET_IDS: [&str; 4] = ["system-health", "circuit-breakers", "recent-activity", "tenant-usage"];

// =============================================================================
// TYPES
// =============================================================================

/// Grid placement hint, in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionHint {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PositionHint {
    #[must_use]
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    /// Key into the widget renderer registry.
    pub id: String,
    /// Position in the layout sequence; kept equal to the index.
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub position: PositionHint,
}

impl Widget {
    #[must_use]
    pub fn new(id: impl Into<String>, position: PositionHint) -> Self {
        Self { id: id.into(), order: 0, position }
    }
}

/// Ordered widget sequence. Deserialization goes through
/// [`DashboardLayout::new`], so ids stay unique and orders match indices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawLayout")]
pub struct DashboardLayout {
    pub widgets: Vec<Widget>,
}

#[derive(Deserialize)]
struct RawLayout {
    #[serde(default)]
    widgets: Vec<Widget>,
}

impl From<RawLayout> for DashboardLayout {
    fn from(raw: RawLayout) -> Self {
        Self::new(raw.widgets)
    }
}

impl DashboardLayout {
    /// Build a layout, keeping the first occurrence of each id.
    #[must_use]
    pub fn new(widgets: Vec<Widget>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(widgets.len());
        for widget in widgets {
            if seen.insert(widget.id.clone()) {
                kept.push(widget);
            } else {
                warn!(widget_id = %widget.id, "duplicate widget id dropped from layout");
            }
        }
        let mut layout = Self { widgets: kept };
        layout.renumber();
        layout
    }

    /// The built-in two-by-two layout.
    #[must_use]
    pub fn default_layout() -> Self {
        let widgets = DEFAULT_WIDGET_IDS
            .iter()
            .zip(0u32..)
            .map(|(id, i)| {
                let position = PositionHint {
                    x: (i % 2) * DEFAULT_WIDGET_WIDTH,
                    y: (i / 2) * DEFAULT_WIDGET_HEIGHT,
                    w: DEFAULT_WIDGET_WIDTH,
                    h: DEFAULT_WIDGET_HEIGHT,
                };
                Widget::new(*id, position)
            })
            .collect();
        Self::new(widgets)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.widgets.iter().any(|w| w.id == id)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.widgets.iter().map(|w| w.id.as_str()).collect()
    }

    /// Placement for a newly appended widget: left edge, below everything.
    #[must_use]
    pub fn next_slot(&self) -> PositionHint {
        let y = self.widgets.iter().map(|w| w.position.bottom()).max().unwrap_or(0);
        PositionHint { x: 0, y, w: DEFAULT_WIDGET_WIDTH, h: DEFAULT_WIDGET_HEIGHT }
    }

    /// Reset every `order` to its index.
    pub fn renumber(&mut self) {
        for (widget, order) in self.widgets.iter_mut().zip(0u32..) {
            widget.order = order;
        }
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    /// A layout of `n` widgets named `w0..w{n-1}`, stacked in one column.
    pub fn sample_layout(n: u32) -> DashboardLayout {
        DashboardLayout::new(
            (0..n)
                .map(|i| {
                    let position = PositionHint {
                        x: 0,
                        y: i * DEFAULT_WIDGET_HEIGHT,
                        w: DEFAULT_WIDGET_WIDTH,
                        h: DEFAULT_WIDGET_HEIGHT,
                    };
                    Widget::new(format!("w{i}"), position)
                })
                .collect(),
        )
    }
}
