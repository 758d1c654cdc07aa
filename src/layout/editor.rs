//! Dashboard layout editor.
//!
//! DESIGN
//! ======
//! The editor owns a working [`DashboardLayout`], its undo history and the
//! save status. Every mutation renumbers widget order, records a snapshot,
//! marks the status unsaved and hands back a [`LayoutChange`] naming the
//! animation the host should play. Out-of-range indices and duplicate ids
//! are ignored and return `None`.
//!
//! A drag is bracketed by `begin_drag`/`end_drag`, so every intermediate
//! drop position collapses into one undo entry. The save status only moves
//! when the drag ends somewhere new; a cancelled drag leaves it untouched.
//!
//! SAVING
//! ======
//! Leaving edit mode persists the layout when there are unsaved changes (or
//! re-attempts a failed save). The store call is bounded by `save_timeout`;
//! elapsing is reported like any other failure.
//!
//! ERROR HANDLING
//! ==============
//! Load failures fall back to the default layout. Save failures land in the
//! status as a user-facing message and never propagate.

use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::keys::{HistoryShortcut, KeyChord, Platform, match_shortcut};
use super::{DashboardLayout, Widget};
use crate::history::{DEFAULT_HISTORY_CAPACITY, UndoRedoStack};
use crate::motion::variant::AnimationKind;
use crate::net::{LayoutStore, PersistenceError};
use crate::save::{InvalidTransition, SaveEvent, SaveState, SaveStatus, SaveStatusMachine};

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;

pub const DEFAULT_SAVE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub history_capacity: usize,
    pub save_timeout: Duration,
    pub platform: Platform,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            save_timeout: Duration::from_millis(DEFAULT_SAVE_TIMEOUT_MS),
            platform: Platform::default(),
        }
    }
}

// =============================================================================
// CHANGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Moved,
    Reset,
    Undo,
    Redo,
}

/// A mutation the host should animate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutChange {
    pub kind: ChangeKind,
    /// The widget the change is about; absent for whole-layout changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
}

impl LayoutChange {
    fn widget(kind: ChangeKind, id: &str) -> Self {
        Self { kind, widget_id: Some(id.to_owned()) }
    }

    fn whole(kind: ChangeKind) -> Self {
        Self { kind, widget_id: None }
    }

    #[must_use]
    pub fn animation_kind(&self) -> AnimationKind {
        match self.kind {
            ChangeKind::Added => AnimationKind::Pop,
            ChangeKind::Moved => AnimationKind::SlideUp,
            ChangeKind::Removed | ChangeKind::Reset | ChangeKind::Undo | ChangeKind::Redo => AnimationKind::Fade,
        }
    }
}

// =============================================================================
// EDITOR
// =============================================================================

pub struct DashboardLayoutEditor {
    layout: DashboardLayout,
    history: UndoRedoStack<DashboardLayout>,
    status: SaveStatusMachine,
    edit_mode: bool,
    options: EditorOptions,
    user_id: String,
    session_id: Uuid,
}

impl DashboardLayoutEditor {
    #[must_use]
    pub fn new(user_id: impl Into<String>, layout: DashboardLayout, options: EditorOptions) -> Self {
        let user_id = user_id.into();
        let session_id = Uuid::new_v4();
        info!(%user_id, %session_id, widgets = layout.len(), "layout editor opened");
        Self {
            history: UndoRedoStack::new(layout.clone(), options.history_capacity),
            layout,
            status: SaveStatusMachine::new(),
            edit_mode: false,
            options,
            user_id,
            session_id,
        }
    }

    /// Open an editor on the user's saved layout, falling back to the default
    /// layout when none is saved or the load fails.
    pub async fn load<S>(store: &S, user_id: &str, options: EditorOptions) -> Self
    where
        S: LayoutStore + ?Sized,
    {
        let layout = match store.load_layout(user_id).await {
            Ok(Some(layout)) => layout,
            Ok(None) => {
                info!(%user_id, "no saved layout; using default");
                DashboardLayout::default_layout()
            }
            Err(e) => {
                warn!(%user_id, error = %e, code = e.error_code(), "layout load failed; using default");
                DashboardLayout::default_layout()
            }
        };
        Self::new(user_id, layout, options)
    }

    // --- Accessors ---

    #[must_use]
    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    #[must_use]
    pub fn status(&self) -> &SaveStatus {
        self.status.status()
    }

    #[must_use]
    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.history.in_gesture()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.is_dragging() && self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.is_dragging() && self.history.can_redo()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    // --- Mutations ---

    /// Move the widget at `from` so it ends up at `to`.
    pub fn move_widget(&mut self, from: usize, to: usize) -> Option<LayoutChange> {
        let len = self.layout.len();
        if from >= len || to >= len || from == to {
            return None;
        }
        let widget = self.layout.widgets.remove(from);
        let change = LayoutChange::widget(ChangeKind::Moved, &widget.id);
        self.layout.widgets.insert(to, widget);
        self.commit(change)
    }

    pub fn remove_widget(&mut self, index: usize) -> Option<LayoutChange> {
        if index >= self.layout.len() {
            return None;
        }
        let widget = self.layout.widgets.remove(index);
        self.commit(LayoutChange::widget(ChangeKind::Removed, &widget.id))
    }

    /// Append `id` in the next free slot. Blank and already-present ids are
    /// refused.
    pub fn add_widget(&mut self, id: &str) -> Option<LayoutChange> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        if self.layout.contains(id) {
            warn!(widget_id = %id, "widget already on the dashboard; add ignored");
            return None;
        }
        let position = self.layout.next_slot();
        self.layout.widgets.push(Widget::new(id, position));
        self.commit(LayoutChange::widget(ChangeKind::Added, id))
    }

    /// Restore the built-in layout. No-op when it is already showing.
    pub fn reset_layout(&mut self) -> Option<LayoutChange> {
        let default = DashboardLayout::default_layout();
        if self.layout == default {
            return None;
        }
        self.layout = default;
        self.commit(LayoutChange::whole(ChangeKind::Reset))
    }

    // --- Drag gestures ---

    pub fn begin_drag(&mut self) {
        self.history.begin_gesture();
    }

    /// Finish the drag. Returns whether it produced an undo entry; only then
    /// is the layout marked unsaved.
    pub fn end_drag(&mut self) -> bool {
        let recorded = self.history.commit_gesture();
        if recorded {
            self.mark_mutated();
        }
        debug!(recorded, "drag ended");
        recorded
    }

    /// Abandon the drag and snap back to where it started.
    pub fn cancel_drag(&mut self) {
        if !self.history.in_gesture() {
            return;
        }
        self.layout = self.history.cancel_gesture().clone();
        debug!("drag cancelled");
    }

    // --- History ---

    pub fn undo(&mut self) -> Option<LayoutChange> {
        if !self.can_undo() {
            return None;
        }
        self.layout = self.history.undo().clone();
        self.mark_mutated();
        Some(LayoutChange::whole(ChangeKind::Undo))
    }

    pub fn redo(&mut self) -> Option<LayoutChange> {
        if !self.can_redo() {
            return None;
        }
        self.layout = self.history.redo().clone();
        self.mark_mutated();
        Some(LayoutChange::whole(ChangeKind::Redo))
    }

    /// Undo/redo shortcuts. Ignored outside edit mode.
    pub fn handle_key(&mut self, chord: KeyChord) -> Option<LayoutChange> {
        if !self.edit_mode {
            return None;
        }
        match match_shortcut(chord, self.options.platform)? {
            HistoryShortcut::Undo => self.undo(),
            HistoryShortcut::Redo => self.redo(),
        }
    }

    // --- Edit mode + saving ---

    pub fn enter_edit_mode(&mut self) {
        if !self.edit_mode {
            self.edit_mode = true;
            debug!(session_id = %self.session_id, "edit mode entered");
        }
    }

    /// Leave edit mode and persist pending changes. An open drag is committed
    /// first. A previously failed save is re-attempted.
    pub async fn exit_edit_mode<S>(&mut self, store: &S) -> &SaveStatus
    where
        S: LayoutStore + ?Sized,
    {
        self.edit_mode = false;
        if self.history.in_gesture() {
            self.end_drag();
        }
        let event = match self.status.state() {
            SaveState::Unsaved => SaveEvent::EditModeExited,
            SaveState::Error => SaveEvent::Retry,
            SaveState::Saved | SaveState::Saving => return self.status(),
        };
        if self.transition(event) {
            self.persist(store).await;
        }
        self.status()
    }

    /// Re-attempt a failed save with the current layout.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] unless the last save failed.
    pub async fn retry_save<S>(&mut self, store: &S) -> Result<&SaveStatus, InvalidTransition>
    where
        S: LayoutStore + ?Sized,
    {
        self.status.apply(SaveEvent::Retry)?;
        self.persist(store).await;
        Ok(self.status())
    }

    async fn persist<S>(&mut self, store: &S)
    where
        S: LayoutStore + ?Sized,
    {
        let timeout = self.options.save_timeout;
        let result = match tokio::time::timeout(timeout, store.save_layout(&self.user_id, &self.layout)).await {
            Ok(result) => result,
            Err(_) => Err(PersistenceError::Timeout {
                after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };
        let event = match result {
            Ok(()) => {
                info!(user_id = %self.user_id, widgets = self.layout.len(), "layout saved");
                SaveEvent::PersistSucceeded(OffsetDateTime::now_utc())
            }
            Err(e) => {
                warn!(user_id = %self.user_id, error = %e, code = e.error_code(), "layout save failed");
                SaveEvent::PersistFailed(e.user_message())
            }
        };
        self.transition(event);
    }

    // --- Internals ---

    fn commit(&mut self, change: LayoutChange) -> Option<LayoutChange> {
        self.layout.renumber();
        self.history.push(self.layout.clone());
        // Inside a drag the status waits for `end_drag`.
        if !self.history.in_gesture() {
            self.mark_mutated();
        }
        debug!(kind = ?change.kind, widget_id = ?change.widget_id, "layout mutated");
        Some(change)
    }

    fn mark_mutated(&mut self) {
        self.transition(SaveEvent::Mutated);
    }

    fn transition(&mut self, event: SaveEvent) -> bool {
        match self.status.apply(event) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "save status unchanged");
                false
            }
        }
    }
}
