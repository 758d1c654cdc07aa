//! Autosave status machine.
//!
//! DESIGN
//! ======
//! Four states driven by five events. The table in [`SaveStatusMachine::apply`]
//! is the whole protocol: anything it does not list is rejected and leaves
//! the status untouched.
//!
//! ```text
//! saved   --Mutated-->          unsaved
//! unsaved --Mutated-->          unsaved
//! unsaved --EditModeExited-->   saving
//! saving  --PersistSucceeded--> saved
//! saving  --PersistFailed-->    error
//! error   --Retry-->            saving
//! ```

use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

#[cfg(test)]
#[path = "save_test.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveState {
    #[default]
    Saved,
    Saving,
    Unsaved,
    Error,
}

impl SaveState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Saving => "saving",
            Self::Unsaved => "unsaved",
            Self::Error => "error",
        }
    }
}

/// Snapshot handed to the save indicator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SaveStatus {
    pub state: SaveState,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_saved_at: Option<OffsetDateTime>,
    pub error_message: Option<String>,
}

impl SaveStatus {
    /// Indicator text.
    #[must_use]
    pub fn label(&self) -> String {
        match self.state {
            SaveState::Saved => match self.last_saved_at {
                Some(at) => format!("Saved at {:02}:{:02}", at.hour(), at.minute()),
                None => "Saved".to_owned(),
            },
            SaveState::Saving => "Saving...".to_owned(),
            SaveState::Unsaved => "Unsaved changes".to_owned(),
            SaveState::Error => match &self.error_message {
                Some(message) => format!("Save failed: {message}"),
                None => "Save failed".to_owned(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveEvent {
    Mutated,
    EditModeExited,
    PersistSucceeded(OffsetDateTime),
    PersistFailed(String),
    Retry,
}

impl SaveEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Mutated => "mutated",
            Self::EditModeExited => "edit_mode_exited",
            Self::PersistSucceeded(_) => "persist_succeeded",
            Self::PersistFailed(_) => "persist_failed",
            Self::Retry => "retry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("save status cannot go from {from} on {event}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub event: &'static str,
}

impl InvalidTransition {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        "E_INVALID_TRANSITION"
    }
}

// =============================================================================
// MACHINE
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct SaveStatusMachine {
    status: SaveStatus,
}

impl SaveStatusMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    #[must_use]
    pub fn state(&self) -> SaveState {
        self.status.state
    }

    /// Apply `event` and return the new state.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] for any pair outside the table; the
    /// status is left unchanged.
    pub fn apply(&mut self, event: SaveEvent) -> Result<SaveState, InvalidTransition> {
        let from = self.status.state;
        let next = match (from, event) {
            (SaveState::Saved | SaveState::Unsaved, SaveEvent::Mutated) => SaveState::Unsaved,
            (SaveState::Unsaved, SaveEvent::EditModeExited) | (SaveState::Error, SaveEvent::Retry) => {
                SaveState::Saving
            }
            (SaveState::Saving, SaveEvent::PersistSucceeded(at)) => {
                self.status.last_saved_at = Some(at);
                self.status.error_message = None;
                SaveState::Saved
            }
            (SaveState::Saving, SaveEvent::PersistFailed(message)) => {
                self.status.error_message = Some(message);
                SaveState::Error
            }
            (from, event) => {
                return Err(InvalidTransition { from: from.as_str(), event: event.name() });
            }
        };
        if next != from {
            debug!(from = from.as_str(), to = next.as_str(), "save status transition");
        }
        self.status.state = next;
        Ok(next)
    }
}
