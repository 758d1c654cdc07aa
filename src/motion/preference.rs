//! Reduced-motion preference as an observable value.
//!
//! The host seeds the flag from the platform accessibility setting and calls
//! [`MotionPreference::set_reduced`] whenever the platform reports a change.
//! Consumers either read the current value or hold a subscription and react
//! to changes (see `VariantWatch`).

use tokio::sync::watch;
use tracing::info;

#[cfg(test)]
#[path = "preference_test.rs"]
mod tests;

/// Shared handle to the "prefers reduced motion" flag. Clones observe the
/// same value.
#[derive(Clone, Debug)]
pub struct MotionPreference {
    tx: watch::Sender<bool>,
}

impl MotionPreference {
    #[must_use]
    pub fn new(reduced: bool) -> Self {
        let (tx, _rx) = watch::channel(reduced);
        Self { tx }
    }

    /// Current value of the flag.
    #[must_use]
    pub fn is_reduced(&self) -> bool {
        *self.tx.borrow()
    }

    /// Update the flag. Subscribers are only notified when the value changes.
    pub fn set_reduced(&self, reduced: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == reduced {
                false
            } else {
                *current = reduced;
                true
            }
        });
        if changed {
            info!(reduced, "reduced-motion preference changed");
        }
    }

    /// Subscribe to changes of the flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for MotionPreference {
    fn default() -> Self {
        Self::new(false)
    }
}
