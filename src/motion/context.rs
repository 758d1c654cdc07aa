//! Contextual preset selection.
//!
//! DESIGN
//! ======
//! A small first-match decision list over a [`RuntimeContext`] snapshot.
//! Resource constraints (power, network) are checked before device class,
//! and device class before aesthetic preference. Reduced motion sits above
//! all of them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::preference::MotionPreference;
use super::preset::PresetName;
use super::variant::{AnimationKind, AnimationVariant, build_variant};

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;

// =============================================================================
// CONTEXT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionClass {
    #[default]
    Fast,
    Medium,
    Slow,
}

impl ConnectionClass {
    /// Map a Network Information API `effectiveType` string. Unknown values
    /// are treated as fast.
    #[must_use]
    pub fn from_effective_type(effective_type: &str) -> Self {
        match effective_type.trim().to_ascii_lowercase().as_str() {
            "slow-2g" | "2g" => Self::Slow,
            "3g" => Self::Medium,
            _ => Self::Fast,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserPreference {
    #[default]
    Default,
    Playful,
    Minimal,
}

impl UserPreference {
    /// Unknown names fall back to `Default`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "playful" => Self::Playful,
            "minimal" => Self::Minimal,
            _ => Self::Default,
        }
    }
}

/// Snapshot of the environment, read once per decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuntimeContext {
    pub is_mobile: bool,
    pub is_low_power: bool,
    pub connection: ConnectionClass,
    pub preference: UserPreference,
}

impl RuntimeContext {
    /// Battery saver or a slow link.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        self.is_low_power || self.connection == ConnectionClass::Slow
    }
}

/// Outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionChoice {
    /// Reduced motion: render zero-duration no-ops.
    Disabled,
    Preset(PresetName),
}

// =============================================================================
// SELECTOR
// =============================================================================

/// Picks presets and variants for a runtime context.
#[derive(Clone, Debug, Default)]
pub struct ContextualSelector {
    preference: MotionPreference,
}

impl ContextualSelector {
    #[must_use]
    pub fn new(preference: MotionPreference) -> Self {
        Self { preference }
    }

    #[must_use]
    pub fn select_preset(&self, ctx: &RuntimeContext) -> MotionChoice {
        let choice = select_preset(ctx, self.preference.is_reduced());
        debug!(?ctx, ?choice, "motion preset selected");
        choice
    }

    /// Build the variant for `kind` under `ctx`.
    ///
    /// Constrained contexts also swap looping kinds for a one-shot fade so
    /// nothing animates continuously on battery or a slow link.
    #[must_use]
    pub fn select_variant(&self, ctx: &RuntimeContext, kind: AnimationKind) -> AnimationVariant {
        let kind = if ctx.is_constrained() && kind.is_looping() { AnimationKind::Fade } else { kind };
        match self.select_preset(ctx) {
            MotionChoice::Disabled => AnimationVariant::reduced(kind, PresetName::Default),
            MotionChoice::Preset(name) => build_variant(kind, name.preset(), false),
        }
    }
}

/// The decision list itself, independent of any preference handle.
#[must_use]
pub fn select_preset(ctx: &RuntimeContext, reduced_motion: bool) -> MotionChoice {
    if reduced_motion {
        return MotionChoice::Disabled;
    }
    let name = if ctx.is_constrained() {
        PresetName::Snappy
    } else if ctx.is_mobile {
        PresetName::Smooth
    } else {
        match ctx.preference {
            UserPreference::Playful => PresetName::Bouncy,
            UserPreference::Minimal => PresetName::Gentle,
            UserPreference::Default => PresetName::Default,
        }
    };
    MotionChoice::Preset(name)
}
