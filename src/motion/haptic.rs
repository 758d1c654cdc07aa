//! Simulated haptics for pointer devices that have none.
//!
//! DESIGN
//! ======
//! A haptic cue is a timed CSS class on the target element plus an optional
//! micro-animation. Each `trigger` call owns its own timer: overlapping calls
//! on the same target do not cancel each other, so the first call to finish
//! removes the class even while a later call is still running. Hosts that
//! care should not stack identical cues on one element.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::preference::MotionPreference;
use super::variant::{Easing, MotionState, Property, Transition};

#[cfg(test)]
#[path = "haptic_test.rs"]
mod tests;

/// Peak horizontal travel of a pulsed cue at full intensity, in CSS pixels.
const PULSE_AMPLITUDE_PX: f64 = 4.0;
/// Scale dip of a single-beat cue at full intensity.
const TAP_SCALE_DIP: f64 = 0.05;

// =============================================================================
// PATTERNS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticKind {
    Light,
    Medium,
    Heavy,
    Success,
    Warning,
    Error,
    Selection,
}

impl HapticKind {
    pub const ALL: [HapticKind; 7] = [
        HapticKind::Light,
        HapticKind::Medium,
        HapticKind::Heavy,
        HapticKind::Success,
        HapticKind::Warning,
        HapticKind::Error,
        HapticKind::Selection,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str().eq_ignore_ascii_case(name.trim()))
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Selection => "selection",
        }
    }

    /// CSS class applied to the target while the cue runs.
    #[must_use]
    pub fn class_name(self) -> String {
        format!("haptic-{}", self.as_str())
    }

    #[must_use]
    pub fn pattern(self) -> &'static HapticPattern {
        &PATTERNS[self as usize]
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct HapticPattern {
    pub kind: HapticKind,
    /// Strength in (0, 1].
    pub intensity: f64,
    pub duration_ms: u32,
    /// Sub-interval lengths for multi-beat cues.
    pub pulses: Option<&'static [u32]>,
}

impl HapticPattern {
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration_ms))
    }

    #[must_use]
    pub fn beats(&self) -> usize {
        self.pulses.map_or(1, <[u32]>::len)
    }
}

static PATTERNS: [HapticPattern; 7] = [
    HapticPattern { kind: HapticKind::Light, intensity: 0.3, duration_ms: 10, pulses: None },
    HapticPattern { kind: HapticKind::Medium, intensity: 0.5, duration_ms: 20, pulses: None },
    HapticPattern { kind: HapticKind::Heavy, intensity: 0.8, duration_ms: 30, pulses: None },
    HapticPattern { kind: HapticKind::Success, intensity: 0.6, duration_ms: 50, pulses: Some(&[10, 50, 10]) },
    HapticPattern { kind: HapticKind::Warning, intensity: 0.7, duration_ms: 80, pulses: Some(&[20, 40, 20]) },
    HapticPattern { kind: HapticKind::Error, intensity: 1.0, duration_ms: 100, pulses: Some(&[10, 30, 10, 30, 10]) },
    HapticPattern { kind: HapticKind::Selection, intensity: 0.2, duration_ms: 5, pulses: None },
];

// =============================================================================
// TARGETS
// =============================================================================

/// Anything that can carry CSS classes, typically a DOM element wrapper.
pub trait ClassTarget {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
}

// =============================================================================
// SIMULATOR
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct HapticSimulator {
    preference: MotionPreference,
}

impl HapticSimulator {
    #[must_use]
    pub fn new(preference: MotionPreference) -> Self {
        Self { preference }
    }

    /// Pulse the cue's class on `target` for the pattern's duration.
    ///
    /// Resolves immediately when reduced motion is on or there is no target.
    pub async fn trigger<T>(&self, target: Option<&T>, kind: HapticKind)
    where
        T: ClassTarget + ?Sized,
    {
        let Some(target) = target else {
            return;
        };
        if self.preference.is_reduced() {
            return;
        }

        let pattern = kind.pattern();
        let class = kind.class_name();
        trace!(%class, duration_ms = pattern.duration_ms, "haptic cue start");
        target.add_class(&class);
        tokio::time::sleep(pattern.duration()).await;
        target.remove_class(&class);
        trace!(%class, "haptic cue end");
    }

    /// Like [`trigger`](Self::trigger) but keyed by pattern name. Unknown
    /// names do nothing.
    pub async fn trigger_named<T>(&self, target: Option<&T>, name: &str)
    where
        T: ClassTarget + ?Sized,
    {
        match HapticKind::from_name(name) {
            Some(kind) => self.trigger(target, kind).await,
            None => debug!(name, "unknown haptic pattern ignored"),
        }
    }

    /// Visual micro-motion for the cue, or `None` under reduced motion.
    #[must_use]
    pub fn micro_animation(&self, kind: HapticKind) -> Option<MotionState> {
        if self.preference.is_reduced() {
            return None;
        }
        Some(micro_animation(kind.pattern()))
    }
}

/// Single-beat cues dip in scale; multi-beat cues shake sideways once per
/// beat, alternating direction.
#[must_use]
pub fn micro_animation(pattern: &HapticPattern) -> MotionState {
    let transition = Transition::tween(f64::from(pattern.duration_ms) / 1000.0, Easing::EaseInOut);
    match pattern.pulses {
        None => MotionState::new(transition)
            .with_keyframes(Property::Scale, vec![1.0, 1.0 - TAP_SCALE_DIP * pattern.intensity, 1.0]),
        Some(pulses) => {
            let amplitude = PULSE_AMPLITUDE_PX * pattern.intensity;
            let mut frames = Vec::with_capacity(pulses.len() + 2);
            frames.push(0.0);
            let mut sign = 1.0;
            for _ in pulses {
                frames.push(amplitude * sign);
                sign = -sign;
            }
            frames.push(0.0);
            MotionState::new(transition).with_keyframes(Property::X, frames)
        }
    }
}
