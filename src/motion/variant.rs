//! Variant factory. Turns an animation kind and a spring preset into a
//! three-phase keyframe descriptor.
//!
//! DESIGN
//! ======
//! A variant is plain data (`initial` / `animate` / `exit` states, each with
//! its own transition) so the rendering layer can consume it as JSON. Entry
//! transitions take their duration from the preset; exit transitions run at
//! 50 to 60% of that. Looping kinds
//! (`pulse`, `rotate`) have no exit and repeat until the host cancels them.
//!
//! Reduced motion overrides everything: every phase becomes a fully opaque,
//! zero-duration no-op.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::preference::MotionPreference;
use super::preset::{PresetName, SpringPreset, get_preset};

#[cfg(test)]
#[path = "variant_test.rs"]
mod tests;

/// Travel distance for slide entrances and exits, in CSS pixels.
const SLIDE_OFFSET_PX: f64 = 20.0;
const SHAKE_OFFSET_PX: f64 = 10.0;
const SCALE_FROM: f64 = 0.8;
const POP_FROM: f64 = 0.5;
const POP_OVERSHOOT: f64 = 1.1;
const PULSE_PEAK: f64 = 1.05;
const PULSE_PERIOD_FACTOR: f64 = 4.0;
const ROTATE_PERIOD_FACTOR: f64 = 5.0;

// =============================================================================
// KINDS AND PROPERTIES
// =============================================================================

/// The animation shapes the factory knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    #[default]
    Fade,
    Scale,
    Pop,
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    Shake,
    Pulse,
    Rotate,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 10] = [
        AnimationKind::Fade,
        AnimationKind::Scale,
        AnimationKind::Pop,
        AnimationKind::SlideUp,
        AnimationKind::SlideDown,
        AnimationKind::SlideLeft,
        AnimationKind::SlideRight,
        AnimationKind::Shake,
        AnimationKind::Pulse,
        AnimationKind::Rotate,
    ];

    /// Parse a kind name (`"slide-up"`, `"slideUp"` and `"slide_up"` all
    /// work). Unknown names fall back to `fade`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "scale" => Self::Scale,
            "pop" => Self::Pop,
            "slideup" => Self::SlideUp,
            "slidedown" => Self::SlideDown,
            "slideleft" => Self::SlideLeft,
            "slideright" => Self::SlideRight,
            "shake" => Self::Shake,
            "pulse" => Self::Pulse,
            "rotate" => Self::Rotate,
            _ => Self::Fade,
        }
    }

    /// Continuous kinds loop until cancelled and have no exit phase.
    #[must_use]
    pub fn is_looping(self) -> bool {
        matches!(self, Self::Pulse | Self::Rotate)
    }

    /// Exit duration as a fraction of the entry duration.
    #[must_use]
    pub fn exit_ratio(self) -> f64 {
        match self {
            Self::SlideUp | Self::SlideDown | Self::SlideLeft | Self::SlideRight | Self::Shake => 0.5,
            _ => 0.6,
        }
    }
}

/// Animatable properties understood by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Opacity,
    Scale,
    X,
    Y,
    Rotate,
}

/// A property target: either a final value or a keyframe sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Value(f64),
    Keyframes(Vec<f64>),
}

impl Target {
    /// The value the property rests on once the phase finishes.
    #[must_use]
    pub fn settled(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Keyframes(frames) => frames.last().copied(),
        }
    }
}

// =============================================================================
// TRANSITIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Easing {
    Spring { stiffness: f64, damping: f64, mass: f64 },
    EaseInOut,
    EaseIn,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    Once,
    Infinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub duration_secs: f64,
    pub easing: Easing,
    pub repeat: Repeat,
}

impl Transition {
    #[must_use]
    pub fn spring(preset: &SpringPreset) -> Self {
        Self {
            duration_secs: preset.base_duration_secs,
            easing: Easing::Spring { stiffness: preset.stiffness, damping: preset.damping, mass: preset.mass },
            repeat: Repeat::Once,
        }
    }

    #[must_use]
    pub fn tween(duration_secs: f64, easing: Easing) -> Self {
        Self { duration_secs, easing, repeat: Repeat::Once }
    }

    /// Zero-duration transition used by reduced motion.
    #[must_use]
    pub fn instant() -> Self {
        Self::tween(0.0, Easing::Linear)
    }

    #[must_use]
    pub fn looping(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self
    }
}

// =============================================================================
// STATES AND VARIANTS
// =============================================================================

/// One phase of a variant: property targets plus the transition into them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub values: BTreeMap<Property, Target>,
    pub transition: Transition,
}

impl MotionState {
    #[must_use]
    pub fn new(transition: Transition) -> Self {
        Self { values: BTreeMap::new(), transition }
    }

    #[must_use]
    pub fn with(mut self, property: Property, value: f64) -> Self {
        self.values.insert(property, Target::Value(value));
        self
    }

    #[must_use]
    pub fn with_keyframes(mut self, property: Property, frames: Vec<f64>) -> Self {
        self.values.insert(property, Target::Keyframes(frames));
        self
    }

    #[must_use]
    pub fn get(&self, property: Property) -> Option<&Target> {
        self.values.get(&property)
    }
}

/// A complete entrance/steady/exit description for one animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationVariant {
    pub kind: AnimationKind,
    pub preset: PresetName,
    pub initial: MotionState,
    pub animate: MotionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<MotionState>,
}

impl AnimationVariant {
    /// The reduced-motion rendition: opaque and instant in every phase.
    #[must_use]
    pub fn reduced(kind: AnimationKind, preset: PresetName) -> Self {
        let still = MotionState::new(Transition::instant()).with(Property::Opacity, 1.0);
        Self { kind, preset, initial: still.clone(), animate: still.clone(), exit: Some(still) }
    }

    /// True when no phase takes any time.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.phases().all(|s| s.transition.duration_secs == 0.0)
    }

    /// Entry duration in seconds.
    #[must_use]
    pub fn entry_duration_secs(&self) -> f64 {
        self.animate.transition.duration_secs
    }

    #[must_use]
    pub fn exit_duration_secs(&self) -> Option<f64> {
        self.exit.as_ref().map(|s| s.transition.duration_secs)
    }

    fn phases(&self) -> impl Iterator<Item = &MotionState> {
        [Some(&self.initial), Some(&self.animate), self.exit.as_ref()]
            .into_iter()
            .flatten()
    }
}

/// Build the variant for `kind` driven by `preset`.
#[must_use]
pub fn build_variant(kind: AnimationKind, preset: &SpringPreset, reduced: bool) -> AnimationVariant {
    if reduced {
        return AnimationVariant::reduced(kind, preset.name);
    }

    let entry = Transition::spring(preset);
    let base = preset.base_duration_secs;
    let exit = Transition::tween(base * kind.exit_ratio(), Easing::EaseIn);
    let at_rest = MotionState::new(entry);

    let (initial, animate, exit) = match kind {
        AnimationKind::Fade => (
            at_rest.clone().with(Property::Opacity, 0.0),
            at_rest.with(Property::Opacity, 1.0),
            Some(MotionState::new(exit).with(Property::Opacity, 0.0)),
        ),
        AnimationKind::Scale => (
            at_rest.clone().with(Property::Opacity, 0.0).with(Property::Scale, SCALE_FROM),
            at_rest.with(Property::Opacity, 1.0).with(Property::Scale, 1.0),
            Some(MotionState::new(exit).with(Property::Opacity, 0.0).with(Property::Scale, SCALE_FROM)),
        ),
        AnimationKind::Pop => (
            at_rest.with(Property::Opacity, 0.0).with(Property::Scale, POP_FROM),
            MotionState::new(Transition::tween(base, Easing::EaseInOut))
                .with(Property::Opacity, 1.0)
                .with_keyframes(Property::Scale, vec![POP_FROM, POP_OVERSHOOT, 1.0]),
            Some(MotionState::new(exit).with(Property::Opacity, 0.0).with(Property::Scale, POP_FROM)),
        ),
        AnimationKind::SlideUp | AnimationKind::SlideDown | AnimationKind::SlideLeft | AnimationKind::SlideRight => {
            let (axis, from) = match kind {
                AnimationKind::SlideUp => (Property::Y, SLIDE_OFFSET_PX),
                AnimationKind::SlideDown => (Property::Y, -SLIDE_OFFSET_PX),
                AnimationKind::SlideLeft => (Property::X, SLIDE_OFFSET_PX),
                _ => (Property::X, -SLIDE_OFFSET_PX),
            };
            (
                at_rest.clone().with(Property::Opacity, 0.0).with(axis, from),
                at_rest.with(Property::Opacity, 1.0).with(axis, 0.0),
                // Exits continue in the direction of travel.
                Some(MotionState::new(exit).with(Property::Opacity, 0.0).with(axis, -from)),
            )
        }
        AnimationKind::Shake => (
            at_rest.with(Property::X, 0.0),
            MotionState::new(Transition::tween(base, Easing::EaseInOut)).with_keyframes(
                Property::X,
                vec![0.0, -SHAKE_OFFSET_PX, SHAKE_OFFSET_PX, -SHAKE_OFFSET_PX, SHAKE_OFFSET_PX, 0.0],
            ),
            Some(MotionState::new(exit).with(Property::X, 0.0)),
        ),
        AnimationKind::Pulse => (
            at_rest.with(Property::Scale, 1.0),
            MotionState::new(Transition::tween(base * PULSE_PERIOD_FACTOR, Easing::EaseInOut).looping())
                .with_keyframes(Property::Scale, vec![1.0, PULSE_PEAK, 1.0]),
            None,
        ),
        AnimationKind::Rotate => (
            at_rest.with(Property::Rotate, 0.0),
            MotionState::new(Transition::tween(base * ROTATE_PERIOD_FACTOR, Easing::Linear).looping())
                .with(Property::Rotate, 360.0),
            None,
        ),
    };

    AnimationVariant { kind, preset: preset.name, initial, animate, exit }
}

// =============================================================================
// FACTORY
// =============================================================================

/// Builds variants while honoring the live reduced-motion preference.
#[derive(Clone, Debug, Default)]
pub struct VariantFactory {
    preference: MotionPreference,
}

impl VariantFactory {
    #[must_use]
    pub fn new(preference: MotionPreference) -> Self {
        Self { preference }
    }

    #[must_use]
    pub fn preference(&self) -> &MotionPreference {
        &self.preference
    }

    #[must_use]
    pub fn build(&self, kind: AnimationKind, preset: PresetName) -> AnimationVariant {
        build_variant(kind, preset.preset(), self.preference.is_reduced())
    }

    /// String-keyed entry point: unknown kinds become `fade`, unknown presets
    /// become `default`.
    #[must_use]
    pub fn build_named(&self, kind: &str, preset: &str) -> AnimationVariant {
        build_variant(AnimationKind::from_name(kind), get_preset(preset), self.preference.is_reduced())
    }

    /// A variant that re-derives itself when the preference changes.
    #[must_use]
    pub fn watch(&self, kind: AnimationKind, preset: PresetName) -> VariantWatch {
        let mut rx = self.preference.subscribe();
        let reduced = *rx.borrow_and_update();
        VariantWatch { kind, preset, rx, current: build_variant(kind, preset.preset(), reduced) }
    }
}

/// A live variant bound to the reduced-motion preference.
pub struct VariantWatch {
    kind: AnimationKind,
    preset: PresetName,
    rx: watch::Receiver<bool>,
    current: AnimationVariant,
}

impl VariantWatch {
    #[must_use]
    pub fn current(&self) -> &AnimationVariant {
        &self.current
    }

    /// Wait for the preference to change and return the rebuilt variant.
    /// Returns `None` once every preference handle has been dropped.
    pub async fn changed(&mut self) -> Option<&AnimationVariant> {
        self.rx.changed().await.ok()?;
        let reduced = *self.rx.borrow_and_update();
        self.current = build_variant(self.kind, self.preset.preset(), reduced);
        Some(&self.current)
    }
}
