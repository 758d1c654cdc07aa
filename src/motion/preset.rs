//! Spring presets: the static physics table every animation draws from.
//!
//! DESIGN
//! ======
//! Six named parameter sets live in a `static` table. Lookups hand out
//! `&'static` references so two lookups of the same preset are the same
//! object, and an unknown name resolves to `default` instead of failing.
//! Higher stiffness with lower damping reads as "bouncier"; that is a design
//! guideline for the table values, nothing enforces it.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "preset_test.rs"]
mod tests;

// =============================================================================
// TYPES
// =============================================================================

/// Name of one of the six well-known presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    Gentle,
    #[default]
    Default,
    Bouncy,
    Snappy,
    Smooth,
    Wobbly,
}

impl PresetName {
    pub const ALL: [PresetName; 6] = [
        PresetName::Gentle,
        PresetName::Default,
        PresetName::Bouncy,
        PresetName::Snappy,
        PresetName::Smooth,
        PresetName::Wobbly,
    ];

    /// Parse a preset name. Returns `None` for anything outside the table.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gentle" => Some(Self::Gentle),
            "default" => Some(Self::Default),
            "bouncy" => Some(Self::Bouncy),
            "snappy" => Some(Self::Snappy),
            "smooth" => Some(Self::Smooth),
            "wobbly" => Some(Self::Wobbly),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gentle => "gentle",
            Self::Default => "default",
            Self::Bouncy => "bouncy",
            Self::Snappy => "snappy",
            Self::Smooth => "smooth",
            Self::Wobbly => "wobbly",
        }
    }

    /// The table entry for this name.
    #[must_use]
    pub fn preset(self) -> &'static SpringPreset {
        &PRESETS[self as usize]
    }
}

/// Immutable spring parameters for one motion feel.
#[derive(Debug, PartialEq, Serialize)]
pub struct SpringPreset {
    pub name: PresetName,
    /// Spring constant; higher settles faster.
    pub stiffness: f64,
    /// Resistance; lower overshoots more.
    pub damping: f64,
    pub mass: f64,
    /// Entry duration in seconds for duration-based renderers.
    pub base_duration_secs: f64,
}

impl SpringPreset {
    /// Damping ratio ζ = c / (2√(km)). Below 1.0 the spring overshoots.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

// =============================================================================
// TABLE
// =============================================================================

// Order matches the `PresetName` discriminants.
static PRESETS: [SpringPreset; 6] = [
    SpringPreset { name: PresetName::Gentle, stiffness: 120.0, damping: 14.0, mass: 1.0, base_duration_secs: 0.5 },
    SpringPreset { name: PresetName::Default, stiffness: 260.0, damping: 20.0, mass: 1.0, base_duration_secs: 0.3 },
    SpringPreset { name: PresetName::Bouncy, stiffness: 400.0, damping: 10.0, mass: 1.0, base_duration_secs: 0.4 },
    SpringPreset { name: PresetName::Snappy, stiffness: 500.0, damping: 30.0, mass: 1.0, base_duration_secs: 0.2 },
    SpringPreset { name: PresetName::Smooth, stiffness: 200.0, damping: 25.0, mass: 1.0, base_duration_secs: 0.35 },
    SpringPreset { name: PresetName::Wobbly, stiffness: 180.0, damping: 8.0, mass: 1.2, base_duration_secs: 0.6 },
];

/// Look up a preset by name, falling back to `default` for unknown names.
#[must_use]
pub fn get_preset(name: &str) -> &'static SpringPreset {
    PresetName::parse(name).unwrap_or_default().preset()
}

/// All six presets in table order.
#[must_use]
pub fn all_presets() -> &'static [SpringPreset] {
    &PRESETS
}
