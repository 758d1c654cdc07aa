//! Adaptive animation engine.
//!
//! | Module | Role |
//! |--------|------|
//! | [`preset`] | Static spring preset table |
//! | [`variant`] | Keyframe descriptors built from a kind and a preset |
//! | [`context`] | Preset choice from device, power, network and taste |
//! | [`haptic`] | Timed class pulses standing in for tactile feedback |
//! | [`perf`] | Frame sampling and process-wide animation counters |
//! | [`preference`] | Observable reduced-motion flag |

pub mod context;
pub mod haptic;
pub mod perf;
pub mod preference;
pub mod preset;
pub mod variant;

use context::ContextualSelector;
use haptic::HapticSimulator;
use perf::PerformanceTracker;
use preference::MotionPreference;
use variant::VariantFactory;

/// Every motion component wired to one shared preference.
#[derive(Clone, Debug)]
pub struct Motion {
    pub preference: MotionPreference,
    pub variants: VariantFactory,
    pub selector: ContextualSelector,
    pub haptics: HapticSimulator,
    pub tracker: PerformanceTracker,
}

impl Motion {
    #[must_use]
    pub fn new(preference: MotionPreference, tracker: PerformanceTracker) -> Self {
        Self {
            variants: VariantFactory::new(preference.clone()),
            selector: ContextualSelector::new(preference.clone()),
            haptics: HapticSimulator::new(preference.clone()),
            preference,
            tracker,
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::new(MotionPreference::default(), PerformanceTracker::global().clone())
    }
}
