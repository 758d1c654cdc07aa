use super::*;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingTarget {
    classes: Mutex<HashSet<String>>,
    events: Mutex<Vec<String>>,
}

impl RecordingTarget {
    fn has(&self, class: &str) -> bool {
        self.classes.lock().unwrap().contains(class)
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ClassTarget for RecordingTarget {
    fn add_class(&self, class: &str) {
        self.classes.lock().unwrap().insert(class.to_owned());
        self.events.lock().unwrap().push(format!("+{class}"));
    }

    fn remove_class(&self, class: &str) {
        self.classes.lock().unwrap().remove(class);
        self.events.lock().unwrap().push(format!("-{class}"));
    }
}

// =============================================================================
// patterns
// =============================================================================

#[test]
fn every_pattern_is_well_formed() {
    for kind in HapticKind::ALL {
        let p = kind.pattern();
        assert_eq!(p.kind, kind);
        assert!(p.intensity > 0.0 && p.intensity <= 1.0, "{kind:?}");
        assert!(p.duration_ms > 0, "{kind:?}");
    }
}

#[test]
fn error_pattern_has_five_beats() {
    assert_eq!(HapticKind::Error.pattern().beats(), 5);
    assert_eq!(HapticKind::Light.pattern().beats(), 1);
}

#[test]
fn names_parse_case_insensitively() {
    assert_eq!(HapticKind::from_name("Success"), Some(HapticKind::Success));
    assert_eq!(HapticKind::from_name("thud"), None);
    assert_eq!(HapticKind::Warning.class_name(), "haptic-warning");
}

// =============================================================================
// trigger
// =============================================================================

#[tokio::test(start_paused = true)]
async fn trigger_adds_then_removes_class() {
    let sim = HapticSimulator::default();
    let target = RecordingTarget::default();

    let started = tokio::time::Instant::now();
    sim.trigger(Some(&target), HapticKind::Heavy).await;

    assert!(started.elapsed() >= Duration::from_millis(30));
    assert!(!target.has("haptic-heavy"));
    assert_eq!(target.events(), vec!["+haptic-heavy", "-haptic-heavy"]);
}

#[tokio::test(start_paused = true)]
async fn class_is_present_while_cue_runs() {
    let sim = HapticSimulator::default();
    let target = RecordingTarget::default();

    let cue = sim.trigger(Some(&target), HapticKind::Error);
    let probe = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        target.has("haptic-error")
    };
    let ((), during) = tokio::join!(cue, probe);
    assert!(during);
    assert!(!target.has("haptic-error"));
}

#[tokio::test(start_paused = true)]
async fn overlapping_calls_each_complete() {
    let sim = HapticSimulator::default();
    let target = RecordingTarget::default();

    tokio::join!(
        sim.trigger(Some(&target), HapticKind::Medium),
        sim.trigger(Some(&target), HapticKind::Medium),
    );

    let events = target.events();
    assert_eq!(events.iter().filter(|e| e.starts_with('+')).count(), 2);
    assert_eq!(events.iter().filter(|e| e.starts_with('-')).count(), 2);
    assert!(!target.has("haptic-medium"));
}

#[tokio::test(start_paused = true)]
async fn reduced_motion_resolves_without_touching_target() {
    let sim = HapticSimulator::new(MotionPreference::new(true));
    let target = RecordingTarget::default();

    let started = tokio::time::Instant::now();
    sim.trigger(Some(&target), HapticKind::Error).await;

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(target.events().is_empty());
}

#[tokio::test]
async fn missing_target_is_noop() {
    let sim = HapticSimulator::default();
    sim.trigger::<RecordingTarget>(None, HapticKind::Light).await;
}

#[tokio::test(start_paused = true)]
async fn unknown_name_is_noop() {
    let sim = HapticSimulator::default();
    let target = RecordingTarget::default();
    sim.trigger_named(Some(&target), "rumble").await;
    assert!(target.events().is_empty());

    sim.trigger_named(Some(&target), "selection").await;
    assert_eq!(target.events().len(), 2);
}

// =============================================================================
// micro-animation
// =============================================================================

#[test]
fn single_beat_dips_scale_by_intensity() {
    let state = micro_animation(HapticKind::Heavy.pattern());
    let Some(crate::motion::variant::Target::Keyframes(frames)) = state.get(Property::Scale) else {
        panic!("expected scale keyframes");
    };
    assert_eq!(frames.len(), 3);
    assert!((frames[1] - (1.0 - 0.05 * 0.8)).abs() < 1e-9);
}

#[test]
fn pulsed_cue_shakes_once_per_beat() {
    let state = micro_animation(HapticKind::Error.pattern());
    let Some(crate::motion::variant::Target::Keyframes(frames)) = state.get(Property::X) else {
        panic!("expected x keyframes");
    };
    assert_eq!(frames.len(), 7);
    assert_eq!(frames.first(), Some(&0.0));
    assert_eq!(frames.last(), Some(&0.0));
    assert!((frames[1] + frames[2]).abs() < 1e-9);
}

#[test]
fn micro_animation_respects_reduced_motion() {
    let pref = MotionPreference::new(false);
    let sim = HapticSimulator::new(pref.clone());
    assert!(sim.micro_animation(HapticKind::Success).is_some());
    pref.set_reduced(true);
    assert!(sim.micro_animation(HapticKind::Success).is_none());
}
