//! Frame-level animation performance tracking.
//!
//! DESIGN
//! ======
//! One [`AnimationMetrics`] record per tracker, guarded by a mutex so frame
//! samplers on any thread can report into it. Each tracked animation owns a
//! sampling window: frame timestamps become instantaneous FPS samples until
//! the window fills or the animation is cancelled, and the window average is
//! then blended into the running figure.
//!
//! `average_fps` is `(old + window_avg) / 2`, a cheap running blend and not a
//! true mean. Consumers must not read it as statistics.
//!
//! LOCKING
//! =======
//! Window lock first, then the metrics lock. Never the reverse.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

#[cfg(test)]
#[path = "perf_test.rs"]
mod tests;

pub const DEFAULT_WINDOW_FRAMES: usize = 60;
pub const DEFAULT_DROP_THRESHOLD_FPS: f64 = 55.0;
const INITIAL_AVERAGE_FPS: f64 = 60.0;

// =============================================================================
// METRICS
// =============================================================================

/// Snapshot of the tracker's counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationMetrics {
    pub total_animations: u64,
    pub active_animations: u64,
    pub dropped_frames: u64,
    pub average_fps: f64,
}

impl Default for AnimationMetrics {
    fn default() -> Self {
        Self { total_animations: 0, active_animations: 0, dropped_frames: 0, average_fps: INITIAL_AVERAGE_FPS }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Samples collected before a window completes on its own.
    pub window_frames: usize,
    /// Instantaneous FPS below this counts as a dropped frame.
    pub drop_threshold_fps: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { window_frames: DEFAULT_WINDOW_FRAMES, drop_threshold_fps: DEFAULT_DROP_THRESHOLD_FPS }
    }
}

// =============================================================================
// TRACKER
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct PerformanceTracker {
    metrics: Arc<Mutex<AnimationMetrics>>,
    config: TrackerConfig,
}

impl PerformanceTracker {
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self { metrics: Arc::new(Mutex::new(AnimationMetrics::default())), config }
    }

    /// The process-wide tracker with default settings.
    #[must_use]
    pub fn global() -> &'static PerformanceTracker {
        static GLOBAL: OnceLock<PerformanceTracker> = OnceLock::new();
        GLOBAL.get_or_init(PerformanceTracker::default)
    }

    #[must_use]
    pub fn metrics(&self) -> AnimationMetrics {
        *lock(&self.metrics)
    }

    /// Start tracking an animation. Dropping the handle cancels it.
    #[must_use]
    pub fn track(&self, animation_id: impl Into<String>) -> TrackHandle {
        let animation_id = animation_id.into();
        {
            let mut m = lock(&self.metrics);
            m.total_animations += 1;
            m.active_animations += 1;
        }
        debug!(%animation_id, "animation tracking started");
        TrackHandle {
            cancel: CancelHandle {
                animation_id: Arc::from(animation_id),
                window: Arc::new(Mutex::new(SampleWindow::default())),
                metrics: Arc::clone(&self.metrics),
            },
            config: self.config,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// PER-ANIMATION WINDOW
// =============================================================================

#[derive(Debug, Default)]
struct SampleWindow {
    last_frame: Option<Instant>,
    samples: Vec<f64>,
    finished: bool,
}

/// Whether a frame report left the window open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Sampling,
    Complete,
}

/// Cloneable cancel function for a tracked animation.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    animation_id: Arc<str>,
    window: Arc<Mutex<SampleWindow>>,
    metrics: Arc<Mutex<AnimationMetrics>>,
}

impl CancelHandle {
    /// Stop sampling and fold the window into the metrics. Safe to call any
    /// number of times, including after the window completed on its own.
    pub fn cancel(&self) {
        let mut window = lock(&self.window);
        self.finish(&mut window);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        lock(&self.window).finished
    }

    fn finish(&self, window: &mut SampleWindow) {
        if window.finished {
            return;
        }
        window.finished = true;

        let mut m = lock(&self.metrics);
        if !window.samples.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let avg = window.samples.iter().sum::<f64>() / window.samples.len() as f64;
            m.average_fps = (m.average_fps + avg) / 2.0;
        }
        m.active_animations = m.active_animations.saturating_sub(1);
        debug!(
            animation_id = %self.animation_id,
            samples = window.samples.len(),
            average_fps = m.average_fps,
            "animation tracking finished"
        );
    }
}

/// Owner handle for one tracked animation.
#[derive(Debug)]
pub struct TrackHandle {
    cancel: CancelHandle,
    config: TrackerConfig,
}

impl TrackHandle {
    #[must_use]
    pub fn animation_id(&self) -> &str {
        &self.cancel.animation_id
    }

    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cancel.is_finished()
    }

    /// Report a frame at the current instant.
    pub fn record_frame(&self) -> FrameOutcome {
        self.record_frame_at(Instant::now())
    }

    /// Report a frame rendered at `at`. The first frame only sets the
    /// baseline; frames after completion are ignored.
    pub fn record_frame_at(&self, at: Instant) -> FrameOutcome {
        let mut window = lock(&self.cancel.window);
        if window.finished {
            return FrameOutcome::Complete;
        }

        let previous = window.last_frame.replace(at);
        let Some(previous) = previous else {
            return FrameOutcome::Sampling;
        };
        let delta = at.saturating_duration_since(previous);
        if delta.is_zero() {
            return FrameOutcome::Sampling;
        }

        let fps = 1.0 / delta.as_secs_f64();
        window.samples.push(fps);
        if fps < self.config.drop_threshold_fps {
            lock(&self.cancel.metrics).dropped_frames += 1;
        }

        if window.samples.len() >= self.config.window_frames {
            self.cancel.finish(&mut window);
            return FrameOutcome::Complete;
        }
        FrameOutcome::Sampling
    }
}

impl Drop for TrackHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Shortest accepted frame period; `tokio::time::interval` rejects zero.
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Drive a tracked animation from a frame ticker until its window completes
/// or it is cancelled. A zero interval is raised to 1ms.
pub fn spawn_frame_sampler(handle: TrackHandle, frame_interval: Duration) -> JoinHandle<()> {
    let frame_interval = frame_interval.max(MIN_FRAME_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if handle.record_frame() == FrameOutcome::Complete {
                break;
            }
        }
    })
}
