use std::sync::Arc;
use std::time::Duration;

use motionboard::config::DashboardConfig;
use motionboard::layout::editor::DashboardLayoutEditor;
use motionboard::layout::registry::WidgetRegistry;
use motionboard::motion::Motion;
use motionboard::motion::perf::{PerformanceTracker, spawn_frame_sampler};
use motionboard::motion::preference::MotionPreference;
use motionboard::motion::variant::AnimationKind;
use motionboard::net::LayoutStore;
use motionboard::net::data::spawn_data_poller;
use motionboard::net::http::HttpLayoutStore;

/// One frame at 60 Hz.
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = DashboardConfig::from_env().expect("invalid configuration");
    let motion = Motion::new(
        MotionPreference::new(config.prefers_reduced_motion),
        PerformanceTracker::new(config.tracker),
    );

    let store: Arc<dyn LayoutStore> =
        Arc::new(HttpLayoutStore::new(&config.api_url, config.http).expect("HTTP client init failed"));
    tracing::info!(api_url = %config.api_url, user_id = %config.user_id, "dashboard client starting");

    let editor = DashboardLayoutEditor::load(store.as_ref(), &config.user_id, config.editor_options()).await;

    match store.widget_catalog().await {
        Ok(catalog) => tracing::info!(available = catalog.len(), "widget catalog loaded"),
        Err(e) => tracing::warn!(error = %e, code = e.error_code(), "widget catalog unavailable"),
    }

    // Wait for the first data snapshot, then stop polling.
    let (poller, mut data_rx) = spawn_data_poller(Arc::clone(&store), config.poll_interval);
    let first = tokio::time::timeout(Duration::from_secs(config.http.request_secs), data_rx.changed()).await;
    if !matches!(first, Ok(Ok(()))) {
        tracing::warn!("dashboard data unavailable; rendering without content");
    }
    poller.abort();
    let data = data_rx.borrow().clone();

    let choice = motion.selector.select_preset(&config.runtime);
    let entry = motion.selector.select_variant(&config.runtime, AnimationKind::Fade);
    tracing::info!(?choice, duration_secs = entry.entry_duration_secs(), "adaptive motion selected");

    // Sample one entry animation so the frame metrics reflect this host.
    if !entry.is_noop() {
        let handle = motion.tracker.track("dashboard-entry");
        if let Err(e) = spawn_frame_sampler(handle, FRAME_INTERVAL).await {
            tracing::warn!(error = %e, "frame sampler failed");
        }
        let metrics = motion.tracker.metrics();
        tracing::info!(
            average_fps = metrics.average_fps,
            dropped_frames = metrics.dropped_frames,
            "entry animation sampled"
        );
    }

    let rendered = WidgetRegistry::with_builtin().render_layout(editor.layout(), &data);
    let output = serde_json::json!({
        "user_id": editor.user_id(),
        "session_id": editor.session_id(),
        "status": editor.status(),
        "status_label": editor.status().label(),
        "entry_animation": entry,
        "widgets": rendered,
    });
    println!("{}", serde_json::to_string_pretty(&output).expect("output serialization failed"));
}
