use super::*;
use serde_json::json;

use crate::layout::test_helpers::sample_layout;

struct Fixed;

impl WidgetRenderer for Fixed {
    fn title(&self) -> &str {
        "Fixed"
    }

    fn render(&self, data: Option<&serde_json::Value>) -> String {
        data.map_or_else(|| "empty".to_owned(), ToString::to_string)
    }
}

#[test]
fn resolve_registered_and_unknown() {
    let mut registry = WidgetRegistry::new();
    assert!(registry.is_empty());
    registry.register("w0", Fixed);

    assert!(matches!(registry.resolve("w0"), Resolved::Registered(r) if r.title() == "Fixed"));
    assert!(matches!(registry.resolve("w9"), Resolved::Placeholder));
}

#[test]
fn render_layout_keeps_order_and_marks_placeholders() {
    let mut registry = WidgetRegistry::new();
    registry.register("w1", Fixed);
    let data: DashboardData = [("w1".to_owned(), json!(7))].into_iter().collect();

    let rendered = registry.render_layout(&sample_layout(2), &data);
    assert_eq!(rendered.len(), 2);

    assert!(rendered[0].placeholder);
    assert_eq!(rendered[0].widget_id, "w0");
    assert_eq!(rendered[0].warning.as_deref(), Some("Unknown widget \"w0\""));

    assert!(!rendered[1].placeholder);
    assert_eq!(rendered[1].title, "Fixed");
    assert_eq!(rendered[1].body, "7");
    assert_eq!(rendered[1].position.y, 4);
}

#[test]
fn builtin_covers_default_layout() {
    let registry = WidgetRegistry::with_builtin();
    let rendered = registry.render_layout(&DashboardLayout::default_layout(), &DashboardData::new());
    assert_eq!(rendered.len(), 4);
    assert!(rendered.iter().all(|w| !w.placeholder));
    assert!(rendered.iter().all(|w| w.body == "No data"));
}

#[test]
fn metric_renderer_sorts_lines() {
    let body = MetricRenderer::new("Health").render(Some(&json!({"uptime": "99.9%", "cpu": 0.4})));
    assert_eq!(body, "cpu: 0.4\nuptime: 99.9%");
    assert_eq!(MetricRenderer::new("Health").render(Some(&json!([1]))), "No data");
}

#[test]
fn breaker_renderer_lists_states() {
    let body = CircuitBreakerRenderer.render(Some(&json!([
        {"name": "billing", "state": "half_open", "failure_count": 2}
    ])));
    assert_eq!(body, "billing [half-open] failures=2");
}

#[test]
fn activity_renderer_accepts_strings_and_messages() {
    let body = ActivityRenderer.render(Some(&json!(["deploy", {"message": "rollback"}, 3])));
    assert_eq!(body, "deploy\nrollback");
    assert_eq!(ActivityRenderer.render(None), "No data");
}

#[test]
fn rendered_widget_omits_absent_warning() {
    let registry = WidgetRegistry::with_builtin();
    let rendered = registry.render_layout(&DashboardLayout::default_layout(), &DashboardData::new());
    let json = serde_json::to_value(&rendered[0]).unwrap();
    assert!(json.get("warning").is_none());
    assert_eq!(json["widget_id"], "system-health");
}
