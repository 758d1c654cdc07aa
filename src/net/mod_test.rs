use super::*;

// =============================================================================
// parse_layout_body
// =============================================================================

#[test]
fn layout_body_parses_widgets_in_order() {
    let body = r#"{"widgets":[
        {"id":"b","position":{"x":6,"y":0,"w":6,"h":4}},
        {"id":"a","position":{"x":0,"y":0,"w":6,"h":4}}
    ]}"#;
    let layout = parse_layout_body(body).unwrap().unwrap();
    assert_eq!(layout.ids(), vec!["b", "a"]);
    assert_eq!(layout.widgets[1].order, 1);
    assert_eq!(layout.widgets[0].position.x, 6);
}

#[test]
fn absent_layouts_are_none() {
    assert!(parse_layout_body("").unwrap().is_none());
    assert!(parse_layout_body("null").unwrap().is_none());
    assert!(parse_layout_body("{}").unwrap().is_none());
    assert!(parse_layout_body(r#"{"widgets":"nope"}"#).unwrap().is_none());
}

#[test]
fn malformed_entries_are_skipped_or_defaulted() {
    let body = r#"{"widgets":[{"position":{"x":1}},{"id":"ok","position":"bad"},{"id":42}]}"#;
    let layout = parse_layout_body(body).unwrap().unwrap();
    assert_eq!(layout.ids(), vec!["ok"]);
    assert_eq!(layout.widgets[0].position, PositionHint::default());
}

#[test]
fn invalid_json_is_a_parse_error() {
    let err = parse_layout_body("{not json").unwrap_err();
    assert_eq!(err.error_code(), "E_PARSE");
}

// =============================================================================
// catalog + error bodies
// =============================================================================

#[test]
fn catalog_skips_bad_entries() {
    let body = r#"[{"id":"a","name":"A"},{"id":"b"},"junk",{"id":"c","name":"C"}]"#;
    let catalog = parse_catalog_body(body).unwrap();
    assert_eq!(catalog.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
    assert!(parse_catalog_body(r#"{"widgets":[]}"#).unwrap().is_empty());
}

#[test]
fn error_message_prefers_error_then_message_then_detail() {
    assert_eq!(error_message_from_body(r#"{"error":"quota exceeded"}"#).as_deref(), Some("quota exceeded"));
    assert_eq!(error_message_from_body(r#"{"message":"bad layout"}"#).as_deref(), Some("bad layout"));
    assert_eq!(error_message_from_body(r#"{"detail":"nope"}"#).as_deref(), Some("nope"));
    assert_eq!(error_message_from_body(r#"{"error":"  "}"#), None);
    assert_eq!(error_message_from_body("<html>"), None);
}

#[test]
fn save_request_matches_wire_shape() {
    let layout = crate::layout::test_helpers::sample_layout(2);
    let json = serde_json::to_value(SaveLayoutRequest::new("u1", &layout)).unwrap();
    assert_eq!(json["user_id"], "u1");
    assert_eq!(json["layout"]["widgets"][1]["id"], "w1");
    assert_eq!(json["layout"]["widgets"][1]["position"]["y"], 4);
    assert!(json["layout"]["widgets"][0].get("order").is_none());
}

// =============================================================================
// PersistenceError
// =============================================================================

#[test]
fn user_message_uses_server_text_or_fallback() {
    let with = PersistenceError::Response { status: 400, message: Some("Layout too large".into()) };
    let without = PersistenceError::Response { status: 500, message: None };
    assert_eq!(with.user_message(), "Layout too large");
    assert_eq!(without.user_message(), GENERIC_SAVE_FAILURE);
    assert_eq!(PersistenceError::Request("reset".into()).user_message(), GENERIC_SAVE_FAILURE);
    assert!(PersistenceError::Timeout { after_ms: 10 }.user_message().starts_with(GENERIC_SAVE_FAILURE));
}

#[test]
fn retryable_classification() {
    assert!(PersistenceError::Request("x".into()).retryable());
    assert!(PersistenceError::Timeout { after_ms: 1 }.retryable());
    assert!(PersistenceError::Response { status: 503, message: None }.retryable());
    assert!(PersistenceError::Response { status: 429, message: None }.retryable());
    assert!(!PersistenceError::Response { status: 400, message: None }.retryable());
    assert!(!PersistenceError::Parse("x".into()).retryable());
}
