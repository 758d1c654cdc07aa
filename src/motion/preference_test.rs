use super::*;

#[test]
fn default_is_full_motion() {
    assert!(!MotionPreference::default().is_reduced());
}

#[test]
fn clones_share_the_flag() {
    let pref = MotionPreference::new(false);
    let other = pref.clone();
    other.set_reduced(true);
    assert!(pref.is_reduced());
}

#[tokio::test]
async fn subscribers_see_changes() {
    let pref = MotionPreference::new(false);
    let mut rx = pref.subscribe();
    pref.set_reduced(true);
    rx.changed().await.unwrap();
    assert!(*rx.borrow_and_update());
}

#[test]
fn setting_same_value_does_not_notify() {
    let pref = MotionPreference::new(true);
    let rx = pref.subscribe();
    pref.set_reduced(true);
    assert!(!rx.has_changed().unwrap());
}
