use super::*;

fn stack() -> UndoRedoStack<i32> {
    UndoRedoStack::new(0, DEFAULT_HISTORY_CAPACITY)
}

// =============================================================================
// bounds
// =============================================================================

#[test]
fn fresh_history_cannot_undo_or_redo() {
    let mut s = stack();
    assert!(!s.can_undo());
    assert!(!s.can_redo());
    assert_eq!(*s.undo(), 0);
    assert_eq!(*s.redo(), 0);
    assert_eq!(s.cursor(), 0);
    assert!(!s.is_empty());
}

#[test]
fn one_push_enables_undo_only() {
    let mut s = stack();
    s.push(1);
    assert!(s.can_undo());
    assert!(!s.can_redo());
    assert_eq!(*s.current(), 1);
}

#[test]
fn undo_then_redo_walks_the_cursor() {
    let mut s = stack();
    s.push(1);
    s.push(2);
    assert_eq!(*s.undo(), 1);
    assert_eq!(*s.undo(), 0);
    assert_eq!(*s.undo(), 0);
    assert_eq!(*s.redo(), 1);
    assert_eq!(*s.redo(), 2);
    assert_eq!(*s.redo(), 2);
}

#[test]
fn push_after_undo_discards_redo_branch() {
    let mut s = stack();
    s.push(1);
    s.push(2);
    s.undo();
    assert!(s.can_redo());
    s.push(3);
    assert!(!s.can_redo());
    assert_eq!(s.len(), 3);
    assert_eq!(*s.undo(), 1);
}

#[test]
fn capacity_evicts_oldest_and_keeps_cursor_valid() {
    let mut s = UndoRedoStack::new(0, 3);
    for i in 1..=5 {
        s.push(i);
    }
    assert_eq!(s.len(), 3);
    assert_eq!(s.cursor(), 2);
    assert_eq!(*s.undo(), 4);
    assert_eq!(*s.undo(), 3);
    assert!(!s.can_undo());
}

#[test]
fn zero_capacity_keeps_one_entry() {
    let mut s = UndoRedoStack::new(0, 0);
    s.push(7);
    assert_eq!(s.capacity(), 1);
    assert_eq!(s.len(), 1);
    assert_eq!(*s.current(), 7);
    assert!(!s.can_undo());
}

#[test]
fn reset_restarts_history() {
    let mut s = stack();
    s.push(1);
    s.push(2);
    s.reset(9);
    assert_eq!(s.len(), 1);
    assert_eq!(*s.current(), 9);
    assert!(!s.can_undo());
}

// =============================================================================
// gestures
// =============================================================================

#[test]
fn gesture_collapses_pushes_into_one_entry() {
    let mut s = stack();
    s.begin_gesture();
    for i in 1..=20 {
        s.push(i);
    }
    assert_eq!(s.len(), 1);
    assert!(s.commit_gesture());
    assert_eq!(s.len(), 2);
    assert_eq!(*s.current(), 20);
    assert_eq!(*s.undo(), 0);
}

#[test]
fn gesture_ending_where_it_started_records_nothing() {
    let mut s = stack();
    s.begin_gesture();
    s.push(5);
    s.push(0);
    assert!(!s.commit_gesture());
    assert_eq!(s.len(), 1);
    assert!(!s.in_gesture());
}

#[test]
fn empty_or_missing_gesture_commits_nothing() {
    let mut s = stack();
    assert!(!s.commit_gesture());
    s.begin_gesture();
    assert!(!s.commit_gesture());
}

#[test]
fn cancelled_gesture_returns_start_snapshot() {
    let mut s = stack();
    s.push(1);
    s.begin_gesture();
    s.push(2);
    s.push(3);
    assert_eq!(*s.cancel_gesture(), 1);
    assert_eq!(s.len(), 2);
    s.push(4);
    assert_eq!(s.len(), 3);
}

#[test]
fn nested_begin_keeps_pending_snapshot() {
    let mut s = stack();
    s.begin_gesture();
    s.push(1);
    s.begin_gesture();
    assert!(s.commit_gesture());
    assert_eq!(*s.current(), 1);
}
