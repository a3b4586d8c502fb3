use infokit_core::{EditorEvent, EventCategory, GeometryEvent};
use infokit_editor::{Bounds, Modifiers, PointerEvent, SelectionMode};

use crate::support::{count, editor, label_node, record};

#[test]
fn test_click_selects_node() {
    let mut editor = editor(&["A", "B"]);
    let a = label_node(&mut editor, 0, 10.0, 10.0, 10.0, 10.0);
    let b = label_node(&mut editor, 1, 40.0, 10.0, 10.0, 10.0);

    editor.pointer_down(&PointerEvent::new(15.0, 15.0));
    editor.pointer_up(&PointerEvent::new(16.0, 15.0));
    assert_eq!(editor.selection().nodes(), &[a]);

    let shift = Modifiers::SHIFT;
    editor.pointer_down(&PointerEvent::new(45.0, 15.0).with_modifiers(shift));
    editor.pointer_up(&PointerEvent::new(45.0, 15.0).with_modifiers(shift));
    assert_eq!(editor.selection().nodes(), &[a, b]);

    editor.pointer_down(&PointerEvent::new(15.0, 15.0).with_modifiers(shift));
    editor.pointer_up(&PointerEvent::new(15.0, 15.0).with_modifiers(shift));
    assert_eq!(editor.selection().nodes(), &[b]);
    assert_eq!(editor.history().undo_depth(), 0);
}

#[test]
fn test_drag_moves_and_records_one_undo_unit() {
    let mut editor = editor(&["A", "B"]);
    let a = label_node(&mut editor, 0, 10.0, 10.0, 10.0, 10.0);
    let b = label_node(&mut editor, 1, 40.0, 10.0, 10.0, 10.0);
    editor.select(&[a, b], SelectionMode::Replace);
    let log = record(&editor, &[EventCategory::Geometry, EventCategory::History]);

    editor.pointer_down(&PointerEvent::new(45.0, 15.0));
    editor.pointer_move(&PointerEvent::new(55.0, 20.0));
    assert_eq!(
        editor.scene().bounds(a).unwrap(),
        Bounds::from_rect(20.0, 15.0, 10.0, 10.0)
    );
    editor.pointer_up(&PointerEvent::new(65.0, 25.0));

    assert_eq!(
        editor.scene().bounds(a).unwrap(),
        Bounds::from_rect(30.0, 20.0, 10.0, 10.0)
    );
    assert_eq!(
        editor.scene().bounds(b).unwrap(),
        Bounds::from_rect(60.0, 20.0, 10.0, 10.0)
    );
    assert_eq!(editor.history().undo_depth(), 1);
    assert_eq!(editor.history().undo_label(), Some("Move"));
    assert_eq!(count(&log, EventCategory::History), 1);
    assert!(count(&log, EventCategory::Geometry) >= 2);
    assert!(!editor.scheduler().is_locked());

    assert!(editor.undo().unwrap());
    assert_eq!(
        editor.scene().bounds(a).unwrap(),
        Bounds::from_rect(10.0, 10.0, 10.0, 10.0)
    );
    assert_eq!(
        editor.scene().bounds(b).unwrap(),
        Bounds::from_rect(40.0, 10.0, 10.0, 10.0)
    );

    assert!(editor.redo().unwrap());
    assert_eq!(
        editor.scene().bounds(b).unwrap(),
        Bounds::from_rect(60.0, 20.0, 10.0, 10.0)
    );
}

#[test]
fn test_drag_on_unselected_node_selects_it() {
    let mut editor = editor(&["A", "B"]);
    let a = label_node(&mut editor, 0, 10.0, 10.0, 10.0, 10.0);
    let b = label_node(&mut editor, 1, 40.0, 10.0, 10.0, 10.0);
    editor.select(&[a], SelectionMode::Replace);

    editor.pointer_down(&PointerEvent::new(45.0, 15.0));
    editor.pointer_move(&PointerEvent::new(45.0, 35.0));
    editor.pointer_up(&PointerEvent::new(45.0, 35.0));

    assert_eq!(editor.selection().nodes(), &[b]);
    assert_eq!(
        editor.scene().bounds(a).unwrap(),
        Bounds::from_rect(10.0, 10.0, 10.0, 10.0)
    );
    assert_eq!(editor.scene().bounds(b).unwrap().min_y, 30.0);
}

#[test]
fn test_cancel_restores_live_moves() {
    let mut editor = editor(&["A"]);
    let a = label_node(&mut editor, 0, 10.0, 10.0, 10.0, 10.0);

    editor.pointer_down(&PointerEvent::new(15.0, 15.0));
    editor.pointer_move(&PointerEvent::new(50.0, 50.0));
    assert_eq!(editor.scene().bounds(a).unwrap().min_x, 45.0);
    let log = record(&editor, &[EventCategory::Geometry]);

    editor.cancel_gesture();
    assert_eq!(
        editor.scene().bounds(a).unwrap(),
        Bounds::from_rect(10.0, 10.0, 10.0, 10.0)
    );
    assert_eq!(
        *log.lock(),
        vec![EditorEvent::Geometry(GeometryEvent::Changed { target: a })]
    );
    assert!(!editor.gesture_active());
    assert!(!editor.scheduler().is_locked());
    assert_eq!(editor.history().undo_depth(), 0);

    // A late release after cancellation does nothing.
    editor.pointer_up(&PointerEvent::new(50.0, 50.0));
    assert_eq!(editor.history().undo_depth(), 0);
}

#[test]
fn test_second_gesture_is_inert_while_first_holds_lock() {
    let mut editor = editor(&["A", "B"]);
    let a = label_node(&mut editor, 0, 10.0, 10.0, 10.0, 10.0);
    let _b = label_node(&mut editor, 1, 40.0, 10.0, 10.0, 10.0);

    // G1: brush on empty canvas, still pressed.
    editor.pointer_down(&PointerEvent::new(0.0, 100.0));
    assert_eq!(editor.scheduler().owner().as_deref(), Some("brush-select"));

    // G2: press on a node while G1 holds the lock.
    editor.pointer_down(&PointerEvent::new(15.0, 15.0));
    assert_eq!(editor.scheduler().owner().as_deref(), Some("brush-select"));
    assert!(editor.selection().is_empty());
    assert_eq!(
        editor.scene().bounds(a).unwrap(),
        Bounds::from_rect(10.0, 10.0, 10.0, 10.0)
    );

    // G1 completes normally.
    editor.pointer_move(&PointerEvent::new(25.0, 0.0));
    editor.pointer_up(&PointerEvent::new(25.0, 0.0));
    assert_eq!(editor.selection().nodes(), &[a]);
    assert_eq!(editor.history().undo_depth(), 0);
}
