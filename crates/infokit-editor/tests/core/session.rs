use serde_json::json;

use infokit_core::{CommandError, EditorEvent, EventCategory, GeometryEvent, SelectionEvent};
use infokit_editor::{Bounds, Editor, EditorCommand, NodeSpec, PointerEvent, SelectionMode};
use infokit_settings::EditorConfig;

use crate::support::{editor, label_node, obj, options, record};

#[test]
fn test_detach_prunes_selection() {
    let mut editor = editor(&["A", "B"]);
    let group = editor
        .scene_mut()
        .insert_root(NodeSpec::new(Bounds::from_rect(0.0, 0.0, 100.0, 50.0)));
    let a = editor
        .scene_mut()
        .insert_child(
            group,
            NodeSpec::new(Bounds::from_rect(10.0, 10.0, 10.0, 10.0))
                .role(infokit_core::ElementRole::ItemLabel)
                .indexes([0]),
        )
        .unwrap();
    let b = label_node(&mut editor, 1, 60.0, 10.0, 10.0, 10.0);
    editor.select(&[a, b], SelectionMode::Replace);
    let log = record(&editor, &[EventCategory::Selection]);

    let removed = editor.detach_node(group);
    assert_eq!(removed, vec![group, a]);
    assert_eq!(editor.selection().nodes(), &[b]);
    assert_eq!(
        log.lock().as_slice(),
        &[EditorEvent::Selection(SelectionEvent::Changed {
            prev: vec![a, b],
            next: vec![b],
        })]
    );
}

#[test]
fn test_select_ignores_detached_nodes() {
    let mut editor = editor(&["A"]);
    let a = label_node(&mut editor, 0, 0.0, 0.0, 10.0, 10.0);
    editor.detach_node(a);
    assert!(!editor.select(&[a], SelectionMode::Replace));
    assert!(editor.selection().is_empty());
}

#[test]
fn test_undo_on_detached_node_still_restores() {
    let mut editor = editor(&["A"]);
    let a = label_node(&mut editor, 0, 0.0, 0.0, 10.0, 10.0);
    editor
        .execute(EditorCommand::update_attributes(
            a,
            obj(json!({"fill": "#f00", "width": 30.0})),
        ))
        .unwrap();
    assert_eq!(editor.scene().bounds(a).unwrap().width(), 30.0);

    editor.detach_node(a);
    assert!(editor.undo().unwrap());
    let node = editor.scene().get(a).unwrap();
    assert!(!node.attached);
    assert!(!node.attributes.contains_key("fill"));
    assert_eq!(node.bounds.width(), 10.0);
}

#[test]
fn test_undo_on_destroyed_node_fails_and_keeps_history() {
    let mut editor = editor(&["A"]);
    let a = label_node(&mut editor, 0, 0.0, 0.0, 10.0, 10.0);
    editor
        .execute(EditorCommand::update_attributes(a, obj(json!({"opacity": 0.4}))))
        .unwrap();
    editor.destroy_node(a);

    assert_eq!(editor.undo(), Err(CommandError::NodeDestroyed(a.raw())));
    assert_eq!(editor.history().undo_depth(), 1);
}

#[test]
fn test_geometry_notifications() {
    let mut editor = editor(&[]);
    let node = editor
        .scene_mut()
        .insert_root(NodeSpec::new(Bounds::from_rect(0.0, 0.0, 5.0, 5.0)));
    let log = record(&editor, &[EventCategory::Geometry]);

    editor.notify_geometry_changed(node);
    editor
        .execute(EditorCommand::update_attributes(node, obj(json!({"y": 12.0}))))
        .unwrap();
    editor
        .execute(EditorCommand::update_attributes(node, obj(json!({"stroke": "#000"}))))
        .unwrap();

    let expected = EditorEvent::Geometry(GeometryEvent::Changed { target: node });
    assert_eq!(log.lock().as_slice(), &[expected.clone(), expected]);
}

#[test]
fn test_history_depth_from_config() {
    let mut config = EditorConfig::default();
    config.history.max_depth = 2;
    let mut editor = Editor::new(options(&[]), config);
    for title in ["a", "b", "c"] {
        editor
            .execute(EditorCommand::update_data("title", json!(title)))
            .unwrap();
    }
    assert_eq!(editor.history().undo_depth(), 2);
}

#[test]
fn test_stale_gesture_lock_is_reclaimed_after_timeout() {
    let mut config = EditorConfig::default();
    config.interaction.gesture_timeout_ms = 0;
    let mut editor = Editor::with_default_interactions(options(&["A"]), config);
    let a = label_node(&mut editor, 0, 10.0, 10.0, 10.0, 10.0);

    // A gesture that never reaches release.
    let abandoned = editor.scheduler().try_acquire("resize").unwrap();

    editor.pointer_down(&PointerEvent::new(15.0, 15.0));
    editor.pointer_up(&PointerEvent::new(15.0, 15.0));
    assert!(!abandoned.is_active());
    assert_eq!(editor.selection().nodes(), &[a]);
}

#[test]
fn test_destroy_releases_everything() {
    let mut editor = editor(&["A"]);
    label_node(&mut editor, 0, 10.0, 10.0, 10.0, 10.0);
    assert_eq!(editor.interaction_names(), vec!["drag-move", "brush-select"]);

    editor.pointer_down(&PointerEvent::new(15.0, 15.0));
    assert!(editor.scheduler().is_locked());

    editor.destroy();
    assert!(!editor.scheduler().is_locked());
    assert!(editor.interaction_names().is_empty());

    editor.pointer_up(&PointerEvent::new(15.0, 15.0));
    assert!(editor.selection().is_empty());
}
