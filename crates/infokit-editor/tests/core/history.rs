use serde_json::json;

use infokit_core::{CommandError, EventCategory, ItemDatum};
use infokit_editor::EditorCommand;

use crate::support::{count, editor, obj, record};

#[test]
fn test_batch_undo_restores_everything() {
    let mut editor = editor(&["A", "B"]);
    let before = editor.state().options().clone();

    editor
        .execute_batch(vec![
            EditorCommand::add_item([2], ItemDatum::labeled("C")),
            EditorCommand::update_item([0], obj(json!({"desc": "first"}))),
            EditorCommand::remove_item([1]),
            EditorCommand::update_data("title", json!("Report")),
            EditorCommand::update_options(obj(json!({"theme": "dark", "padding": [4, 8]}))),
        ])
        .unwrap();
    assert_eq!(editor.history().undo_depth(), 1);
    assert_eq!(editor.state().data().items.len(), 2);
    assert_eq!(editor.viewport().padding(), [4.0, 8.0, 4.0, 8.0]);

    let log = record(&editor, &[EventCategory::History]);
    assert!(editor.undo().unwrap());
    assert_eq!(editor.state().options(), &before);
    assert_eq!(editor.viewport().padding(), [0.0; 4]);
    assert_eq!(count(&log, EventCategory::History), 1);
}

#[test]
fn test_failed_batch_is_rolled_back_and_not_recorded() {
    let mut editor = editor(&["A"]);
    let before = editor.state().options().clone();
    let log = record(&editor, &[EventCategory::History]);

    let err = editor
        .execute_batch(vec![
            EditorCommand::add_item([1], ItemDatum::labeled("B")),
            EditorCommand::update_options(obj(json!({"width": "wide"}))),
        ])
        .unwrap_err();
    assert!(matches!(err, CommandError::BatchFailed { index: 1, .. }));
    assert_eq!(editor.state().options(), &before);
    assert!(!editor.history().can_undo());
    assert_eq!(count(&log, EventCategory::History), 0);
}

#[test]
fn test_empty_batch_does_nothing() {
    let mut editor = editor(&["A"]);
    editor.execute_batch(Vec::new()).unwrap();
    assert!(!editor.history().can_undo());
}

#[test]
fn test_undo_redo_on_empty_stacks() {
    let mut editor = editor(&[]);
    let log = record(&editor, &[EventCategory::History]);
    assert!(!editor.undo().unwrap());
    assert!(!editor.redo().unwrap());
    assert_eq!(count(&log, EventCategory::History), 0);
}

#[test]
fn test_redo_replays_removed_item() {
    let mut editor = editor(&["A", "B", "C"]);
    editor.execute(EditorCommand::remove_item([0])).unwrap();
    editor.undo().unwrap();
    assert_eq!(editor.state().data().items[0].label.as_deref(), Some("A"));

    editor.redo().unwrap();
    let labels: Vec<_> = editor
        .state()
        .data()
        .items
        .iter()
        .filter_map(|i| i.label.clone())
        .collect();
    assert_eq!(labels, vec!["B", "C"]);
    assert_eq!(editor.history().redo_label(), None);
    assert_eq!(editor.history().undo_label(), Some("Remove Item"));
}
