use serde_json::json;

use infokit_core::{DataEvent, EditorEvent, EventCategory, IndexesPath, ItemDatum, OptionsEvent};
use infokit_editor::{Bounds, EditorCommand};

use crate::support::{count, editor, obj, record};

fn labels(editor: &infokit_editor::Editor) -> Vec<String> {
    editor
        .state()
        .data()
        .items
        .iter()
        .filter_map(|i| i.label.clone())
        .collect()
}

#[test]
fn test_insert_shifts_later_siblings() {
    let mut editor = editor(&["A", "B"]);
    editor
        .execute(EditorCommand::add_item([1], ItemDatum::labeled("C")))
        .unwrap();
    assert_eq!(labels(&editor), vec!["A", "C", "B"]);

    editor
        .execute(EditorCommand::update_item([2], obj(json!({"value": 7.5}))))
        .unwrap();
    let b = &editor.state().data().items[2];
    assert_eq!(b.label.as_deref(), Some("B"));
    assert_eq!(b.value, Some(7.5));
}

#[test]
fn test_remove_event_carries_removed_datum() {
    let mut editor = editor(&["A", "B", "C"]);
    let log = record(&editor, &[EventCategory::Data, EventCategory::Options]);

    editor.execute(EditorCommand::remove_item([1])).unwrap();
    assert_eq!(labels(&editor), vec!["A", "C"]);

    let events = log.lock();
    assert_eq!(
        events[0],
        EditorEvent::Data(DataEvent::ItemRemoved {
            indexes: IndexesPath::from([1]),
            datum: ItemDatum::labeled("B"),
        })
    );
    match &events[1] {
        EditorEvent::Options(OptionsEvent::Changed { changes, .. }) => {
            assert_eq!(changes[0].value, json!({"label": "B"}));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_nested_children_are_addressable() {
    let mut editor = editor(&["Root"]);
    editor
        .execute(EditorCommand::add_item([0, 0], ItemDatum::labeled("Child")))
        .unwrap();
    editor
        .execute(EditorCommand::update_item([0, 0], obj(json!({"icon": "star"}))))
        .unwrap();
    let child = editor.state().item(&IndexesPath::from([0, 0])).unwrap();
    assert_eq!(child.icon.as_deref(), Some("star"));

    editor.undo().unwrap();
    editor.undo().unwrap();
    assert!(editor.state().data().items[0].children.is_empty());
}

#[test]
fn test_stale_indexes_emit_nothing() {
    let mut editor = editor(&["A"]);
    let log = record(&editor, &[EventCategory::Data, EventCategory::Options]);

    editor
        .execute(EditorCommand::update_item([4], obj(json!({"label": "X"}))))
        .unwrap();
    editor.execute(EditorCommand::remove_item([2, 1])).unwrap();
    assert!(log.lock().is_empty());

    editor.undo().unwrap();
    editor.undo().unwrap();
    assert!(log.lock().is_empty());
    assert_eq!(labels(&editor), vec!["A"]);
}

#[test]
fn test_element_update_through_scene_address() {
    let mut editor = editor(&["A", "B"]);
    let label = editor
        .scene_mut()
        .insert_from_attrs(None, Some("item-label"), Some("1"), Bounds::default())
        .unwrap()
        .unwrap();
    let title = editor
        .scene_mut()
        .insert_from_attrs(None, Some("title"), None, Bounds::default())
        .unwrap()
        .unwrap();
    let before = editor.state().data().clone();
    let log = record(&editor, &[EventCategory::Options]);

    let label_address = editor.scene().address(label).unwrap();
    let title_address = editor.scene().address(title).unwrap();
    editor
        .execute_batch(vec![
            EditorCommand::update_element(label_address, obj(json!({"fill": "#0af"}))),
            EditorCommand::update_element(title_address, obj(json!({"fontWeight": "bold"}))),
        ])
        .unwrap();

    assert_eq!(
        editor.state().data().items[1].attributes["label"],
        json!({"fill": "#0af"})
    );
    assert_eq!(
        editor.state().data().attributes["title"],
        json!({"fontWeight": "bold"})
    );
    let paths: Vec<String> = log
        .lock()
        .iter()
        .filter_map(|e| match e {
            EditorEvent::Options(OptionsEvent::Changed { changes, .. }) => {
                Some(changes[0].path.clone())
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        paths,
        vec!["data.items[1].attributes.label", "data.attributes.title"]
    );

    editor.undo().unwrap();
    assert_eq!(editor.state().data(), &before);
}

#[test]
fn test_every_mutation_emits_one_specific_then_one_generic() {
    let mut editor = editor(&["A"]);
    let log = record(&editor, &[EventCategory::Data, EventCategory::Options]);

    editor.execute(EditorCommand::update_data("desc", json!("Notes"))).unwrap();
    editor
        .execute(EditorCommand::update_options(obj(json!({"theme": "light"}))))
        .unwrap();
    editor.undo().unwrap();

    let events = log.lock();
    assert_eq!(events.len(), 6);
    for pair in events.chunks(2) {
        assert_eq!(pair[0].category(), EventCategory::Data);
        assert_eq!(pair[1].category(), EventCategory::Options);
    }
    drop(events);
    assert_eq!(count(&log, EventCategory::Options), 3);
    assert_eq!(editor.state().options().theme, None);
    assert_eq!(editor.state().data().desc.as_deref(), Some("Notes"));
}
