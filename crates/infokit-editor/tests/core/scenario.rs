use serde_json::json;

use infokit_core::{
    DataEvent, DiffOp, EditorEvent, EventCategory, IndexesPath, ItemDatum, OptionsEvent,
};
use infokit_editor::EditorCommand;

use crate::support::{count, editor, record};

#[test]
fn test_add_item_then_undo() {
    let mut editor = editor(&["Item 1"]);
    let log = record(
        &editor,
        &[
            EventCategory::Data,
            EventCategory::Options,
            EventCategory::History,
        ],
    );

    editor
        .execute(EditorCommand::add_item([1], ItemDatum::labeled("Item 2")))
        .unwrap();
    assert_eq!(
        editor.state().data().items,
        vec![ItemDatum::labeled("Item 1"), ItemDatum::labeled("Item 2")]
    );

    {
        let events = log.lock();
        let data_events: Vec<_> = events
            .iter()
            .filter(|e| e.category() != EventCategory::History)
            .collect();
        assert_eq!(data_events.len(), 2);
        assert_eq!(
            data_events[0],
            &EditorEvent::Data(DataEvent::ItemAdded {
                indexes: IndexesPath::from([1]),
                datum: ItemDatum::labeled("Item 2"),
            })
        );
        match data_events[1] {
            EditorEvent::Options(OptionsEvent::Changed { changes, .. }) => {
                assert_eq!(changes.len(), 1);
                assert_eq!(changes[0].op, DiffOp::Add);
                assert_eq!(changes[0].path, "data.items");
                assert_eq!(changes[0].indexes, Some(IndexesPath::from([1])));
                assert_eq!(changes[0].value, json!([{"label": "Item 2"}]));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
    log.lock().clear();

    assert!(editor.undo().unwrap());
    assert_eq!(editor.state().data().items, vec![ItemDatum::labeled("Item 1")]);
    assert_eq!(count(&log, EventCategory::History), 1);
}
