use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;

use infokit_core::{EventBus, ItemDatum, NodeId};
use infokit_editor::{Document, EditorCommand, SelectionMode, SelectionModel};

use crate::support::{editor, obj, options};

fn command_strategy() -> impl Strategy<Value = EditorCommand> {
    prop_oneof![
        (0usize..4, "[a-z]{1,6}")
            .prop_map(|(i, label)| EditorCommand::add_item([i], ItemDatum::labeled(label))),
        (0usize..4).prop_map(|i| EditorCommand::remove_item([i])),
        (0usize..4, -100.0f64..100.0)
            .prop_map(|(i, v)| EditorCommand::update_item([i], obj(json!({"value": v})))),
        (0usize..4, "[a-z]{0,6}")
            .prop_map(|(i, d)| EditorCommand::update_item([i], obj(json!({"desc": d})))),
        "[A-Za-z ]{0,12}".prop_map(|t| EditorCommand::update_data("title", json!(t))),
        (0.0f64..40.0).prop_map(|p| EditorCommand::update_options(obj(json!({"padding": p})))),
    ]
}

proptest! {
    #[test]
    fn prop_add_keeps_set_unique_in_first_seen_order(
        batches in prop::collection::vec(prop::collection::vec(0u64..12, 0..8), 1..6)
    ) {
        let mut selection = SelectionModel::new(Arc::new(EventBus::new()));
        let mut expected: Vec<NodeId> = Vec::new();
        for batch in &batches {
            let nodes: Vec<NodeId> = batch.iter().copied().map(NodeId).collect();
            selection.select(&nodes, SelectionMode::Add);
            for node in nodes {
                if !expected.contains(&node) {
                    expected.push(node);
                }
            }
        }
        prop_assert_eq!(selection.nodes(), expected.as_slice());
    }

    #[test]
    fn prop_command_round_trip(command in command_strategy()) {
        let mut doc = Document::new(options(&["A", "B", "C"]), Arc::new(EventBus::new()));
        let before = doc.state.options().clone();
        let mut command = command;
        if command.apply(&mut doc).is_ok() {
            command.undo(&mut doc).unwrap();
        }
        prop_assert_eq!(doc.state.options(), &before);
    }

    #[test]
    fn prop_batch_undo_restores_state(
        commands in prop::collection::vec(command_strategy(), 1..10)
    ) {
        let mut editor = editor(&["A", "B"]);
        let before = editor.state().options().clone();
        if editor.execute_batch(commands).is_ok() {
            prop_assert!(editor.undo().unwrap());
        }
        prop_assert_eq!(editor.state().options(), &before);
        prop_assert_eq!(editor.viewport().padding(), [0.0; 4]);
    }
}
