use std::sync::Arc;

use infokit_core::{ElementRole, EventBus, EventCategory, NodeId};
use infokit_editor::{
    Bounds, BrushSelect, CommandManager, Document, Editor, Interaction, InteractionContext,
    InteractionScheduler, Modifiers, NodeSpec, PointerEvent, SelectionMode, SelectionModel,
    Viewport,
};
use infokit_settings::{EditorConfig, InteractionSettings};

use crate::support::{count, label_node, options, record};

/// Editor with only brush selection and three label nodes in a row.
fn brush_editor() -> (Editor, Vec<NodeId>) {
    let mut editor = Editor::new(options(&["A", "B", "C"]), EditorConfig::default());
    editor.register(Box::new(BrushSelect::new()));
    let nodes = vec![
        label_node(&mut editor, 0, 10.0, 10.0, 10.0, 10.0),
        label_node(&mut editor, 1, 40.0, 10.0, 10.0, 10.0),
        label_node(&mut editor, 2, 70.0, 10.0, 10.0, 10.0),
    ];
    (editor, nodes)
}

fn brush(editor: &mut Editor, from: (f64, f64), to: (f64, f64), modifiers: Modifiers) {
    editor.pointer_down(&PointerEvent::new(from.0, from.1).with_modifiers(modifiers));
    editor.pointer_move(&PointerEvent::new(to.0, to.1).with_modifiers(modifiers));
    editor.pointer_up(&PointerEvent::new(to.0, to.1).with_modifiers(modifiers));
}

#[test]
fn test_partial_overlap_selects() {
    let (mut editor, nodes) = brush_editor();
    brush(&mut editor, (0.0, 0.0), (45.0, 15.0), Modifiers::NONE);
    assert_eq!(editor.selection().nodes(), &nodes[..2]);
    assert!(!editor.scheduler().is_locked());
}

#[test]
fn test_rect_equal_to_bounds_includes_node() {
    let (editor, nodes) = brush_editor();
    let bounds = editor.scene().bounds(nodes[1]).unwrap();
    assert_eq!(
        BrushSelect::nodes_in_rect(editor.scene(), &bounds),
        vec![nodes[1]]
    );
}

#[test]
fn test_touching_edge_counts_as_overlap() {
    let (mut editor, nodes) = brush_editor();
    brush(&mut editor, (0.0, 0.0), (10.0, 10.0), Modifiers::NONE);
    assert_eq!(editor.selection().nodes(), &[nodes[0]]);
}

#[test]
fn test_reverse_drag_normalizes() {
    let (mut editor, nodes) = brush_editor();
    brush(&mut editor, (90.0, 30.0), (65.0, 0.0), Modifiers::NONE);
    assert_eq!(editor.selection().nodes(), &[nodes[2]]);
}

#[test]
fn test_modifier_adds_to_selection() {
    let (mut editor, nodes) = brush_editor();
    editor.select(&[nodes[2]], SelectionMode::Replace);
    brush(&mut editor, (0.0, 0.0), (25.0, 25.0), Modifiers::SHIFT);
    assert_eq!(editor.selection().nodes(), &[nodes[2], nodes[0]]);
}

#[test]
fn test_empty_result_without_modifier_clears() {
    let (mut editor, nodes) = brush_editor();
    editor.select(&[nodes[0]], SelectionMode::Replace);
    brush(&mut editor, (0.0, 50.0), (100.0, 90.0), Modifiers::NONE);
    assert!(editor.selection().is_empty());
}

#[test]
fn test_empty_result_with_modifier_is_no_op() {
    let (mut editor, nodes) = brush_editor();
    editor.select(&[nodes[0]], SelectionMode::Replace);
    let log = record(&editor, &[EventCategory::Selection]);
    brush(&mut editor, (0.0, 50.0), (100.0, 90.0), Modifiers::SHIFT);
    assert_eq!(editor.selection().nodes(), &[nodes[0]]);
    assert_eq!(count(&log, EventCategory::Selection), 0);
}

#[test]
fn test_press_on_addressable_node_is_ignored() {
    let (mut editor, nodes) = brush_editor();
    editor.pointer_down(&PointerEvent::new(15.0, 15.0));
    assert!(!editor.scheduler().is_locked());
    editor.pointer_move(&PointerEvent::new(90.0, 30.0));
    editor.pointer_up(&PointerEvent::new(90.0, 30.0));
    assert!(editor.selection().is_empty());
    assert!(!editor.selection().contains(nodes[0]));
}

#[test]
fn test_press_on_text_editable_node_is_ignored() {
    let (mut editor, _) = brush_editor();
    editor.scene_mut().insert_root(
        NodeSpec::new(Bounds::from_rect(100.0, 100.0, 50.0, 20.0))
            .text_editable(true)
            .selectable(false),
    );
    editor.pointer_down(&PointerEvent::new(110.0, 110.0));
    assert!(!editor.scheduler().is_locked());
}

#[test]
fn test_marquee_tracks_drag_past_threshold() {
    let bus = Arc::new(EventBus::new());
    let mut doc = Document::new(options(&[]), bus.clone());
    let mut selection = SelectionModel::new(bus.clone());
    let mut history = CommandManager::new(bus);
    let scheduler = InteractionScheduler::default();
    let viewport = Viewport::new();
    let settings = InteractionSettings::default();
    let mut ctx = InteractionContext {
        doc: &mut doc,
        selection: &mut selection,
        history: &mut history,
        scheduler: &scheduler,
        viewport: &viewport,
        settings: &settings,
    };

    let mut brush = BrushSelect::new();
    brush.pointer_down(&PointerEvent::new(0.0, 0.0), &mut ctx);
    brush.pointer_move(&PointerEvent::new(2.0, 2.0), &mut ctx);
    assert!(brush.marquee().is_none());

    brush.pointer_move(&PointerEvent::new(20.0, 10.0), &mut ctx);
    assert_eq!(brush.marquee(), Some(Bounds::new(0.0, 0.0, 20.0, 10.0)));
    brush.pointer_move(&PointerEvent::new(-5.0, 4.0), &mut ctx);
    assert_eq!(brush.marquee(), Some(Bounds::new(-5.0, 0.0, 0.0, 4.0)));

    brush.cancel(&mut ctx);
    assert!(brush.marquee().is_none());
    assert!(!scheduler.is_locked());
}

#[test]
fn test_start_point_uses_view_transform() {
    let (mut editor, nodes) = brush_editor();
    editor.viewport_mut().set_zoom(2.0);
    // Screen (0,0)-(50,50) is local (0,0)-(25,25): only the first node.
    brush(&mut editor, (0.0, 0.0), (50.0, 50.0), Modifiers::NONE);
    assert_eq!(editor.selection().nodes(), &[nodes[0]]);
}

#[test]
fn test_gesture_refused_while_lock_held() {
    let (mut editor, nodes) = brush_editor();
    editor.select(&[nodes[2]], SelectionMode::Replace);
    let held = editor.scheduler().try_acquire("resize").unwrap();

    brush(&mut editor, (0.0, 0.0), (100.0, 100.0), Modifiers::NONE);
    assert_eq!(editor.selection().nodes(), &[nodes[2]]);
    assert!(held.is_active());
    assert_eq!(editor.scheduler().owner().as_deref(), Some("resize"));
}

#[test]
fn test_small_release_on_empty_canvas_is_a_click() {
    let (mut editor, nodes) = brush_editor();
    editor.select(&[nodes[2]], SelectionMode::Replace);

    // 2px of travel stays under the 3px threshold.
    editor.pointer_down(&PointerEvent::new(8.0, 15.0));
    editor.pointer_move(&PointerEvent::new(10.0, 15.0));
    editor.pointer_up(&PointerEvent::new(10.0, 15.0));
    assert!(editor.selection().is_empty());
    assert!(!editor.scheduler().is_locked());

    editor.select(&[nodes[2]], SelectionMode::Replace);
    let shift = Modifiers::SHIFT;
    editor.pointer_down(&PointerEvent::new(8.0, 15.0).with_modifiers(shift));
    editor.pointer_up(&PointerEvent::new(10.0, 15.0).with_modifiers(shift));
    assert_eq!(editor.selection().nodes(), &[nodes[2]]);
}

#[test]
fn test_release_past_threshold_without_moves_still_brushes() {
    let (mut editor, nodes) = brush_editor();
    editor.pointer_down(&PointerEvent::new(0.0, 0.0));
    editor.pointer_up(&PointerEvent::new(25.0, 25.0));
    assert_eq!(editor.selection().nodes(), &[nodes[0]]);
}

#[test]
fn test_background_node_does_not_block_brush() {
    let mut editor = Editor::new(options(&["A"]), EditorConfig::default());
    editor.register(Box::new(BrushSelect::new()));
    editor.scene_mut().insert_root(
        NodeSpec::new(Bounds::from_rect(0.0, 0.0, 200.0, 200.0)).role(ElementRole::Background),
    );
    let label = label_node(&mut editor, 0, 40.0, 40.0, 10.0, 10.0);

    brush(&mut editor, (5.0, 5.0), (60.0, 60.0), Modifiers::NONE);
    assert_eq!(editor.selection().nodes(), &[label]);
}
