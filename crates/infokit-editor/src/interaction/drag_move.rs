//! Press on a node: click to select, drag to move the selection.

use serde_json::Value;

use infokit_core::{EditorEvent, GeometryEvent, JsonMap, NodeId};

use super::{
    ExclusiveGuard, HostBindings, Interaction, InteractionContext, PointerEvent, PointerPhase,
};
use crate::commands::{Document, EditorCommand};
use crate::scene::Point;
use crate::selection::SelectionMode;

const OWNER: &str = "drag-move";

#[derive(Debug)]
struct MovedNode {
    id: NodeId,
    /// `x` / `y` attributes before the drag started.
    original: JsonMap,
    origin: Point,
}

#[derive(Debug)]
struct DragSession {
    guard: ExclusiveGuard,
    target: NodeId,
    start_screen: Point,
    start_local: Point,
    additive: bool,
    /// Empty until the pointer crosses the drag threshold.
    moved: Vec<MovedNode>,
    dragging: bool,
}

/// Element-level gesture on selectable nodes.
///
/// A release under the drag threshold is a click: it selects the node, or
/// toggles it while a modifier is held. Past the threshold the selection
/// follows the pointer live and the release records one undo unit holding
/// an attribute update per moved node.
#[derive(Debug, Default)]
pub struct DragMove {
    session: Option<DragSession>,
}

impl DragMove {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node under the press, while a gesture is in progress.
    pub fn target(&self) -> Option<NodeId> {
        self.session.as_ref().map(|s| s.target)
    }

    fn begin_drag(session: &mut DragSession, ctx: &mut InteractionContext<'_>) {
        session.dragging = true;
        if !ctx.selection.contains(session.target) {
            let mode = if session.additive {
                SelectionMode::Add
            } else {
                SelectionMode::Replace
            };
            ctx.selection.select(&[session.target], mode);
        }
        for id in ctx.selection.nodes() {
            let Some(bounds) = ctx.doc.scene.bounds(*id) else {
                continue;
            };
            if !ctx.doc.scene.is_attached(*id) {
                continue;
            }
            if let Some(original) = ctx.doc.scene.snapshot_attributes(*id, &["x", "y"]) {
                session.moved.push(MovedNode {
                    id: *id,
                    original,
                    origin: Point::new(bounds.min_x, bounds.min_y),
                });
            }
        }
        tracing::debug!("Drag started on {} ({} nodes)", session.target, session.moved.len());
    }

    fn move_to(session: &DragSession, doc: &mut Document, dx: f64, dy: f64) {
        for node in &session.moved {
            let patch = position_patch(node.origin.x + dx, node.origin.y + dy);
            if doc.scene.set_attributes(node.id, &patch).is_some() {
                doc.bus()
                    .publish(EditorEvent::Geometry(GeometryEvent::Changed { target: node.id }));
            }
        }
    }

    fn restore(session: &DragSession, doc: &mut Document) {
        for node in &session.moved {
            if doc.scene.set_attributes(node.id, &node.original).is_some() {
                doc.bus()
                    .publish(EditorEvent::Geometry(GeometryEvent::Changed { target: node.id }));
            }
        }
    }
}

fn position_patch(x: f64, y: f64) -> JsonMap {
    let mut patch = JsonMap::new();
    patch.insert("x".to_string(), Value::from(x));
    patch.insert("y".to_string(), Value::from(y));
    patch
}

impl Interaction for DragMove {
    fn name(&self) -> &str {
        OWNER
    }

    fn init(&mut self, bindings: &mut HostBindings) {
        bindings.listen(PointerPhase::Down);
        bindings.listen(PointerPhase::Move);
        bindings.listen(PointerPhase::Up);
    }

    fn destroy(&mut self, ctx: &mut InteractionContext<'_>) {
        self.cancel(ctx);
    }

    fn pointer_down(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>) {
        if self.session.is_some() {
            return;
        }
        let start_local = ctx.to_local(event);
        let Some(target) = ctx
            .doc
            .scene
            .hit_test_where(&start_local, |node| node.selectable)
        else {
            return;
        };
        let guard = match ctx.scheduler.try_acquire(OWNER) {
            Ok(guard) => guard,
            Err(e) => {
                tracing::debug!("Drag not started on {}: {}", target, e);
                return;
            }
        };
        self.session = Some(DragSession {
            guard,
            target,
            start_screen: event.position,
            start_local,
            additive: event.modifiers.any(),
            moved: Vec::new(),
            dragging: false,
        });
    }

    fn pointer_move(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.guard.is_active() {
            return;
        }
        if !session.dragging {
            if !ctx.past_threshold(&session.start_screen, &event.position) {
                return;
            }
            Self::begin_drag(session, ctx);
        }
        let current = ctx.to_local(event);
        let (dx, dy) = (
            current.x - session.start_local.x,
            current.y - session.start_local.y,
        );
        Self::move_to(session, ctx.doc, dx, dy);
    }

    fn pointer_up(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>) {
        let Some(session) = self.session.take() else {
            return;
        };
        if !session.guard.is_active() {
            tracing::debug!("Drag lost its lock, reverting live moves");
            Self::restore(&session, ctx.doc);
            return;
        }

        if !session.dragging {
            if session.additive {
                ctx.selection.toggle(session.target);
            } else {
                ctx.selection.select(&[session.target], SelectionMode::Replace);
            }
            session.guard.complete();
            return;
        }

        let current = ctx.to_local(event);
        let (dx, dy) = (
            current.x - session.start_local.x,
            current.y - session.start_local.y,
        );
        Self::move_to(&session, ctx.doc, dx, dy);

        if dx != 0.0 || dy != 0.0 {
            let commands = session
                .moved
                .iter()
                .map(|node| {
                    EditorCommand::update_attributes_from(
                        node.id,
                        node.original.clone(),
                        position_patch(node.origin.x + dx, node.origin.y + dy),
                    )
                })
                .collect();
            if let Err(e) = ctx.history.execute_named_batch(ctx.doc, "Move", commands) {
                tracing::warn!("Move could not be recorded: {}", e);
                Self::restore(&session, ctx.doc);
            }
        }
        session.guard.complete();
    }

    fn cancel(&mut self, ctx: &mut InteractionContext<'_>) {
        if let Some(session) = self.session.take() {
            Self::restore(&session, ctx.doc);
            session.guard.cancel();
        }
    }

    fn is_active(&self) -> bool {
        self.session.is_some()
    }
}
