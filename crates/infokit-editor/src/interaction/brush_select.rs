//! Marquee (brush) selection on empty canvas.

use infokit_core::NodeId;

use super::{
    ExclusiveGuard, HostBindings, Interaction, InteractionContext, PointerEvent, PointerPhase,
};
use crate::scene::{Bounds, Point, SceneGraph};
use crate::selection::SelectionMode;

const OWNER: &str = "brush-select";

#[derive(Debug)]
struct BrushSession {
    guard: ExclusiveGuard,
    start_screen: Point,
    start_local: Point,
    mode: SelectionMode,
    marquee: Option<Bounds>,
}

/// Selects every selectable node whose bounds overlap a dragged rectangle.
///
/// Presses on text-editable or selectable nodes are left to element-level
/// interactions; decorative nodes (background, shapes) do not block it. Overlap is a closed AABB test, so touching edges count.
#[derive(Debug, Default)]
pub struct BrushSelect {
    session: Option<BrushSession>,
}

impl BrushSelect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transient rectangle in scene-local space, while dragging.
    pub fn marquee(&self) -> Option<Bounds> {
        self.session.as_ref().and_then(|s| s.marquee)
    }

    /// Selectable attached nodes overlapping `rect`, in paint order.
    pub fn nodes_in_rect(scene: &SceneGraph, rect: &Bounds) -> Vec<NodeId> {
        scene
            .selectable_nodes()
            .into_iter()
            .filter(|id| scene.bounds(*id).is_some_and(|b| b.intersects(rect)))
            .collect()
    }

    fn starts_on_element(scene: &SceneGraph, point: &Point) -> bool {
        scene
            .hit_test_where(point, |node| node.text_editable || node.selectable)
            .is_some()
    }
}

impl Interaction for BrushSelect {
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
        if Self::starts_on_element(&ctx.doc.scene, &start_local) {
            return;
        }
        let guard = match ctx.scheduler.try_acquire(OWNER) {
            Ok(guard) => guard,
            Err(e) => {
                tracing::debug!("Brush select not started: {}", e);
                return;
            }
        };
        self.session = Some(BrushSession {
            guard,
            start_screen: event.position,
            start_local,
            mode: event.modifiers.selection_mode(),
            marquee: None,
        });
    }

    fn pointer_move(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.marquee.is_none() && !ctx.past_threshold(&session.start_screen, &event.position)
        {
            return;
        }
        let current = ctx.to_local(event);
        session.marquee = Some(Bounds::from_corners(session.start_local, current));
    }

    fn pointer_up(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>) {
        let Some(session) = self.session.take() else {
            return;
        };
        if !session.guard.is_active() {
            tracing::debug!("Brush select lost its lock, result discarded");
            return;
        }

        // Under the drag threshold the gesture is a click at the press point.
        let dragged = session.marquee.is_some()
            || ctx.past_threshold(&session.start_screen, &event.position);
        let end = if dragged {
            ctx.to_local(event)
        } else {
            session.start_local
        };
        let rect = Bounds::from_corners(session.start_local, end);
        let hits = Self::nodes_in_rect(&ctx.doc.scene, &rect);
        tracing::debug!("Brush select {:?}: {} hits", rect, hits.len());

        if hits.is_empty() {
            if session.mode == SelectionMode::Replace {
                ctx.selection.clear();
            }
        } else {
            ctx.selection.select(&hits, session.mode);
        }
        session.guard.complete();
    }

    fn cancel(&mut self, _ctx: &mut InteractionContext<'_>) {
        if let Some(session) = self.session.take() {
            session.guard.cancel();
        }
    }

    fn is_active(&self) -> bool {
        self.session.is_some()
    }
}
