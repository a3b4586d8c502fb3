//! Pointer interactions.
//!
//! Every interaction follows the same gesture protocol: press (claim the
//! interaction lock, record the start point), drag (only once the pointer
//! moved past the drag threshold), release (compute the result, settle the
//! lock). The host forwards raw pointer events in screen space; the editor
//! dispatches them to every registered interaction listening for that
//! phase, in registration order. The scheduler lock guarantees that at most
//! one of them acts on a given gesture.

mod brush_select;
mod drag_move;
pub mod scheduler;

pub use brush_select::BrushSelect;
pub use drag_move::DragMove;
pub use scheduler::{
    ExclusiveGuard, GestureCompletion, GestureOutcome, InteractionScheduler, LockState,
};

use std::collections::HashSet;

use infokit_settings::InteractionSettings;

use crate::commands::Document;
use crate::history::CommandManager;
use crate::scene::Point;
use crate::selection::{SelectionMode, SelectionModel};
use crate::viewport::Viewport;

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        meta: false,
    };

    /// Whether any selection-extending modifier is held.
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Selection mode implied by the modifiers.
    pub fn selection_mode(&self) -> SelectionMode {
        if self.any() {
            SelectionMode::Add
        } else {
            SelectionMode::Replace
        }
    }
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Pointer listeners an interaction attached during `init`.
#[derive(Debug, Clone, Default)]
pub struct HostBindings {
    phases: HashSet<PointerPhase>,
}

impl HostBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&mut self, phase: PointerPhase) {
        self.phases.insert(phase);
    }

    pub fn listens(&self, phase: PointerPhase) -> bool {
        self.phases.contains(&phase)
    }

    /// Detaches every listener.
    pub fn clear(&mut self) {
        self.phases.clear();
    }
}

/// Everything an interaction may read or mutate while handling an event.
pub struct InteractionContext<'a> {
    pub doc: &'a mut Document,
    pub selection: &'a mut SelectionModel,
    pub history: &'a mut CommandManager,
    pub scheduler: &'a InteractionScheduler,
    pub viewport: &'a Viewport,
    pub settings: &'a InteractionSettings,
}

impl InteractionContext<'_> {
    pub fn to_local(&self, event: &PointerEvent) -> Point {
        self.viewport.screen_to_local(event.position)
    }

    /// Whether the pointer moved far enough from `start` to count as a drag.
    /// Both points are in screen space.
    pub fn past_threshold(&self, start: &Point, current: &Point) -> bool {
        start.distance_to(current) > self.settings.drag_threshold_px
    }
}

/// A pointer-driven editing behavior.
pub trait Interaction {
    /// Owner name used for the interaction lock.
    fn name(&self) -> &str;

    /// Attaches the pointer listeners this interaction needs.
    fn init(&mut self, bindings: &mut HostBindings);

    /// Detaches listeners and drops transient visuals and any held lock.
    fn destroy(&mut self, ctx: &mut InteractionContext<'_>);

    fn pointer_down(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>);

    fn pointer_move(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>);

    fn pointer_up(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>);

    /// Abandons the gesture in progress without side effects.
    fn cancel(&mut self, ctx: &mut InteractionContext<'_>);

    /// Whether a gesture is in progress.
    fn is_active(&self) -> bool;
}
