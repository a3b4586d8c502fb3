//! Editing session facade.
//!
//! [`Editor`] owns the document, selection, history, scheduler and
//! viewport of one session and is the single entry point for the host:
//! pointer events, commands, undo/redo and scene lifecycle notifications.

use std::fmt;
use std::sync::Arc;

use infokit_core::{
    CommandError, EditorEvent, EventBus, GeometryEvent, InfographicOptions, NodeId,
};
use infokit_settings::EditorConfig;

use crate::commands::{Document, EditorCommand};
use crate::history::CommandManager;
use crate::interaction::{
    BrushSelect, DragMove, HostBindings, Interaction, InteractionContext, InteractionScheduler,
    PointerEvent, PointerPhase,
};
use crate::scene::SceneGraph;
use crate::selection::{SelectionMode, SelectionModel};
use crate::state::StateManager;
use crate::viewport::Viewport;

struct Registered {
    interaction: Box<dyn Interaction>,
    bindings: HostBindings,
}

pub struct Editor {
    config: EditorConfig,
    bus: Arc<EventBus>,
    doc: Document,
    selection: SelectionModel,
    history: CommandManager,
    scheduler: InteractionScheduler,
    viewport: Viewport,
    interactions: Vec<Registered>,
}

impl Editor {
    /// Opens a session on `options` with no interactions registered.
    pub fn new(options: InfographicOptions, config: EditorConfig) -> Self {
        let bus = Arc::new(EventBus::with_config(config.events.to_bus_config()));
        let doc = Document::new(options, bus.clone());
        let mut viewport = Viewport::new();
        viewport.apply_padding(doc.state.view_padding());

        tracing::info!(
            "Editor session opened ({} items, history depth {})",
            doc.state.data().item_count(),
            config.history.max_depth
        );

        Self {
            selection: SelectionModel::new(bus.clone()),
            history: CommandManager::with_max_depth(bus.clone(), config.history.max_depth),
            scheduler: InteractionScheduler::new(config.interaction.gesture_timeout()),
            viewport,
            interactions: Vec::new(),
            doc,
            bus,
            config,
        }
    }

    /// Opens a session with the stock interactions: element drag (and
    /// click) first, then brush selection on empty canvas.
    pub fn with_default_interactions(options: InfographicOptions, config: EditorConfig) -> Self {
        let mut editor = Self::new(options, config);
        editor.register(Box::new(DragMove::new()));
        editor.register(Box::new(BrushSelect::new()));
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.doc.scene
    }

    /// Scene access for the host renderer, which builds and lays out nodes.
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.doc.scene
    }

    pub fn state(&self) -> &StateManager {
        &self.doc.state
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn history(&self) -> &CommandManager {
        &self.history
    }

    pub fn scheduler(&self) -> &InteractionScheduler {
        &self.scheduler
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Registers an interaction and lets it attach its listeners.
    pub fn register(&mut self, mut interaction: Box<dyn Interaction>) {
        let mut bindings = HostBindings::new();
        interaction.init(&mut bindings);
        tracing::debug!("Registered interaction '{}'", interaction.name());
        self.interactions.push(Registered {
            interaction,
            bindings,
        });
    }

    pub fn interaction_names(&self) -> Vec<&str> {
        self.interactions
            .iter()
            .map(|r| r.interaction.name())
            .collect()
    }

    /// Whether any interaction has a gesture in progress.
    pub fn gesture_active(&self) -> bool {
        self.interactions.iter().any(|r| r.interaction.is_active())
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) {
        self.dispatch(PointerPhase::Down, event);
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) {
        self.dispatch(PointerPhase::Move, event);
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) {
        self.dispatch(PointerPhase::Up, event);
    }

    /// Abandons any gesture in progress and frees the interaction lock.
    pub fn cancel_gesture(&mut self) {
        let (interactions, mut ctx) = self.split();
        for registered in interactions.iter_mut() {
            registered.interaction.cancel(&mut ctx);
        }
        if let Some(owner) = self.scheduler.cancel_active() {
            tracing::debug!("Gesture '{}' cancelled by host", owner);
        }
    }

    fn dispatch(&mut self, phase: PointerPhase, event: &PointerEvent) {
        let (interactions, mut ctx) = self.split();
        for registered in interactions.iter_mut() {
            if !registered.bindings.listens(phase) {
                continue;
            }
            let interaction = &mut registered.interaction;
            match phase {
                PointerPhase::Down => interaction.pointer_down(event, &mut ctx),
                PointerPhase::Move => interaction.pointer_move(event, &mut ctx),
                PointerPhase::Up => interaction.pointer_up(event, &mut ctx),
            }
        }
        self.sync_viewport();
    }

    fn split(&mut self) -> (&mut Vec<Registered>, InteractionContext<'_>) {
        (
            &mut self.interactions,
            InteractionContext {
                doc: &mut self.doc,
                selection: &mut self.selection,
                history: &mut self.history,
                scheduler: &self.scheduler,
                viewport: &self.viewport,
                settings: &self.config.interaction,
            },
        )
    }

    pub fn execute(&mut self, command: EditorCommand) -> Result<(), CommandError> {
        let result = self.history.execute(&mut self.doc, command);
        self.sync_viewport();
        result
    }

    pub fn execute_batch(&mut self, commands: Vec<EditorCommand>) -> Result<(), CommandError> {
        let result = self.history.execute_batch(&mut self.doc, commands);
        self.sync_viewport();
        result
    }

    pub fn undo(&mut self) -> Result<bool, CommandError> {
        let result = self.history.undo(&mut self.doc);
        self.sync_viewport();
        result
    }

    pub fn redo(&mut self) -> Result<bool, CommandError> {
        let result = self.history.redo(&mut self.doc);
        self.sync_viewport();
        result
    }

    pub fn select(&mut self, nodes: &[NodeId], mode: SelectionMode) -> bool {
        let attached: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|id| self.doc.scene.is_attached(*id))
            .collect();
        self.selection.select(&attached, mode)
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear()
    }

    /// Takes a node out of the rendered tree and prunes it from the selection.
    pub fn detach_node(&mut self, id: NodeId) -> Vec<NodeId> {
        let removed = self.doc.scene.detach(id);
        self.selection.remove_nodes(&removed);
        removed
    }

    /// Frees a node and its subtree and prunes them from the selection.
    pub fn destroy_node(&mut self, id: NodeId) -> Vec<NodeId> {
        let removed = self.doc.scene.destroy(id);
        self.selection.remove_nodes(&removed);
        removed
    }

    /// Called by the host renderer after it moved or re-laid out a node.
    pub fn notify_geometry_changed(&self, target: NodeId) {
        self.bus
            .publish(EditorEvent::Geometry(GeometryEvent::Changed { target }));
    }

    /// Tears the session down: interactions detach their listeners and
    /// drop transient state, and the interaction lock is freed.
    pub fn destroy(&mut self) {
        let (interactions, mut ctx) = self.split();
        for registered in interactions.iter_mut() {
            registered.interaction.destroy(&mut ctx);
            registered.bindings.clear();
        }
        self.interactions.clear();
        self.scheduler.cancel_active();
        tracing::info!("Editor session closed");
    }

    fn sync_viewport(&mut self) {
        self.viewport.apply_padding(self.doc.state.view_padding());
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("items", &self.doc.state.data().item_count())
            .field("nodes", &self.doc.scene.len())
            .field("selection", &self.selection.nodes())
            .field("undo_depth", &self.history.undo_depth())
            .field("interactions", &self.interaction_names())
            .finish()
    }
}
