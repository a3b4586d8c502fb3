//! Undo/redo stacks.

use std::sync::Arc;

use infokit_core::{CommandError, EditorEvent, EventBus, HistoryEvent};

use crate::commands::{Document, EditorCommand};

/// Default number of undo units kept.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Executes commands and keeps them for undo/redo.
///
/// History-changed is published exactly once for every call that changes
/// the stacks, and never for calls that fail or find nothing to do.
#[derive(Debug)]
pub struct CommandManager {
    undo_stack: Vec<EditorCommand>,
    redo_stack: Vec<EditorCommand>,
    max_depth: usize,
    bus: Arc<EventBus>,
}

impl CommandManager {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self::with_max_depth(bus, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(bus: Arc<EventBus>, max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            bus,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Applies `command` and pushes it onto the undo stack.
    ///
    /// A failed command is not recorded and leaves both stacks untouched.
    pub fn execute(&mut self, doc: &mut Document, mut command: EditorCommand) -> Result<(), CommandError> {
        command.apply(doc)?;
        tracing::debug!("Executed '{}'", command.name());
        self.push(command);
        Ok(())
    }

    /// Applies `commands` in order as one undo unit.
    ///
    /// Either every command applies or none does: on failure the applied
    /// prefix is undone in reverse order and [`CommandError::BatchFailed`]
    /// is returned. An empty batch does nothing.
    pub fn execute_batch(
        &mut self,
        doc: &mut Document,
        commands: Vec<EditorCommand>,
    ) -> Result<(), CommandError> {
        self.execute_named_batch(doc, "Batch", commands)
    }

    pub fn execute_named_batch(
        &mut self,
        doc: &mut Document,
        name: &str,
        commands: Vec<EditorCommand>,
    ) -> Result<(), CommandError> {
        if commands.is_empty() {
            return Ok(());
        }
        self.execute(doc, EditorCommand::batch(name, commands))
    }

    /// Reverts the most recent command. `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = command.undo(doc) {
            tracing::warn!("Undo of '{}' failed: {}", command.name(), e);
            self.undo_stack.push(command);
            return Err(e);
        }
        tracing::debug!("Undid '{}'", command.name());
        self.redo_stack.push(command);
        self.notify();
        Ok(true)
    }

    /// Re-applies the most recently undone command. `Ok(false)` when there is
    /// nothing to redo.
    pub fn redo(&mut self, doc: &mut Document) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = command.apply(doc) {
            tracing::warn!("Redo of '{}' failed: {}", command.name(), e);
            self.redo_stack.push(command);
            return Err(e);
        }
        tracing::debug!("Redid '{}'", command.name());
        self.undo_stack.push(command);
        self.notify();
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Name of the command `undo` would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(EditorCommand::name)
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(EditorCommand::name)
    }

    /// Drops both stacks.
    pub fn clear(&mut self) {
        if self.undo_stack.is_empty() && self.redo_stack.is_empty() {
            return;
        }
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify();
    }

    fn push(&mut self, command: EditorCommand) {
        self.undo_stack.push(command);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_depth {
            let evicted = self.undo_stack.remove(0);
            tracing::debug!("History full, evicted '{}'", evicted.name());
        }
        self.notify();
    }

    fn notify(&self) {
        self.bus.publish(EditorEvent::History(HistoryEvent::Changed));
    }
}
