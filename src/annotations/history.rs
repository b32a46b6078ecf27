//! Two-stack undo/redo log over annotation commands

use super::commands::Command;
use crate::domain::AnnotationList;

/// Snapshot handed to the state-changed listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
}

type Listener = Box<dyn FnMut(HistoryStatus)>;

#[derive(Default)]
pub struct CommandStack {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    listener: Option<Listener>,
}

impl std::fmt::Debug for CommandStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandStack")
            .field("undo", &self.undo_count())
            .field("redo", &self.redo_count())
            .finish()
    }
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the state-changed notification
    pub fn set_listener(&mut self, listener: impl FnMut(HistoryStatus) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Execute a command and record it. Any redo history is discarded.
    pub fn run(&mut self, mut command: Box<dyn Command>, annotations: &mut AnnotationList) {
        command.execute(annotations);
        log::debug!("run: {}", command.description());
        self.undo_stack.push(command);
        self.redo_stack.clear();
        self.notify();
    }

    /// Undo the most recent command, returning its description
    pub fn undo(&mut self, annotations: &mut AnnotationList) -> Option<String> {
        let mut command = self.undo_stack.pop()?;
        command.undo(annotations);
        let description = command.description();
        log::debug!("undo: {}", description);
        self.redo_stack.push(command);
        self.notify();
        Some(description)
    }

    /// Re-execute the most recently undone command, returning its description
    pub fn redo(&mut self, annotations: &mut AnnotationList) -> Option<String> {
        let mut command = self.redo_stack.pop()?;
        command.execute(annotations);
        let description = command.description();
        log::debug!("redo: {}", description);
        self.undo_stack.push(command);
        self.notify();
        Some(description)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    fn notify(&mut self) {
        let status = self.status();
        if let Some(listener) = self.listener.as_mut() {
            listener(status);
        }
    }
}
