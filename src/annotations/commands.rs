//! Reversible mutations of the annotation sequence
//!
//! Commands hold identities and indices into the shared [`AnnotationList`];
//! the list itself is passed in on every call and never copied.

use crate::domain::{Annotation, AnnotationId, AnnotationList, Vector};

/// Trait for undoable/redoable edits
pub trait Command {
    fn execute(&mut self, annotations: &mut AnnotationList);
    fn undo(&mut self, annotations: &mut AnnotationList);
    fn description(&self) -> String;
}

/// Append an annotation on top; undo takes it back out
pub struct AddAnnotation {
    id: AnnotationId,
    kind: &'static str,
    /// Holds the annotation while it is not in the list
    pending: Option<Annotation>,
}

impl AddAnnotation {
    pub fn new(annotation: Annotation) -> Self {
        Self {
            id: annotation.id(),
            kind: annotation.kind.name(),
            pending: Some(annotation),
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }
}

impl Command for AddAnnotation {
    fn execute(&mut self, annotations: &mut AnnotationList) {
        if let Some(annotation) = self.pending.take()
            && !annotations.contains(self.id)
        {
            annotations.push(annotation);
        }
    }

    fn undo(&mut self, annotations: &mut AnnotationList) {
        if let Some((_, annotation)) = annotations.remove(self.id) {
            self.pending = Some(annotation);
        }
    }

    fn description(&self) -> String {
        format!("Add {}", self.kind)
    }
}

/// Remove an annotation, remembering where it sat in the sequence
pub struct RemoveAnnotation {
    id: AnnotationId,
    kind: &'static str,
    index: Option<usize>,
    removed: Option<Annotation>,
}

impl RemoveAnnotation {
    pub fn new(annotations: &AnnotationList, id: AnnotationId) -> Self {
        Self {
            id,
            kind: annotations.get(id).map_or("Annotation", |a| a.kind.name()),
            index: annotations.position(id),
            removed: None,
        }
    }
}

impl Command for RemoveAnnotation {
    fn execute(&mut self, annotations: &mut AnnotationList) {
        // The sequence may have changed since construction
        if let Some((index, annotation)) = annotations.remove(self.id) {
            self.index = Some(index);
            self.removed = Some(annotation);
        }
    }

    fn undo(&mut self, annotations: &mut AnnotationList) {
        let Some(annotation) = self.removed.take() else {
            return;
        };
        match self.index {
            Some(index) => annotations.insert(index, annotation),
            None => annotations.push(annotation),
        }
    }

    fn description(&self) -> String {
        format!("Remove {}", self.kind)
    }
}

/// Translate an annotation by a fixed vector
pub struct MoveAnnotation {
    id: AnnotationId,
    kind: &'static str,
    delta: Vector,
}

impl MoveAnnotation {
    pub fn new(annotations: &AnnotationList, id: AnnotationId, delta: Vector) -> Self {
        Self {
            id,
            kind: annotations.get(id).map_or("Annotation", |a| a.kind.name()),
            delta,
        }
    }
}

impl Command for MoveAnnotation {
    fn execute(&mut self, annotations: &mut AnnotationList) {
        if let Some(a) = annotations.get_mut(self.id) {
            a.translate(self.delta);
        }
    }

    fn undo(&mut self, annotations: &mut AnnotationList) {
        if let Some(a) = annotations.get_mut(self.id) {
            a.translate(-self.delta);
        }
    }

    fn description(&self) -> String {
        format!("Move {}", self.kind)
    }
}
