//! Hit testing and single-selection state

use super::annotation::AnnotationId;
use super::geometry::{Point, Vector};
use super::list::AnnotationList;

/// Slack around annotation bounds when hit testing
pub const HIT_MARGIN: f32 = 5.0;

/// Topmost annotation whose inflated bounds contain `point`
pub fn hit_test(annotations: &AnnotationList, point: Point) -> Option<AnnotationId> {
    annotations
        .iter()
        .rev()
        .find(|a| a.bounds().inflate(HIT_MARGIN, HIT_MARGIN).contains(point))
        .map(|a| a.id())
}

/// At most one selected annotation, plus an in-progress drag
#[derive(Debug, Clone, Default)]
pub struct Selection {
    current: Option<AnnotationId>,
    drag_anchor: Option<Point>,
}

impl Selection {
    pub fn current(&self) -> Option<AnnotationId> {
        self.current
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Select `id` (or nothing), moving the `selected` flag accordingly
    pub fn select(&mut self, annotations: &mut AnnotationList, id: Option<AnnotationId>) {
        if let Some(previous) = self.current.take()
            && let Some(a) = annotations.get_mut(previous)
        {
            a.selected = false;
        }
        self.drag_anchor = None;

        let Some(id) = id else {
            return;
        };
        if let Some(a) = annotations.get_mut(id) {
            a.selected = true;
            self.current = Some(id);
        }
    }

    pub fn clear(&mut self, annotations: &mut AnnotationList) {
        self.select(annotations, None);
    }

    /// Forget a selection whose annotation no longer exists
    pub fn revalidate(&mut self, annotations: &AnnotationList) {
        if let Some(id) = self.current
            && !annotations.contains(id)
        {
            self.current = None;
            self.drag_anchor = None;
        }
    }

    /// Start dragging the current selection from `point`
    pub fn begin_drag(&mut self, point: Point) -> bool {
        if self.current.is_none() {
            return false;
        }
        self.drag_anchor = Some(point);
        true
    }

    /// Translate the selection by the movement since the previous frame.
    ///
    /// Drags are applied directly and are not recorded in the command history.
    pub fn drag_to(&mut self, annotations: &mut AnnotationList, point: Point) -> Option<Vector> {
        let anchor = self.drag_anchor?;
        let annotation = annotations.get_mut(self.current?)?;
        let delta = point - anchor;
        annotation.translate(delta);
        self.drag_anchor = Some(point);
        Some(delta)
    }

    pub fn end_drag(&mut self) -> bool {
        self.drag_anchor.take().is_some()
    }
}
