//! Pointer handlers for an editing session
//!
//! Routes press/move/release to crop selection, the selection engine or the
//! active drawing tool.

use crate::annotations::tools::{Tool, should_commit, update_provisional};
use crate::domain::{Point, Rect, hit_test};
use crate::session::messages::{Effect, PointerAction};
use crate::session::state::{CropState, Drawing, EditorSession};

/// Crop drags must exceed this in both dimensions to be offered for confirmation
pub const MIN_CROP_SIZE: f32 = 10.0;

/// Handle a pointer action, returning a request for the host if one is needed
pub fn handle_pointer(session: &mut EditorSession, action: PointerAction) -> Option<Effect> {
    let point = action.point();
    if session.crop != CropState::Off {
        return handle_crop(session, action, point);
    }
    match action {
        PointerAction::Press(..) => press(session, point),
        PointerAction::Move(..) => {
            pointer_moved(session, point);
            None
        }
        PointerAction::Release(..) => {
            release(session);
            None
        }
    }
}

// ============================================================================
// Tool handlers
// ============================================================================

fn press(session: &mut EditorSession, point: Point) -> Option<Effect> {
    match session.tools.tool {
        Tool::Select => {
            let hit = hit_test(&session.annotations, point);
            session.selection.select(&mut session.annotations, hit);
            if hit.is_some() {
                session.selection.begin_drag(point);
            }
            session.redraw();
            None
        }
        Tool::Step => {
            let number = session.annotations.take_step_number();
            let marker = session.tools.step_marker(point, number);
            session.add_annotation(marker);
            None
        }
        Tool::Text => Some(Effect::RequestText(point)),
        _ => {
            session.drawing = session
                .tools
                .begin(point)
                .map(|annotation| Drawing {
                    start: point,
                    annotation,
                });
            session.redraw();
            None
        }
    }
}

fn pointer_moved(session: &mut EditorSession, point: Point) {
    if session.selection.is_dragging() {
        if session
            .selection
            .drag_to(&mut session.annotations, point)
            .is_some()
        {
            session.redraw();
        }
    } else if let Some(drawing) = session.drawing.as_mut() {
        update_provisional(&mut drawing.annotation, drawing.start, point);
        session.redraw();
    }
}

fn release(session: &mut EditorSession) {
    if session.selection.end_drag() {
        return;
    }
    let Some(drawing) = session.drawing.take() else {
        return;
    };
    if should_commit(&drawing.annotation) {
        session.add_annotation(drawing.annotation);
    } else {
        log::debug!("discarding {} too small to keep", drawing.annotation.kind.name());
        session.redraw();
    }
}

// ============================================================================
// Crop handlers
// ============================================================================

fn handle_crop(session: &mut EditorSession, action: PointerAction, point: Point) -> Option<Effect> {
    match (action, session.crop) {
        (PointerAction::Press(..), _) => {
            session.crop = CropState::Dragging {
                start: point,
                current: point,
            };
            session.redraw();
            None
        }
        (PointerAction::Move(..), CropState::Dragging { start, .. }) => {
            session.crop = CropState::Dragging {
                start,
                current: point,
            };
            session.redraw();
            None
        }
        (PointerAction::Release(..), CropState::Dragging { start, .. }) => {
            // Crop mode ends with the drag either way
            session.crop = CropState::Off;
            session.redraw();
            let rect = Rect::from_points(start, point);
            (rect.width > MIN_CROP_SIZE && rect.height > MIN_CROP_SIZE)
                .then_some(Effect::ConfirmCrop(rect))
        }
        _ => None,
    }
}
