//! Editing session state
//!
//! One session exclusively owns the canvas bitmap, the annotation sequence and
//! the command history. Every mutation ends with a full redraw of the overlay.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::annotations::commands::{AddAnnotation, RemoveAnnotation};
use crate::annotations::handlers::handle_pointer;
use crate::annotations::history::{CommandStack, HistoryStatus};
use crate::annotations::tools::{Tool, ToolState};
use crate::capture::CaptureHandoff;
use crate::capture::image::CanvasImage;
use crate::config::{ShapeColor, ToolDefaults};
use crate::domain::{Annotation, AnnotationList, Point, Rect, Selection};
use crate::export::{self, ClipboardSink, ExportError};
use crate::render::{OverlayExtras, RenderPipeline};
use crate::session::messages::{CanvasMsg, EditMsg, EditorMsg, Effect, OutputMsg, ToolMsg};
use crate::transform::{self, TransformError, Transformed};

/// What the status line should report, left to the host to phrase
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    CanvasSize { width: u32, height: u32 },
    NextStep(u32),
    CropPrompt,
    Copied,
    Saved(PathBuf),
    Failed(String),
}

/// A drag-tool annotation that is not committed yet
#[derive(Debug, Clone)]
pub struct Drawing {
    pub start: Point,
    pub annotation: Annotation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum CropState {
    #[default]
    Off,
    /// Waiting for the crop drag to start
    Armed,
    Dragging { start: Point, current: Point },
}

#[derive(Debug)]
pub struct EditorSession {
    pub(crate) canvas: CanvasImage,
    region: Rect,
    pub(crate) annotations: AnnotationList,
    pub(crate) history: CommandStack,
    pub(crate) selection: Selection,
    pub(crate) tools: ToolState,
    pub(crate) drawing: Option<Drawing>,
    pub(crate) crop: CropState,
    renderer: RenderPipeline,
    overlay: RgbaImage,
    status: StatusMessage,
}

impl EditorSession {
    pub fn new(image: RgbaImage, defaults: ToolDefaults) -> Self {
        let region = Rect::new(0.0, 0.0, image.width() as f32, image.height() as f32);
        let status = StatusMessage::CanvasSize {
            width: image.width(),
            height: image.height(),
        };
        let mut session = Self {
            overlay: image.clone(),
            canvas: CanvasImage::new(image),
            region,
            annotations: AnnotationList::new(),
            history: CommandStack::new(),
            selection: Selection::default(),
            tools: ToolState::from_defaults(defaults),
            drawing: None,
            crop: CropState::Off,
            renderer: RenderPipeline::new(),
            status,
        };
        session.redraw();
        session
    }

    pub fn from_handoff(handoff: CaptureHandoff, defaults: ToolDefaults) -> Self {
        let mut session = Self::new(handoff.image, defaults);
        session.region = handoff.region;
        session
    }

    pub fn canvas(&self) -> &RgbaImage {
        self.canvas.rgba()
    }

    /// Logical screen region the session was started from
    pub fn region(&self) -> Rect {
        self.region
    }

    pub fn annotations(&self) -> &AnnotationList {
        &self.annotations
    }

    /// Latest interactive render
    pub fn overlay(&self) -> &RgbaImage {
        &self.overlay
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn selected(&self) -> Option<&Annotation> {
        self.annotations.get(self.selection.current()?)
    }

    pub fn provisional(&self) -> Option<&Annotation> {
        self.drawing.as_ref().map(|d| &d.annotation)
    }

    pub fn is_crop_mode(&self) -> bool {
        self.crop != CropState::Off
    }

    /// Crop rectangle being dragged
    pub fn crop_rect(&self) -> Option<Rect> {
        match self.crop {
            CropState::Dragging { start, current } => Some(Rect::from_points(start, current)),
            _ => None,
        }
    }

    pub fn history_status(&self) -> HistoryStatus {
        self.history.status()
    }

    /// Register a callback fired whenever undo/redo availability may change
    pub fn on_history_change(&mut self, listener: impl FnMut(HistoryStatus) + 'static) {
        self.history.set_listener(listener);
    }

    pub fn update(&mut self, msg: EditorMsg) -> Option<Effect> {
        match msg {
            EditorMsg::Pointer(action) => return handle_pointer(self, action),
            EditorMsg::Edit(edit) => match edit {
                EditMsg::Undo => self.undo(),
                EditMsg::Redo => self.redo(),
                EditMsg::DeleteSelected => self.delete_selected(),
                EditMsg::Cancel => self.cancel(),
                EditMsg::PlaceText {
                    position,
                    text,
                    font_size,
                } => self.place_text(position, &text, font_size),
            },
            EditorMsg::Tool(tool) => match tool {
                ToolMsg::SetTool(tool) => self.select_tool(tool),
                ToolMsg::SetColor(color) => self.set_color(color),
                ToolMsg::SetStrokeWidth(width) => self.set_stroke_width(width),
                ToolMsg::SetOpacity(opacity) => self.tools.opacity = opacity.clamp(0.0, 1.0),
                ToolMsg::SetFontSize(size) => self.tools.font_size = size,
            },
            EditorMsg::Canvas(canvas) => {
                let result = match canvas {
                    CanvasMsg::EnterCropMode => {
                        self.enter_crop_mode();
                        Ok(())
                    }
                    CanvasMsg::ApplyCrop(rect) => self.apply_crop(rect),
                    CanvasMsg::RotateClockwise => self.rotate(),
                    CanvasMsg::Resize(width, height) => self.resize(width, height),
                };
                if let Err(err) = result {
                    log::warn!("canvas operation rejected: {err}");
                }
            }
            EditorMsg::Output(OutputMsg::CopyToClipboard) => return Some(Effect::CopyToClipboard),
            EditorMsg::Output(OutputMsg::Save) => return Some(Effect::Save),
        }
        None
    }

    /// Rebuild the interactive overlay from scratch
    pub(crate) fn redraw(&mut self) {
        let extras = OverlayExtras {
            provisional: self.drawing.as_ref().map(|d| &d.annotation),
            crop: match self.crop {
                CropState::Dragging { start, current } => Some(Rect::from_points(start, current)),
                _ => None,
            },
        };
        self.overlay = self
            .renderer
            .render_overlay(self.canvas.rgba(), &self.annotations, extras);
    }

    /// Keep the selection and the `selected` flags consistent after replay
    fn sync_selection(&mut self) {
        self.selection.revalidate(&self.annotations);
        let current = self.selection.current();
        for a in self.annotations.iter_mut() {
            a.selected = Some(a.id()) == current;
        }
    }

    /// Commit an annotation through the history
    pub fn add_annotation(&mut self, annotation: Annotation) {
        let is_step = annotation.is_step();
        self.history
            .run(Box::new(AddAnnotation::new(annotation)), &mut self.annotations);
        if is_step {
            self.annotations.renumber_steps();
            self.status = StatusMessage::NextStep(self.annotations.next_step_number());
        }
        self.redraw();
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selection.current() else {
            return;
        };
        self.selection.clear(&mut self.annotations);
        let command = RemoveAnnotation::new(&self.annotations, id);
        self.history.run(Box::new(command), &mut self.annotations);
        self.annotations.renumber_steps();
        self.redraw();
    }

    pub fn undo(&mut self) {
        if self.history.undo(&mut self.annotations).is_some() {
            self.annotations.renumber_steps();
            self.sync_selection();
            self.redraw();
        }
    }

    pub fn redo(&mut self) {
        if self.history.redo(&mut self.annotations).is_some() {
            self.annotations.renumber_steps();
            self.sync_selection();
            self.redraw();
        }
    }

    /// Switch tools, dropping any in-progress drawing.
    ///
    /// Any tool other than Select also clears the selection.
    pub fn select_tool(&mut self, tool: Tool) {
        self.tools.tool = tool;
        self.drawing = None;
        if tool != Tool::Select {
            self.selection.clear(&mut self.annotations);
        }
        self.redraw();
    }

    pub fn set_color(&mut self, color: ShapeColor) {
        self.tools.color = color;
        if let Some(id) = self.selection.current()
            && let Some(a) = self.annotations.get_mut(id)
        {
            a.style.color = color;
            self.redraw();
        }
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.tools.stroke_width = width;
        if let Some(id) = self.selection.current()
            && let Some(a) = self.annotations.get_mut(id)
        {
            a.style.thickness = width;
            self.redraw();
        }
    }

    /// Add a text label; blank text is ignored
    pub fn place_text(&mut self, position: Point, text: &str, font_size: f32) {
        if let Some(label) = self.tools.text_label(position, text, font_size) {
            self.add_annotation(label);
        }
    }

    pub fn enter_crop_mode(&mut self) {
        self.crop = CropState::Armed;
        self.drawing = None;
        self.selection.clear(&mut self.annotations);
        self.status = StatusMessage::CropPrompt;
        self.redraw();
    }

    /// Escape: leave crop mode first, otherwise deselect
    pub fn cancel(&mut self) {
        self.drawing = None;
        if self.crop != CropState::Off {
            self.crop = CropState::Off;
            self.status = self.canvas_status();
        } else {
            self.selection.clear(&mut self.annotations);
        }
        self.redraw();
    }

    pub fn apply_crop(&mut self, rect: Rect) -> Result<(), TransformError> {
        self.crop = CropState::Off;
        let result = transform::crop(self.canvas.rgba(), self.annotations.as_slice(), rect);
        self.commit_transform(result)
    }

    pub fn rotate(&mut self) -> Result<(), TransformError> {
        let result = transform::rotate_90_clockwise(self.canvas.rgba(), self.annotations.as_slice());
        self.commit_transform(result)
    }

    pub fn scale(&mut self, scale_x: f32, scale_y: f32) -> Result<(), TransformError> {
        let result = transform::scale(
            self.canvas.rgba(),
            self.annotations.as_slice(),
            scale_x,
            scale_y,
        );
        self.commit_transform(result)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TransformError> {
        let result =
            transform::resize(self.canvas.rgba(), self.annotations.as_slice(), width, height);
        self.commit_transform(result)
    }

    /// Swap in a transformed canvas, or keep everything on error
    fn commit_transform(
        &mut self,
        result: Result<Transformed, TransformError>,
    ) -> Result<(), TransformError> {
        let transformed = match result {
            Ok(transformed) => transformed,
            Err(err) => {
                self.redraw();
                return Err(err);
            }
        };
        self.drawing = None;
        self.canvas.replace(transformed.image);
        self.annotations.replace(transformed.annotations);
        self.annotations.renumber_steps();
        self.sync_selection();
        self.status = self.canvas_status();
        self.redraw();
        Ok(())
    }

    fn canvas_status(&self) -> StatusMessage {
        StatusMessage::CanvasSize {
            width: self.canvas.width(),
            height: self.canvas.height(),
        }
    }

    /// Flattened image at the current canvas resolution.
    ///
    /// The selected flag is lifted for the duration of the render.
    pub fn export_image(&mut self) -> RgbaImage {
        let selected = self.selection.current();
        self.annotations.clear_selection();
        let image = self
            .renderer
            .render_export(self.canvas.rgba(), &self.annotations);
        if let Some(id) = selected
            && let Some(a) = self.annotations.get_mut(id)
        {
            a.selected = true;
        }
        image
    }

    pub fn copy_to(&mut self, clipboard: &mut dyn ClipboardSink) -> Result<(), ExportError> {
        let image = self.export_image();
        match clipboard.set_image(&image) {
            Ok(()) => {
                self.status = StatusMessage::Copied;
                Ok(())
            }
            Err(err) => {
                log::error!("copy to clipboard failed: {err}");
                self.status = StatusMessage::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub fn save_to(&mut self, path: &Path) -> Result<(), ExportError> {
        let image = self.export_image();
        match export::save(&image, path) {
            Ok(()) => {
                self.status = StatusMessage::Saved(path.to_path_buf());
                Ok(())
            }
            Err(err) => {
                log::error!("saving {} failed: {err}", path.display());
                self.status = StatusMessage::Failed(err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::domain::AnnotationKind;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn session() -> EditorSession {
        EditorSession::new(RgbaImage::from_pixel(200, 150, WHITE), ToolDefaults::default())
    }

    fn drag(session: &mut EditorSession, from: (f32, f32), to: (f32, f32)) -> Option<Effect> {
        session.update(EditorMsg::press(from.0, from.1));
        session.update(EditorMsg::pointer_move(to.0, to.1));
        session.update(EditorMsg::release(to.0, to.1))
    }

    fn step_numbers(session: &EditorSession) -> Vec<u32> {
        session
            .annotations()
            .iter()
            .filter_map(|a| match &a.kind {
                AnnotationKind::Step(s) => Some(s.number),
                _ => None,
            })
            .collect()
    }

    #[derive(Default)]
    struct MemoryClipboard(Option<RgbaImage>);

    impl ClipboardSink for MemoryClipboard {
        fn set_image(&mut self, image: &RgbaImage) -> Result<(), ExportError> {
            self.0 = Some(image.clone());
            Ok(())
        }
    }

    #[test]
    fn test_deleting_step_renumbers() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::Step));
        for x in [20.0, 60.0, 100.0] {
            s.update(EditorMsg::press(x, 40.0));
            s.update(EditorMsg::release(x, 40.0));
        }
        assert_eq!(step_numbers(&s), vec![1, 2, 3]);

        s.update(EditorMsg::tool(Tool::Select));
        s.update(EditorMsg::press(60.0, 40.0));
        s.update(EditorMsg::release(60.0, 40.0));
        s.update(EditorMsg::delete_selected());

        assert_eq!(step_numbers(&s), vec![1, 2]);
        assert_eq!(s.annotations().next_step_number(), 3);
    }

    #[test]
    fn test_undo_redo_renumbers_steps() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::Step));
        s.update(EditorMsg::press(20.0, 20.0));
        s.update(EditorMsg::press(60.0, 20.0));
        assert_eq!(s.annotations().next_step_number(), 3);

        s.update(EditorMsg::undo());
        assert_eq!(step_numbers(&s), vec![1]);
        assert_eq!(s.annotations().next_step_number(), 2);

        s.update(EditorMsg::redo());
        assert_eq!(step_numbers(&s), vec![1, 2]);
        assert_eq!(s.annotations().next_step_number(), 3);
    }

    #[test]
    fn test_drawing_commits_and_discards() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::Rectangle));

        s.update(EditorMsg::press(10.0, 10.0));
        s.update(EditorMsg::pointer_move(50.0, 40.0));
        assert!(s.provisional().is_some());
        assert!(s.annotations().is_empty());
        s.update(EditorMsg::release(50.0, 40.0));
        assert!(s.provisional().is_none());
        assert_eq!(s.annotations().len(), 1);
        assert!(s.history_status().can_undo);

        // Too small in both directions
        drag(&mut s, (100.0, 100.0), (103.0, 102.0));
        assert_eq!(s.annotations().len(), 1);

        s.update(EditorMsg::undo());
        assert!(s.annotations().is_empty());
    }

    #[test]
    fn test_overlay_shows_provisional() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::FilledRect));
        s.update(EditorMsg::press(10.0, 10.0));
        s.update(EditorMsg::pointer_move(40.0, 40.0));
        assert_eq!(*s.overlay().get_pixel(25, 25), Rgba([255, 0, 0, 255]));
        assert_eq!(*s.canvas().get_pixel(25, 25), WHITE);
    }

    #[test]
    fn test_select_drag_is_not_recorded() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::Rectangle));
        drag(&mut s, (10.0, 10.0), (50.0, 40.0));

        s.update(EditorMsg::tool(Tool::Select));
        drag(&mut s, (30.0, 10.0), (40.0, 20.0));
        let moved = s.selected().unwrap().bounds();
        assert_eq!(moved, Rect::new(20.0, 20.0, 40.0, 30.0));

        // Only the add is undoable
        s.update(EditorMsg::undo());
        assert!(s.annotations().is_empty());
        assert!(s.selected().is_none());
    }

    #[test]
    fn test_style_changes_apply_to_selection() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::Ellipse));
        drag(&mut s, (10.0, 10.0), (50.0, 40.0));
        s.update(EditorMsg::tool(Tool::Select));
        s.update(EditorMsg::press(30.0, 25.0));
        s.update(EditorMsg::release(30.0, 25.0));

        s.update(EditorMsg::color(ShapeColor::YELLOW));
        s.update(EditorMsg::stroke_width(8.0));
        let style = s.selected().unwrap().style;
        assert_eq!(style.color, ShapeColor::YELLOW);
        assert_eq!(style.thickness, 8.0);
        assert_eq!(s.tools().stroke_width, 8.0);
    }

    #[test]
    fn test_text_request_and_place() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::Text));
        let effect = s.update(EditorMsg::press(15.0, 25.0));
        assert_eq!(effect, Some(Effect::RequestText(Point::new(15.0, 25.0))));

        s.update(EditorMsg::place_text(Point::new(15.0, 25.0), "  ", 16.0));
        assert!(s.annotations().is_empty());
        s.update(EditorMsg::place_text(Point::new(15.0, 25.0), "note", 16.0));
        assert_eq!(s.annotations().len(), 1);
    }

    #[test]
    fn test_crop_flow() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::Step));
        s.update(EditorMsg::press(30.0, 30.0));
        s.update(EditorMsg::press(180.0, 140.0));

        s.update(EditorMsg::crop_mode());
        assert_eq!(s.status(), &StatusMessage::CropPrompt);
        // Small drags leave crop mode without asking
        assert_eq!(drag(&mut s, (10.0, 10.0), (15.0, 40.0)), None);
        assert!(!s.is_crop_mode());

        s.update(EditorMsg::crop_mode());
        let effect = drag(&mut s, (20.0, 20.0), (120.0, 120.0));
        let Some(Effect::ConfirmCrop(rect)) = effect else {
            panic!("expected crop confirmation, got {effect:?}");
        };
        assert!(!s.is_crop_mode());
        s.update(EditorMsg::apply_crop(rect));

        assert_eq!((s.canvas().width(), s.canvas().height()), (100, 100));
        assert_eq!(step_numbers(&s), vec![1]);
        assert_eq!(s.annotations().next_step_number(), 2);
        assert_eq!(
            s.status(),
            &StatusMessage::CanvasSize {
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn test_escape_cancels_crop_before_selection() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::Rectangle));
        drag(&mut s, (10.0, 10.0), (50.0, 40.0));
        s.update(EditorMsg::tool(Tool::Select));
        s.update(EditorMsg::press(10.0, 10.0));
        s.update(EditorMsg::release(10.0, 10.0));
        assert!(s.selected().is_some());

        s.update(EditorMsg::crop_mode());
        s.update(EditorMsg::cancel());
        assert!(!s.is_crop_mode());

        s.update(EditorMsg::press(10.0, 10.0));
        s.update(EditorMsg::release(10.0, 10.0));
        s.update(EditorMsg::cancel());
        assert!(s.selected().is_none());
    }

    #[test]
    fn test_failed_transform_keeps_state() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::Rectangle));
        drag(&mut s, (10.0, 10.0), (50.0, 40.0));
        let before = s.annotations().as_slice()[0].bounds();

        assert!(s.resize(0, 10).is_err());
        assert!(s.apply_crop(Rect::new(500.0, 500.0, 20.0, 20.0)).is_err());
        assert_eq!((s.canvas().width(), s.canvas().height()), (200, 150));
        assert_eq!(s.annotations().as_slice()[0].bounds(), before);

        s.rotate().unwrap();
        assert_eq!((s.canvas().width(), s.canvas().height()), (150, 200));
        s.resize(300, 400).unwrap();
        assert_eq!((s.canvas().width(), s.canvas().height()), (300, 400));
    }

    #[test]
    fn test_export_hides_selection_and_restores_flag() {
        let mut s = session();
        s.update(EditorMsg::tool(Tool::Rectangle));
        drag(&mut s, (20.0, 20.0), (60.0, 60.0));
        s.update(EditorMsg::tool(Tool::Select));
        s.update(EditorMsg::press(20.0, 20.0));
        s.update(EditorMsg::release(20.0, 20.0));

        let mut clipboard = MemoryClipboard::default();
        s.copy_to(&mut clipboard).unwrap();
        let copied = clipboard.0.unwrap();
        // Indicator sits 4 units outside the bounds
        let column = |img: &RgbaImage| (16..=64).map(|y| *img.get_pixel(16, y)).collect::<Vec<_>>();
        assert!(column(&copied).iter().all(|p| *p == WHITE));
        assert!(column(s.overlay()).iter().any(|p| *p != WHITE));
        assert!(s.selected().unwrap().selected);
        assert_eq!(s.status(), &StatusMessage::Copied);
    }

    #[test]
    fn test_save_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.png");
        let mut s = session();
        assert_eq!(s.update(EditorMsg::save()), Some(Effect::Save));
        s.save_to(&path).unwrap();
        assert_eq!(s.status(), &StatusMessage::Saved(path.clone()));
        assert!(path.exists());

        let bad = dir.path().join("missing").join("x.png");
        assert!(s.save_to(&bad).is_err());
        assert!(matches!(s.status(), StatusMessage::Failed(_)));
    }
}
