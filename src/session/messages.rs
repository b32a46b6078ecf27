//! Message types for an editing session
//!
//! This module contains:
//! - EditorMsg enum with nested sub-enums for organized message handling
//! - Effect enum for requests the session hands back to its host

use crate::annotations::tools::Tool;
use crate::config::ShapeColor;
use crate::domain::{Point, Rect};

// ============================================================================
// Pointer Types
// ============================================================================

/// Pointer input in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Button pressed at position
    Press(f32, f32),
    /// Pointer moved while the button is held
    Move(f32, f32),
    /// Button released at position
    Release(f32, f32),
}

impl PointerAction {
    pub fn point(self) -> Point {
        match self {
            PointerAction::Press(x, y) | PointerAction::Move(x, y) | PointerAction::Release(x, y) => {
                Point::new(x, y)
            }
        }
    }
}

// ============================================================================
// Edit Types
// ============================================================================

/// History and selection messages
#[derive(Debug, Clone, PartialEq)]
pub enum EditMsg {
    Undo,
    Redo,
    /// Remove the selected annotation
    DeleteSelected,
    /// Leave crop mode, or clear the selection
    Cancel,
    /// Add a text label once the host has collected the string
    PlaceText {
        position: Point,
        text: String,
        font_size: f32,
    },
}

// ============================================================================
// Tool Types
// ============================================================================

/// Tool and style messages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolMsg {
    SetTool(Tool),
    /// Also recolors the selected annotation
    SetColor(ShapeColor),
    /// Also restyles the selected annotation
    SetStrokeWidth(f32),
    SetOpacity(f32),
    SetFontSize(f32),
}

// ============================================================================
// Canvas Types
// ============================================================================

/// Whole-canvas operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasMsg {
    /// Start dragging a crop rectangle
    EnterCropMode,
    /// Crop to a rectangle the user confirmed
    ApplyCrop(Rect),
    RotateClockwise,
    Resize(u32, u32),
}

// ============================================================================
// Output Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMsg {
    CopyToClipboard,
    Save,
}

// ============================================================================
// Main Message Enum
// ============================================================================

/// Messages for editing session interactions
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMsg {
    Pointer(PointerAction),
    Edit(EditMsg),
    Tool(ToolMsg),
    Canvas(CanvasMsg),
    Output(OutputMsg),
}

/// Requests the session cannot fulfil on its own
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the user to confirm cropping to this rectangle
    ConfirmCrop(Rect),
    /// Ask the user for text to place at this point
    RequestText(Point),
    /// Push the flattened image to the clipboard
    CopyToClipboard,
    /// Save the flattened image
    Save,
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl EditorMsg {
    // Pointer shortcuts
    pub fn press(x: f32, y: f32) -> Self {
        Self::Pointer(PointerAction::Press(x, y))
    }
    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::Pointer(PointerAction::Move(x, y))
    }
    pub fn release(x: f32, y: f32) -> Self {
        Self::Pointer(PointerAction::Release(x, y))
    }

    // Edit shortcuts
    pub fn undo() -> Self {
        Self::Edit(EditMsg::Undo)
    }
    pub fn redo() -> Self {
        Self::Edit(EditMsg::Redo)
    }
    pub fn delete_selected() -> Self {
        Self::Edit(EditMsg::DeleteSelected)
    }
    pub fn cancel() -> Self {
        Self::Edit(EditMsg::Cancel)
    }
    pub fn place_text(position: Point, text: impl Into<String>, font_size: f32) -> Self {
        Self::Edit(EditMsg::PlaceText {
            position,
            text: text.into(),
            font_size,
        })
    }

    // Tool shortcuts
    pub fn tool(tool: Tool) -> Self {
        Self::Tool(ToolMsg::SetTool(tool))
    }
    pub fn color(color: ShapeColor) -> Self {
        Self::Tool(ToolMsg::SetColor(color))
    }
    pub fn stroke_width(width: f32) -> Self {
        Self::Tool(ToolMsg::SetStrokeWidth(width))
    }
    pub fn opacity(opacity: f32) -> Self {
        Self::Tool(ToolMsg::SetOpacity(opacity))
    }
    pub fn font_size(size: f32) -> Self {
        Self::Tool(ToolMsg::SetFontSize(size))
    }

    // Canvas shortcuts
    pub fn crop_mode() -> Self {
        Self::Canvas(CanvasMsg::EnterCropMode)
    }
    pub fn apply_crop(rect: Rect) -> Self {
        Self::Canvas(CanvasMsg::ApplyCrop(rect))
    }
    pub fn rotate() -> Self {
        Self::Canvas(CanvasMsg::RotateClockwise)
    }
    pub fn resize(width: u32, height: u32) -> Self {
        Self::Canvas(CanvasMsg::Resize(width, height))
    }

    // Output shortcuts
    pub fn copy_to_clipboard() -> Self {
        Self::Output(OutputMsg::CopyToClipboard)
    }
    pub fn save() -> Self {
        Self::Output(OutputMsg::Save)
    }
}
