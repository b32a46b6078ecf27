//! Editing session management
//!
//! This module contains:
//! - Session state and its operations
//! - Message types for editor interactions
//! - Keyboard shortcut mapping

pub mod messages;
pub mod shortcuts;
pub mod state;

pub use messages::{EditorMsg, Effect};
pub use state::{EditorSession, StatusMessage};
