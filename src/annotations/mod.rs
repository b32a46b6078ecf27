//! Annotation editing: commands, history, tools and pointer handlers
//!
//! This module provides:
//! - Reversible commands over the annotation sequence
//! - The undo/redo command stack
//! - Drawing tools and provisional annotations
//! - Pointer handlers for the editing session

pub mod commands;
pub mod handlers;
pub mod history;
pub mod tools;
