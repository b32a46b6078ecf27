//! Region capture, annotation and flattened export for screenshots

pub mod annotations;
pub mod capture;
pub mod config;
pub mod domain;
pub mod export;
pub mod render;
pub mod session;
pub mod transform;
