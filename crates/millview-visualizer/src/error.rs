//! Error types for the visualizer crate.

use thiserror::Error;

/// Errors raised by OpenGL rendering operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("OpenGL error: {0}")]
    OpenGLError(String),
    #[error("Shader compilation error: {0}")]
    ShaderError(String),
    #[error("Buffer creation error: {0}")]
    BufferError(String),
}

/// Errors raised while starting or driving a visualization
#[derive(Debug, Error)]
pub enum VisualizerError {
    /// The container cannot provide a hardware-accelerated drawing surface
    #[error("Rendering backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Operation requires at least one move
    #[error("Move list is empty")]
    EmptyMoveList,

    /// Image scale must be finite and strictly positive
    #[error("Invalid pixels per millimeter: {0}")]
    InvalidScale(f32),

    /// Session method called in the wrong lifecycle state
    #[error("Invalid session state: expected {expected}, found {found}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for visualizer operations
pub type Result<T> = std::result::Result<T, VisualizerError>;
