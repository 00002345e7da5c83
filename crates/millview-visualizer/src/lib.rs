//! # MillView Visualizer
//!
//! Turns a milling tool path into an interactive 3D scene: coordinate
//! mapping, per-move cylinder geometry, scene assembly, orbit camera, the
//! session that drives the render loop, and an OpenGL renderer. Also renders
//! a top-down SVG of the path.

pub mod error;
pub mod visualizer;

pub use error::{RenderError, Result, VisualizerError};
pub use visualizer::{
    moves_to_svg, visualize, CallbackId, CoordinateTransform, InputEvent, MoveVisualizer,
    OrbitControls, PerspectiveCamera, RenderSurface, Scene, SceneAssembler, SceneRenderer,
    SceneStats, SegmentGeometryBuilder, SegmentPrimitive, SessionState, SvgOptions,
    ViewportContainer, ViewportSession, FALLBACK_MESSAGE,
};

pub use millview_settings::{SceneStyle, SegmentColoring, StylePreset};
