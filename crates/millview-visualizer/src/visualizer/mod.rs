//! 3D tool path visualization
//!
//! This module provides:
//! - Machine-to-render coordinate mapping (transform)
//! - Oriented cylinder geometry per tool move (segment)
//! - Scene assembly with grids, axes, tool marker and lights (scene)
//! - Perspective camera and damped orbit controls (camera, controls)
//! - Session lifecycle and render loop wiring (session)
//! - OpenGL scene rendering (scene_renderer)
//! - Top-down SVG export (svg_export)

pub mod camera;
pub mod controls;
pub mod mesh_rendering;
pub mod mesh_shaders;
pub mod scene;
pub mod scene_renderer;
pub mod segment;
pub mod session;
pub mod svg_export;
pub mod transform;

pub use camera::PerspectiveCamera;
pub use controls::{InputEvent, OrbitControls};
pub use mesh_rendering::{mesh_utils, MeshMaterial, Primitive, RenderableMesh};
pub use scene::{
    AxisIndicator, Fog, Grid, Light, Scene, SceneAssembler, SceneStats, ToolMarker,
};
pub use scene_renderer::{LightingParams, SceneRenderer};
pub use segment::{DegenerateSegment, SegmentGeometryBuilder, SegmentPrimitive};
pub use session::{
    visualize, CallbackId, FrameCallback, InputCallback, MoveVisualizer, RenderSurface,
    ResizeCallback, SessionState, ViewportContainer, ViewportSession, FALLBACK_MESSAGE,
};
pub use svg_export::{moves_to_svg, SvgOptions, DEFAULT_PIXELS_PER_MM};
pub use transform::CoordinateTransform;
