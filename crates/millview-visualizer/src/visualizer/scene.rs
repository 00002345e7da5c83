//! # Scene Assembly
//!
//! Builds one complete [`Scene`] per visualization request: path segments,
//! tool marker, axis indicator, fine and coarse grids, lights, background and
//! fog. Scenes are rebuilt wholesale on every request; nothing is patched in
//! place.

use super::camera::PerspectiveCamera;
use super::controls::OrbitControls;
use super::mesh_rendering::{mesh_utils, MeshMaterial, Primitive, RenderableMesh};
use super::segment::{
    DegenerateSegment, SegmentGeometryBuilder, SegmentPrimitive, SEGMENT_RADIAL_SEGMENTS,
};
use super::transform::CoordinateTransform;
use glam::{Mat4, Vec3};
use millview_core::{Color, Move, RenderUnit, ToolDiameter};
use millview_settings::{CameraSettings, Config, ControlSettings, SceneStyle, StylePreset};
use serde::Serialize;
use tracing::{debug, info, warn};

pub const TOOL_MARKER_RADIUS: f32 = 3.0;
pub const TOOL_MARKER_HEIGHT: f32 = 30.0;
pub const TOOL_MARKER_RADIAL_SEGMENTS: u32 = 100;
pub const AXES_SIZE: f32 = 100.0;
pub const FINE_GRID_DIVISIONS: u32 = 100;
pub const COARSE_GRID_DIVISIONS: u32 = 10;
/// Coarse grid cell size in millimeters
pub const COARSE_GRID_CELL_MM: f32 = 10.0;

/// Scene light source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Parallel light shining from `position` toward the origin
    Directional { color: Color, position: Vec3 },
    Ambient { color: Color },
}

impl Light {
    /// Fixed three-light rig: white key, dark blue fill, dim ambient.
    pub fn default_rig() -> [Light; 3] {
        [
            Light::Directional {
                color: Color::WHITE,
                position: Vec3::new(1.0, 1.0, 1.0),
            },
            Light::Directional {
                color: Color::from_hex(0x002288),
                position: Vec3::new(-1.0, -1.0, -1.0),
            },
            Light::Ambient {
                color: Color::from_hex(0x222222),
            },
        ]
    }
}

/// Exponential-squared distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub density: f32,
}

impl Fog {
    /// Fraction of fog color mixed in at `depth` render units from the eye.
    pub fn factor(&self, depth: f32) -> f32 {
        1.0 - (-self.density * self.density * depth * depth).exp()
    }
}

/// Line grid on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Edge length in render units
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color,
    pub line_color: Color,
}

impl Grid {
    pub fn cell_size(&self) -> f32 {
        self.size / self.divisions as f32
    }

    pub fn to_mesh(&self) -> RenderableMesh {
        mesh_utils::create_grid_mesh(self.size, self.divisions, self.center_color, self.line_color)
    }
}

/// Upright cylinder marking the tool position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolMarker {
    pub radius: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub color: Color,
    /// Center of the cylinder
    pub position: Vec3,
}

impl ToolMarker {
    pub fn new(color: Color) -> Self {
        Self {
            radius: TOOL_MARKER_RADIUS,
            height: TOOL_MARKER_HEIGHT,
            radial_segments: TOOL_MARKER_RADIAL_SEGMENTS,
            color,
            // Sits on the ground plane
            position: Vec3::new(0.0, TOOL_MARKER_HEIGHT / 2.0, 0.0),
        }
    }

    pub fn to_mesh(&self) -> RenderableMesh {
        let mut mesh = mesh_utils::create_cylinder_mesh(
            self.radius,
            self.height,
            self.radial_segments,
            self.color,
        )
        .with_material(MeshMaterial::phong_flat());
        mesh.transform(&Mat4::from_translation(self.position));
        mesh
    }
}

/// Axis indicator at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisIndicator {
    pub size: f32,
}

/// Counts and extents of an assembled scene
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SceneStats {
    pub move_count: usize,
    pub segments: usize,
    pub rapid_segments: usize,
    pub milling_segments: usize,
    /// Moves dropped as zero-length or non-finite
    pub skipped_segments: usize,
    /// Render-space extents of the path, if any segment was built
    pub bounds_min: Option<[f32; 3]>,
    pub bounds_max: Option<[f32; 3]>,
}

/// Everything drawn for one visualization request
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Color,
    pub fog: Fog,
    pub segments: Vec<SegmentPrimitive>,
    pub tool_marker: ToolMarker,
    pub axes: AxisIndicator,
    /// Fine grid first, coarse grid second
    pub grids: [Grid; 2],
    pub lights: [Light; 3],
}

impl Scene {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Directional lights as (direction toward the light, color)
    pub fn directional_lights(&self) -> impl Iterator<Item = (Vec3, Color)> + '_ {
        self.lights.iter().filter_map(|light| match *light {
            Light::Directional { color, position } => {
                Some((position.normalize_or_zero(), color))
            }
            Light::Ambient { .. } => None,
        })
    }

    /// Sum of ambient light colors
    pub fn ambient_light(&self) -> [f32; 3] {
        self.lights.iter().fold([0.0; 3], |acc, light| match light {
            Light::Ambient { color } => {
                let c = color.to_rgb_f32();
                [acc[0] + c[0], acc[1] + c[1], acc[2] + c[2]]
            }
            Light::Directional { .. } => acc,
        })
    }

    /// All path segments batched into one unlit triangle mesh.
    pub fn segment_mesh(&self) -> RenderableMesh {
        let unit = mesh_utils::create_unit_cylinder(SEGMENT_RADIAL_SEGMENTS, Color::WHITE);
        let mut batch =
            RenderableMesh::new(Primitive::Triangles).with_material(MeshMaterial::basic());
        for segment in &self.segments {
            let mut mesh = unit.clone();
            mesh.set_color(segment.color());
            mesh.transform(&segment.model_matrix());
            batch.append(&mesh);
        }
        batch
    }

    /// GPU-ready meshes: segments, tool marker, grids, axes.
    pub fn build_meshes(&self) -> Vec<RenderableMesh> {
        let mut meshes = vec![self.segment_mesh(), self.tool_marker.to_mesh()];
        meshes.extend(self.grids.iter().map(Grid::to_mesh));
        meshes.push(mesh_utils::create_axes_mesh(self.axes.size));
        meshes
    }
}

/// Composes scenes, cameras and controls for visualization requests.
#[derive(Debug, Clone)]
pub struct SceneAssembler {
    transform: CoordinateTransform,
    builder: SegmentGeometryBuilder,
    style: SceneStyle,
    camera: CameraSettings,
    controls: ControlSettings,
}

impl Default for SceneAssembler {
    fn default() -> Self {
        Self::new(RenderUnit::DEFAULT, SceneStyle::default())
    }
}

impl SceneAssembler {
    pub fn new(render_unit: RenderUnit, style: SceneStyle) -> Self {
        Self {
            transform: CoordinateTransform::new(render_unit),
            builder: SegmentGeometryBuilder::default(),
            style,
            camera: CameraSettings::default(),
            controls: ControlSettings::default(),
        }
    }

    /// Assembler configured from application settings
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with_preset(config, config.scene.preset)
    }

    pub fn from_config_with_preset(config: &Config, preset: StylePreset) -> Self {
        Self::new(config.scene.render_unit, config.scene.scene_style_for(preset))
            .with_camera_settings(config.camera.clone())
            .with_control_settings(config.controls.clone())
    }

    pub fn with_camera_settings(mut self, camera: CameraSettings) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_control_settings(mut self, controls: ControlSettings) -> Self {
        self.controls = controls;
        self
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    /// Build the scene for a move list.
    ///
    /// Segment `i` joins `moves[i-1]` to `moves[i]` and takes its color from
    /// `moves[i].is_rapid`. Degenerate segments are skipped and counted.
    pub fn assemble(&self, moves: &[Move], tool_diameter: ToolDiameter) -> (Scene, SceneStats) {
        let diameter = tool_diameter.in_render_units(self.transform.scale());
        let mut stats = SceneStats {
            move_count: moves.len(),
            ..SceneStats::default()
        };
        let mut segments = Vec::with_capacity(moves.len().saturating_sub(1));
        let mut bounds: Option<(Vec3, Vec3)> = None;

        for (index, pair) in moves.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            let from = self.transform.to_render(prev);
            let to = self.transform.to_render(next);
            let color = self.style.coloring.color_for(next.is_rapid);

            match self.builder.try_build(from, to, color, diameter) {
                Ok(segment) => {
                    if next.is_rapid {
                        stats.rapid_segments += 1;
                    } else {
                        stats.milling_segments += 1;
                    }
                    bounds = Some(match bounds {
                        Some((min, max)) => (min.min(from).min(to), max.max(from).max(to)),
                        None => (from.min(to), from.max(to)),
                    });
                    segments.push(segment);
                }
                Err(DegenerateSegment::ZeroLength) => {
                    debug!(segment = index + 1, "skipping zero-length segment");
                    stats.skipped_segments += 1;
                }
                Err(DegenerateSegment::NonFinite) => {
                    warn!(segment = index + 1, ?prev, ?next, "skipping segment with non-finite coordinates");
                    stats.skipped_segments += 1;
                }
            }
        }

        stats.segments = segments.len();
        if let Some((min, max)) = bounds {
            stats.bounds_min = Some(min.to_array());
            stats.bounds_max = Some(max.to_array());
        }

        let scene = Scene {
            background: self.style.background,
            fog: Fog {
                color: self.style.background,
                density: self.style.fog_density,
            },
            segments,
            tool_marker: ToolMarker::new(self.style.tool_marker),
            axes: AxisIndicator { size: AXES_SIZE },
            grids: self.grids(),
            lights: Light::default_rig(),
        };

        info!(
            moves = stats.move_count,
            segments = stats.segments,
            rapid = stats.rapid_segments,
            milling = stats.milling_segments,
            skipped = stats.skipped_segments,
            tool_diameter = %tool_diameter,
            "assembled tool path scene"
        );

        (scene, stats)
    }

    fn grids(&self) -> [Grid; 2] {
        let fine_cell = self.transform.length_to_render(1.0);
        let coarse_cell = self.transform.length_to_render(COARSE_GRID_CELL_MM);
        [
            Grid {
                size: fine_cell * FINE_GRID_DIVISIONS as f32,
                divisions: FINE_GRID_DIVISIONS,
                center_color: self.style.fine_grid_center,
                line_color: self.style.fine_grid_line,
            },
            Grid {
                size: coarse_cell * COARSE_GRID_DIVISIONS as f32,
                divisions: COARSE_GRID_DIVISIONS,
                center_color: self.style.coarse_grid,
                line_color: self.style.coarse_grid,
            },
        ]
    }

    /// Camera for a viewport of the given size, looking at the origin.
    pub fn camera(&self, width: u32, height: u32) -> PerspectiveCamera {
        let aspect = PerspectiveCamera::aspect_for(width, height).unwrap_or(1.0);
        PerspectiveCamera::from_settings(&self.camera, aspect)
    }

    pub fn controls(&self) -> OrbitControls {
        OrbitControls::new(self.controls.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diameter(mm: f32) -> ToolDiameter {
        ToolDiameter::unchecked(mm)
    }

    #[test]
    fn test_fixed_scene_content() {
        let (scene, stats) = SceneAssembler::default().assemble(&[], diameter(1.0));
        assert_eq!(stats.segments, 0);
        assert_eq!(stats.bounds_min, None);
        assert_eq!(scene.background, Color::from_hex(0xcccccc));
        assert_eq!(scene.fog.density, 0.0005);
        assert_eq!(scene.axes.size, 100.0);
        assert_eq!(scene.tool_marker.position, Vec3::new(0.0, 15.0, 0.0));
        assert_eq!(scene.grids[0].size, 1000.0);
        assert_eq!(scene.grids[0].cell_size(), 10.0);
        assert_eq!(scene.grids[1].cell_size(), 100.0);
        assert_eq!(scene.grids[1].line_color, Color::RED);
        assert_eq!(scene.directional_lights().count(), 2);
        let ambient = scene.ambient_light();
        assert!((ambient[0] - 0x22 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_move_has_no_segments() {
        let (scene, stats) =
            SceneAssembler::default().assemble(&[Move::rapid(1.0, 2.0, 3.0)], diameter(1.0));
        assert_eq!(scene.segment_count(), 0);
        assert_eq!(stats.skipped_segments, 0);
    }

    #[test]
    fn test_legacy_style_is_uniform() {
        let moves = [
            Move::milling(0.0, 0.0, 0.0),
            Move::rapid(1.0, 0.0, 0.0),
            Move::milling(1.0, 1.0, 0.0),
        ];
        let (scene, _) = SceneAssembler::new(RenderUnit::DEFAULT, SceneStyle::legacy())
            .assemble(&moves, diameter(1.0));
        assert!(scene.segments.iter().all(|s| s.color() == Color::RED));
    }

    #[test]
    fn test_degenerate_and_non_finite_skipped() {
        let moves = [
            Move::milling(0.0, 0.0, 0.0),
            Move::milling(0.0, 0.0, 0.0),
            Move::milling(f32::NAN, 0.0, 0.0),
            Move::milling(5.0, 0.0, 0.0),
            Move::rapid(5.0, 5.0, 0.0),
        ];
        let (scene, stats) = SceneAssembler::default().assemble(&moves, diameter(1.0));
        assert_eq!(stats.skipped_segments, 3);
        assert_eq!(scene.segment_count(), 1);
        assert_eq!(stats.segments + stats.skipped_segments, moves.len() - 1);
        assert!(scene.segments.iter().all(|s| s.length() > 0.0));
    }

    #[test]
    fn test_bounds_and_counts() {
        let moves = [
            Move::milling(0.0, 0.0, 0.0),
            Move::milling(10.0, 0.0, 0.0),
            Move::rapid(10.0, 0.0, 5.0),
        ];
        let (_, stats) = SceneAssembler::default().assemble(&moves, diameter(2.0));
        assert_eq!((stats.rapid_segments, stats.milling_segments), (1, 1));
        assert_eq!(stats.bounds_min, Some([0.0, 0.0, 0.0]));
        assert_eq!(stats.bounds_max, Some([100.0, 50.0, 0.0]));
    }

    #[test]
    fn test_meshes() {
        let moves = [Move::milling(0.0, 0.0, 0.0), Move::milling(10.0, 0.0, 0.0)];
        let (scene, _) = SceneAssembler::default().assemble(&moves, diameter(2.0));
        let meshes = scene.build_meshes();
        assert_eq!(meshes.len(), 5);
        assert_eq!(meshes[0].triangle_count(), 4 * SEGMENT_RADIAL_SEGMENTS as usize);
        assert!(!meshes[0].material.lit);
        assert!(meshes[1].material.lit && meshes[1].material.flat_shading);
        assert_eq!(meshes[2].line_count(), 2 * 101);
        assert_eq!(meshes[4].line_count(), 3);
    }

    #[test]
    fn test_fog_factor() {
        let fog = Fog {
            color: Color::WHITE,
            density: 0.0005,
        };
        assert_eq!(fog.factor(0.0), 0.0);
        assert!(fog.factor(400.0) < 0.05);
        assert!(fog.factor(10000.0) > 0.99);
    }
}
