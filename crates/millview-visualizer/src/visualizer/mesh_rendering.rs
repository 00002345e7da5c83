//! # Mesh Data
//!
//! CPU-side mesh buffers for the scene: cylinders for path segments and the
//! tool marker, line meshes for grids and the axis indicator.

use glam::{Mat4, Vec3};
use millview_core::Color;

/// Floats per vertex: position (3), normal (3), color (4)
pub const FLOATS_PER_VERTEX: usize = 10;

/// How a mesh is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    Lines,
}

/// Material properties for mesh rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshMaterial {
    /// Participates in scene lighting; unlit meshes show their vertex color as is
    pub lit: bool,
    /// Use per-face normals instead of the interpolated vertex normals
    pub flat_shading: bool,
    /// Specular color (RGB)
    pub specular_color: [f32; 3],
    /// Shininess factor
    pub shininess: f32,
    /// Affected by scene fog
    pub fog: bool,
}

impl Default for MeshMaterial {
    fn default() -> Self {
        Self::basic()
    }
}

impl MeshMaterial {
    /// Unlit vertex colors
    pub fn basic() -> Self {
        Self {
            lit: false,
            flat_shading: false,
            specular_color: [0.0; 3],
            shininess: 0.0,
            fog: true,
        }
    }

    /// Lit, faceted Phong material
    pub fn phong_flat() -> Self {
        Self {
            lit: true,
            flat_shading: true,
            specular_color: [0.067, 0.067, 0.067],
            shininess: 30.0,
            fog: true,
        }
    }
}

/// A renderable mesh
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableMesh {
    /// Vertex data: [x, y, z, nx, ny, nz, r, g, b, a] per vertex
    pub vertices: Vec<f32>,
    /// Index data for triangles or line pairs
    pub indices: Vec<u32>,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub primitive: Primitive,
    pub material: MeshMaterial,
}

impl RenderableMesh {
    /// Create a new empty mesh
    pub fn new(primitive: Primitive) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            bounds_min: Vec3::ZERO,
            bounds_max: Vec3::ZERO,
            primitive,
            material: MeshMaterial::default(),
        }
    }

    /// Set material properties
    pub fn with_material(mut self, material: MeshMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn triangle_count(&self) -> usize {
        match self.primitive {
            Primitive::Triangles => self.indices.len() / 3,
            Primitive::Lines => 0,
        }
    }

    pub fn line_count(&self) -> usize {
        match self.primitive {
            Primitive::Lines => self.indices.len() / 2,
            Primitive::Triangles => 0,
        }
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Get bounds as (min, max) Vec3 tuple
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.bounds_min, self.bounds_max)
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3, color: [f32; 4]) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&[
            position.x, position.y, position.z, normal.x, normal.y, normal.z, color[0], color[1],
            color[2], color[3],
        ]);
        index
    }

    /// Set every vertex color
    pub fn set_color(&mut self, color: Color) {
        let rgba = color.to_rgba_f32(1.0);
        for chunk in self.vertices.chunks_mut(FLOATS_PER_VERTEX) {
            chunk[6..10].copy_from_slice(&rgba);
        }
    }

    /// Transform mesh vertices by a matrix
    pub fn transform(&mut self, transform: &Mat4) {
        let normal_matrix = transform.inverse().transpose();

        for chunk in self.vertices.chunks_mut(FLOATS_PER_VERTEX) {
            let pos = transform.transform_point3(Vec3::new(chunk[0], chunk[1], chunk[2]));
            chunk[0..3].copy_from_slice(&pos.to_array());

            let normal = normal_matrix
                .transform_vector3(Vec3::new(chunk[3], chunk[4], chunk[5]))
                .normalize_or_zero();
            chunk[3..6].copy_from_slice(&normal.to_array());
        }

        self.recompute_bounds();
    }

    /// Append another mesh of the same primitive type
    pub fn append(&mut self, other: &RenderableMesh) {
        let was_empty = self.vertices.is_empty();
        let base = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));

        if was_empty {
            self.bounds_min = other.bounds_min;
            self.bounds_max = other.bounds_max;
        } else if !other.vertices.is_empty() {
            self.bounds_min = self.bounds_min.min(other.bounds_min);
            self.bounds_max = self.bounds_max.max(other.bounds_max);
        }
    }

    fn recompute_bounds(&mut self) {
        let mut min_pos = Vec3::splat(f32::MAX);
        let mut max_pos = Vec3::splat(f32::MIN);

        for chunk in self.vertices.chunks(FLOATS_PER_VERTEX) {
            let pos = Vec3::new(chunk[0], chunk[1], chunk[2]);
            min_pos = min_pos.min(pos);
            max_pos = max_pos.max(pos);
        }

        if self.vertices.is_empty() {
            min_pos = Vec3::ZERO;
            max_pos = Vec3::ZERO;
        }
        self.bounds_min = min_pos;
        self.bounds_max = max_pos;
    }
}

/// Utility functions for mesh generation
pub mod mesh_utils {
    use super::*;
    use std::f32::consts::TAU;

    /// Closed cylinder centred on the origin along +Y.
    ///
    /// Side vertices carry smooth radial normals; the caps carry ±Y normals.
    pub fn create_cylinder_mesh(
        radius: f32,
        height: f32,
        radial_segments: u32,
        color: Color,
    ) -> RenderableMesh {
        let mut mesh = RenderableMesh::new(Primitive::Triangles);
        let rgba = color.to_rgba_f32(1.0);
        let segments = radial_segments.max(3);
        let half = height * 0.5;

        // Side: a ring of (top, bottom) vertex pairs, first column repeated to close the seam
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            let normal = Vec3::new(sin, 0.0, cos);
            mesh.push_vertex(Vec3::new(radius * sin, half, radius * cos), normal, rgba);
            mesh.push_vertex(Vec3::new(radius * sin, -half, radius * cos), normal, rgba);
        }
        for i in 0..segments {
            let top = i * 2;
            let bottom = top + 1;
            let next_top = top + 2;
            let next_bottom = top + 3;
            mesh.indices
                .extend_from_slice(&[top, bottom, next_top, bottom, next_bottom, next_top]);
        }

        // Caps
        for (y, normal) in [(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
            let center = mesh.push_vertex(Vec3::new(0.0, y, 0.0), normal, rgba);
            let first = center + 1;
            for i in 0..=segments {
                let theta = i as f32 / segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                mesh.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal, rgba);
            }
            for i in 0..segments {
                if normal.y > 0.0 {
                    mesh.indices
                        .extend_from_slice(&[center, first + i, first + i + 1]);
                } else {
                    mesh.indices
                        .extend_from_slice(&[center, first + i + 1, first + i]);
                }
            }
        }

        mesh.bounds_min = Vec3::new(-radius.abs(), -half.abs(), -radius.abs());
        mesh.bounds_max = Vec3::new(radius.abs(), half.abs(), radius.abs());
        mesh
    }

    /// Unit cylinder used for path segments (height 1, radius 1)
    pub fn create_unit_cylinder(radial_segments: u32, color: Color) -> RenderableMesh {
        create_cylinder_mesh(1.0, 1.0, radial_segments, color)
    }

    /// Square grid on the XZ plane, centred on the origin.
    ///
    /// The two center lines use `center_color`, all other lines `line_color`.
    pub fn create_grid_mesh(
        size: f32,
        divisions: u32,
        center_color: Color,
        line_color: Color,
    ) -> RenderableMesh {
        let mut mesh = RenderableMesh::new(Primitive::Lines);
        let divisions = divisions.max(1);
        let step = size / divisions as f32;
        let half_size = size * 0.5;
        let center = divisions / 2;

        for i in 0..=divisions {
            let k = -half_size + i as f32 * step;
            let rgba = if i == center {
                center_color.to_rgba_f32(1.0)
            } else {
                line_color.to_rgba_f32(1.0)
            };

            let a = mesh.push_vertex(Vec3::new(-half_size, 0.0, k), Vec3::Y, rgba);
            let b = mesh.push_vertex(Vec3::new(half_size, 0.0, k), Vec3::Y, rgba);
            let c = mesh.push_vertex(Vec3::new(k, 0.0, -half_size), Vec3::Y, rgba);
            let d = mesh.push_vertex(Vec3::new(k, 0.0, half_size), Vec3::Y, rgba);
            mesh.indices.extend_from_slice(&[a, b, c, d]);
        }

        mesh.bounds_min = Vec3::new(-half_size, 0.0, -half_size);
        mesh.bounds_max = Vec3::new(half_size, 0.0, half_size);
        mesh
    }

    /// Coordinate axes from the origin: X red, Y green, Z blue
    pub fn create_axes_mesh(length: f32) -> RenderableMesh {
        let mut mesh = RenderableMesh::new(Primitive::Lines);
        let axes = [
            (Vec3::X, Color::RED),
            (Vec3::Y, Color::GREEN),
            (Vec3::Z, Color::BLUE),
        ];

        for (axis, color) in axes {
            let rgba = color.to_rgba_f32(1.0);
            let a = mesh.push_vertex(Vec3::ZERO, Vec3::Y, rgba);
            let b = mesh.push_vertex(axis * length, Vec3::Y, rgba);
            mesh.indices.extend_from_slice(&[a, b]);
        }

        mesh.bounds_min = Vec3::ZERO;
        mesh.bounds_max = Vec3::splat(length);
        mesh
    }
}
