//! # OpenGL Scene Renderer
//!
//! Uploads an assembled [`Scene`] to the GPU and draws it with the scene's
//! lights, background and fog.

use super::camera::PerspectiveCamera;
use super::mesh_rendering::{MeshMaterial, Primitive, RenderableMesh};
use super::mesh_shaders::{
    LINE_FRAGMENT_SHADER, LINE_VERTEX_SHADER, MESH_FRAGMENT_SHADER, MESH_VERTEX_SHADER,
};
use super::scene::{Fog, Scene};
use crate::error::RenderError;
use glam::{Mat4, Vec3};
use glow::HasContext;
use millview_core::Color;
use tracing::debug;

type Result<T> = std::result::Result<T, RenderError>;

/// OpenGL resources for a single mesh
#[derive(Debug)]
struct MeshGLResources {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    index_count: i32,
    primitive: Primitive,
    material: MeshMaterial,
}

/// Lighting parameters taken from the scene
#[derive(Debug, Clone)]
pub struct LightingParams {
    /// Up to two directional lights: (direction toward the light, color)
    pub directional: [(Vec3, [f32; 3]); 2],
    pub ambient_color: [f32; 3],
    pub background: Color,
    pub fog: Option<Fog>,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            directional: [(Vec3::Y, [0.0; 3]); 2],
            ambient_color: [0.0; 3],
            background: Color::BLACK,
            fog: None,
        }
    }
}

impl LightingParams {
    pub fn from_scene(scene: &Scene) -> Self {
        let mut params = Self {
            ambient_color: scene.ambient_light(),
            background: scene.background,
            fog: Some(scene.fog),
            ..Self::default()
        };
        for (slot, (direction, color)) in params
            .directional
            .iter_mut()
            .zip(scene.directional_lights())
        {
            *slot = (direction, color.to_rgb_f32());
        }
        params
    }
}

/// OpenGL scene renderer
pub struct SceneRenderer {
    gl: glow::Context,
    mesh_program: glow::Program,
    line_program: glow::Program,
    meshes: Vec<MeshGLResources>,
    lighting: LightingParams,
}

impl SceneRenderer {
    /// Compile shaders. Requires a current GL context.
    pub fn new(gl: glow::Context) -> Result<Self> {
        let mesh_program =
            Self::create_shader_program(&gl, MESH_VERTEX_SHADER, MESH_FRAGMENT_SHADER)?;
        let line_program =
            match Self::create_shader_program(&gl, LINE_VERTEX_SHADER, LINE_FRAGMENT_SHADER) {
                Ok(program) => program,
                Err(e) => {
                    unsafe { gl.delete_program(mesh_program) };
                    return Err(e);
                }
            };

        Ok(Self {
            gl,
            mesh_program,
            line_program,
            meshes: Vec::new(),
            lighting: LightingParams::default(),
        })
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Replace all GPU meshes with those of `scene`.
    pub fn upload_scene(&mut self, scene: &Scene) -> Result<()> {
        self.clear_all_meshes();
        self.lighting = LightingParams::from_scene(scene);

        for mesh in scene.build_meshes() {
            if let Some(resources) = self.upload_mesh(&mesh)? {
                self.meshes.push(resources);
            }
        }

        debug!(meshes = self.meshes.len(), "uploaded scene to GPU");
        Ok(())
    }

    fn upload_mesh(&self, mesh: &RenderableMesh) -> Result<Option<MeshGLResources>> {
        if mesh.is_empty() {
            return Ok(None);
        }

        unsafe {
            let vao = self
                .gl
                .create_vertex_array()
                .map_err(RenderError::BufferError)?;
            self.gl.bind_vertex_array(Some(vao));

            let vbo = self.gl.create_buffer().map_err(RenderError::BufferError)?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.vertices),
                glow::STATIC_DRAW,
            );

            let ebo = self.gl.create_buffer().map_err(RenderError::BufferError)?;
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            self.gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.indices),
                glow::STATIC_DRAW,
            );

            // Position (location 0)
            self.gl
                .vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 40, 0);
            self.gl.enable_vertex_attrib_array(0);

            // Normal (location 1)
            self.gl
                .vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, 40, 12);
            self.gl.enable_vertex_attrib_array(1);

            // Color (location 2)
            self.gl
                .vertex_attrib_pointer_f32(2, 4, glow::FLOAT, false, 40, 24);
            self.gl.enable_vertex_attrib_array(2);

            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Some(MeshGLResources {
                vao,
                vbo,
                ebo,
                index_count: mesh.indices.len() as i32,
                primitive: mesh.primitive,
                material: mesh.material,
            }))
        }
    }

    /// Clear to the scene background and draw every uploaded mesh.
    pub fn render(&self, camera: &PerspectiveCamera, width: u32, height: u32) -> Result<()> {
        let view = camera.get_view_matrix();
        let projection = camera.get_projection_matrix();
        let [r, g, b] = self.lighting.background.to_rgb_f32();

        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
            self.gl.clear_color(r, g, b, 1.0);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.depth_func(glow::LEQUAL);

            for resources in &self.meshes {
                let program = match resources.primitive {
                    Primitive::Triangles => self.mesh_program,
                    Primitive::Lines => self.line_program,
                };
                self.gl.use_program(Some(program));
                self.set_uniform_mat4(program, "view_matrix", &view);
                self.set_uniform_mat4(program, "projection_matrix", &projection);
                self.set_fog_uniforms(program, resources.material.fog);

                if resources.primitive == Primitive::Triangles {
                    self.set_material_uniforms(program, &resources.material, camera.position);
                }

                self.gl.bind_vertex_array(Some(resources.vao));
                let mode = match resources.primitive {
                    Primitive::Triangles => glow::TRIANGLES,
                    Primitive::Lines => glow::LINES,
                };
                self.gl
                    .draw_elements(mode, resources.index_count, glow::UNSIGNED_INT, 0);
                self.gl.bind_vertex_array(None);
            }

            self.gl.use_program(None);

            let error = self.gl.get_error();
            if error != glow::NO_ERROR {
                return Err(RenderError::OpenGLError(format!("glGetError 0x{:04x}", error)));
            }
        }

        Ok(())
    }

    /// Clear all meshes
    pub fn clear_all_meshes(&mut self) {
        for resources in std::mem::take(&mut self.meshes) {
            self.cleanup_mesh_resources(&resources);
        }
    }

    fn create_shader_program(
        gl: &glow::Context,
        vs_source: &str,
        fs_source: &str,
    ) -> Result<glow::Program> {
        unsafe {
            let vs = gl
                .create_shader(glow::VERTEX_SHADER)
                .map_err(RenderError::ShaderError)?;
            gl.shader_source(vs, vs_source);
            gl.compile_shader(vs);

            if !gl.get_shader_compile_status(vs) {
                let info = gl.get_shader_info_log(vs);
                gl.delete_shader(vs);
                return Err(RenderError::ShaderError(format!("Vertex shader: {}", info)));
            }

            let fs = gl
                .create_shader(glow::FRAGMENT_SHADER)
                .map_err(RenderError::ShaderError)?;
            gl.shader_source(fs, fs_source);
            gl.compile_shader(fs);

            if !gl.get_shader_compile_status(fs) {
                let info = gl.get_shader_info_log(fs);
                gl.delete_shader(vs);
                gl.delete_shader(fs);
                return Err(RenderError::ShaderError(format!("Fragment shader: {}", info)));
            }

            let program = gl.create_program().map_err(RenderError::ShaderError)?;
            gl.attach_shader(program, vs);
            gl.attach_shader(program, fs);
            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let info = gl.get_program_info_log(program);
                gl.delete_shader(vs);
                gl.delete_shader(fs);
                gl.delete_program(program);
                return Err(RenderError::ShaderError(format!("Program linking: {}", info)));
            }

            gl.delete_shader(vs);
            gl.delete_shader(fs);

            Ok(program)
        }
    }

    fn cleanup_mesh_resources(&self, resources: &MeshGLResources) {
        unsafe {
            self.gl.delete_vertex_array(resources.vao);
            self.gl.delete_buffer(resources.vbo);
            self.gl.delete_buffer(resources.ebo);
        }
    }

    fn set_fog_uniforms(&self, program: glow::Program, enabled: bool) {
        match self.lighting.fog.filter(|_| enabled) {
            Some(fog) => {
                self.set_uniform_bool(program, "fog_enabled", true);
                self.set_uniform_vec3(program, "fog_color", fog.color.to_rgb_f32());
                self.set_uniform_f32(program, "fog_density", fog.density);
            }
            None => self.set_uniform_bool(program, "fog_enabled", false),
        }
    }

    fn set_material_uniforms(&self, program: glow::Program, material: &MeshMaterial, eye: Vec3) {
        self.set_uniform_bool(program, "lit", material.lit);
        self.set_uniform_bool(program, "flat_shading", material.flat_shading);
        self.set_uniform_vec3(program, "material_specular", material.specular_color);
        self.set_uniform_f32(program, "material_shininess", material.shininess.max(1.0));

        let [(dir0, color0), (dir1, color1)] = self.lighting.directional;
        self.set_uniform_vec3(program, "light0_direction", dir0.to_array());
        self.set_uniform_vec3(program, "light0_color", color0);
        self.set_uniform_vec3(program, "light1_direction", dir1.to_array());
        self.set_uniform_vec3(program, "light1_color", color1);
        self.set_uniform_vec3(program, "ambient_color", self.lighting.ambient_color);
        self.set_uniform_vec3(program, "camera_position", eye.to_array());
    }

    fn set_uniform_mat4(&self, program: glow::Program, name: &str, matrix: &Mat4) {
        unsafe {
            if let Some(loc) = self.gl.get_uniform_location(program, name) {
                self.gl
                    .uniform_matrix_4_f32_slice(Some(&loc), false, &matrix.to_cols_array());
            }
        }
    }

    fn set_uniform_vec3(&self, program: glow::Program, name: &str, v: [f32; 3]) {
        unsafe {
            if let Some(loc) = self.gl.get_uniform_location(program, name) {
                self.gl.uniform_3_f32(Some(&loc), v[0], v[1], v[2]);
            }
        }
    }

    fn set_uniform_f32(&self, program: glow::Program, name: &str, value: f32) {
        unsafe {
            if let Some(loc) = self.gl.get_uniform_location(program, name) {
                self.gl.uniform_1_f32(Some(&loc), value);
            }
        }
    }

    fn set_uniform_bool(&self, program: glow::Program, name: &str, value: bool) {
        unsafe {
            if let Some(loc) = self.gl.get_uniform_location(program, name) {
                self.gl.uniform_1_i32(Some(&loc), i32::from(value));
            }
        }
    }
}

impl Drop for SceneRenderer {
    fn drop(&mut self) {
        self.clear_all_meshes();

        unsafe {
            self.gl.delete_program(self.mesh_program);
            self.gl.delete_program(self.line_program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::scene::SceneAssembler;
    use millview_core::ToolDiameter;

    #[test]
    fn test_lighting_from_scene() {
        let (scene, _) = SceneAssembler::default().assemble(&[], ToolDiameter::unchecked(1.0));
        let params = LightingParams::from_scene(&scene);
        let (key_dir, key_color) = params.directional[0];
        assert!(key_dir.abs_diff_eq(Vec3::ONE.normalize(), 1e-6));
        assert_eq!(key_color, [1.0, 1.0, 1.0]);
        let (fill_dir, _) = params.directional[1];
        assert!(fill_dir.abs_diff_eq(-Vec3::ONE.normalize(), 1e-6));
        assert_eq!(params.background, Color::from_hex(0xcccccc));
        assert_eq!(params.fog.map(|f| f.density), Some(0.0005));
    }
}
