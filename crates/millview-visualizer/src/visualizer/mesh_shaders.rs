//! # OpenGL Shaders for Scene Rendering
//!
//! Mesh shader (unlit or Phong-lit triangles) and line shader, both with
//! exponential-squared fog.

pub const MESH_VERTEX_SHADER: &str = r#"
#version 330 core

layout (location = 0) in vec3 position;
layout (location = 1) in vec3 normal;
layout (location = 2) in vec4 color;

uniform mat4 view_matrix;
uniform mat4 projection_matrix;

out vec3 frag_position;
out vec3 frag_normal;
out vec4 frag_color;
out float fog_depth;

void main() {
    vec4 view_position = view_matrix * vec4(position, 1.0);
    gl_Position = projection_matrix * view_position;

    // Meshes are baked in world space
    frag_position = position;
    frag_normal = normal;
    frag_color = color;
    fog_depth = -view_position.z;
}
"#;

pub const MESH_FRAGMENT_SHADER: &str = r#"
#version 330 core

in vec3 frag_position;
in vec3 frag_normal;
in vec4 frag_color;
in float fog_depth;

// Two directional lights plus ambient
uniform vec3 light0_direction;
uniform vec3 light0_color;
uniform vec3 light1_direction;
uniform vec3 light1_color;
uniform vec3 ambient_color;
uniform vec3 camera_position;

uniform bool lit;
uniform bool flat_shading;
uniform vec3 material_specular;
uniform float material_shininess;

uniform bool fog_enabled;
uniform vec3 fog_color;
uniform float fog_density;

out vec4 FragColor;

vec3 directional(vec3 normal, vec3 view_dir, vec3 light_dir, vec3 light_color) {
    float diff = max(dot(normal, light_dir), 0.0);
    vec3 halfway_dir = normalize(light_dir + view_dir);
    float spec = pow(max(dot(normal, halfway_dir), 0.0), material_shininess);
    return diff * light_color * frag_color.rgb + spec * light_color * material_specular;
}

void main() {
    vec3 color = frag_color.rgb;

    if (lit) {
        vec3 normal = flat_shading
            ? normalize(cross(dFdx(frag_position), dFdy(frag_position)))
            : normalize(frag_normal);
        vec3 view_dir = normalize(camera_position - frag_position);

        color = ambient_color * frag_color.rgb
            + directional(normal, view_dir, normalize(light0_direction), light0_color)
            + directional(normal, view_dir, normalize(light1_direction), light1_color);
    }

    if (fog_enabled) {
        float fog_factor = 1.0 - exp(-fog_density * fog_density * fog_depth * fog_depth);
        color = mix(color, fog_color, clamp(fog_factor, 0.0, 1.0));
    }

    FragColor = vec4(color, frag_color.a);
}
"#;

pub const LINE_VERTEX_SHADER: &str = r#"
#version 330 core

layout (location = 0) in vec3 position;
layout (location = 1) in vec3 normal;
layout (location = 2) in vec4 color;

uniform mat4 view_matrix;
uniform mat4 projection_matrix;

out vec4 frag_color;
out float fog_depth;

void main() {
    vec4 view_position = view_matrix * vec4(position, 1.0);
    gl_Position = projection_matrix * view_position;
    frag_color = color;
    fog_depth = -view_position.z;
}
"#;

pub const LINE_FRAGMENT_SHADER: &str = r#"
#version 330 core

in vec4 frag_color;
in float fog_depth;

uniform bool fog_enabled;
uniform vec3 fog_color;
uniform float fog_density;

out vec4 FragColor;

void main() {
    vec3 color = frag_color.rgb;
    if (fog_enabled) {
        float fog_factor = 1.0 - exp(-fog_density * fog_density * fog_depth * fog_depth);
        color = mix(color, fog_color, clamp(fog_factor, 0.0, 1.0));
    }
    FragColor = vec4(color, frag_color.a);
}
"#;
