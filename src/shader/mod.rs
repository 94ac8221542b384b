//! Shader program ownership and the GLSL sources the demo ships with.

mod program;

pub use program::ShaderProgram;

pub mod sources {
    pub const SCENE_VERTEX: &str = include_str!("glsl/scene.vert");
    pub const SCENE_FRAGMENT: &str = include_str!("glsl/scene.frag");
    pub const LIGHT_VERTEX: &str = include_str!("glsl/light.vert");
    pub const LIGHT_FRAGMENT: &str = include_str!("glsl/light.frag");
    pub const HUD_VERTEX: &str = include_str!("glsl/hud.vert");
    pub const HUD_FRAGMENT: &str = include_str!("glsl/hud.frag");
}
