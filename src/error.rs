use std::path::PathBuf;

use crate::gpu::ShaderStage;

pub type Result<T> = std::result::Result<T, FreecamError>;

#[derive(Debug, thiserror::Error)]
pub enum FreecamError {
    #[allow(dead_code)]
    #[error("unsupported shader stage 0x{0:04x}")]
    UnsupportedShaderStage(u32),

    #[error("{stage} shader source is empty")]
    EmptyShaderSource { stage: ShaderStage },

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {0}")]
    ShaderLink(String),

    /// A shader was added after the last successful link.
    #[error("shader program used before its shaders were linked")]
    ProgramNotLinked,

    #[error("gpu resource creation failed: {0}")]
    Gpu(String),

    #[error("could not read texture image {}", path.display())]
    TextureDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("obj parse error at line {line}: {message}")]
    ObjParse { line: usize, message: String },

    #[error("mesh {0} has no vertices or no faces")]
    EmptyMesh(String),

    #[error("hud start direction {0:?} is not a unit vector along X or Z")]
    HudDirectionNotAxisAligned([f32; 3]),

    #[error("hud is already calibrated")]
    HudAlreadyCalibrated,

    #[error("hud drawn before calibration")]
    HudNotCalibrated,

    #[error("window creation failed: {0}")]
    Window(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Glutin(#[from] glutin::error::Error),

    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl FreecamError {
    pub fn obj(line: usize, message: impl ToString) -> Self {
        FreecamError::ObjParse {
            line,
            message: message.to_string(),
        }
    }
}

impl From<raw_window_handle::HandleError> for FreecamError {
    fn from(err: raw_window_handle::HandleError) -> Self {
        FreecamError::Window(err.to_string())
    }
}
