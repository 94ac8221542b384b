use std::path::PathBuf;

use crate::CONFY_APP_NAME;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "My OpenGL Window".to_string(),
            vsync: true,
        }
    }
}

impl WindowSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "window").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "window", self);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    pub position: [f32; 3],
    /// Must point exactly along one of +X, -X, +Z or -Z so the HUD can calibrate.
    pub direction: [f32; 3],
    pub speed: f32,
    pub sensitivity: f32,
    pub zoom: f32,
    pub fps_movement: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.5, 0.5, 6.0],
            direction: [0.0, 0.0, -1.0],
            speed: 3.0,
            sensitivity: 0.1,
            zoom: 45.0,
            fps_movement: false,
        }
    }
}

impl CameraSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "camera").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "camera", self);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSettings {
    pub primary_texture: PathBuf,
    pub secondary_texture: PathBuf,
    pub light_position: [f32; 3],
    pub light_color: [f32; 3],
    pub object_color: [f32; 3],
    pub mix_factor: f32,
    pub clear_color: [f32; 3],
    pub cube_positions: Vec<[f32; 3]>,
    pub hud_arrow_obj: Option<PathBuf>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            primary_texture: PathBuf::from("assets/container.jpg"),
            secondary_texture: PathBuf::from("assets/awesomeface.png"),
            light_position: [1.2, 1.0, 2.0],
            light_color: [1.0, 1.0, 1.0],
            object_color: [1.0, 1.0, 1.0],
            mix_factor: 0.2,
            clear_color: [0.1, 0.1, 0.1],
            cube_positions: vec![
                [0.0, 0.0, 0.0],
                [2.0, 5.0, -15.0],
                [-1.5, -2.2, -2.5],
                [-3.8, -2.0, -12.3],
                [2.4, -0.4, -3.5],
                [-1.7, 3.0, -7.5],
                [1.3, -2.0, -2.5],
                [1.5, 2.0, -2.5],
                [1.5, 0.2, -1.5],
                [-1.3, 1.0, -1.5],
            ],
            hud_arrow_obj: None,
        }
    }
}

impl SceneSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "scene").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "scene", self);
    }
}

// Aggregate struct for convenience
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub scene: SceneSettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            window: WindowSettings::load(),
            camera: CameraSettings::load(),
            scene: SceneSettings::load(),
        }
    }

    /// Writes every section back, creating the config files on first run.
    pub fn save(&self) {
        self.window.save();
        self.camera.save();
        self.scene.save();
    }
}
