mod controller;
mod state;

pub use controller::CameraController;
pub use state::{Camera, Movement};
