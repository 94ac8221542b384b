use anyhow::Context;
use winit::event_loop::{ControlFlow, EventLoop};

mod app;
mod camera;
mod error;
mod gpu;
mod hud;
mod mesh;
mod renderer;
mod settings;
mod shader;
mod texture;

use app::AppHandler;
use settings::Settings;

pub const CONFY_APP_NAME: &str = "freecam-rs";

fn init_logging() {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filter) => {
            builder.parse_filters(&filter);
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Info);
        }
    }
    builder.init();
}

/// Runs the event loop until the window closes or a fatal error stops it.
fn run(settings: Settings) -> error::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = AppHandler::new(settings);
    event_loop.run_app(&mut handler)?;

    match handler.take_error() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let settings = Settings::load();
    log::debug!("loaded settings: {settings:?}");

    run(settings).context("freecam-rs shut down after an error")
}
