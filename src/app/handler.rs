use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use super::app::App;
use crate::error::FreecamError;
use crate::settings::Settings;

pub struct AppHandler {
    app: Option<App>,
    settings: Settings,
    error: Option<FreecamError>,
}

impl AppHandler {
    pub fn new(settings: Settings) -> Self {
        Self {
            app: None,
            settings,
            error: None,
        }
    }

    /// The error that stopped the loop, if any
    pub fn take_error(&mut self) -> Option<FreecamError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: FreecamError) {
        log::error!("{error}");
        self.error = Some(error);
        // drop GL resources before the loop tears the window down
        self.app = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() || self.error.is_some() {
            return;
        }
        match App::new(event_loop, &self.settings) {
            Ok(app) => self.app = Some(app),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(app) = &mut self.app {
            let response = app.handle_event(&event);
            if response.exit {
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let (Some(app), DeviceEvent::MouseMotion { delta }) = (&mut self.app, event) {
            app.on_mouse_motion(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(app) = &mut self.app else {
            return;
        };
        match app.render() {
            Ok(response) if response.exit => event_loop.exit(),
            Ok(_) => {}
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.app = None;
        // first run writes the defaults so they can be edited
        self.settings.save();
    }
}
