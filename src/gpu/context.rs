use std::num::NonZeroU32;

use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorGrabMode, Window};

use crate::error::{FreecamError, Result};
use crate::settings::WindowSettings;

/// A winit window with a current OpenGL 3.3 core context bound to it.
pub struct GlWindow {
    pub window: Window,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
}

impl GlWindow {
    /// Opens the window, makes its context current and loads the GL functions.
    pub fn new(
        event_loop: &ActiveEventLoop,
        settings: &WindowSettings,
    ) -> Result<(Self, glow::Context)> {
        let window_attrs = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                settings.width as f64,
                settings.height as f64,
            ));

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attrs))
            .build(event_loop, template, |configs| {
                // DisplayBuilder::build returns find_configs' BadConfig error
                // before calling the picker when no config matches the
                // template, so the iterator here always yields at least one.
                configs
                    .reduce(|best, config| {
                        if config.num_samples() > best.num_samples() {
                            config
                        } else {
                            best
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| FreecamError::Window(e.to_string()))?;
        let window =
            window.ok_or_else(|| FreecamError::Window("display builder made no window".into()))?;

        let raw_handle = window.window_handle()?.as_raw();
        let display = config.display();
        let context_attrs = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_handle));
        let not_current = unsafe { display.create_context(&config, &context_attrs)? };

        let surface_attrs = window.build_surface_attributes(Default::default())?;
        let surface = unsafe { display.create_window_surface(&config, &surface_attrs)? };
        let context = not_current.make_current(&surface)?;

        if settings.vsync {
            if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                log::warn!("could not enable vsync: {e}");
            }
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| {
                display.get_proc_address(symbol) as *const _
            })
        };
        log::info!(
            "created {}x{} window with an OpenGL 3.3 core context",
            settings.width,
            settings.height
        );

        Ok((
            Self {
                window,
                surface,
                context,
            },
            gl,
        ))
    }

    /// Locks and hides the cursor so raw motion drives the camera.
    pub fn grab_cursor(&self) {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            log::warn!("cursor grab unavailable: {e}");
        }
        self.window.set_cursor_visible(false);
    }

    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Zero-sized (minimized) windows keep their old surface size.
    pub fn resize(&self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
        }
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }
}
