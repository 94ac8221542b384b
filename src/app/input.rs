use std::time::Instant;

use winit::keyboard::KeyCode;

pub const MIX_STEP: f32 = 0.01;

/// Per-frame keys that are not camera movement: the texture mix and quitting.
#[derive(Debug, Clone)]
pub struct FrameInput {
    mix: f32,
    raise_mix: bool,
    lower_mix: bool,
    quit: bool,
}

impl FrameInput {
    pub fn new(mix: f32) -> Self {
        Self {
            mix: mix.clamp(0.0, 1.0),
            raise_mix: false,
            lower_mix: false,
            quit: false,
        }
    }

    pub fn on_key(&mut self, code: KeyCode, pressed: bool) -> bool {
        match code {
            KeyCode::ArrowUp => self.raise_mix = pressed,
            KeyCode::ArrowDown => self.lower_mix = pressed,
            KeyCode::Space | KeyCode::Escape => self.quit |= pressed,
            _ => return false,
        }
        true
    }

    /// Applies one frame of held keys. Returns true when the app should quit,
    /// in which case the mix is left alone.
    pub fn update(&mut self) -> bool {
        if self.quit {
            return true;
        }
        if self.raise_mix {
            self.mix = (self.mix + MIX_STEP).min(1.0);
        } else if self.lower_mix {
            self.mix = (self.mix - MIX_STEP).max(0.0);
        }
        false
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    pub fn release_all(&mut self) {
        self.raise_mix = false;
        self.lower_mix = false;
    }
}

/// Seconds between frames, from a monotonic clock
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// The first tick yields zero.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        dt
    }
}
