use crate::mask::TextMask;
use crate::rng::{CoherentNoise, SeededRandom};
use crate::surface::{Rgba, Surface};

pub const PLACEMENT_ATTEMPTS: usize = 1000;
const JITTER_RATE: f64 = 10.0;
const AXIS_OFFSET: f64 = 500.0;

/// A particle pinned inside the text, shimmering around a fixed home.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParticle {
    pub home_x: f64,
    pub home_y: f64,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub noise_offset: f64,
}

impl TextParticle {
    /// Rejection-sample a home inside the mask, falling back to the canvas
    /// center. With no raster backend the center is used without sampling.
    pub fn spawn(rng: &mut SeededRandom, mask: &TextMask, width: f64, height: f64) -> Self {
        let center = (width / 2.0, height / 2.0);
        let (home_x, home_y) = if mask.is_available() {
            (0..PLACEMENT_ATTEMPTS)
                .map(|_| (rng.random(width), rng.random(height)))
                .find(|&(x, y)| mask.is_inside(x, y))
                .unwrap_or(center)
        } else {
            center
        };
        let size = rng.range(2.0, 4.0);
        let noise_offset = rng.random(1000.0);
        Self {
            home_x,
            home_y,
            x: home_x,
            y: home_y,
            size,
            noise_offset,
        }
    }

    /// Position is recomputed from home every frame, never integrated.
    pub fn update(&mut self, noise: &CoherentNoise, clock: f64, jitter: f64) {
        let phase = clock * JITTER_RATE;
        let jitter_x = noise.sample(self.noise_offset + phase) * 2.0 - 1.0;
        let jitter_y = noise.sample(self.noise_offset + AXIS_OFFSET + phase) * 2.0 - 1.0;
        self.x = self.home_x + jitter_x * jitter;
        self.y = self.home_y + jitter_y * jitter;
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.x, self.y, self.size, Rgba::WHITE);
    }
}
