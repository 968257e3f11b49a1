//! Background particles: magnetic attraction to the letters, repulsion from
//! the text itself, a sweeping wave pulse, damped integration and edge wrap.

use super::FieldEnv;
use crate::mask::{LetterBound, MaskSample};
use crate::rng::SeededRandom;
use crate::surface::{Rgba, Surface};

pub const DAMPING: f64 = 0.85;
pub const MAX_ATTRACTION: f64 = 2.0;
pub const REPULSION: f64 = 0.5;
pub const WAVE_REACH: f64 = 100.0;
pub const WAVE_STEP: u64 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct MagneticParticle {
    pub home_x: f64,
    pub home_y: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub alpha: f64,
    pub noise_offset_x: f64,
    pub noise_offset_y: f64,
}

impl MagneticParticle {
    /// Draw order of the random calls is part of the seeded layout.
    pub fn spawn(rng: &mut SeededRandom, width: f64, height: f64) -> Self {
        let home_x = rng.random(width);
        let home_y = rng.random(height);
        let size = rng.range(1.0, 3.0);
        let alpha = rng.range(100.0, 255.0);
        let noise_offset_x = rng.random(1000.0);
        let noise_offset_y = rng.random(1000.0);
        Self {
            home_x,
            home_y,
            x: home_x,
            y: home_y,
            vx: 0.0,
            vy: 0.0,
            size,
            alpha,
            noise_offset_x,
            noise_offset_y,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    pub fn apply_magnetic_force(&mut self, env: &FieldEnv<'_>, strength: f64) {
        let Some(target) = nearest_bound(env.bounds, self.x, self.y) else {
            return;
        };
        match env.mask.sample(self.x, self.y) {
            MaskSample::Unavailable => {}
            MaskSample::Outside => {
                let dx = target.x - self.x;
                let dy = target.y - self.y;
                let distance = dx.hypot(dy);
                if distance > 0.0 {
                    let angle = dy.atan2(dx);
                    let magnitude = magnetic_force_magnitude(strength, distance, angle, env.clock);
                    self.vx += dx / distance * magnitude;
                    self.vy += dy / distance * magnitude;
                }
            }
            MaskSample::Inside => {
                let dx = self.x - target.x;
                let dy = self.y - target.y;
                let distance = dx.hypot(dy);
                if distance > 0.0 {
                    self.vx += dx / distance * REPULSION;
                    self.vy += dy / distance * REPULSION;
                }
            }
        }
    }

    pub fn apply_wave_force(&mut self, env: &FieldEnv<'_>, amplitude: f64) {
        let wave_x = (env.frame.wrapping_mul(WAVE_STEP) as f64).rem_euclid(env.width);
        let dist_to_wave = (self.x - wave_x).abs();
        if dist_to_wave < WAVE_REACH {
            let falloff = 1.0 - dist_to_wave / WAVE_REACH;
            let push = amplitude * falloff * (self.y * 0.05 + env.clock * 5.0).sin();
            self.vx += push * 0.1;
        }
    }

    pub fn integrate(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;
        self.vx *= DAMPING;
        self.vy *= DAMPING;
        self.x = wrap(self.x, width);
        self.y = wrap(self.y, height);
    }

    /// Force accumulation order matters: magnetic, wave, then integrate.
    pub fn update(&mut self, env: &FieldEnv<'_>, strength: f64, amplitude: f64) {
        self.apply_magnetic_force(env, strength);
        self.apply_wave_force(env, amplitude);
        self.integrate(env.width, env.height);
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let color = Rgba::WHITE.with_alpha(self.alpha as u8);
        surface.fill_circle(self.x, self.y, self.size, color);
    }
}

/// Linear scan; ties keep the first bound found.
pub fn nearest_bound(bounds: &[LetterBound], x: f64, y: f64) -> Option<&LetterBound> {
    let mut closest = None;
    let mut min_dist = f64::INFINITY;
    for bound in bounds {
        let d = (bound.x - x).hypot(bound.y - y);
        if d < min_dist {
            min_dist = d;
            closest = Some(bound);
        }
    }
    closest
}

/// Attraction magnitude of the three-lobed, clock-rotated field, clamped to
/// `[0, MAX_ATTRACTION]`.
pub fn magnetic_force_magnitude(strength: f64, distance: f64, angle: f64, clock: f64) -> f64 {
    let elliptical = 1.0 + 0.3 * (angle * 3.0 + clock).sin();
    let magnitude = strength / (distance * 0.01) * elliptical;
    if magnitude.is_nan() {
        return 0.0;
    }
    magnitude.clamp(0.0, MAX_ATTRACTION)
}

/// Teleport across an edge: below zero lands on the far edge, at or past the
/// extent lands on zero. The result always lies in `[0, extent)`.
pub fn wrap(v: f64, extent: f64) -> f64 {
    if v < 0.0 {
        below(extent)
    } else if v >= extent {
        0.0
    } else {
        v
    }
}

// Largest f64 strictly below a positive extent.
fn below(extent: f64) -> f64 {
    if extent > 0.0 && extent.is_finite() {
        f64::from_bits(extent.to_bits() - 1)
    } else {
        0.0
    }
}
