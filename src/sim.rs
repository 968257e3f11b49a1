//! Simulation context: parameters, clock, and the two particle fields.
//!
//! Lifecycle is `new` -> `reinitialize` -> repeated `step`. Structural changes
//! (particle count, seed, reset) rebuild every array from scratch so particles
//! from different seeds or mask generations never coexist.

use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::mask::{LetterBound, MaskRasterizer, TextData, TextLayout, TextMask};
use crate::params::{
    parse_seed_entry, ParamKey, Params, Rebuild, SEED_MAX, TEXT_PARTICLE_COUNT,
};
use crate::particles::{FieldEnv, MagneticParticle, TextParticle};
use crate::rng::{self, CoherentNoise};
use crate::surface::{Rgba, Surface};

/// Everything rebuilt by one reinitialization.
#[derive(Debug)]
pub struct Fields {
    pub mask: TextMask,
    pub bounds: Vec<LetterBound>,
    pub background: Vec<MagneticParticle>,
    pub text: Vec<TextParticle>,
    noise: CoherentNoise,
}

#[derive(Debug, Default)]
pub enum FieldState {
    #[default]
    Uninitialized,
    Running(Fields),
}

/// Outcome of a seed control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedChange {
    Applied(u32),
    /// Input rejected; carries the seed the display should revert to.
    Rejected(u32),
}

impl SeedChange {
    pub fn seed(self) -> u32 {
        match self {
            SeedChange::Applied(seed) | SeedChange::Rejected(seed) => seed,
        }
    }
}

pub struct Simulation<R> {
    params: Params,
    defaults: Params,
    layout: TextLayout,
    rasterizer: R,
    clock: f64,
    frame: u64,
    state: FieldState,
}

impl<R: MaskRasterizer> Simulation<R> {
    /// Starts uninitialized; call [`Simulation::reinitialize`] to populate.
    pub fn new(params: Params, layout: TextLayout, rasterizer: R) -> Self {
        Self {
            params,
            defaults: params,
            layout,
            rasterizer,
            clock: 0.0,
            frame: 0,
            state: FieldState::Uninitialized,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn defaults(&self) -> &Params {
        &self.defaults
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, FieldState::Running(_))
    }

    pub fn fields(&self) -> Option<&Fields> {
        match &self.state {
            FieldState::Running(fields) => Some(fields),
            FieldState::Uninitialized => None,
        }
    }

    pub fn letter_bounds(&self) -> &[LetterBound] {
        self.fields().map(|f| f.bounds.as_slice()).unwrap_or_default()
    }

    pub fn background(&self) -> &[MagneticParticle] {
        self.fields().map(|f| f.background.as_slice()).unwrap_or_default()
    }

    pub fn text_particles(&self) -> &[TextParticle] {
        self.fields().map(|f| f.text.as_slice()).unwrap_or_default()
    }

    /// Seed generators, regenerate the mask, rebuild both arrays, reset the
    /// clock. The frame counter keeps running so the wave does not restart.
    pub fn reinitialize(&mut self) {
        let seed = self.params.seed;
        let (mut random, noise) = rng::seeded(seed);
        let TextData { mask, bounds } = TextData::generate(&self.rasterizer, &self.layout);
        let (width, height) = (self.layout.width, self.layout.height);

        let background: Vec<MagneticParticle> = (0..self.params.particle_count)
            .map(|_| MagneticParticle::spawn(&mut random, width, height))
            .collect();
        let text: Vec<TextParticle> = (0..TEXT_PARTICLE_COUNT)
            .map(|_| TextParticle::spawn(&mut random, &mask, width, height))
            .collect();

        let placed = text
            .iter()
            .filter(|p| mask.is_inside(p.home_x, p.home_y))
            .count();
        debug!(
            seed,
            background = background.len(),
            text = text.len(),
            placed,
            "reinitialized particle fields"
        );

        self.clock = 0.0;
        self.state = FieldState::Running(Fields {
            mask,
            bounds,
            background,
            text,
            noise,
        });
    }

    /// Advance one frame: clock first, then background, then text.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        self.clock += self.params.wave_speed;

        let FieldState::Running(fields) = &mut self.state else {
            return;
        };
        if fields.background.is_empty() && fields.text.is_empty() {
            return;
        }

        let env = FieldEnv {
            mask: &fields.mask,
            bounds: &fields.bounds,
            clock: self.clock,
            frame: self.frame,
            width: self.layout.width,
            height: self.layout.height,
        };
        for particle in &mut fields.background {
            particle.update(
                &env,
                self.params.magnetic_strength,
                self.params.wave_amplitude,
            );
        }
        for particle in &mut fields.text {
            particle.update(&fields.noise, self.clock, self.params.jitter_amount);
        }
    }

    /// Black background, then background particles, then text on top.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear(Rgba::BLACK);
        let Some(fields) = self.fields() else {
            return;
        };
        for particle in &fields.background {
            particle.render(surface);
        }
        for particle in &fields.text {
            particle.render(surface);
        }
    }

    /// One complete frame.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.tick();
        self.render(surface);
    }

    /// Slider handler; rebuilds only for structural parameters.
    pub fn update_param(&mut self, name: &str, value: f64) -> Result<Rebuild> {
        let key: ParamKey = name.parse()?;
        let rebuild = self.params.set(key, value);
        if rebuild == Rebuild::Required {
            self.reinitialize();
        }
        Ok(rebuild)
    }

    /// Seed entry box. Invalid input leaves all state untouched.
    pub fn enter_seed(&mut self, input: &str) -> SeedChange {
        match parse_seed_entry(input) {
            Some(seed) => self.apply_seed(seed),
            None => SeedChange::Rejected(self.params.seed),
        }
    }

    pub fn previous_seed(&mut self) -> SeedChange {
        self.apply_seed(self.params.seed.saturating_sub(1).max(1))
    }

    pub fn next_seed(&mut self) -> SeedChange {
        self.apply_seed(self.params.seed.saturating_add(1))
    }

    /// Uniform pick in `[1, SEED_MAX]`.
    pub fn randomize_seed<G: Rng>(&mut self, rng: &mut G) -> SeedChange {
        self.apply_seed(rng.gen_range(1..=SEED_MAX))
    }

    /// Restore the startup snapshot and rebuild.
    pub fn reset_parameters(&mut self) {
        self.params = self.defaults;
        self.reinitialize();
    }

    fn apply_seed(&mut self, seed: u32) -> SeedChange {
        self.params.seed = seed;
        self.reinitialize();
        SeedChange::Applied(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::BlockFontRasterizer;
    use crate::surface::PixelFrame;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small(seed: u32, particle_count: usize) -> Simulation<BlockFontRasterizer> {
        let params = Params {
            seed,
            particle_count,
            ..Params::default()
        };
        Simulation::new(params, TextLayout::default(), BlockFontRasterizer)
    }

    #[test]
    fn uninitialized_tick_only_advances_clock() {
        let mut sim = small(1, 10);
        sim.tick();
        sim.tick();
        assert!(!sim.is_running());
        assert!((sim.clock() - 0.016).abs() < 1e-12);
        assert_eq!(sim.frame(), 2);
        assert!(sim.background().is_empty());

        let mut frame = PixelFrame::new(1200, 675);
        sim.render(&mut frame);
        assert_eq!(frame.pixel(600, 337), Some([0, 0, 0, 255]));
    }

    #[test]
    fn reinitialize_builds_both_fields() {
        let mut sim = small(1, 25);
        sim.reinitialize();
        assert!(sim.is_running());
        assert_eq!(sim.background().len(), 25);
        assert_eq!(sim.text_particles().len(), TEXT_PARTICLE_COUNT);
        assert_eq!(sim.letter_bounds().len(), 6);
        assert_eq!(sim.clock(), 0.0);
    }

    #[test]
    fn particle_count_change_rebuilds() {
        let mut sim = small(1, 25);
        sim.reinitialize();
        assert_eq!(sim.update_param("particleCount", 40.0).unwrap(), Rebuild::Required);
        assert_eq!(sim.background().len(), 40);

        let before = sim.background().to_vec();
        assert_eq!(
            sim.update_param("magneticStrength", 0.5).unwrap(),
            Rebuild::NotRequired
        );
        assert_eq!(sim.background(), before.as_slice());
        assert!(sim.update_param("bogus", 1.0).is_err());
    }

    #[test]
    fn seed_controls() {
        let mut sim = small(1, 5);
        sim.reinitialize();
        assert_eq!(sim.previous_seed(), SeedChange::Applied(1));
        assert_eq!(sim.next_seed(), SeedChange::Applied(2));
        assert_eq!(sim.enter_seed("abc"), SeedChange::Rejected(2));
        assert_eq!(sim.enter_seed("-3"), SeedChange::Rejected(2));
        assert_eq!(sim.params().seed, 2);
        assert_eq!(sim.enter_seed("77"), SeedChange::Applied(77));

        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let seed = sim.randomize_seed(&mut rng).seed();
            assert!((1..=SEED_MAX).contains(&seed));
        }
    }

    #[test]
    fn rejected_seed_keeps_particles() {
        let mut sim = small(9, 5);
        sim.reinitialize();
        sim.tick();
        let before = sim.background().to_vec();
        sim.enter_seed("0");
        assert_eq!(sim.background(), before.as_slice());
        assert!(sim.clock() > 0.0);
    }

    #[test]
    fn reset_restores_snapshot() {
        let mut sim = small(3, 5);
        sim.reinitialize();
        sim.update_param("waveSpeed", 0.5).unwrap();
        sim.update_param("particleCount", 12.0).unwrap();
        sim.next_seed();
        sim.reset_parameters();
        assert_eq!(sim.params(), sim.defaults());
        assert_eq!(sim.background().len(), 5);
    }

    #[test]
    fn render_draws_text_over_background() {
        let mut sim = small(1, 0);
        sim.reinitialize();
        let mut frame = PixelFrame::new(1200, 675);
        sim.step(&mut frame);
        let lit = frame
            .as_rgba()
            .chunks_exact(4)
            .filter(|px| px[0] == 255)
            .count();
        assert!(lit > 0);
    }
}
