#![cfg(not(target_arch = "wasm32"))]

use intro_viz::particles::magnetic::{DAMPING, MAX_ATTRACTION};
use intro_viz::particles::{magnetic_force_magnitude, wrap, MagneticParticle, TextParticle};
use intro_viz::rng::{CoherentNoise, SeededRandom};
use intro_viz::{BlockFontRasterizer, Params, Simulation, TextLayout, TextMask};
use proptest::prelude::*;

fn distance() -> impl Strategy<Value = f64> {
    prop_oneof![1e-12..1e-3_f64, 1e-3..1e3_f64, 1e3..1e12_f64]
}

proptest! {
    #[test]
    fn magnetic_magnitude_is_clamped(
        strength in -5.0..5.0_f64,
        distance in distance(),
        angle in -std::f64::consts::PI..std::f64::consts::PI,
        clock in 0.0..1e4_f64,
    ) {
        let m = magnetic_force_magnitude(strength, distance, angle, clock);
        prop_assert!((0.0..=MAX_ATTRACTION).contains(&m));
    }

    #[test]
    fn wrap_lands_inside_extent(v in -1e6..1e6_f64, extent in 1.0..5000.0_f64) {
        let w = wrap(v, extent);
        prop_assert!(w >= 0.0 && w < extent);
    }

    #[test]
    fn background_stays_on_canvas(
        seed in 1u32..10_000,
        count in 0usize..40,
        strength in 0.0..1.0_f64,
        amplitude in 0.0..200.0_f64,
        ticks in 1usize..80,
    ) {
        let params = Params {
            seed,
            particle_count: count,
            magnetic_strength: strength,
            wave_amplitude: amplitude,
            ..Params::default()
        };
        let mut sim = Simulation::new(params, TextLayout::default(), BlockFontRasterizer);
        sim.reinitialize();
        for _ in 0..ticks {
            sim.tick();
            for p in sim.background() {
                prop_assert!(p.x >= 0.0 && p.x < 1200.0, "x = {}", p.x);
                prop_assert!(p.y >= 0.0 && p.y < 675.0, "y = {}", p.y);
            }
        }
    }

    #[test]
    fn zero_jitter_pins_text_to_home(seed in 1u32..10_000, clock in 0.0..1e5_f64) {
        let mask = TextMask::unavailable(1200, 675);
        let noise = CoherentNoise::new(seed);
        let mut rng = SeededRandom::new(seed);
        let mut p = TextParticle::spawn(&mut rng, &mask, 1200.0, 675.0);
        p.noise_offset = rng.random(1000.0);
        p.update(&noise, clock, 0.0);
        prop_assert_eq!((p.x, p.y), (p.home_x, p.home_y));
    }

    #[test]
    fn free_particle_speed_decays_geometrically(
        vx in -50.0..50.0_f64,
        vy in -50.0..50.0_f64,
        ticks in 1u32..100,
    ) {
        prop_assume!(vx != 0.0 || vy != 0.0);
        let mut p = MagneticParticle::spawn(&mut SeededRandom::new(1), 1200.0, 675.0);
        p.vx = vx;
        p.vy = vy;
        let start = p.speed();
        for _ in 0..ticks {
            p.integrate(1200.0, 675.0);
        }
        let expected = start * DAMPING.powi(ticks as i32);
        prop_assert!(p.speed() > 0.0);
        prop_assert!((p.speed() - expected).abs() <= expected * 1e-9);
    }
}
