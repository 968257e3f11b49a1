pub mod magnetic;
pub mod text;

pub use magnetic::{magnetic_force_magnitude, nearest_bound, wrap, MagneticParticle};
pub use text::TextParticle;

use crate::mask::{LetterBound, TextMask};

/// Read-only view of the world one background update needs.
#[derive(Debug, Clone, Copy)]
pub struct FieldEnv<'a> {
    pub mask: &'a TextMask,
    pub bounds: &'a [LetterBound],
    pub clock: f64,
    pub frame: u64,
    pub width: f64,
    pub height: f64,
}
