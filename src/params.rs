use std::str::FromStr;

use crate::error::IntroError;

pub const CANVAS_WIDTH: f64 = 1200.0;
pub const CANVAS_HEIGHT: f64 = 675.0;

pub const WORD: &str = "ANDREW";
pub const TEXT_SIZE: f64 = 180.0;
pub const LETTER_SPACING: f64 = 140.0;

pub const TEXT_PARTICLE_COUNT: usize = 300;
pub const SEED_MAX: u32 = 999_999;

/// Tunables driven by the UI sliders and seed controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub seed: u32,
    pub particle_count: usize,
    pub magnetic_strength: f64,
    pub wave_amplitude: f64,
    pub wave_speed: f64,
    pub jitter_amount: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: 12345,
            particle_count: 8000,
            magnetic_strength: 0.08,
            wave_amplitude: 20.0,
            wave_speed: 0.008,
            jitter_amount: 0.8,
        }
    }
}

/// Slider-bound parameters, keyed by their control ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKey {
    ParticleCount,
    MagneticStrength,
    WaveAmplitude,
    WaveSpeed,
    JitterAmount,
}

impl ParamKey {
    pub const ALL: [ParamKey; 5] = [
        ParamKey::ParticleCount,
        ParamKey::MagneticStrength,
        ParamKey::WaveAmplitude,
        ParamKey::WaveSpeed,
        ParamKey::JitterAmount,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ParamKey::ParticleCount => "particleCount",
            ParamKey::MagneticStrength => "magneticStrength",
            ParamKey::WaveAmplitude => "waveAmplitude",
            ParamKey::WaveSpeed => "waveSpeed",
            ParamKey::JitterAmount => "jitterAmount",
        }
    }
}

impl FromStr for ParamKey {
    type Err = IntroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamKey::ALL
            .into_iter()
            .find(|key| key.id() == s)
            .ok_or_else(|| IntroError::UnknownParam(s.to_string()))
    }
}

/// Whether a parameter change needs the particle fields rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebuild {
    Required,
    NotRequired,
}

impl Params {
    pub fn get(&self, key: ParamKey) -> f64 {
        match key {
            ParamKey::ParticleCount => self.particle_count as f64,
            ParamKey::MagneticStrength => self.magnetic_strength,
            ParamKey::WaveAmplitude => self.wave_amplitude,
            ParamKey::WaveSpeed => self.wave_speed,
            ParamKey::JitterAmount => self.jitter_amount,
        }
    }

    /// Apply a slider value. Only the particle count is structural.
    pub fn set(&mut self, key: ParamKey, value: f64) -> Rebuild {
        match key {
            ParamKey::ParticleCount => {
                // `as` saturates: NaN and negatives land on 0.
                self.particle_count = value as usize;
                return Rebuild::Required;
            }
            ParamKey::MagneticStrength => self.magnetic_strength = value,
            ParamKey::WaveAmplitude => self.wave_amplitude = value,
            ParamKey::WaveSpeed => self.wave_speed = value,
            ParamKey::JitterAmount => self.jitter_amount = value,
        }
        Rebuild::NotRequired
    }
}

/// Parse the seed entry box the way a browser `parseInt` would read it:
/// leading whitespace, an optional sign, then digits up to the first
/// non-digit. Anything that is not a positive `u32` is rejected.
pub fn parse_seed_entry(input: &str) -> Option<u32> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() || negative {
        return None;
    }
    match digits.parse::<u32>() {
        Ok(seed) if seed > 0 => Some(seed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_control_ids() {
        for key in ParamKey::ALL {
            assert_eq!(key.id().parse::<ParamKey>().unwrap(), key);
        }
        assert!(matches!(
            "seed".parse::<ParamKey>(),
            Err(IntroError::UnknownParam(name)) if name == "seed"
        ));
    }

    #[test]
    fn only_particle_count_is_structural() {
        let mut params = Params::default();
        assert_eq!(params.set(ParamKey::ParticleCount, 120.7), Rebuild::Required);
        assert_eq!(params.particle_count, 120);
        assert_eq!(params.set(ParamKey::ParticleCount, -4.0), Rebuild::Required);
        assert_eq!(params.particle_count, 0);
        assert_eq!(params.set(ParamKey::WaveSpeed, 0.02), Rebuild::NotRequired);
        assert_eq!(params.wave_speed, 0.02);
    }

    #[test]
    fn seed_entry_follows_leading_integer_rules() {
        assert_eq!(parse_seed_entry("42"), Some(42));
        assert_eq!(parse_seed_entry("  77abc"), Some(77));
        assert_eq!(parse_seed_entry("+9"), Some(9));
        assert_eq!(parse_seed_entry("0"), None);
        assert_eq!(parse_seed_entry("-5"), None);
        assert_eq!(parse_seed_entry("abc"), None);
        assert_eq!(parse_seed_entry(""), None);
        assert_eq!(parse_seed_entry("99999999999"), None);
    }
}
