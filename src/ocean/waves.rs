//! Gerstner wave bank: the analytic surface model shared by the GPU
//! displacement shader and the CPU sampler.
//!
//! [`evaluate`] is the reference formula. `shader.wgsl` implements the same
//! trig arguments per point; any change here must be mirrored there or
//! floating bodies drift off the rendered surface.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::params::{OceanParams, WAVE_BANK_SIZE};

/// Wavelengths below this are clamped to avoid a division blowup
const MIN_WAVELENGTH: f32 = 0.001;

/// One traveling wave in the bank. Immutable after bank construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveGenerator {
    /// Unit travel direction in the xz plane
    pub direction: Vec2,
    /// Crest height contribution (meters)
    pub amplitude: f32,
    /// Crest-to-crest distance (meters)
    pub wavelength: f32,
    /// Phase speed (radians/second)
    pub speed: f32,
    /// Horizontal displacement factor, 0..1
    pub steepness: f32,
    /// Static phase offset (radians)
    pub phase: f32,
}

/// Surface sample at one point and time.
///
/// `slope_x`/`slope_z` are the steepness-scaled cosine terms used to build a
/// surface normal. They are a proxy, not the analytic gradient of the height
/// sum; the shader implies the same proxy, so both sides agree.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaveSample {
    pub height: f32,
    pub slope_x: f32,
    pub slope_z: f32,
}

/// Fixed bank of wave generators, seeded once at startup.
#[derive(Debug, Clone)]
pub struct WaveBank {
    generators: Vec<WaveGenerator>,
}

impl WaveBank {
    /// Build the bank: golden-angle-distributed directions, geometrically
    /// decaying amplitude/wavelength/steepness, seeded random phases.
    pub fn new(params: &OceanParams) -> Self {
        let golden = PI * (3.0 - 5.0f32.sqrt());
        let mut rng = StdRng::seed_from_u64(params.seed);

        let generators = (0..WAVE_BANK_SIZE)
            .map(|i| {
                let angle = i as f32 * golden;
                let falloff = params.amplitude_falloff.powi(i as i32);
                WaveGenerator {
                    direction: Vec2::new(angle.cos(), angle.sin()).normalize(),
                    amplitude: params.base_amplitude_m * falloff,
                    wavelength: params.base_wavelength_m
                        / params.wavelength_falloff.powi(i as i32),
                    speed: params.base_speed + i as f32 * params.speed_step,
                    steepness: params.base_steepness
                        * params.steepness_falloff.powi(i as i32),
                    phase: rng.random_range(0.0..TAU),
                }
            })
            .collect();

        Self { generators }
    }

    /// Build a bank from explicit generators (tuning presets, tests).
    pub fn from_generators(generators: Vec<WaveGenerator>) -> Self {
        Self { generators }
    }

    pub fn generators(&self) -> &[WaveGenerator] {
        &self.generators
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

/// Evaluate a set of wave generators at `point` (world xz) and `time`.
///
/// Linear superposition: height can reach the sum of all amplitudes.
/// Deterministic; no state, no randomness.
pub fn evaluate(generators: &[WaveGenerator], point: Vec2, time: f32) -> WaveSample {
    let mut sample = WaveSample::default();
    for wave in generators {
        let k = TAU / wave.wavelength.max(MIN_WAVELENGTH);
        let phase = wave.direction.dot(point) * k + time * wave.speed + wave.phase;
        let (sin_p, cos_p) = phase.sin_cos();
        sample.height += wave.amplitude * sin_p;
        sample.slope_x += wave.steepness * wave.amplitude * wave.direction.x * cos_p;
        sample.slope_z += wave.steepness * wave.amplitude * wave.direction.y * cos_p;
    }
    sample
}

/// Surface normal implied by a sample's slope proxy.
pub fn surface_normal(sample: &WaveSample) -> glam::Vec3 {
    glam::Vec3::new(-sample.slope_x, 1.0, -sample.slope_z).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_wave() -> WaveGenerator {
        WaveGenerator {
            direction: Vec2::new(1.0, 0.0),
            amplitude: 1.0,
            wavelength: TAU,
            speed: 0.0,
            steepness: 0.5,
            phase: 0.0,
        }
    }

    #[test]
    fn single_wave_matches_sine() {
        let bank = [unit_wave()];

        // k = 2*pi / 2*pi = 1, so height(x, 0) = sin(x)
        let at_zero = evaluate(&bank, Vec2::ZERO, 0.0);
        assert!(at_zero.height.abs() < 1e-6);

        let at_crest = evaluate(&bank, Vec2::new(PI / 2.0, 0.0), 0.0);
        assert!((at_crest.height - 1.0).abs() < 1e-6);
    }

    #[test]
    fn evaluate_is_deterministic() {
        let params = OceanParams::default();
        let bank = WaveBank::new(&params);
        let p = Vec2::new(13.7, -42.1);

        let a = evaluate(bank.generators(), p, 123.456);
        let b = evaluate(bank.generators(), p, 123.456);
        assert_eq!(a, b);
    }

    #[test]
    fn bank_is_deterministic_for_a_seed() {
        let params = OceanParams::default();
        let a = WaveBank::new(&params);
        let b = WaveBank::new(&params);
        assert_eq!(a.generators(), b.generators());

        let other = WaveBank::new(&OceanParams {
            seed: 8,
            ..params
        });
        // Directions and amplitudes are seed-independent; phases are not.
        assert_ne!(a.generators(), other.generators());
    }

    #[test]
    fn bank_shape() {
        let bank = WaveBank::new(&OceanParams::default());
        assert_eq!(bank.len(), WAVE_BANK_SIZE);
        for (i, w) in bank.generators().iter().enumerate() {
            assert!((w.direction.length() - 1.0).abs() < 1e-5, "dir {} not unit", i);
            assert!(w.amplitude > 0.0);
            assert!(w.wavelength > 0.0);
            assert!((0.0..=1.0).contains(&w.steepness));
        }
        // Amplitudes decay so the superposition converges visually
        let amps: Vec<f32> = bank.generators().iter().map(|w| w.amplitude).collect();
        assert!(amps.windows(2).all(|p| p[1] < p[0]));
    }

    #[test]
    fn superposition_is_linear() {
        let a = unit_wave();
        let b = WaveGenerator {
            direction: Vec2::new(0.0, 1.0),
            amplitude: 0.3,
            wavelength: 5.0,
            speed: 2.0,
            phase: 1.0,
            ..unit_wave()
        };
        let p = Vec2::new(3.0, -2.0);
        let t = 0.7;

        let sum = evaluate(&[a, b], p, t);
        let parts = evaluate(&[a], p, t);
        let parts_b = evaluate(&[b], p, t);
        assert!((sum.height - (parts.height + parts_b.height)).abs() < 1e-6);
        assert!((sum.slope_x - (parts.slope_x + parts_b.slope_x)).abs() < 1e-6);
        assert!((sum.slope_z - (parts.slope_z + parts_b.slope_z)).abs() < 1e-6);
    }

    #[test]
    fn normal_is_unit_and_points_up() {
        let bank = WaveBank::new(&OceanParams::default());
        let s = evaluate(bank.generators(), Vec2::new(5.0, 9.0), 2.0);
        let n = surface_normal(&s);
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!(n.y > 0.0);
    }
}
