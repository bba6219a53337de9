//! CPU-side wave sampler used to float rigid bodies.
//!
//! Holds the first [`GPU_WAVE_COUNT`] generators of the bank — the same
//! truncation the shader's uniform array applies — and nothing else. All
//! cosmetic GPU layers (group mask, domain warp, phase jitter, crest
//! ripples, wake stamps) are deliberately absent here; bodies float on the
//! base surface both evaluation contexts share.

use glam::Vec2;
use thiserror::Error;

use super::waves::{evaluate, WaveBank, WaveGenerator, WaveSample};
use crate::params::GPU_WAVE_COUNT;

#[derive(Debug, Error)]
pub enum SamplerError {
    /// The bank holds fewer generators than the shader evaluates. Querying
    /// such a sampler would produce a surface the GPU never renders, so
    /// construction fails instead.
    #[error("wave bank has {have} generators but the GPU stage evaluates {need}")]
    BankTooSmall { have: usize, need: usize },
}

/// Scalar height/slope sampler over the truncated wave bank.
#[derive(Debug, Clone)]
pub struct WaveSampler {
    waves: Vec<WaveGenerator>,
}

impl WaveSampler {
    /// Snapshot the first [`GPU_WAVE_COUNT`] generators of `bank`.
    pub fn new(bank: &WaveBank) -> Result<Self, SamplerError> {
        if bank.len() < GPU_WAVE_COUNT {
            return Err(SamplerError::BankTooSmall {
                have: bank.len(),
                need: GPU_WAVE_COUNT,
            });
        }
        Ok(Self {
            waves: bank.generators()[..GPU_WAVE_COUNT].to_vec(),
        })
    }

    /// Sample the base surface at `point` (world xz) and `time`.
    pub fn sample(&self, point: Vec2, time: f32) -> WaveSample {
        evaluate(&self.waves, point, time)
    }

    /// The generators this sampler evaluates, in upload order.
    pub fn waves(&self) -> &[WaveGenerator] {
        &self.waves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::OceanParams;

    #[test]
    fn sampler_matches_truncated_bank_evaluation() {
        let bank = WaveBank::new(&OceanParams::default());
        let sampler = WaveSampler::new(&bank).unwrap();

        let p = Vec2::new(-7.3, 18.9);
        let t = 42.0;
        let via_sampler = sampler.sample(p, t);
        let via_bank = evaluate(&bank.generators()[..GPU_WAVE_COUNT], p, t);
        assert_eq!(via_sampler, via_bank);
    }

    #[test]
    fn sampler_uses_exactly_the_gpu_wave_count() {
        let bank = WaveBank::new(&OceanParams::default());
        let sampler = WaveSampler::new(&bank).unwrap();
        assert_eq!(sampler.waves().len(), GPU_WAVE_COUNT);
        assert_eq!(sampler.waves(), &bank.generators()[..GPU_WAVE_COUNT]);
    }

    #[test]
    fn undersized_bank_is_rejected() {
        let full = WaveBank::new(&OceanParams::default());
        let short = WaveBank::from_generators(full.generators()[..3].to_vec());

        match WaveSampler::new(&short) {
            Err(SamplerError::BankTooSmall { have, need }) => {
                assert_eq!(have, 3);
                assert_eq!(need, GPU_WAVE_COUNT);
            }
            Ok(_) => panic!("short bank should not produce a sampler"),
        }
    }
}
