//! Ocean surface: wave bank, CPU sampler, and static point-grid geometry.

pub mod mesh;
pub mod sampler;
pub mod waves;

pub use mesh::{GridPoint, OceanGrid};
pub use sampler::{SamplerError, WaveSampler};
pub use waves::{evaluate, surface_normal, WaveBank, WaveGenerator, WaveSample};
