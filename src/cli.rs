//! Command-line argument parsing.

use clap::Parser;

use crate::params::{AssetParams, GridParams, OceanParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Wakefield")]
#[command(about = "Interactive ocean scene with floating story buoys", long_about = None)]
pub struct Args {
    /// Seed for wave phases and wake jitter
    #[arg(long, value_name = "SEED", default_value = "7")]
    pub seed: u64,

    /// Ocean grid side length (meters)
    #[arg(long, value_name = "METERS", default_value = "400")]
    pub span: f32,

    /// Grid cells per side (points scale quadratically)
    #[arg(long, value_name = "CELLS", default_value = "600")]
    pub density: usize,

    /// Global wave amplitude scalar
    #[arg(long, value_name = "SCALE", default_value = "1.3")]
    pub amplitude: f32,

    /// Boat model path (OBJ); a procedural hull is used if missing
    #[arg(long, value_name = "PATH")]
    pub boat_model: Option<String>,

    /// Buoy model path (OBJ); a procedural marker is used if missing
    #[arg(long, value_name = "PATH")]
    pub buoy_model: Option<String>,
}

impl Args {
    pub fn ocean_params(&self) -> OceanParams {
        OceanParams {
            seed: self.seed,
            amplitude: self.amplitude,
            ..OceanParams::default()
        }
    }

    pub fn grid_params(&self) -> GridParams {
        GridParams {
            span_m: self.span,
            density: self.density,
        }
    }

    pub fn asset_params(&self) -> AssetParams {
        let mut params = AssetParams::default();
        if let Some(path) = &self.boat_model {
            params.boat_model = path.clone();
        }
        if let Some(path) = &self.buoy_model {
            params.buoy_model = path.clone();
        }
        params
    }
}
