//! Static point-grid geometry for the ocean.
//!
//! The grid never changes after creation: every point is displaced in the
//! vertex shader, so the instance buffer holds only flat xz positions.

use bytemuck::{Pod, Zeroable};

use crate::params::GridParams;

/// Per-instance data for one ocean point (world xz, y implied 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GridPoint {
    pub position: [f32; 2],
}

/// Flat xz point grid centered on the origin
pub struct OceanGrid {
    pub points: Vec<GridPoint>,
    span_m: f32,
}

impl OceanGrid {
    pub fn new(params: &GridParams) -> Self {
        let n = params.density;
        let mut points = Vec::with_capacity((n + 1) * (n + 1));

        for i in 0..=n {
            for j in 0..=n {
                let x = (i as f32 / n as f32 - 0.5) * params.span_m;
                let z = (j as f32 / n as f32 - 0.5) * params.span_m;
                points.push(GridPoint { position: [x, z] });
            }
        }

        Self {
            points,
            span_m: params.span_m,
        }
    }

    /// Half the grid side length; the shader fades points to black over the
    /// band just inside this border.
    pub fn span_half(&self) -> f32 {
        self.span_m * 0.5
    }
}
