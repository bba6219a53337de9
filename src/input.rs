//! Input collaborator surface.
//!
//! The host owns key bindings and mouse handling; the simulation only reads
//! these flags, discrete events, and orbit deltas.

/// Held control flags, sampled once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
}

/// Discrete commands collected since the last tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputEvents {
    pub interact: bool,
    pub toggle_camera: bool,
    pub close_ui: bool,
}

impl InputEvents {
    /// Drain the pending events, leaving the struct cleared for the next
    /// collection window.
    pub fn take(&mut self) -> InputEvents {
        std::mem::take(self)
    }
}

/// Accumulated orbit-camera input for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitInput {
    /// Horizontal drag (pixels)
    pub yaw_delta: f32,
    /// Vertical drag (pixels)
    pub pitch_delta: f32,
    /// Wheel steps (positive zooms in)
    pub zoom_delta: f32,
}

impl OrbitInput {
    pub fn take(&mut self) -> OrbitInput {
        std::mem::take(self)
    }
}
