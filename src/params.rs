//! Parameter definitions with physical units and documented semantics.
//!
//! Every tunable lives here so the simulation modules stay free of magic
//! numbers. Defaults reproduce the reference scene.

/// Number of wave generators the shader evaluates per point.
///
/// The CPU sampler truncates the bank to this same count; the uniform array
/// in `shader.wgsl` is sized by it. Changing one side without the other
/// breaks the CPU/GPU surface agreement.
pub const GPU_WAVE_COUNT: usize = 7;

/// Wave generators created in the bank (only the first [`GPU_WAVE_COUNT`]
/// are evaluated; the extras exist so tuning can swap waves in).
pub const WAVE_BANK_SIZE: usize = 10;

/// Fixed number of wake-stamp uniform slots presented to the GPU each frame.
pub const TRAIL_CAPACITY: usize = 50;

/// Ocean surface parameters (wave bank seeding + global scaling)
#[derive(Debug, Clone)]
pub struct OceanParams {
    /// Seed for wave phases and trail jitter
    pub seed: u64,

    /// Global wave amplitude scalar applied on top of per-wave amplitudes
    pub amplitude: f32,

    /// Amplitude of the largest wave (meters)
    pub base_amplitude_m: f32,

    /// Per-wave amplitude decay ratio
    pub amplitude_falloff: f32,

    /// Wavelength of the largest wave (meters)
    pub base_wavelength_m: f32,

    /// Per-wave wavelength shrink divisor
    pub wavelength_falloff: f32,

    /// Phase speed of the slowest wave (radians/second)
    pub base_speed: f32,

    /// Phase speed added per wave index
    pub speed_step: f32,

    /// Steepness of the first wave (0..1)
    pub base_steepness: f32,

    /// Per-wave steepness decay ratio
    pub steepness_falloff: f32,

    /// Simulation seconds advanced per wall-clock second
    pub time_scale: f32,
}

impl Default for OceanParams {
    fn default() -> Self {
        Self {
            seed: 7,
            amplitude: 1.3,
            base_amplitude_m: 0.6,
            amplitude_falloff: 0.78,
            base_wavelength_m: 24.0,
            wavelength_falloff: 1.28,
            base_speed: 1.1,
            speed_step: 0.15,
            base_steepness: 0.5,
            steepness_falloff: 0.9,
            time_scale: 1.2,
        }
    }
}

/// Point-grid geometry parameters
#[derive(Debug, Clone)]
pub struct GridParams {
    /// World-space side length of the grid (meters)
    pub span_m: f32,

    /// Grid cells per side (600 -> 361,201 point instances)
    pub density: usize,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            span_m: 400.0,
            density: 600,
        }
    }
}

/// Cosmetic displacement layers (GPU-only; the CPU sampler ignores all of
/// these on purpose)
#[derive(Debug, Clone)]
pub struct CosmeticParams {
    /// Group mask blend strength (0 = uniform amplitude, 1 = full mask)
    pub group_strength: f32,
    /// Group mask layer 1 spatial frequency (cycles/meter)
    pub group_freq: f32,
    /// Group mask layer 1 scroll velocity
    pub group_vel: [f32; 2],
    /// Group mask layer 2 spatial frequency
    pub group_freq2: f32,
    /// Group mask layer 2 scroll velocity (scrolls opposite layer 1)
    pub group_vel2: [f32; 2],

    /// Domain warp amplitude (meters of coordinate offset)
    pub warp_amp: f32,
    /// Domain warp noise frequency
    pub warp_freq: f32,
    /// Domain warp scroll velocity
    pub warp_vel: [f32; 2],

    /// Per-sample phase jitter amplitude (radians)
    pub phase_noise_amp: f32,
    /// Phase jitter noise frequency
    pub phase_noise_freq: f32,
    /// Phase jitter scroll velocity
    pub phase_noise_vel: [f32; 2],

    /// Crest ripple displacement amplitude (meters)
    pub ripple_amp: f32,
    /// Crest ripple spatial frequency
    pub ripple_freq: f32,
    /// Crest ripple animation speed
    pub ripple_speed: f32,
    /// Base height where the crest gate starts opening (meters)
    pub crest_low: f32,
    /// Base height where the crest gate is fully open (meters)
    pub crest_high: f32,

    /// Brightness shimmer amplitude
    pub shimmer_amp: f32,
    /// Brightness shimmer spatial frequency
    pub shimmer_freq: f32,
    /// Brightness shimmer animation speed
    pub shimmer_speed: f32,
}

impl Default for CosmeticParams {
    fn default() -> Self {
        Self {
            group_strength: 0.65,
            group_freq: 0.05,
            group_vel: [0.03, 0.02],
            group_freq2: 0.043,
            group_vel2: [0.025, -0.018],
            warp_amp: 1.0,
            warp_freq: 0.06,
            warp_vel: [0.06, -0.04],
            phase_noise_amp: 0.22,
            phase_noise_freq: 0.06,
            phase_noise_vel: [0.02, -0.017],
            ripple_amp: 0.04,
            ripple_freq: 2.6,
            ripple_speed: 2.2,
            crest_low: 0.05,
            crest_high: 0.35,
            shimmer_amp: 0.12,
            shimmer_freq: 0.25,
            shimmer_speed: 1.7,
        }
    }
}

/// Fog and edge-fade parameters for the point grid
#[derive(Debug, Clone)]
pub struct FogParams {
    /// Fog color (linear RGB)
    pub color: [f32; 3],
    /// View distance where fog starts (meters)
    pub near_m: f32,
    /// View distance of full fog (meters)
    pub far_m: f32,
    /// Width of the edge fade band, inward from the grid border (meters)
    pub fade_width_m: f32,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0],
            near_m: 20.0,
            far_m: 220.0,
            fade_width_m: 60.0,
        }
    }
}

/// Wake/spray trail emission and decay parameters
#[derive(Debug, Clone)]
pub struct TrailParams {
    /// Minimum boat speed (world units per tick) before stamps are emitted
    pub min_speed: f32,

    /// Minimum interval between stamps (seconds)
    pub emit_interval_s: f32,

    /// Distance behind the boat where stamps are placed (meters)
    pub offset_behind_m: f32,

    /// Lateral jitter half-range applied to stamp positions (meters, x then z)
    pub jitter_m: [f32; 2],

    /// Vertical displacement of a fresh stamp (meters)
    pub spray_height_m: f32,

    /// Radius of the wake wedge around a stamp (meters)
    pub spray_radius_m: f32,

    /// Seconds for a stamp to decay to 1% of its base height
    pub fade_duration_s: f32,

    /// Boost multiplier on base height
    pub boost_height_mult: f32,

    /// Boost multiplier on fade duration (independent of the height one)
    pub boost_fade_mult: f32,

    /// Boost multiplier on wedge radius
    pub boost_radius_mult: f32,
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            min_speed: 0.05,
            emit_interval_s: 0.2,
            offset_behind_m: 6.0,
            jitter_m: [1.0, 1.5],
            spray_height_m: 5.0,
            spray_radius_m: 15.0,
            fade_duration_s: 20.0,
            boost_height_mult: 1.8,
            boost_fade_mult: 1.5,
            boost_radius_mult: 1.3,
        }
    }
}

/// Boat steering and float parameters
#[derive(Debug, Clone)]
pub struct BoatParams {
    /// Acceleration impulse per tick while throttling (world units)
    pub accel: f32,

    /// Reverse throttle fraction of forward
    pub reverse_factor: f32,

    /// Boost multiplier on the acceleration impulse
    pub boost_mult: f32,

    /// Yaw change per tick while steering (radians)
    pub turn_speed: f32,

    /// Velocity retained per tick (friction)
    pub friction: f32,
}

impl Default for BoatParams {
    fn default() -> Self {
        Self {
            accel: 0.01,
            reverse_factor: 0.6,
            boost_mult: 1.8,
            turn_speed: 0.02,
            friction: 0.96,
        }
    }
}

/// Buoy placement and interaction parameters
#[derive(Debug, Clone)]
pub struct BuoyParams {
    /// Distance at which a buoy becomes highlighted (meters)
    pub interaction_radius_m: f32,

    /// Fraction of the wave height buoys ride (less than the boat's 1.0)
    pub wave_influence: f32,

    /// Extra sinusoidal bob amplitude (meters)
    pub bob_amplitude_m: f32,

    /// Bob angular speed (radians/second of sim time)
    pub bob_speed: f32,

    /// Seconds between the interact command and the detail UI opening
    pub detail_delay_s: f32,
}

impl Default for BuoyParams {
    fn default() -> Self {
        Self {
            interaction_radius_m: 40.0,
            wave_influence: 0.3,
            bob_amplitude_m: 0.1,
            bob_speed: 0.5,
            detail_delay_s: 1.8,
        }
    }
}

/// Camera rig parameters (all three modes plus the bounce-back limiter)
#[derive(Debug, Clone)]
pub struct CameraParams {
    /// Follow: distance behind the boat (meters)
    pub follow_distance_m: f32,
    /// Follow: height above the boat (meters)
    pub follow_height_m: f32,
    /// Follow: lateral offset to the boat's right (meters)
    pub follow_side_m: f32,
    /// Follow: look-at distance ahead of the bow (meters)
    pub follow_ahead_m: f32,
    /// Follow: look-at lift above the deck (meters)
    pub follow_look_up_m: f32,
    /// Follow: per-tick position smoothing factor (0..1)
    pub position_lag: f32,
    /// Follow: per-tick look-at smoothing factor (0..1)
    pub target_lag: f32,

    /// Orbit: minimum radius (meters)
    pub min_radius_m: f32,
    /// Orbit: radius where bounce-back engages (meters)
    pub max_radius_m: f32,
    /// Orbit: radius the bounce eases back to (meters)
    pub bounce_radius_m: f32,
    /// Orbit: bounce-back easing duration (seconds)
    pub bounce_duration_s: f32,
    /// Orbit: radians of yaw per pixel of drag
    pub rotate_speed: f32,
    /// Orbit: fractional radius change per wheel step
    pub zoom_speed: f32,

    /// Cinematic: transition duration (seconds)
    pub cinematic_duration_s: f32,
    /// Cinematic: camera offset from the buoy (meters)
    pub cinematic_offset_m: [f32; 3],
    /// Cinematic: look-at lift above the buoy (meters)
    pub cinematic_look_up_m: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            follow_distance_m: 30.0,
            follow_height_m: 12.0,
            follow_side_m: 2.0,
            follow_ahead_m: 8.0,
            follow_look_up_m: 3.0,
            position_lag: 0.12,
            target_lag: 0.08,
            min_radius_m: 2.0,
            max_radius_m: 200.0,
            bounce_radius_m: 150.0,
            bounce_duration_s: 2.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            cinematic_duration_s: 1.5,
            cinematic_offset_m: [8.0, 12.0, 8.0],
            cinematic_look_up_m: 5.0,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (meters)
    pub near_plane_m: f32,

    /// Far clipping plane (meters)
    pub far_plane_m: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 75.0,
            near_plane_m: 0.1,
            far_plane_m: 4000.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}

/// Asset loading configuration
#[derive(Debug, Clone)]
pub struct AssetParams {
    /// Path of the boat model (OBJ); the fallback hull is used on failure
    pub boat_model: String,

    /// Path of the buoy model (OBJ); the fallback stack is used on failure
    pub buoy_model: String,

    /// Seconds before an unfinished load counts as failed
    pub timeout_s: f32,
}

impl Default for AssetParams {
    fn default() -> Self {
        Self {
            boat_model: "assets/boat.obj".to_string(),
            buoy_model: "assets/buoy.obj".to_string(),
            timeout_s: 5.0,
        }
    }
}
