//! Camera rig: follow / orbit / cinematic state machine with a radial
//! bounce-back limiter, plus view-projection building.
//!
//! Mode switches are explicit except the cinematic auto-exit to orbit.
//! Toggling to orbit is allowed anytime (and cancels a cinematic); toggling
//! to follow is ignored mid-cinematic.

use glam::{Mat4, Vec2, Vec3};

use crate::anim::Easing;
use crate::input::OrbitInput;
use crate::params::{CameraParams, RenderConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Follow,
    Orbit,
    Cinematic,
}

/// Active bounce-back: zoom is locked while this is set.
#[derive(Debug, Clone, Copy)]
struct Bounce {
    start_time: f32,
    from_radius: f32,
}

/// Spherical orbit pose around a target.
#[derive(Debug, Clone)]
struct OrbitState {
    /// Azimuth around +Y (radians)
    yaw: f32,
    /// Polar angle from +Y (radians), clamped off the poles
    pitch: f32,
    radius: f32,
    target: Vec3,
    bounce: Option<Bounce>,
}

impl OrbitState {
    fn offset(&self) -> Vec3 {
        let sin_p = self.pitch.sin();
        Vec3::new(
            sin_p * self.yaw.sin(),
            self.pitch.cos(),
            sin_p * self.yaw.cos(),
        )
    }

    /// Rebuild yaw/pitch/radius from an eye/target pose so orbit continues
    /// seamlessly from wherever the previous mode left the camera.
    fn from_pose(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length().max(0.001);
        let dir = offset / radius;
        Self {
            yaw: dir.x.atan2(dir.z),
            pitch: dir.y.clamp(-1.0, 1.0).acos().clamp(PITCH_MIN, PITCH_MAX),
            radius,
            target,
            bounce: None,
        }
    }
}

const PITCH_MIN: f32 = 0.1;
const PITCH_MAX: f32 = 1.55;

/// One-shot interpolation toward a buoy.
#[derive(Debug, Clone, Copy)]
struct Cinematic {
    start_time: f32,
    from_position: Vec3,
    from_target: Vec3,
    to_position: Vec3,
    to_target: Vec3,
}

pub struct CameraRig {
    mode: CameraMode,
    /// Smoothed eye position
    pub position: Vec3,
    /// Smoothed look-at point
    pub target: Vec3,
    orbit: OrbitState,
    cinematic: Option<Cinematic>,
    params: CameraParams,
}

impl CameraRig {
    /// Start in follow mode, snapped behind the boat at the origin.
    pub fn new(params: CameraParams) -> Self {
        let mut rig = Self {
            mode: CameraMode::Follow,
            position: Vec3::new(18.0, 16.0, 24.0),
            target: Vec3::ZERO,
            orbit: OrbitState {
                yaw: 0.65,
                pitch: 1.33,
                radius: 34.0,
                target: Vec3::ZERO,
                bounce: None,
            },
            cinematic: None,
            params,
        };
        rig.snap_to_follow(Vec3::ZERO, Vec2::new(0.0, -1.0));
        rig
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Current orbit radius (meaningful in orbit mode).
    pub fn orbit_radius(&self) -> f32 {
        self.orbit.radius
    }

    /// Whether the bounce-back limiter currently owns the radius.
    pub fn is_bouncing(&self) -> bool {
        self.orbit.bounce.is_some()
    }

    /// Toggle command: follow <-> orbit. Orbit is reachable anytime and
    /// cancels a running cinematic; follow is refused mid-cinematic.
    pub fn toggle(&mut self, boat_position: Vec3, boat_forward: Vec2) {
        match self.mode {
            CameraMode::Follow => self.enter_orbit(),
            CameraMode::Orbit => self.enter_follow(boat_position, boat_forward),
            CameraMode::Cinematic => self.enter_orbit(),
        }
    }

    fn enter_orbit(&mut self) {
        self.cinematic = None;
        self.orbit = OrbitState::from_pose(self.position, self.target);
        self.orbit.radius = self
            .orbit
            .radius
            .clamp(self.params.min_radius_m, self.params.max_radius_m);
        self.mode = CameraMode::Orbit;
    }

    /// Return to follow mode (e.g. after the detail view closes). Refused
    /// while a cinematic is running, same as the toggle path.
    pub fn request_follow(&mut self, boat_position: Vec3, boat_forward: Vec2) {
        self.enter_follow(boat_position, boat_forward);
    }

    fn enter_follow(&mut self, boat_position: Vec3, boat_forward: Vec2) {
        if self.cinematic.is_some() {
            return; // refused mid-cinematic
        }
        self.mode = CameraMode::Follow;
        self.snap_to_follow(boat_position, boat_forward);
    }

    /// Begin a cinematic move toward a buoy. Ignored if one is running.
    pub fn start_cinematic(&mut self, time: f32, buoy_position: Vec3) {
        if self.cinematic.is_some() {
            return;
        }
        let offset = Vec3::from_array(self.params.cinematic_offset_m);
        self.cinematic = Some(Cinematic {
            start_time: time,
            from_position: self.position,
            from_target: self.target,
            to_position: buoy_position + offset,
            to_target: buoy_position + Vec3::new(0.0, self.params.cinematic_look_up_m, 0.0),
        });
        self.mode = CameraMode::Cinematic;
    }

    /// Per-tick update. `time` is seconds since startup (wall clock, not
    /// wave-simulation time).
    pub fn update(
        &mut self,
        time: f32,
        boat_position: Vec3,
        boat_forward: Vec2,
        orbit_input: &OrbitInput,
    ) {
        match self.mode {
            CameraMode::Follow => self.update_follow(boat_position, boat_forward),
            CameraMode::Orbit => self.update_orbit(time, orbit_input),
            CameraMode::Cinematic => self.update_cinematic(time),
        }
    }

    fn follow_pose(&self, boat_position: Vec3, boat_forward: Vec2) -> (Vec3, Vec3) {
        let forward = Vec3::new(boat_forward.x, 0.0, boat_forward.y);
        let right = forward.cross(Vec3::Y).normalize_or_zero();

        let position = boat_position - forward * self.params.follow_distance_m
            + right * self.params.follow_side_m
            + Vec3::new(0.0, self.params.follow_height_m, 0.0);
        let target = boat_position
            + forward * self.params.follow_ahead_m
            + Vec3::new(0.0, self.params.follow_look_up_m, 0.0);
        (position, target)
    }

    fn snap_to_follow(&mut self, boat_position: Vec3, boat_forward: Vec2) {
        let (position, target) = self.follow_pose(boat_position, boat_forward);
        self.position = position;
        self.target = target;
    }

    fn update_follow(&mut self, boat_position: Vec3, boat_forward: Vec2) {
        let (desired_position, desired_target) = self.follow_pose(boat_position, boat_forward);
        self.position = self
            .position
            .lerp(desired_position, self.params.position_lag);
        self.target = self.target.lerp(desired_target, self.params.target_lag);
    }

    fn update_orbit(&mut self, time: f32, input: &OrbitInput) {
        let orbit = &mut self.orbit;
        orbit.yaw -= input.yaw_delta * self.params.rotate_speed;
        orbit.pitch = (orbit.pitch + input.pitch_delta * self.params.rotate_speed)
            .clamp(PITCH_MIN, PITCH_MAX);

        match orbit.bounce {
            None => {
                orbit.radius = (orbit.radius
                    * (1.0 - input.zoom_delta * self.params.zoom_speed))
                    .clamp(self.params.min_radius_m, self.params.max_radius_m);

                if orbit.radius >= self.params.max_radius_m - 0.01 {
                    orbit.bounce = Some(Bounce {
                        start_time: time,
                        from_radius: orbit.radius,
                    });
                }
            }
            Some(bounce) => {
                // Zoom locked until the ease completes
                let t = ((time - bounce.start_time) / self.params.bounce_duration_s)
                    .clamp(0.0, 1.0);
                let ease = Easing::Smoothstep.apply(t);
                orbit.radius = bounce.from_radius
                    + (self.params.bounce_radius_m - bounce.from_radius) * ease;
                if t >= 1.0 {
                    orbit.bounce = None;
                }
            }
        }

        self.position = orbit.target + orbit.offset() * orbit.radius;
        self.target = orbit.target;
    }

    fn update_cinematic(&mut self, time: f32) {
        let Some(cin) = self.cinematic else {
            // mode == Cinematic implies a live transition; resync if not
            self.mode = CameraMode::Orbit;
            return;
        };

        let progress =
            ((time - cin.start_time) / self.params.cinematic_duration_s).clamp(0.0, 1.0);
        let ease = Easing::CubicOut.apply(progress);
        self.position = cin.from_position.lerp(cin.to_position, ease);
        self.target = cin.from_target.lerp(cin.to_target, ease);

        if progress >= 1.0 {
            self.cinematic = None;
            self.enter_orbit();
        }
    }

    /// Build the view-projection matrix for the current pose.
    pub fn view_proj(&self, render_config: &RenderConfig) -> (Mat4, Vec3) {
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane_m,
            render_config.far_plane_m,
        );
        (proj * view, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(CameraParams::default())
    }

    const NO_INPUT: OrbitInput = OrbitInput {
        yaw_delta: 0.0,
        pitch_delta: 0.0,
        zoom_delta: 0.0,
    };

    fn boat() -> (Vec3, Vec2) {
        (Vec3::ZERO, Vec2::new(0.0, -1.0))
    }

    #[test]
    fn follow_converges_behind_the_boat() {
        let mut rig = rig();
        let (pos, fwd) = boat();
        for i in 0..600 {
            rig.update(i as f32 / 60.0, pos, fwd, &NO_INPUT);
        }
        // Forward is -z, so the camera settles behind (+z) and above
        assert!(rig.position.z > 25.0);
        assert!((rig.position.y - CameraParams::default().follow_height_m).abs() < 0.5);
        assert!(rig.target.z < rig.position.z);
    }

    #[test]
    fn toggle_cycles_follow_and_orbit() {
        let mut rig = rig();
        let (pos, fwd) = boat();
        assert_eq!(rig.mode(), CameraMode::Follow);
        rig.toggle(pos, fwd);
        assert_eq!(rig.mode(), CameraMode::Orbit);
        rig.toggle(pos, fwd);
        assert_eq!(rig.mode(), CameraMode::Follow);
    }

    #[test]
    fn bounce_back_engages_locks_zoom_and_releases() {
        let params = CameraParams::default();
        let mut rig = rig();
        let (pos, fwd) = boat();
        rig.toggle(pos, fwd); // orbit

        // Zoom all the way out until the limiter engages
        let zoom_out = OrbitInput {
            zoom_delta: -1.0,
            ..NO_INPUT
        };
        let mut t = 0.0;
        for _ in 0..200 {
            t += 1.0 / 60.0;
            rig.update(t, pos, fwd, &zoom_out);
            if rig.is_bouncing() {
                break;
            }
        }
        assert!(rig.is_bouncing());
        assert!(rig.orbit_radius() >= params.max_radius_m - 0.02);

        // Keep trying to zoom out during the bounce: input must be ignored
        // and the radius must ease down to the bounce target
        let bounce_start = t;
        while rig.is_bouncing() {
            t += 1.0 / 60.0;
            rig.update(t, pos, fwd, &zoom_out);
            assert!(
                t < bounce_start + params.bounce_duration_s + 0.2,
                "bounce should finish within its duration"
            );
        }
        assert!((rig.orbit_radius() - params.bounce_radius_m).abs() < 1.0);

        // Unlocked again: a quiet tick keeps the eased radius
        rig.update(t + 1.0 / 60.0, pos, fwd, &NO_INPUT);
        assert!(!rig.is_bouncing());
        assert!((rig.orbit_radius() - params.bounce_radius_m).abs() < 1.0);
    }

    #[test]
    fn cinematic_auto_exits_to_orbit() {
        let params = CameraParams::default();
        let mut rig = rig();
        let buoy = Vec3::new(45.0, 0.0, 30.0);

        rig.start_cinematic(10.0, buoy);
        assert_eq!(rig.mode(), CameraMode::Cinematic);

        let (pos, fwd) = boat();
        rig.update(10.5, pos, fwd, &NO_INPUT);
        assert_eq!(rig.mode(), CameraMode::Cinematic);

        rig.update(10.0 + params.cinematic_duration_s + 0.01, pos, fwd, &NO_INPUT);
        assert_eq!(rig.mode(), CameraMode::Orbit);

        // Pose landed at the buoy-relative endpoint
        let expected = buoy + Vec3::from_array(params.cinematic_offset_m);
        assert!(rig.position.distance(expected) < 0.5);
    }

    #[test]
    fn follow_toggle_is_refused_mid_cinematic() {
        let mut rig = rig();
        let (pos, fwd) = boat();
        rig.toggle(pos, fwd); // orbit
        rig.start_cinematic(0.0, Vec3::new(45.0, 0.0, 30.0));

        // Toggle from cinematic goes to orbit (allowed), not follow
        rig.toggle(pos, fwd);
        assert_eq!(rig.mode(), CameraMode::Orbit);
    }

    #[test]
    fn orbit_resumes_from_cinematic_endpoint() {
        let mut rig = rig();
        let (pos, fwd) = boat();
        let buoy = Vec3::new(-50.0, 0.0, 25.0);
        rig.start_cinematic(0.0, buoy);
        rig.update(5.0, pos, fwd, &NO_INPUT); // well past duration

        assert_eq!(rig.mode(), CameraMode::Orbit);
        let before = rig.position;
        rig.update(5.02, pos, fwd, &NO_INPUT);
        // No discontinuity when orbit takes over
        assert!(rig.position.distance(before) < 0.1);
    }

    #[test]
    fn view_proj_is_finite_and_nontrivial() {
        let rig = rig();
        let (mvp, eye) = rig.view_proj(&RenderConfig::default());
        assert_ne!(mvp, Mat4::IDENTITY);
        assert!(eye.is_finite());
        assert!(mvp.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
