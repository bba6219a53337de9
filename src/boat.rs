//! Boat: rigid-body float controller plus damped explicit-Euler steering.
//!
//! Height and orientation come from a fresh wave sample every tick, never
//! integrated, so the boat cannot drift off the surface. Only horizontal
//! motion integrates velocity.

use glam::{Quat, Vec2, Vec3};

use crate::input::InputState;
use crate::ocean::{surface_normal, WaveSampler};
use crate::params::BoatParams;

pub struct Boat {
    /// Horizontal position; y is the base (pre-wave) height
    pub position: Vec3,
    /// Integrated horizontal velocity (world units per tick)
    pub velocity: Vec3,
    /// Steering yaw (radians)
    pub yaw: f32,
    /// World transform of the hull after the last tick
    pub render_position: Vec3,
    pub orientation: Quat,
    params: BoatParams,
}

impl Boat {
    pub fn new(params: BoatParams) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            render_position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            params,
        }
    }

    /// One simulation tick: float on the sampled surface, then apply
    /// steering impulses, friction, and velocity integration.
    pub fn update(
        &mut self,
        sampler: &WaveSampler,
        time: f32,
        amplitude: f32,
        input: &InputState,
    ) {
        // Float on a fresh sample; no height accumulation
        let sample = sampler.sample(Vec2::new(self.position.x, self.position.z), time);
        self.render_position = self.position;
        self.render_position.y = self.position.y + sample.height * amplitude;

        // Tilt onto the surface normal, then compose steering yaw
        let normal = surface_normal(&sample);
        let tilt = Quat::from_rotation_arc(Vec3::Y, normal);
        self.orientation = tilt * Quat::from_rotation_y(self.yaw);

        // Horizontal physics: impulse, friction, integrate
        self.position += self.velocity;
        self.velocity *= self.params.friction;

        let mut accel = self.params.accel;
        if input.boost {
            accel *= self.params.boost_mult;
        }

        if input.forward {
            self.velocity.x -= self.yaw.sin() * accel;
            self.velocity.z -= self.yaw.cos() * accel;
        }
        if input.backward {
            self.velocity.x += self.yaw.sin() * accel * self.params.reverse_factor;
            self.velocity.z += self.yaw.cos() * accel * self.params.reverse_factor;
        }
        if input.left {
            self.yaw += self.params.turn_speed;
        }
        if input.right {
            self.yaw -= self.params.turn_speed;
        }
    }

    /// Unit forward direction in the xz plane, from the full orientation
    /// (wave tilt included) flattened back onto the surface.
    pub fn forward(&self) -> Vec2 {
        let f = self.orientation * Vec3::new(0.0, 0.0, -1.0);
        let flat = Vec2::new(f.x, f.z);
        if flat.length_squared() > 1e-8 {
            flat.normalize()
        } else {
            Vec2::new(-self.yaw.sin(), -self.yaw.cos())
        }
    }

    /// Horizontal speed (world units per tick).
    pub fn speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::WaveBank;
    use crate::params::OceanParams;

    fn sampler() -> WaveSampler {
        WaveSampler::new(&WaveBank::new(&OceanParams::default())).unwrap()
    }

    #[test]
    fn height_tracks_sample_without_drift() {
        let sampler = sampler();
        let mut boat = Boat::new(BoatParams::default());
        let amplitude = 1.3;

        // Many ticks at a fixed time and position: render height must stay
        // pinned to the sample, not accumulate
        for _ in 0..100 {
            boat.update(&sampler, 3.0, amplitude, &InputState::default());
        }
        let expected = sampler
            .sample(Vec2::new(boat.position.x, boat.position.z), 3.0)
            .height
            * amplitude;
        assert!((boat.render_position.y - expected).abs() < 1e-4);
    }

    #[test]
    fn friction_stops_a_coasting_boat() {
        let sampler = sampler();
        let mut boat = Boat::new(BoatParams::default());
        boat.velocity = Vec3::new(0.5, 0.0, 0.5);

        for _ in 0..600 {
            boat.update(&sampler, 0.0, 1.0, &InputState::default());
        }
        assert!(boat.speed() < 1e-4);
    }

    #[test]
    fn throttle_accelerates_along_heading() {
        let sampler = sampler();
        let mut boat = Boat::new(BoatParams::default());
        let input = InputState {
            forward: true,
            ..Default::default()
        };

        for _ in 0..30 {
            boat.update(&sampler, 0.0, 1.0, &input);
        }
        // yaw 0 forward is -z
        assert!(boat.velocity.z < 0.0);
        assert!(boat.position.z < 0.0);
        assert!(boat.velocity.x.abs() < 1e-4);
    }

    #[test]
    fn boost_multiplies_acceleration() {
        let sampler = sampler();
        let forward = InputState {
            forward: true,
            ..Default::default()
        };
        let boosted = InputState {
            boost: true,
            ..forward
        };

        let mut plain = Boat::new(BoatParams::default());
        let mut fast = Boat::new(BoatParams::default());
        for _ in 0..20 {
            plain.update(&sampler, 0.0, 1.0, &forward);
            fast.update(&sampler, 0.0, 1.0, &boosted);
        }
        assert!(fast.speed() > plain.speed() * 1.5);
    }

    #[test]
    fn steering_turns_the_forward_vector() {
        let sampler = sampler();
        let mut boat = Boat::new(BoatParams::default());
        let left = InputState {
            left: true,
            ..Default::default()
        };
        for _ in 0..50 {
            boat.update(&sampler, 0.0, 0.0, &left);
        }
        // amplitude 0 -> flat surface, forward comes purely from yaw
        assert!(boat.yaw > 0.0);
        let f = boat.forward();
        assert!((f.length() - 1.0).abs() < 1e-4);
        assert!(f.x.abs() > 1e-3, "heading should have rotated off -z");
    }

    #[test]
    fn orientation_stays_unit() {
        let sampler = sampler();
        let mut boat = Boat::new(BoatParams::default());
        for i in 0..100 {
            boat.update(&sampler, i as f32 * 0.02, 1.3, &InputState::default());
            assert!((boat.orientation.length() - 1.0).abs() < 1e-4);
        }
    }
}
