//! Wake/spray trail: a bounded ring buffer of decaying displacement stamps
//! behind the boat, uploaded to the GPU as a fixed-size uniform array.
//!
//! A stamp's height is never stored mutably — it is derived from age with an
//! exponential curve tuned so the height reaches 1% of base exactly at the
//! stamp's fade duration. Removal happens two independent ways: age past the
//! fade duration, and FIFO eviction when the buffer is full.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::params::{TrailParams, TRAIL_CAPACITY};

/// exp(-K_FADE) == 0.01: the decay constant divided by fade duration
const K_FADE: f32 = 4.605_170_2; // ln(100)

/// One timestamped spray stamp. Immutable after creation; only its derived
/// height changes with age.
#[derive(Debug, Clone, Copy)]
pub struct TrailStamp {
    pub position: Vec3,
    /// Unit travel direction of the boat at emission (xz plane)
    pub direction: Vec2,
    /// Simulation time of emission (seconds)
    pub created_at: f32,
    pub base_height: f32,
    pub boosted: bool,
}

impl TrailStamp {
    /// Fade duration for this stamp (boost lengthens it).
    pub fn fade_duration(&self, params: &TrailParams) -> f32 {
        if self.boosted {
            params.fade_duration_s * params.boost_fade_mult
        } else {
            params.fade_duration_s
        }
    }

    /// Wedge radius for this stamp (boost widens it).
    pub fn radius(&self, params: &TrailParams) -> f32 {
        if self.boosted {
            params.spray_radius_m * params.boost_radius_mult
        } else {
            params.spray_radius_m
        }
    }

    /// Derived height at `time`: base * exp(-age * k), 0 once past fade.
    pub fn effective_height(&self, time: f32, params: &TrailParams) -> f32 {
        let age = time - self.created_at;
        let fade = self.fade_duration(params);
        if age < 0.0 || age >= fade {
            return 0.0;
        }
        self.base_height * (-age * K_FADE / fade).exp()
    }
}

/// GPU-facing stamp slot. Exactly [`TRAIL_CAPACITY`] of these go up every
/// frame; inactive slots carry height 0 so stale indices never displace.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TrailSlot {
    /// xz position, wedge radius, current (decayed) height
    pub pos_radius_height: [f32; 4],
    /// xz travel direction, boosted flag (0/1), padding
    pub dir_boost: [f32; 4],
}

/// Bounded append-and-decay buffer of trail stamps.
pub struct TrailBuffer {
    stamps: VecDeque<TrailStamp>,
    params: TrailParams,
    last_emit: Option<f32>,
    rng: StdRng,
}

impl TrailBuffer {
    pub fn new(params: TrailParams, seed: u64) -> Self {
        Self {
            stamps: VecDeque::with_capacity(TRAIL_CAPACITY),
            params,
            last_emit: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Per-tick update: emit a stamp behind the boat when it is moving fast
    /// enough and the rate limit allows, then drop fully faded stamps.
    pub fn update(
        &mut self,
        time: f32,
        boat_position: Vec3,
        boat_speed: f32,
        boat_direction: Vec2,
        boost: bool,
    ) {
        if boat_speed > self.params.min_speed {
            let due = match self.last_emit {
                Some(last) => time - last > self.params.emit_interval_s,
                None => true,
            };
            if due {
                self.emit(time, boat_position, boat_direction, boost);
                self.last_emit = Some(time);
            }
        }

        let params = &self.params;
        self.stamps
            .retain(|s| time - s.created_at < s.fade_duration(params));
    }

    fn emit(&mut self, time: f32, boat_position: Vec3, direction: Vec2, boost: bool) {
        let behind = direction * -self.params.offset_behind_m;
        let jx = self.rng.random_range(-self.params.jitter_m[0]..=self.params.jitter_m[0]);
        let jz = self.rng.random_range(-self.params.jitter_m[1]..=self.params.jitter_m[1]);

        let base_height = if boost {
            self.params.spray_height_m * self.params.boost_height_mult
        } else {
            self.params.spray_height_m
        };

        self.stamps.push_back(TrailStamp {
            position: boat_position + Vec3::new(behind.x + jx, 0.0, behind.y + jz),
            direction,
            created_at: time,
            base_height,
            boosted: boost,
        });

        // Capacity bound: oldest out first, never an error
        while self.stamps.len() > TRAIL_CAPACITY {
            self.stamps.pop_front();
        }
    }

    /// Number of live stamps.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn stamps(&self) -> impl Iterator<Item = &TrailStamp> {
        self.stamps.iter()
    }

    /// Clear all stamps (scene teardown / re-init).
    pub fn clear(&mut self) {
        self.stamps.clear();
        self.last_emit = None;
    }

    /// Pack the full fixed-size slot array for upload. Every slot beyond the
    /// live stamps carries an explicit zero height.
    pub fn uniform_slots(&self, time: f32) -> [TrailSlot; TRAIL_CAPACITY] {
        let mut slots = [TrailSlot::default(); TRAIL_CAPACITY];
        for (slot, stamp) in slots.iter_mut().zip(self.stamps.iter()) {
            *slot = TrailSlot {
                pos_radius_height: [
                    stamp.position.x,
                    stamp.position.z,
                    stamp.radius(&self.params),
                    stamp.effective_height(time, &self.params),
                ],
                dir_boost: [
                    stamp.direction.x,
                    stamp.direction.y,
                    if stamp.boosted { 1.0 } else { 0.0 },
                    0.0,
                ],
            };
        }
        slots
    }
}
