//! Buoy field: floating markers with an idle/highlighted/visited state
//! machine driven by boat proximity.
//!
//! Visited is sticky: once a buoy has been interacted with it never returns
//! to idle or highlighted, only its glow intensity responds to range. Visual
//! affordances (glow level, icon pulse) are explicit animation handles
//! created and stopped as transition side effects.

use glam::{Quat, Vec2, Vec3};
use log::debug;

use crate::anim::{AnimationHandle, Easing, Repeat, Scheduler};
use crate::content::{entries, BuoyContent, BUOY_POSITIONS};
use crate::ocean::{surface_normal, WaveSampler};
use crate::params::BuoyParams;

/// Proximity state of one buoy. `Visited` is permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuoyState {
    Idle,
    Highlighted,
    Visited,
}

/// Glow opacity targets per state and range.
mod glow {
    pub const HIGHLIGHTED: f32 = 0.15;
    pub const VISITED_IN_RANGE: f32 = 0.2;
    pub const VISITED_FAR: f32 = 0.1;
    pub const IDLE: f32 = 0.0;
    /// Per-tick approach factor toward the target opacity
    pub const EASE: f32 = 0.08;
}

pub struct Buoy {
    /// Fixed xz anchor
    pub anchor: Vec2,
    pub state: BuoyState,
    /// World transform after the last tick
    pub position: Vec3,
    pub orientation: Quat,
    /// Current glow opacity (eased toward the state target)
    pub glow: f32,
    /// Icon scale driven by the pulse tween while highlighted/visited
    pub icon_scale: f32,
    pulse: Option<AnimationHandle>,
    pub content: BuoyContent,
}

impl Buoy {
    fn new(anchor: Vec2, content: BuoyContent) -> Self {
        Self {
            anchor,
            state: BuoyState::Idle,
            position: Vec3::new(anchor.x, 0.0, anchor.y),
            orientation: Quat::IDENTITY,
            glow: 0.0,
            icon_scale: 1.0,
            pulse: None,
            content,
        }
    }

    fn start_pulse(&mut self, anim: &mut Scheduler) {
        if self.pulse.is_none() {
            self.pulse = Some(anim.start(1.0, 1.1, 1.0, Easing::SineInOut, Repeat::Yoyo));
        }
    }

    fn stop_pulse(&mut self, anim: &mut Scheduler) {
        if let Some(handle) = self.pulse.take() {
            anim.stop(handle);
        }
        self.icon_scale = 1.0;
    }
}

/// All buoys plus the single "currently highlighted" selection.
pub struct BuoyField {
    buoys: Vec<Buoy>,
    highlighted: Option<usize>,
    pub params: BuoyParams,
}

impl BuoyField {
    pub fn new(params: BuoyParams) -> Self {
        let buoys = BUOY_POSITIONS
            .iter()
            .zip(entries())
            .map(|(pos, content)| Buoy::new(Vec2::new(pos[0], pos[1]), content))
            .collect();
        Self {
            buoys,
            highlighted: None,
            params,
        }
    }

    pub fn buoys(&self) -> &[Buoy] {
        &self.buoys
    }

    /// Index of the buoy an interact command would target.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Per-tick update: float every buoy on the shared surface, then run
    /// the proximity state machine against the boat position.
    ///
    /// Highlight selection is nearest-in-range, not scan order, so two
    /// overlapping interaction radii resolve predictably.
    pub fn update(
        &mut self,
        sampler: &WaveSampler,
        time: f32,
        boat_position: Vec3,
        anim: &mut Scheduler,
    ) {
        let mut nearest: Option<(usize, f32)> = None;

        for (index, buoy) in self.buoys.iter_mut().enumerate() {
            // Float: reduced wave influence plus a slow phase-offset bob
            let sample = sampler.sample(buoy.anchor, time);
            let bob = (time * self.params.bob_speed + index as f32).sin()
                * self.params.bob_amplitude_m;
            buoy.position = Vec3::new(
                buoy.anchor.x,
                sample.height * self.params.wave_influence + bob,
                buoy.anchor.y,
            );
            buoy.orientation = Quat::from_rotation_arc(Vec3::Y, surface_normal(&sample));

            let distance = buoy.position.distance(boat_position);
            let in_range = distance <= self.params.interaction_radius_m;

            if in_range {
                match nearest {
                    Some((_, best)) if best <= distance => {}
                    _ => nearest = Some((index, distance)),
                }
            }

            // State transitions; Visited never leaves
            let glow_target = match (buoy.state, in_range) {
                (BuoyState::Visited, true) => {
                    buoy.start_pulse(anim);
                    glow::VISITED_IN_RANGE
                }
                (BuoyState::Visited, false) => {
                    buoy.stop_pulse(anim);
                    glow::VISITED_FAR
                }
                (BuoyState::Idle, true) => {
                    debug!("buoy {} highlighted", index);
                    buoy.state = BuoyState::Highlighted;
                    buoy.start_pulse(anim);
                    glow::HIGHLIGHTED
                }
                (BuoyState::Highlighted, true) => glow::HIGHLIGHTED,
                (BuoyState::Highlighted, false) => {
                    debug!("buoy {} back to idle", index);
                    buoy.state = BuoyState::Idle;
                    buoy.stop_pulse(anim);
                    glow::IDLE
                }
                (BuoyState::Idle, false) => glow::IDLE,
            };

            buoy.glow += (glow_target - buoy.glow) * glow::EASE;
            if let Some(handle) = buoy.pulse {
                if let Some(scale) = anim.value(handle) {
                    buoy.icon_scale = scale;
                }
            }
        }

        self.highlighted = nearest.map(|(index, _)| index);
    }

    /// Handle an explicit interact command: marks the highlighted buoy
    /// visited (permanently) and returns its index for the camera/UI flow.
    pub fn interact(&mut self, anim: &mut Scheduler) -> Option<usize> {
        let index = self.highlighted?;
        let buoy = &mut self.buoys[index];
        buoy.state = BuoyState::Visited;
        buoy.glow = glow::VISITED_IN_RANGE;
        // Restart the pulse so the celebration scale reads as a fresh beat
        buoy.stop_pulse(anim);
        buoy.start_pulse(anim);
        Some(index)
    }

    /// Stop all animation handles (scene teardown / re-init).
    pub fn teardown(&mut self, anim: &mut Scheduler) {
        for buoy in &mut self.buoys {
            buoy.stop_pulse(anim);
        }
        self.highlighted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::WaveBank;
    use crate::params::OceanParams;

    fn fixtures() -> (BuoyField, WaveSampler, Scheduler) {
        let sampler = WaveSampler::new(&WaveBank::new(&OceanParams::default())).unwrap();
        (
            BuoyField::new(BuoyParams::default()),
            sampler,
            Scheduler::new(),
        )
    }

    fn at_buoy(field: &BuoyField, index: usize) -> Vec3 {
        let a = field.buoys()[index].anchor;
        Vec3::new(a.x, 0.0, a.y)
    }

    fn far_away() -> Vec3 {
        Vec3::new(500.0, 0.0, 500.0)
    }

    #[test]
    fn proximity_highlights_and_releases() {
        let (mut field, sampler, mut anim) = fixtures();

        field.update(&sampler, 0.0, at_buoy(&field, 0), &mut anim);
        assert_eq!(field.buoys()[0].state, BuoyState::Highlighted);
        assert_eq!(field.highlighted(), Some(0));

        field.update(&sampler, 0.1, far_away(), &mut anim);
        assert_eq!(field.buoys()[0].state, BuoyState::Idle);
        assert_eq!(field.highlighted(), None);
    }

    #[test]
    fn visited_is_sticky() {
        let (mut field, sampler, mut anim) = fixtures();

        field.update(&sampler, 0.0, at_buoy(&field, 2), &mut anim);
        assert_eq!(field.interact(&mut anim), Some(2));
        assert_eq!(field.buoys()[2].state, BuoyState::Visited);

        // Leave and return: state never reverts
        field.update(&sampler, 1.0, far_away(), &mut anim);
        assert_eq!(field.buoys()[2].state, BuoyState::Visited);
        field.update(&sampler, 2.0, at_buoy(&field, 2), &mut anim);
        assert_eq!(field.buoys()[2].state, BuoyState::Visited);
    }

    #[test]
    fn visited_glow_rises_in_range() {
        let (mut field, sampler, mut anim) = fixtures();
        field.update(&sampler, 0.0, at_buoy(&field, 1), &mut anim);
        field.interact(&mut anim);

        for i in 0..400 {
            field.update(&sampler, i as f32 * 0.02, far_away(), &mut anim);
        }
        let far_glow = field.buoys()[1].glow;

        for i in 0..400 {
            field.update(&sampler, 8.0 + i as f32 * 0.02, at_buoy(&field, 1), &mut anim);
        }
        assert!(field.buoys()[1].glow > far_glow);
    }

    #[test]
    fn interact_without_highlight_is_a_no_op() {
        let (mut field, sampler, mut anim) = fixtures();
        field.update(&sampler, 0.0, far_away(), &mut anim);
        assert_eq!(field.interact(&mut anim), None);
        assert!(field.buoys().iter().all(|b| b.state == BuoyState::Idle));
    }

    #[test]
    fn nearest_buoy_wins_when_two_are_in_range() {
        let (mut field, sampler, mut anim) = fixtures();

        // Midpoint between buoys 0 (45,30) and 4 (0,65), nudged toward 4
        let boat = Vec3::new(20.0, 0.0, 50.0);
        field.update(&sampler, 0.0, boat, &mut anim);

        let d0 = field.buoys()[0].position.distance(boat);
        let d4 = field.buoys()[4].position.distance(boat);
        assert!(d0 <= field.params.interaction_radius_m);
        assert!(d4 <= field.params.interaction_radius_m);

        let expected = if d0 < d4 { 0 } else { 4 };
        assert_eq!(field.highlighted(), Some(expected));
    }

    #[test]
    fn pulse_handles_are_released_on_idle() {
        let (mut field, sampler, mut anim) = fixtures();
        field.update(&sampler, 0.0, at_buoy(&field, 0), &mut anim);
        assert_eq!(anim.active(), 1);

        field.update(&sampler, 0.1, far_away(), &mut anim);
        assert_eq!(anim.active(), 0);
        assert_eq!(field.buoys()[0].icon_scale, 1.0);
    }

    #[test]
    fn teardown_clears_handles_and_selection() {
        let (mut field, sampler, mut anim) = fixtures();
        field.update(&sampler, 0.0, at_buoy(&field, 0), &mut anim);
        field.teardown(&mut anim);
        assert_eq!(anim.active(), 0);
        assert_eq!(field.highlighted(), None);
    }
}
