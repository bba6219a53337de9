//! Per-frame tween scheduler owned by the scene.
//!
//! Handles are generational: stopping a handle whose slot was reused is a
//! no-op, so state machines can hold `Option<AnimationHandle>` and stop them
//! on transition without tracking liveness themselves.

/// Easing curves used by the scene's visual affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadInOut,
    /// 1 - (1-t)^3, the cinematic camera curve
    CubicOut,
    SineInOut,
    /// t*t*(3-2t), the bounce-back curve
    Smoothstep,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => 0.5 - 0.5 * (std::f32::consts::PI * t).cos(),
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Repetition policy for a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Play once, then the slot is reclaimed on the next advance
    Once,
    /// Ping-pong between endpoints until explicitly stopped
    Yoyo,
}

#[derive(Debug, Clone)]
struct Tween {
    from: f32,
    to: f32,
    duration_s: f32,
    elapsed_s: f32,
    easing: Easing,
    repeat: Repeat,
}

impl Tween {
    fn value(&self) -> f32 {
        let cycle = (self.elapsed_s / self.duration_s).clamp(0.0, f32::MAX);
        let t = match self.repeat {
            Repeat::Once => cycle.min(1.0),
            Repeat::Yoyo => {
                let phase = cycle % 2.0;
                if phase <= 1.0 {
                    phase
                } else {
                    2.0 - phase
                }
            }
        };
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    fn finished(&self) -> bool {
        self.repeat == Repeat::Once && self.elapsed_s >= self.duration_s
    }
}

/// Cancellable reference to a running tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationHandle {
    index: usize,
    generation: u32,
}

/// Slot-based tween pool advanced once per frame by the scene.
#[derive(Default)]
pub struct Scheduler {
    slots: Vec<Option<Tween>>,
    generations: Vec<u32>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween from `from` to `to` over `duration_s` seconds.
    pub fn start(
        &mut self,
        from: f32,
        to: f32,
        duration_s: f32,
        easing: Easing,
        repeat: Repeat,
    ) -> AnimationHandle {
        let tween = Tween {
            from,
            to,
            duration_s: duration_s.max(f32::EPSILON),
            elapsed_s: 0.0,
            easing,
            repeat,
        };

        match self.slots.iter().position(|s| s.is_none()) {
            Some(index) => {
                self.slots[index] = Some(tween);
                AnimationHandle {
                    index,
                    generation: self.generations[index],
                }
            }
            None => {
                self.slots.push(Some(tween));
                self.generations.push(0);
                AnimationHandle {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    /// Stop a tween. Stale handles are ignored.
    pub fn stop(&mut self, handle: AnimationHandle) {
        if self.is_live(handle) {
            self.slots[handle.index] = None;
            self.generations[handle.index] += 1;
        }
    }

    /// Current value, or `None` if the handle is stale.
    pub fn value(&self, handle: AnimationHandle) -> Option<f32> {
        if self.is_live(handle) {
            self.slots[handle.index].as_ref().map(Tween::value)
        } else {
            None
        }
    }

    /// Advance all tweens; finished one-shots are reclaimed.
    pub fn advance(&mut self, dt: f32) {
        for (slot, generation) in self.slots.iter_mut().zip(self.generations.iter_mut()) {
            if let Some(tween) = slot {
                tween.elapsed_s += dt;
                if tween.finished() {
                    *slot = None;
                    *generation += 1;
                }
            }
        }
    }

    /// Drop every tween (scene teardown). Outstanding handles go stale.
    pub fn clear(&mut self) {
        for (slot, generation) in self.slots.iter_mut().zip(self.generations.iter_mut()) {
            if slot.is_some() {
                *slot = None;
                *generation += 1;
            }
        }
    }

    /// Live tween count (teardown assertions, debugging).
    pub fn active(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    fn is_live(&self, handle: AnimationHandle) -> bool {
        handle.index < self.slots.len()
            && self.generations[handle.index] == handle.generation
            && self.slots[handle.index].is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_runs_to_completion_and_is_reclaimed() {
        let mut sched = Scheduler::new();
        let h = sched.start(0.0, 10.0, 1.0, Easing::Linear, Repeat::Once);

        assert_eq!(sched.value(h), Some(0.0));
        sched.advance(0.5);
        assert!((sched.value(h).unwrap() - 5.0).abs() < 1e-5);
        sched.advance(0.6);
        // Finished: slot reclaimed, handle stale
        assert_eq!(sched.value(h), None);
        assert_eq!(sched.active(), 0);
    }

    #[test]
    fn yoyo_ping_pongs_until_stopped() {
        let mut sched = Scheduler::new();
        let h = sched.start(1.0, 2.0, 1.0, Easing::Linear, Repeat::Yoyo);

        sched.advance(1.0);
        assert!((sched.value(h).unwrap() - 2.0).abs() < 1e-5);
        sched.advance(1.0);
        assert!((sched.value(h).unwrap() - 1.0).abs() < 1e-5);
        sched.advance(0.5);
        assert!((sched.value(h).unwrap() - 1.5).abs() < 1e-5);

        sched.stop(h);
        assert_eq!(sched.value(h), None);
    }

    #[test]
    fn stale_handles_are_ignored_after_slot_reuse() {
        let mut sched = Scheduler::new();
        let a = sched.start(0.0, 1.0, 1.0, Easing::Linear, Repeat::Once);
        sched.stop(a);

        // Slot 0 is reused with a bumped generation
        let b = sched.start(5.0, 6.0, 1.0, Easing::Linear, Repeat::Yoyo);
        assert_eq!(sched.value(a), None);
        sched.stop(a); // no-op, must not kill b
        assert!(sched.value(b).is_some());
    }

    #[test]
    fn easings_hit_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::QuadInOut,
            Easing::CubicOut,
            Easing::SineInOut,
            Easing::Smoothstep,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn clear_invalidates_all_handles() {
        let mut sched = Scheduler::new();
        let a = sched.start(0.0, 1.0, 1.0, Easing::Linear, Repeat::Yoyo);
        let b = sched.start(0.0, 1.0, 1.0, Easing::Linear, Repeat::Yoyo);
        sched.clear();
        assert_eq!(sched.value(a), None);
        assert_eq!(sched.value(b), None);
        assert_eq!(sched.active(), 0);
    }
}
