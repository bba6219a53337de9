//! Scene orchestrator: owns every simulation subsystem and ticks them in a
//! fixed order each frame.
//!
//! Per tick: animation timers, then the camera, then ocean time, then the
//! boat float, then the wake trail, then buoy proximity. The host renders
//! from the resulting state afterward.

use log::info;
use thiserror::Error;

use crate::anim::Scheduler;
use crate::boat::Boat;
use crate::buoy::BuoyField;
use crate::camera::CameraRig;
use crate::input::{InputEvents, InputState, OrbitInput};
use crate::ocean::{SamplerError, WaveBank, WaveSampler};
use crate::params::{BoatParams, BuoyParams, CameraParams, OceanParams, TrailParams};
use crate::trail::TrailBuffer;
use crate::ui::DetailUi;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Sampler(#[from] SamplerError),
}

/// Delayed detail-view open scheduled by an interact command.
struct PendingDetail {
    open_at: f32,
    buoy_index: usize,
}

pub struct Scene {
    pub bank: WaveBank,
    sampler: WaveSampler,
    pub boat: Boat,
    pub trail: TrailBuffer,
    pub buoys: BuoyField,
    pub camera: CameraRig,
    pub anim: Scheduler,
    ocean_params: OceanParams,
    /// Scaled wave-phase time fed to every sampler call and the shader
    sim_time: f32,
    /// Unscaled seconds since startup; camera and UI delays run on this
    wall_time: f32,
    pending_detail: Option<PendingDetail>,
}

impl Scene {
    pub fn new(
        ocean_params: OceanParams,
        boat_params: BoatParams,
        trail_params: TrailParams,
        buoy_params: BuoyParams,
        camera_params: CameraParams,
    ) -> Result<Self, SceneError> {
        let bank = WaveBank::new(&ocean_params);
        let sampler = WaveSampler::new(&bank)?;
        let trail_seed = ocean_params.seed.wrapping_add(1);

        Ok(Self {
            bank,
            sampler,
            boat: Boat::new(boat_params),
            trail: TrailBuffer::new(trail_params, trail_seed),
            buoys: BuoyField::new(buoy_params),
            camera: CameraRig::new(camera_params),
            anim: Scheduler::new(),
            ocean_params,
            sim_time: 0.0,
            wall_time: 0.0,
            pending_detail: None,
        })
    }

    /// Wave-phase time for the shader uniforms.
    pub fn sim_time(&self) -> f32 {
        self.sim_time
    }

    pub fn sampler(&self) -> &WaveSampler {
        &self.sampler
    }

    pub fn ocean_params(&self) -> &OceanParams {
        &self.ocean_params
    }

    /// One frame. `dt` is wall-clock seconds since the previous call.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputState,
        orbit_input: &OrbitInput,
        events: InputEvents,
        ui: &mut dyn DetailUi,
    ) {
        self.wall_time += dt;
        self.anim.advance(dt);

        self.handle_events(events, ui);

        // While the detail view is open the boat still floats but ignores
        // steering, so the reader isn't drifting away from the buoy.
        let steering = if ui.is_open() {
            InputState::default()
        } else {
            *input
        };

        self.camera.update(
            self.wall_time,
            self.boat.render_position,
            self.boat.forward(),
            orbit_input,
        );

        self.sim_time += dt * self.ocean_params.time_scale;

        self.boat.update(
            &self.sampler,
            self.sim_time,
            self.ocean_params.amplitude,
            &steering,
        );
        self.trail.update(
            self.sim_time,
            self.boat.render_position,
            self.boat.speed(),
            self.boat.forward(),
            steering.boost,
        );
        self.buoys.update(
            &self.sampler,
            self.sim_time,
            self.boat.render_position,
            &mut self.anim,
        );

        if let Some(pending) = &self.pending_detail {
            if self.wall_time >= pending.open_at {
                let buoy = &self.buoys.buoys()[pending.buoy_index];
                ui.show_detail(&buoy.content);
                self.pending_detail = None;
            }
        }
    }

    fn handle_events(&mut self, events: InputEvents, ui: &mut dyn DetailUi) {
        if events.close_ui && ui.close() {
            self.camera
                .request_follow(self.boat.render_position, self.boat.forward());
        }

        // Discrete commands are suppressed while a detail view is up
        if ui.is_open() {
            return;
        }

        if events.toggle_camera {
            self.camera
                .toggle(self.boat.render_position, self.boat.forward());
        }

        if events.interact && self.pending_detail.is_none() {
            if let Some(index) = self.buoys.interact(&mut self.anim) {
                let buoy = &self.buoys.buoys()[index];
                info!("visiting buoy {}: {}", index, buoy.content.title);
                self.camera.start_cinematic(self.wall_time, buoy.position);
                self.pending_detail = Some(PendingDetail {
                    open_at: self.wall_time + self.buoys.params.detail_delay_s,
                    buoy_index: index,
                });
            }
        }
    }

    /// Release per-run state: stamps, tweens, pending UI work. Wave phases
    /// and visited flags persist; this is a pause/reset seam, not a rebuild.
    pub fn teardown(&mut self, ui: &mut dyn DetailUi) {
        ui.close();
        self.pending_detail = None;
        self.trail.clear();
        self.buoys.teardown(&mut self.anim);
        self.anim.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buoy::BuoyState;
    use crate::camera::CameraMode;
    use crate::ui::LogUi;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn scene() -> Scene {
        Scene::new(
            OceanParams::default(),
            BoatParams::default(),
            TrailParams::default(),
            BuoyParams::default(),
            CameraParams::default(),
        )
        .unwrap()
    }

    fn tick(scene: &mut Scene, ui: &mut LogUi, events: InputEvents) {
        scene.update(
            DT,
            &InputState::default(),
            &OrbitInput::default(),
            events,
            ui,
        );
    }

    fn park_at_buoy(scene: &mut Scene, index: usize) {
        let anchor = scene.buoys.buoys()[index].anchor;
        scene.boat.position = Vec3::new(anchor.x, 0.0, anchor.y);
    }

    #[test]
    fn sim_time_advances_scaled() {
        let mut scene = scene();
        let mut ui = LogUi::new();
        for _ in 0..60 {
            tick(&mut scene, &mut ui, InputEvents::default());
        }
        let expected = 60.0 * DT * scene.ocean_params().time_scale;
        assert!((scene.sim_time() - expected).abs() < 1e-3);
    }

    #[test]
    fn interact_starts_cinematic_then_opens_detail() {
        let mut scene = scene();
        let mut ui = LogUi::new();
        park_at_buoy(&mut scene, 0);
        tick(&mut scene, &mut ui, InputEvents::default());
        assert_eq!(scene.buoys.highlighted(), Some(0));

        tick(
            &mut scene,
            &mut ui,
            InputEvents {
                interact: true,
                ..Default::default()
            },
        );
        assert_eq!(scene.buoys.buoys()[0].state, BuoyState::Visited);
        assert_eq!(scene.camera.mode(), CameraMode::Cinematic);
        assert!(!ui.is_open(), "detail must wait for the delay");

        // Run past the delay; the detail view opens exactly once
        let delay = scene.buoys.params.detail_delay_s;
        let ticks = (delay / DT) as usize + 5;
        for _ in 0..ticks {
            tick(&mut scene, &mut ui, InputEvents::default());
        }
        assert!(ui.is_open());
    }

    #[test]
    fn interact_is_suppressed_while_detail_is_open() {
        let mut scene = scene();
        let mut ui = LogUi::new();
        park_at_buoy(&mut scene, 1);
        tick(&mut scene, &mut ui, InputEvents::default());
        ui.show_detail(&scene.buoys.buoys()[1].content);

        tick(
            &mut scene,
            &mut ui,
            InputEvents {
                interact: true,
                ..Default::default()
            },
        );
        assert_eq!(scene.buoys.buoys()[1].state, BuoyState::Highlighted);
    }

    #[test]
    fn closing_the_detail_returns_to_follow() {
        let mut scene = scene();
        let mut ui = LogUi::new();
        park_at_buoy(&mut scene, 0);
        tick(&mut scene, &mut ui, InputEvents::default());
        tick(
            &mut scene,
            &mut ui,
            InputEvents {
                interact: true,
                ..Default::default()
            },
        );

        // Let the cinematic finish (auto-exits to orbit) and the UI open
        for _ in 0..240 {
            tick(&mut scene, &mut ui, InputEvents::default());
        }
        assert!(ui.is_open());
        assert_eq!(scene.camera.mode(), CameraMode::Orbit);

        tick(
            &mut scene,
            &mut ui,
            InputEvents {
                close_ui: true,
                ..Default::default()
            },
        );
        assert!(!ui.is_open());
        assert_eq!(scene.camera.mode(), CameraMode::Follow);
    }

    #[test]
    fn camera_toggle_ignored_while_detail_open() {
        let mut scene = scene();
        let mut ui = LogUi::new();
        ui.show_detail(&scene.buoys.buoys()[0].content);
        tick(
            &mut scene,
            &mut ui,
            InputEvents {
                toggle_camera: true,
                ..Default::default()
            },
        );
        assert_eq!(scene.camera.mode(), CameraMode::Follow);
    }

    #[test]
    fn steering_is_frozen_while_detail_open() {
        let mut scene = scene();
        let mut ui = LogUi::new();
        ui.show_detail(&scene.buoys.buoys()[0].content);

        let throttle = InputState {
            forward: true,
            ..Default::default()
        };
        for _ in 0..30 {
            scene.update(
                DT,
                &throttle,
                &OrbitInput::default(),
                InputEvents::default(),
                &mut ui,
            );
        }
        assert!(scene.boat.speed() < 1e-6);
    }

    #[test]
    fn teardown_releases_everything() {
        let mut scene = scene();
        let mut ui = LogUi::new();
        park_at_buoy(&mut scene, 2);
        tick(&mut scene, &mut ui, InputEvents::default());
        tick(
            &mut scene,
            &mut ui,
            InputEvents {
                interact: true,
                ..Default::default()
            },
        );

        scene.teardown(&mut ui);
        assert!(!ui.is_open());
        assert_eq!(scene.anim.active(), 0);
        assert!(scene.trail.is_empty());
        // Visited state survives teardown
        assert_eq!(scene.buoys.buoys()[2].state, BuoyState::Visited);
    }
}
