//! Wakefield - an interactive ocean scene.
//!
//! Steer a boat across a Gerstner-wave point grid, leave a decaying wake,
//! and visit the story buoys scattered around the spawn point.

mod anim;
mod assets;
mod boat;
mod buoy;
mod camera;
mod cli;
mod content;
mod input;
mod ocean;
mod params;
mod rendering;
mod scene;
mod trail;
mod ui;

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::{Mat4, Quat, Vec3};
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use assets::{fallback_boat, fallback_buoy, glow_shell, load_model, LoadPoll, MeshData, ModelLoad};
use cli::Args;
use input::{InputEvents, InputState, OrbitInput};
use ocean::OceanGrid;
use params::*;
use rendering::{BodyId, BodyUniforms, OceanStyle, OceanUniforms, RenderSystem};
use scene::Scene;
use ui::{DetailUi, LogUi};

const BOAT_COLOR: [f32; 4] = [0.85, 0.88, 0.92, 1.0];
const BUOY_COLOR: [f32; 4] = [0.95, 0.42, 0.12, 1.0];
const GLOW_COLOR: [f32; 3] = [1.0, 0.78, 0.3];

/// One tracked model slot: the registered body plus an optional in-flight
/// load that will replace its fallback geometry.
struct ModelSlot {
    load: Option<ModelLoad>,
    mesh: Option<MeshData>,
    label: &'static str,
}

impl ModelSlot {
    fn poll(&mut self) {
        let Some(load) = &mut self.load else {
            return;
        };
        match load.poll() {
            LoadPoll::Pending => {}
            LoadPoll::Ready(mesh) => {
                info!("{} model loaded", self.label);
                self.mesh = Some(mesh);
                self.load = None;
            }
            LoadPoll::Failed(e) => {
                warn!("{} model unavailable, keeping fallback: {}", self.label, e);
                self.load = None;
            }
        }
    }
}

/// Main application state
struct App {
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    scene: Scene,
    ui: LogUi,
    grid: OceanGrid,

    // Style parameters consumed by the uniform packer every frame
    grid_params: GridParams,
    cosmetics: CosmeticParams,
    fog: FogParams,
    render_config: RenderConfig,
    asset_params: AssetParams,

    // Input collection for the next tick
    input: InputState,
    events: InputEvents,
    orbit: OrbitInput,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,

    // GPU body handles, filled in on resume
    boat_body: Option<BodyId>,
    buoy_bodies: Vec<BodyId>,
    glow_bodies: Vec<BodyId>,
    boat_model: ModelSlot,
    buoy_model: ModelSlot,

    last_frame: Instant,
}

impl App {
    fn new(args: &Args) -> Result<Self, scene::SceneError> {
        let grid_params = args.grid_params();
        let scene = Scene::new(
            args.ocean_params(),
            BoatParams::default(),
            TrailParams::default(),
            BuoyParams::default(),
            CameraParams::default(),
        )?;

        Ok(Self {
            window: None,
            render_system: None,
            scene,
            ui: LogUi::new(),
            grid: OceanGrid::new(&grid_params),
            grid_params,
            cosmetics: CosmeticParams::default(),
            fog: FogParams::default(),
            render_config: RenderConfig::default(),
            asset_params: args.asset_params(),
            input: InputState::default(),
            events: InputEvents::default(),
            orbit: OrbitInput::default(),
            dragging: false,
            last_cursor: None,
            boat_body: None,
            buoy_bodies: Vec::new(),
            glow_bodies: Vec::new(),
            boat_model: ModelSlot {
                load: None,
                mesh: None,
                label: "boat",
            },
            buoy_model: ModelSlot {
                load: None,
                mesh: None,
                label: "buoy",
            },
            last_frame: Instant::now(),
        })
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => self.input.forward = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.input.backward = pressed,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.input.left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.input.right = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.input.boost = pressed,
            KeyCode::KeyE if pressed => self.events.interact = true,
            KeyCode::KeyC if pressed => self.events.toggle_camera = true,
            _ => {}
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        self.poll_models();

        let orbit = self.orbit.take();
        let events = self.events.take();
        self.scene.update(dt, &self.input, &orbit, events, &mut self.ui);

        let Some(render_system) = &self.render_system else {
            return;
        };

        let (view_proj, camera_pos) = self.scene.camera.view_proj(&self.render_config);

        let style = OceanStyle {
            ocean: self.scene.ocean_params(),
            grid: &self.grid_params,
            cosmetics: &self.cosmetics,
            fog: &self.fog,
        };
        let uniforms = OceanUniforms::pack(
            view_proj,
            camera_pos,
            self.scene.sim_time(),
            render_system.size(),
            &style,
            self.scene.sampler().waves(),
            self.scene.trail.uniform_slots(self.scene.sim_time()),
        );
        render_system.update_ocean_uniforms(&uniforms);

        if let Some(id) = self.boat_body {
            let model = Mat4::from_rotation_translation(
                self.scene.boat.orientation,
                self.scene.boat.render_position,
            );
            render_system.update_body(id, &BodyUniforms::new(view_proj, model, BOAT_COLOR));
        }

        for (buoy, (&body, &glow)) in self
            .scene
            .buoys
            .buoys()
            .iter()
            .zip(self.buoy_bodies.iter().zip(&self.glow_bodies))
        {
            let model = Mat4::from_rotation_translation(buoy.orientation, buoy.position);
            render_system.update_body(body, &BodyUniforms::new(view_proj, model, BUOY_COLOR));

            let glow_model = Mat4::from_scale_rotation_translation(
                Vec3::splat(buoy.icon_scale),
                Quat::IDENTITY,
                buoy.position,
            );
            let glow_color = [GLOW_COLOR[0], GLOW_COLOR[1], GLOW_COLOR[2], buoy.glow];
            render_system.update_body(glow, &BodyUniforms::new(view_proj, glow_model, glow_color));
        }

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = (self.render_config.window_width, self.render_config.window_height);
                if let Some(rs) = &mut self.render_system {
                    rs.resize(w, h);
                }
            }
            Err(e) => error!("render error: {:?}", e),
        }
    }

    /// Advance in-flight model loads and swap finished meshes in.
    fn poll_models(&mut self) {
        self.boat_model.poll();
        if let (Some(mesh), Some(id), Some(rs)) = (
            self.boat_model.mesh.take(),
            self.boat_body,
            self.render_system.as_mut(),
        ) {
            rs.replace_mesh(id, &mesh);
        }

        self.buoy_model.poll();
        if let (Some(mesh), Some(rs)) = (self.buoy_model.mesh.take(), self.render_system.as_mut()) {
            for &id in &self.buoy_bodies {
                rs.replace_mesh(id, &mesh);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Wakefield")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let mut render_system =
            pollster::block_on(RenderSystem::new(Arc::clone(&window), &self.grid)).unwrap();

        // Register bodies with fallback geometry; finished loads swap in later
        self.boat_body = Some(render_system.add_body(&fallback_boat(), false));
        let buoy_mesh = fallback_buoy();
        let shell = glow_shell();
        for _ in self.scene.buoys.buoys() {
            self.buoy_bodies.push(render_system.add_body(&buoy_mesh, false));
            self.glow_bodies.push(render_system.add_body(&shell, true));
        }

        self.boat_model.load = Some(load_model(
            std::path::Path::new(&self.asset_params.boat_model),
            self.asset_params.timeout_s,
        ));
        self.buoy_model.load = Some(load_model(
            std::path::Path::new(&self.asset_params.buoy_model),
            self.asset_params.timeout_s,
        ));

        self.ui.show_controls_help();

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.render_config.window_width = size.width.max(1);
                self.render_config.window_height = size.height.max(1);
                if let Some(rs) = &mut self.render_system {
                    rs.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if code == KeyCode::Escape && pressed {
                    // Escape closes an open detail view first, then quits
                    if self.ui.is_open() {
                        self.events.close_ui = true;
                    } else {
                        event_loop.exit();
                    }
                } else {
                    self.handle_key(code, pressed);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
                if !self.dragging {
                    self.last_cursor = None;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.dragging {
                    if let Some((lx, ly)) = self.last_cursor {
                        self.orbit.yaw_delta += (position.x - lx) as f32;
                        self.orbit.pitch_delta += (position.y - ly) as f32;
                    }
                    self.last_cursor = Some((position.x, position.y));
                } else {
                    self.last_cursor = None;
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.orbit.zoom_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 60.0,
                };
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut app = match App::new(&args) {
        Ok(app) => app,
        Err(e) => {
            error!("failed to build the scene: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "wakefield starting: seed {}, {}x{} grid",
        args.seed, args.density, args.density
    );

    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
