//! Rendering system: wgpu device, ocean point pipeline, and solid-body
//! pipelines for the boat and buoys.
//!
//! Ocean points are instanced camera-facing quads; all displacement happens
//! in the vertex shader from the packed wave and trail uniforms. The CPU
//! never touches point positions after startup.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::assets::{BodyVertex, MeshData};
use crate::ocean::{GridPoint, OceanGrid, WaveGenerator};
use crate::params::{
    CosmeticParams, FogParams, GridParams, OceanParams, GPU_WAVE_COUNT, TRAIL_CAPACITY,
};
use crate::trail::TrailSlot;

/// One wave generator as the shader consumes it. Matches `WaveUniform` in
/// `shader.wgsl` field for field.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct WaveUniform {
    /// direction.xy, amplitude, wavelength
    pub dir_amp_len: [f32; 4],
    /// phase speed, steepness, initial phase, pad
    pub speed_steep_phase: [f32; 4],
}

impl From<&WaveGenerator> for WaveUniform {
    fn from(wave: &WaveGenerator) -> Self {
        Self {
            dir_amp_len: [
                wave.direction.x,
                wave.direction.y,
                wave.amplitude,
                wave.wavelength,
            ],
            speed_steep_phase: [wave.speed, wave.steepness, wave.phase, 0.0],
        }
    }
}

/// Uniform block for the ocean shader. Layout mirrors `OceanUniforms` in
/// `shader.wgsl`; every scalar group is pre-packed into vec4 slots.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct OceanUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// camera position.xyz, wave-phase time
    pub camera_time: [f32; 4],
    /// viewport width, viewport height, global amplitude, grid half-span
    pub viewport_grid: [f32; 4],
    /// fog near, fog far, edge fade width, pad
    pub fog: [f32; 4],
    pub fog_color: [f32; 4],
    /// group mask strength, frequency, scroll velocity.xy
    pub group1: [f32; 4],
    /// group mask layer 2 frequency, scroll velocity.xy, pad
    pub group2: [f32; 4],
    /// domain warp amplitude, frequency, scroll velocity.xy
    pub warp: [f32; 4],
    /// phase jitter amplitude, frequency, scroll velocity.xy
    pub phase_noise: [f32; 4],
    /// ripple amplitude, frequency, speed; w = shimmer speed
    pub ripple: [f32; 4],
    /// crest gate low, high, shimmer amplitude, shimmer frequency
    pub crest: [f32; 4],
    pub waves: [WaveUniform; GPU_WAVE_COUNT],
    pub trail: [TrailSlot; TRAIL_CAPACITY],
}

/// Everything the packer needs that isn't per-frame.
pub struct OceanStyle<'a> {
    pub ocean: &'a OceanParams,
    pub grid: &'a GridParams,
    pub cosmetics: &'a CosmeticParams,
    pub fog: &'a FogParams,
}

impl OceanUniforms {
    /// Pack the per-frame uniform block. `waves` must be the sampler's
    /// truncated snapshot so the surface the boat floats on is the surface
    /// the shader draws.
    pub fn pack(
        view_proj: Mat4,
        camera: Vec3,
        sim_time: f32,
        viewport: (u32, u32),
        style: &OceanStyle,
        waves: &[WaveGenerator],
        trail: [TrailSlot; TRAIL_CAPACITY],
    ) -> Self {
        let mut wave_uniforms = [WaveUniform::default(); GPU_WAVE_COUNT];
        for (slot, wave) in wave_uniforms.iter_mut().zip(waves.iter()) {
            *slot = WaveUniform::from(wave);
        }

        let c = style.cosmetics;
        let f = style.fog;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_time: [camera.x, camera.y, camera.z, sim_time],
            viewport_grid: [
                viewport.0 as f32,
                viewport.1 as f32,
                style.ocean.amplitude,
                style.grid.span_m * 0.5,
            ],
            fog: [f.near_m, f.far_m, f.fade_width_m, 0.0],
            fog_color: [f.color[0], f.color[1], f.color[2], 0.0],
            group1: [c.group_strength, c.group_freq, c.group_vel[0], c.group_vel[1]],
            group2: [c.group_freq2, c.group_vel2[0], c.group_vel2[1], 0.0],
            warp: [c.warp_amp, c.warp_freq, c.warp_vel[0], c.warp_vel[1]],
            phase_noise: [
                c.phase_noise_amp,
                c.phase_noise_freq,
                c.phase_noise_vel[0],
                c.phase_noise_vel[1],
            ],
            ripple: [c.ripple_amp, c.ripple_freq, c.ripple_speed, c.shimmer_speed],
            crest: [c.crest_low, c.crest_high, c.shimmer_amp, c.shimmer_freq],
            waves: wave_uniforms,
            trail,
        }
    }
}

/// Uniform block for one solid body. Matches `BodyUniforms` in `body.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BodyUniforms {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// rgb tint, alpha
    pub color: [f32; 4],
}

impl BodyUniforms {
    pub fn new(view_proj: Mat4, model: Mat4, color: [f32; 4]) -> Self {
        Self {
            mvp: (view_proj * model).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color,
        }
    }
}

/// Handle to a body registered with the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyId(usize);

struct GpuBody {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Alpha-blended bodies (glow shells) draw last without depth writes
    translucent: bool,
    visible: bool,
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    ocean_pipeline: wgpu::RenderPipeline,
    body_pipeline: wgpu::RenderPipeline,
    glow_pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    ocean_uniform_buffer: wgpu::Buffer,
    ocean_bind_group: wgpu::BindGroup,
    body_bind_group_layout: wgpu::BindGroupLayout,
    bodies: Vec<GpuBody>,
    depth_view: wgpu::TextureView,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(
        window: std::sync::Arc<winit::window::Window>,
        ocean_grid: &OceanGrid,
    ) -> Result<Self, String> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance
            .create_surface(window)
            .map_err(|e| format!("Failed to create surface: {}", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or("Failed to find suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| format!("Failed to request device: {}", e))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, config.width, config.height);

        let ocean_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ocean Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let body_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Body Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("body.wgsl").into()),
        });

        // Static instance buffer: one xz grid point per ocean dot
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ocean Instance Buffer"),
            contents: bytemuck::cast_slice(&ocean_grid.points),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ocean_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Ocean Uniform Buffer"),
            size: std::mem::size_of::<OceanUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let ocean_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Ocean Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let ocean_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Ocean Bind Group"),
            layout: &ocean_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ocean_uniform_buffer.as_entire_binding(),
            }],
        });

        let ocean_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Ocean Pipeline Layout"),
                bind_group_layouts: &[&ocean_bind_group_layout],
                push_constant_ranges: &[],
            });

        let ocean_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Ocean Render Pipeline"),
            layout: Some(&ocean_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &ocean_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GridPoint>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &ocean_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let body_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Body Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let body_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Body Pipeline Layout"),
                bind_group_layouts: &[&body_bind_group_layout],
                push_constant_ranges: &[],
            });

        let make_body_pipeline = |label: &str, blend: Option<wgpu::BlendState>, depth_write| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&body_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &body_shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<BodyVertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute {
                                offset: 0,
                                shader_location: 0,
                                format: wgpu::VertexFormat::Float32x3,
                            },
                            wgpu::VertexAttribute {
                                offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                                shader_location: 1,
                                format: wgpu::VertexFormat::Float32x3,
                            },
                        ],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &body_shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let body_pipeline = make_body_pipeline("Body Pipeline", None, true);
        let glow_pipeline = make_body_pipeline(
            "Glow Pipeline",
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            ocean_pipeline,
            body_pipeline,
            glow_pipeline,
            instance_buffer,
            instance_count: ocean_grid.points.len() as u32,
            ocean_uniform_buffer,
            ocean_bind_group,
            body_bind_group_layout,
            bodies: Vec::new(),
            depth_view,
        })
    }

    /// Register a body with initial geometry. Opaque bodies depth-test;
    /// translucent ones (glow shells) draw last without depth writes.
    pub fn add_body(&mut self, mesh: &MeshData, translucent: bool) -> BodyId {
        let (vertex_buffer, index_buffer) = self.mesh_buffers(mesh);
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Body Uniform Buffer"),
            size: std::mem::size_of::<BodyUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Body Bind Group"),
            layout: &self.body_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        self.bodies.push(GpuBody {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniform_buffer,
            bind_group,
            translucent,
            visible: true,
        });
        BodyId(self.bodies.len() - 1)
    }

    /// Swap a body's geometry (fallback mesh replaced by a finished load).
    pub fn replace_mesh(&mut self, id: BodyId, mesh: &MeshData) {
        let (vertex_buffer, index_buffer) = self.mesh_buffers(mesh);
        let body = &mut self.bodies[id.0];
        body.vertex_buffer = vertex_buffer;
        body.index_buffer = index_buffer;
        body.index_count = mesh.indices.len() as u32;
    }

    fn mesh_buffers(&self, mesh: &MeshData) -> (wgpu::Buffer, wgpu::Buffer) {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Body Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Body Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        (vertex_buffer, index_buffer)
    }

    /// Upload a body's per-frame transform and tint.
    pub fn update_body(&self, id: BodyId, uniforms: &BodyUniforms) {
        self.queue.write_buffer(
            &self.bodies[id.0].uniform_buffer,
            0,
            bytemuck::cast_slice(&[*uniforms]),
        );
    }

    pub fn set_body_visible(&mut self, id: BodyId, visible: bool) {
        self.bodies[id.0].visible = visible;
    }

    /// Upload the ocean uniform block.
    pub fn update_ocean_uniforms(&self, uniforms: &OceanUniforms) {
        self.queue.write_buffer(
            &self.ocean_uniform_buffer,
            0,
            bytemuck::cast_slice(&[*uniforms]),
        );
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, self.config.width, self.config.height);
    }

    /// Render a frame: ocean points, then opaque bodies, then glow shells.
    pub fn render(&self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.ocean_pipeline);
            render_pass.set_bind_group(0, &self.ocean_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
            render_pass.draw(0..4, 0..self.instance_count);

            render_pass.set_pipeline(&self.body_pipeline);
            for body in self.bodies.iter().filter(|b| b.visible && !b.translucent) {
                render_pass.set_bind_group(0, &body.bind_group, &[]);
                render_pass.set_vertex_buffer(0, body.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(body.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..body.index_count, 0, 0..1);
            }

            render_pass.set_pipeline(&self.glow_pipeline);
            for body in self.bodies.iter().filter(|b| b.visible && b.translucent) {
                render_pass.set_bind_group(0, &body.bind_group, &[]);
                render_pass.set_vertex_buffer(0, body.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(body.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..body.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
