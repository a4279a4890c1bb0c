//! GPU state and the per-frame render path.
//!
//! The simulation stays on the CPU; each frame the field's particles and
//! connections are packed into instance buffers and drawn in a single render
//! pass: clear, connection lines, then particle dots on top.

mod connections;
mod particles;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use winit::window::Window;

use crate::error::GpuError;
use crate::field::{Connection, ParticleField};
use crate::visuals::VisualConfig;

use connections::LineInstance;
use particles::ParticleInstance;

/// Shared shader uniforms: surface extents plus the fixed visual constants.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    surface_size: [f32; 2],
    _pad: [f32; 2],
    accent: [f32; 3],
    line_width: f32,
}

/// Owns the wgpu surface, device, pipelines, and per-frame staging vectors.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    particle_pipeline: wgpu::RenderPipeline,
    connection_pipeline: wgpu::RenderPipeline,
    particle_buffer: wgpu::Buffer,
    line_buffer: wgpu::Buffer,
    particle_instances: Vec<ParticleInstance>,
    line_instances: Vec<LineInstance>,
    connection_scratch: Vec<Connection>,
    visuals: VisualConfig,
}

impl GpuState {
    /// Set up the surface, device, and pipelines for a window.
    ///
    /// `particle_count` sizes the instance buffers once; the field never
    /// grows past it.
    pub async fn new(
        window: Arc<Window>,
        visuals: VisualConfig,
        particle_count: u32,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

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
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let particle_pipeline =
            particles::create_pipeline(&device, &uniform_bind_group_layout, surface_format);
        let connection_pipeline =
            connections::create_pipeline(&device, &uniform_bind_group_layout, surface_format);

        let particle_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Instance Buffer"),
            size: (particle_count.max(1) as u64)
                * std::mem::size_of::<ParticleInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let max_lines = ParticleField::max_connections(particle_count);
        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Instance Buffer"),
            size: (max_lines.max(1) as u64) * std::mem::size_of::<LineInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut state = Self {
            surface,
            device,
            queue,
            config,
            uniform_buffer,
            uniform_bind_group,
            particle_pipeline,
            connection_pipeline,
            particle_buffer,
            line_buffer,
            particle_instances: Vec::with_capacity(particle_count as usize),
            line_instances: Vec::with_capacity(max_lines as usize),
            connection_scratch: Vec::with_capacity(max_lines as usize),
            visuals,
        };
        state.write_uniforms();
        Ok(state)
    }

    fn write_uniforms(&mut self) {
        let uniforms = Uniforms {
            surface_size: [self.config.width as f32, self.config.height as f32],
            _pad: [0.0; 2],
            accent: self.visuals.accent.to_array(),
            line_width: self.visuals.line_width,
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Reconfigure the surface for new extents.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.write_uniforms();
        }
    }

    /// Draw one frame of the field.
    pub fn render(&mut self, field: &ParticleField) -> Result<(), wgpu::SurfaceError> {
        self.particle_instances.clear();
        for p in field.particles() {
            self.particle_instances.push(ParticleInstance {
                position: p.position.to_array(),
                radius: p.radius,
                opacity: p.opacity,
            });
        }

        field.connections(&mut self.connection_scratch);
        self.line_instances.clear();
        for c in &self.connection_scratch {
            self.line_instances.push(LineInstance {
                a: c.a.to_array(),
                b: c.b.to_array(),
                alpha: c.alpha,
                _pad: 0.0,
            });
        }

        if !self.particle_instances.is_empty() {
            self.queue.write_buffer(
                &self.particle_buffer,
                0,
                bytemuck::cast_slice(&self.particle_instances),
            );
        }
        if !self.line_instances.is_empty() {
            self.queue.write_buffer(
                &self.line_buffer,
                0,
                bytemuck::cast_slice(&self.line_instances),
            );
        }

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
            let bg = self.visuals.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.x as f64,
                            g: bg.y as f64,
                            b: bg.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            // Lines under dots.
            render_pass.set_pipeline(&self.connection_pipeline);
            render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
            render_pass.draw(0..6, 0..self.line_instances.len() as u32);

            render_pass.set_pipeline(&self.particle_pipeline);
            render_pass.set_vertex_buffer(0, self.particle_buffer.slice(..));
            render_pass.draw(0..6, 0..self.particle_instances.len() as u32);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
