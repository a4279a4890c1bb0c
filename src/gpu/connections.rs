//! Connection rendering between nearby particles.
//!
//! Each connection is a line segment expanded to a thin screen-space quad in
//! the vertex shader, stroked in the accent hue at the per-line alpha the
//! field computed from the pair distance.

use bytemuck::{Pod, Zeroable};

/// Per-line instance data, uploaded each frame.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(super) struct LineInstance {
    pub a: [f32; 2],
    pub b: [f32; 2],
    pub alpha: f32,
    pub _pad: f32,
}

const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x2,
    },
    wgpu::VertexAttribute {
        offset: 8,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x2,
    },
    wgpu::VertexAttribute {
        offset: 16,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32,
    },
];

pub(super) fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRIBUTES,
    }
}

pub(super) fn create_pipeline(
    device: &wgpu::Device,
    uniform_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Connection Shader"),
        source: wgpu::ShaderSource::Wgsl(SHADER.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Connection Pipeline Layout"),
        bind_group_layouts: &[uniform_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Connection Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[instance_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

const SHADER: &str = r#"
struct Uniforms {
    surface_size: vec2<f32>,
    accent: vec3<f32>,
    line_width: f32,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) alpha: f32,
};

fn to_clip(pos: vec2<f32>) -> vec4<f32> {
    let ndc = vec2<f32>(
        pos.x / uniforms.surface_size.x * 2.0 - 1.0,
        1.0 - pos.y / uniforms.surface_size.y * 2.0,
    );
    return vec4<f32>(ndc, 0.0, 1.0);
}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) a: vec2<f32>,
    @location(1) b: vec2<f32>,
    @location(2) alpha: f32,
) -> VertexOutput {
    let seg = b - a;
    let len = length(seg);

    // Degenerate pair (distance ~0): any expansion axis works, the quad is
    // a point either way.
    var perp = vec2<f32>(0.0, uniforms.line_width * 0.5);
    if len > 0.0001 {
        let dir = seg / len;
        perp = vec2<f32>(-dir.y, dir.x) * uniforms.line_width * 0.5;
    }

    var pos: vec2<f32>;
    switch vertex_index {
        case 0u: { pos = a - perp; }
        case 1u: { pos = a + perp; }
        case 2u: { pos = b - perp; }
        case 3u: { pos = a + perp; }
        case 4u: { pos = b - perp; }
        default: { pos = b + perp; }
    }

    var out: VertexOutput;
    out.clip_position = to_clip(pos);
    out.alpha = alpha;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(uniforms.accent, in.alpha);
}
"#;
