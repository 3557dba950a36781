//! Instanced billboard rendering for the ambient dust motes.
//!
//! Each mote is a camera-facing quad expanded in view space from a storage
//! buffer of world positions. Motes blend additively over the backdrop and
//! depth-test against the mesh without writing depth.

use bytemuck::{Pod, Zeroable};
use std::num::NonZeroU64;
use wgpu::util::DeviceExt;

use crate::camera::OrbitCamera;
use crate::depth::DepthBuffer;

/// Capacity of the instance buffer.
pub const MAX_PARTICLES: usize = 256;

/// GPU instance data for one dust mote.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// World-space center.
    pub position: [f32; 3],
    /// Billboard radius in world units.
    pub size: f32,
}

/// View/projection pair for billboard expansion.
///
/// The view matrix places the mote center; the corner offsets are added in
/// view space so the quad always faces the camera.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct ParticleUniform {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

/// Additively blended billboard pipeline for the dust cloud.
pub struct ParticlePipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_count: u32,
}

impl ParticlePipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle-shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLE_SHADER_SOURCE.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle-uniform"),
            size: std::mem::size_of::<ParticleUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let instance_data = vec![ParticleInstance::zeroed(); MAX_PARTICLES];
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle-instances"),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("particle-bind-group-layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: NonZeroU64::new(128), // two mat4x4<f32>
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particle-bind-group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: instance_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particle-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                // motes hide behind the mesh but never occlude each other
                depth_write_enabled: false,
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent::OVER,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            instance_buffer,
            bind_group,
            instance_count: 0,
        }
    }

    /// Upload the camera and the current mote positions for this frame.
    /// Instances beyond [`MAX_PARTICLES`] are dropped.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        camera: &OrbitCamera,
        aspect_ratio: f32,
        instances: &[ParticleInstance],
    ) {
        let uniform = ParticleUniform {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix(aspect_ratio).to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));

        let count = instances.len().min(MAX_PARTICLES);
        queue.write_buffer(
            &self.instance_buffer,
            0,
            bytemuck::cast_slice(&instances[..count]),
        );
        self.instance_count = count as u32;
    }

    /// Draw the uploaded motes. No-op when none were uploaded.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..4, 0..self.instance_count);
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }
}

/// WGSL source for the dust billboard shader.
pub const PARTICLE_SHADER_SOURCE: &str = r#"
struct ViewParams {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
};

struct DustInstance {
    position: vec3<f32>,
    size: f32,
};

@group(0) @binding(0) var<uniform> params: ViewParams;
@group(0) @binding(1) var<storage, read> instances: array<DustInstance>;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) local: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vid: u32, @builtin(instance_index) iid: u32) -> VertexOutput {
    let inst = instances[iid];
    // triangle-strip quad: 0,1,2,3 -> BL,BR,TL,TR
    let corner = vec2<f32>(f32(vid & 1u), f32((vid >> 1u) & 1u)) * 2.0 - 1.0;

    let center = (params.view * vec4<f32>(inst.position, 1.0)).xyz;
    let view_pos = center + vec3<f32>(corner * inst.size, 0.0);

    var out: VertexOutput;
    out.position = params.proj * vec4<f32>(view_pos, 1.0);
    out.local = corner;
    return out;
}

const DUST_COLOR: vec3<f32> = vec3<f32>(0.9, 0.92, 1.0);

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let r2 = dot(in.local, in.local);
    let alpha = exp(-r2 * 4.0) * 0.35;
    if alpha < 0.005 {
        discard;
    }
    return vec4<f32>(DUST_COLOR * alpha, alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    force_fallback_adapter: false,
                    compatible_surface: None,
                })
                .await
                .ok()?;

            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }

    #[test]
    fn test_shader_has_expected_entry_points() {
        assert!(PARTICLE_SHADER_SOURCE.contains("fn vs_main"));
        assert!(PARTICLE_SHADER_SOURCE.contains("fn fs_main"));
    }

    #[test]
    fn test_instance_is_16_bytes() {
        // vec3<f32> + f32 = exactly one storage array element
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 16);
    }

    #[test]
    fn test_uniform_is_two_matrices() {
        assert_eq!(std::mem::size_of::<ParticleUniform>(), 128);
    }

    #[test]
    fn test_pipeline_creation_succeeds() {
        let Some((device, _queue)) = create_test_device() else {
            // No adapter available (headless CI without GPU) — skip.
            return;
        };
        let _pipeline = ParticlePipeline::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb);
    }

    #[test]
    fn test_update_clamps_to_capacity() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut pipeline = ParticlePipeline::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(pipeline.instance_count(), 0);

        let camera = OrbitCamera::new(0.0, 0.0, 6.0, 30.0);
        let few = vec![ParticleInstance::zeroed(); 60];
        pipeline.update(&queue, &camera, 1.0, &few);
        assert_eq!(pipeline.instance_count(), 60);

        let too_many = vec![ParticleInstance::zeroed(); MAX_PARTICLES + 40];
        pipeline.update(&queue, &camera, 1.0, &too_many);
        assert_eq!(pipeline.instance_count(), MAX_PARTICLES as u32);
    }
}
