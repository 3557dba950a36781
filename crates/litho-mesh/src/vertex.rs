//! Canonical vertex format and `wgpu::VertexBufferLayout` for preview meshes.
//!
//! Every preview render pipeline references [`LITHO_VERTEX_LAYOUT`] so the
//! shader attributes cannot drift from the CPU-side struct.
//!
//! ## Attribute layout
//!
//! | Location | Offset | Format    | Field                                |
//! |----------|--------|-----------|--------------------------------------|
//! | 0        | 0      | Float32x3 | position (object space)              |
//! | 1        | 12     | Float32x3 | normal (recomputed after displace)   |
//! | 2        | 24     | Float32x2 | uv (image space, v down)             |
//! | 3        | 32     | Float32x3 | surface: image mask, relief, maria   |

use std::mem;

use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// One displaced mesh vertex.
///
/// `surface` carries the baked per-vertex surface values: `x` is the image
/// region mask (1 inside the image, fading to 0 at its rim), `y` the
/// dimensionless terrain/crater relief composite and `z` the lunar maria
/// mask. Panels bake `[1, 0, 0]`; only the sphere builder writes anything
/// else.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub surface: [f32; 3],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 44]);

/// Vertex attributes for the preview mesh format.
pub const LITHO_VERTEX_ATTRIBUTES: [VertexAttribute; 4] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 24,
        shader_location: 2,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 32,
        shader_location: 3,
    },
];

/// The vertex buffer layout shared by all preview render pipelines.
pub const LITHO_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<MeshVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &LITHO_VERTEX_ATTRIBUTES,
};

const _: () = assert!(
    mem::size_of::<MeshVertex>() == 44,
    "MeshVertex size changed — update LITHO_VERTEX_LAYOUT"
);
const _: () = assert!(LITHO_VERTEX_ATTRIBUTES[0].offset == 0);
const _: () = assert!(LITHO_VERTEX_ATTRIBUTES[1].offset == 12);
const _: () = assert!(LITHO_VERTEX_ATTRIBUTES[2].offset == 24);
const _: () = assert!(LITHO_VERTEX_ATTRIBUTES[3].offset == 32);
const _: () = assert!(
    LITHO_VERTEX_ATTRIBUTES[3].offset + 12 <= mem::size_of::<MeshVertex>() as u64,
    "Last attribute exceeds vertex stride"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_stride_matches_struct_size() {
        assert_eq!(
            LITHO_VERTEX_LAYOUT.array_stride,
            mem::size_of::<MeshVertex>() as u64
        );
    }

    #[test]
    fn test_shader_locations_are_sequential() {
        for (i, attr) in LITHO_VERTEX_ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.shader_location, i as u32);
        }
    }

    #[test]
    fn test_vertex_is_pod() {
        let v = MeshVertex {
            position: [1.0, 2.0, 3.0],
            normal: [0.0, 0.0, 1.0],
            uv: [0.5, 0.5],
            surface: [1.0, 0.0, 0.0],
        };
        assert_eq!(bytemuck::bytes_of(&v).len(), 44);
    }

    #[test]
    fn test_layout_is_valid_for_wgpu_pipeline() {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            force_fallback_adapter: true,
            ..Default::default()
        }));

        let Ok(adapter) = adapter else {
            // No adapter available (headless CI without GPU) — skip.
            return;
        };

        let (device, _queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
                .expect("failed to create device");

        let shader_source = r#"
            @vertex
            fn vs_main(
                @location(0) position: vec3<f32>,
                @location(1) normal: vec3<f32>,
                @location(2) uv: vec2<f32>,
                @location(3) surface: vec3<f32>,
            ) -> @builtin(position) vec4<f32> {
                return vec4<f32>(position + normal * surface.x, uv.x);
            }

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0);
            }
        "#;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test_litho_vertex_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let _pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("test_litho_vertex_pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[LITHO_VERTEX_LAYOUT],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Bgra8UnormSrgb,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });
    }
}
