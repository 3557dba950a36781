//! The preview render pipeline for displaced lithophane meshes.
//!
//! The fragment shader is a line-for-line port of the reference formulas in
//! `litho_shading::model`; the CPU side stays the source of truth and the
//! tests there pin the behavior. Lunar relief and the image-region mask
//! arrive pre-baked in the vertex `surface` attribute, so the shader never
//! evaluates noise.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use litho_mesh::LITHO_VERTEX_LAYOUT;

use crate::buffer::MeshBuffer;
use crate::camera::OrbitCamera;
use crate::depth::DepthBuffer;
use crate::texture::LuminanceTexture;

/// Per-draw transform uniform.
///
/// Shading runs in view space: `model_view` carries normals and positions
/// there, and the key light directions are constants in that space, so the
/// light stays over the viewer's shoulder while the camera orbits.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniform {
    pub mvp: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
}

impl SceneUniform {
    /// Build the transforms for a uniformly scaled mesh at the origin.
    pub fn new(camera: &OrbitCamera, aspect_ratio: f32, scale: f32) -> Self {
        let model = Mat4::from_scale(Vec3::splat(scale));
        let model_view = camera.view_matrix() * model;
        let mvp = camera.projection_matrix(aspect_ratio) * model_view;
        Self {
            mvp: mvp.to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
        }
    }
}

/// Render pipeline for the displaced preview mesh.
///
/// Bind groups: 0 = transforms (vertex), 1 = shading params (fragment),
/// 2 = luminance texture + sampler (fragment, layout owned by the host).
pub struct LithoPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub scene_bind_group_layout: wgpu::BindGroupLayout,
    pub shade_bind_group_layout: wgpu::BindGroupLayout,
}

impl LithoPipeline {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        luminance_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("scene-bind-group-layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(128), // two mat4x4<f32>
                    },
                    count: None,
                }],
            });

        let shade_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("shade-bind-group-layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(96), // ShadeUniform
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("litho-pipeline-layout"),
            bind_group_layouts: &[
                &scene_bind_group_layout,
                &shade_bind_group_layout,
                luminance_layout,
            ],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("litho-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[LITHO_VERTEX_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // panels and the open cylinder are visible from both sides
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None, // opaque
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            scene_bind_group_layout,
            shade_bind_group_layout,
        }
    }
}

/// Draw one preview mesh with the given bindings.
pub fn draw_litho<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    pipeline: &LithoPipeline,
    scene_bind_group: &'a wgpu::BindGroup,
    shade_bind_group: &'a wgpu::BindGroup,
    luminance: &'a LuminanceTexture,
    mesh: &'a MeshBuffer,
) {
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, scene_bind_group, &[]);
    render_pass.set_bind_group(1, shade_bind_group, &[]);
    render_pass.set_bind_group(2, &luminance.bind_group, &[]);
    mesh.bind(render_pass);
    mesh.draw(render_pass);
}

/// WGSL source for the preview shader.
///
/// `ShadeParams` must stay field-for-field identical to
/// `litho_shading::ShadeUniform`, and the shading functions mirror
/// `litho_shading::model` exactly.
pub const LITHO_SHADER_SOURCE: &str = r#"
struct SceneParams {
    mvp: mat4x4<f32>,
    model_view: mat4x4<f32>,
};

struct ShadeParams {
    light_color: vec3<f32>,
    light_on: f32,
    base_color: vec3<f32>,
    contrast_power: f32,
    key_light_dir: vec3<f32>,
    absorption: f32,
    transmission_floor: f32,
    transmission_ceil: f32,
    backlight_gain: f32,
    sss_gain: f32,
    ambient_floor: f32,
    diffuse_gain: f32,
    rim_gain: f32,
    lit_surface_mix: f32,
    thickness_darken: f32,
};

@group(0) @binding(0) var<uniform> scene: SceneParams;
@group(1) @binding(0) var<uniform> shade: ShadeParams;
@group(2) @binding(0) var luminance_texture: texture_2d<f32>;
@group(2) @binding(1) var luminance_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) surface: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_pos: vec3<f32>,
    @location(1) view_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) surface: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = scene.mvp * vec4<f32>(in.position, 1.0);
    out.view_pos = (scene.model_view * vec4<f32>(in.position, 1.0)).xyz;
    // uniform scale only, so no inverse-transpose is needed
    out.view_normal = (scene.model_view * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    out.surface = in.surface;
    return out;
}

const MOON_BASE_COLOR: vec3<f32> = vec3<f32>(0.82, 0.80, 0.78);
const MARIA_COLOR: vec3<f32> = vec3<f32>(0.65, 0.63, 0.60);
const MOON_KEY_LIGHT_DIR: vec3<f32> = vec3<f32>(0.3, 0.5, 0.8);
const MOON_FRESNEL_COLOR: vec3<f32> = vec3<f32>(0.9, 0.88, 0.85);

// L^p * (3 - 2L)
fn contrast_curve(luminance: f32) -> f32 {
    return pow(luminance, shade.contrast_power) * (3.0 - 2.0 * luminance);
}

fn tonemap(color: vec3<f32>) -> vec3<f32> {
    return color / (color + vec3<f32>(1.0));
}

fn shade_litho(luminance: f32, normal: vec3<f32>, view_dir: vec3<f32>) -> vec3<f32> {
    let base = shade.base_color;
    let thickness = 1.0 - contrast_curve(luminance);
    let trans = clamp(
        exp(-thickness * shade.absorption),
        shade.transmission_floor,
        shade.transmission_ceil,
    );

    let backlight = shade.light_color * trans * shade.backlight_gain;
    let sss = trans * shade.sss_gain;

    let diffuse = max(dot(normal, normalize(shade.key_light_dir)), 0.0);
    let surface = base * (shade.ambient_floor + diffuse * shade.diffuse_gain);

    let fresnel = pow(1.0 - max(dot(normal, view_dir), 0.0), 3.0);
    let rim = base * fresnel * shade.rim_gain;

    let lit = backlight + base * sss + surface * shade.lit_surface_mix + rim;
    let unlit = surface + rim * 0.5;
    let color = mix(unlit, lit, shade.light_on);

    return color * (1.0 - thickness * shade.thickness_darken);
}

fn shade_moon(relief: f32, maria: f32, normal: vec3<f32>, view_dir: vec3<f32>) -> vec3<f32> {
    let moon_color = mix(MARIA_COLOR, MOON_BASE_COLOR, maria) + vec3<f32>(relief * 0.2);

    let diffuse = max(dot(normal, normalize(MOON_KEY_LIGHT_DIR)), 0.0);
    var lit = moon_color * (0.15 + diffuse * 0.7);
    // crater self-shadowing: depressions darken, rims catch light
    lit = lit * (1.0 + relief * 0.3);
    lit = lit + shade.light_color * 0.08 * shade.light_on;

    let fresnel = pow(1.0 - max(dot(normal, view_dir), 0.0), 2.5);
    return lit + MOON_FRESNEL_COLOR * fresnel * 0.12;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let luminance = textureSample(luminance_texture, luminance_sampler, in.uv).r;
    let normal = normalize(in.view_normal);
    let view_dir = normalize(-in.view_pos);

    let litho = shade_litho(luminance, normal, view_dir);
    let moon = shade_moon(in.surface.y, in.surface.z, normal, view_dir);
    let color = mix(moon, litho, in.surface.x);
    return vec4<f32>(tonemap(color), 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use litho_shading::{LightColor, PANEL_PROFILE, ShadeUniform};

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

    fn create_test_pipeline(device: &wgpu::Device) -> (LithoPipeline, wgpu::BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test-litho-shader"),
            source: wgpu::ShaderSource::Wgsl(LITHO_SHADER_SOURCE.into()),
        });
        let luminance_layout = LuminanceTexture::bind_group_layout(device);
        let pipeline = LithoPipeline::new(
            device,
            &shader,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            &luminance_layout,
        );
        (pipeline, luminance_layout)
    }

    #[test]
    fn test_pipeline_creation_succeeds() {
        let Some((device, _queue)) = create_test_device() else {
            // No adapter available (headless CI without GPU) — skip.
            return;
        };
        // create_render_pipeline validates the WGSL against the vertex
        // layout and bind group layouts; reaching this line is success.
        let _ = create_test_pipeline(&device);
    }

    #[test]
    fn test_shader_has_expected_entry_points() {
        assert!(LITHO_SHADER_SOURCE.contains("fn vs_main"));
        assert!(LITHO_SHADER_SOURCE.contains("fn fs_main"));
    }

    #[test]
    fn test_shader_params_match_uniform_field_order() {
        // ShadeParams must list the fields in ShadeUniform order; a drift
        // here silently scrambles the shading constants.
        let fields = [
            "light_color",
            "light_on",
            "base_color",
            "contrast_power",
            "key_light_dir",
            "absorption",
            "transmission_floor",
            "transmission_ceil",
            "backlight_gain",
            "sss_gain",
            "ambient_floor",
            "diffuse_gain",
            "rim_gain",
            "lit_surface_mix",
            "thickness_darken",
        ];
        let mut last = 0;
        for field in fields {
            let pos = LITHO_SHADER_SOURCE
                .find(&format!("{field}: f32"))
                .or_else(|| LITHO_SHADER_SOURCE.find(&format!("{field}: vec3<f32>")))
                .unwrap_or_else(|| panic!("shader is missing field {field}"));
            assert!(pos > last, "field {field} is out of order");
            last = pos;
        }
    }

    #[test]
    fn test_scene_uniform_size() {
        // Two mat4x4<f32>, matching min_binding_size in the layout.
        assert_eq!(std::mem::size_of::<SceneUniform>(), 128);
    }

    #[test]
    fn test_scene_uniform_applies_scale_in_view_space() {
        let camera = OrbitCamera::new(0.0, 0.0, 6.0, 30.0);
        let uniform = SceneUniform::new(&camera, 1.0, 2.0);
        let model_view = Mat4::from_cols_array_2d(&uniform.model_view);

        // a point 1 unit up lands 2 units up, 6 in front of the eye
        let p = model_view.transform_point3(Vec3::Y);
        assert!((p - Vec3::new(0.0, 2.0, -6.0)).length() < 1e-5, "{p}");
    }

    #[test]
    fn test_bind_group_layouts_accept_the_uniforms() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let (pipeline, _) = create_test_pipeline(&device);

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("test-scene"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM,
            mapped_at_creation: false,
        });
        let _scene = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("test-scene-bg"),
            layout: &pipeline.scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let shade = ShadeUniform::new(&PANEL_PROFILE, LightColor::Warm, 1.0);
        let shade_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("test-shade"),
            size: bytemuck::bytes_of(&shade).len() as u64,
            usage: wgpu::BufferUsages::UNIFORM,
            mapped_at_creation: false,
        });
        let _shade = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("test-shade-bg"),
            layout: &pipeline.shade_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: shade_buffer.as_entire_binding(),
            }],
        });
        // create_bind_group panics on a layout mismatch, so reaching this
        // line validates both layouts.
    }
}
