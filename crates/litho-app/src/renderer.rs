//! GPU-side mirror of the scene: pipelines, uniform buffers, and the
//! currently uploaded mesh.

use std::path::Path;
use std::sync::Arc;

use litho_config::Config;
use litho_render::{
    DepthBuffer, FrameEncoder, LITHO_SHADER_SOURCE, LithoPipeline, LuminanceTexture, MeshBuffer,
    NIGHT_BACKDROP, OrbitCamera, ParticleInstance, ParticlePipeline, RenderContext,
    RenderPassBuilder, SceneUniform, SurfaceError, draw_litho, write_snapshot_png,
};
use litho_scene::{ParticleField, SceneState};
use litho_shading::{PANEL_PROFILE, ShadeProfile, ShadeUniform};
use tracing::{info, warn};

pub struct PreviewRenderer {
    litho_pipeline: LithoPipeline,
    particles: ParticlePipeline,
    depth: DepthBuffer,
    luminance_layout: wgpu::BindGroupLayout,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    shade_buffer: wgpu::Buffer,
    shade_bind_group: wgpu::BindGroup,
    mesh: Option<MeshBuffer>,
    luminance: Option<LuminanceTexture>,
    /// Scene mesh version the buffers above were uploaded from.
    synced_version: u64,
    fov_degrees: f32,
    show_particles: bool,
}

impl PreviewRenderer {
    pub fn new(gpu: &RenderContext, config: &Config) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("litho-shader"),
            source: wgpu::ShaderSource::Wgsl(LITHO_SHADER_SOURCE.into()),
        });

        let luminance_layout = LuminanceTexture::bind_group_layout(device);
        let litho_pipeline =
            LithoPipeline::new(device, &shader, gpu.surface_format, &luminance_layout);
        let particles = ParticlePipeline::new(device, gpu.surface_format);
        let depth = DepthBuffer::new(device, gpu.surface_config.width, gpu.surface_config.height);

        let (scene_buffer, scene_bind_group) = uniform_binding::<SceneUniform>(
            device,
            "scene",
            &litho_pipeline.scene_bind_group_layout,
        );
        let (shade_buffer, shade_bind_group) = uniform_binding::<ShadeUniform>(
            device,
            "shade",
            &litho_pipeline.shade_bind_group_layout,
        );

        Self {
            litho_pipeline,
            particles,
            depth,
            luminance_layout,
            scene_buffer,
            scene_bind_group,
            shade_buffer,
            shade_bind_group,
            mesh: None,
            luminance: None,
            synced_version: 0,
            fov_degrees: config.camera.fov_degrees,
            show_particles: config.preview.show_particles,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Re-uploads the mesh and luminance texture if the scene rebuilt since
    /// the last frame. Buffers for the previous mesh are dropped here.
    pub fn sync_scene(&mut self, gpu: &RenderContext, scene: &SceneState) {
        if scene.mesh_version() == self.synced_version {
            return;
        }
        self.synced_version = scene.mesh_version();

        match (scene.mesh(), scene.grid()) {
            (Some(mesh), Some(grid)) => {
                let label = format!("{}-mesh", mesh.kind);
                self.mesh = Some(MeshBuffer::upload(&gpu.device, &label, mesh));
                self.luminance = Some(LuminanceTexture::from_grid(
                    &gpu.device,
                    &gpu.queue,
                    &self.luminance_layout,
                    grid,
                ));
                info!(
                    "Uploaded {} mesh: {} triangles, {}x{} luminance",
                    mesh.kind,
                    mesh.triangle_count(),
                    grid.width(),
                    grid.height()
                );
            }
            _ => {
                self.mesh = None;
                self.luminance = None;
            }
        }
    }

    /// Draws one frame, optionally reading it back into a PNG.
    ///
    /// A failed snapshot only logs; the presented frame is unaffected.
    pub fn render(
        &mut self,
        gpu: &RenderContext,
        scene: &SceneState,
        snapshot: Option<&Path>,
    ) -> Result<(), SurfaceError> {
        let surface_texture = gpu.get_current_texture()?;

        self.write_frame_state(gpu, scene);

        let mut encoder =
            FrameEncoder::new(&gpu.device, Arc::new(gpu.queue.clone()), surface_texture);
        let pass_builder = RenderPassBuilder::new()
            .label("preview-pass")
            .clear_color(NIGHT_BACKDROP)
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE);
        {
            let mut pass = encoder.begin_render_pass(&pass_builder);

            if let (Some(mesh), Some(luminance)) = (&self.mesh, &self.luminance) {
                draw_litho(
                    &mut pass,
                    &self.litho_pipeline,
                    &self.scene_bind_group,
                    &self.shade_bind_group,
                    luminance,
                    mesh,
                );
            }
            if self.show_particles {
                self.particles.draw(&mut pass);
            }
        }

        let readback = snapshot.and_then(|_| encoder.copy_surface_to_buffer(&gpu.device));
        encoder.submit();

        if let Some(path) = snapshot {
            match readback {
                Some((buffer, width, height, padded)) => {
                    if let Err(error) = write_snapshot_png(
                        &gpu.device,
                        gpu.surface_format,
                        &buffer,
                        width,
                        height,
                        padded,
                        path,
                    ) {
                        warn!("Snapshot failed: {error}");
                    }
                }
                None => warn!("Snapshot failed: readback could not be queued"),
            }
        }

        Ok(())
    }

    /// Uploads per-frame uniforms and particle instances.
    fn write_frame_state(&mut self, gpu: &RenderContext, scene: &SceneState) {
        let view = scene.view();
        let camera = OrbitCamera::new(view.yaw(), view.pitch(), view.zoom(), self.fov_degrees);
        let aspect = gpu.aspect_ratio();

        let scene_uniform = SceneUniform::new(&camera, aspect, scene.scale());
        gpu.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene_uniform));

        let profile = scene
            .mesh()
            .map(|mesh| ShadeProfile::for_kind(mesh.kind))
            .unwrap_or(&PANEL_PROFILE);
        let shade = ShadeUniform::new(profile, scene.light_color(), scene.light_level());
        gpu.queue
            .write_buffer(&self.shade_buffer, 0, bytemuck::bytes_of(&shade));

        if self.show_particles {
            let instances = particle_instances(scene.particles());
            self.particles.update(&gpu.queue, &camera, aspect, &instances);
        }
    }
}

/// One uniform buffer with its bind group over the given single-entry
/// layout.
fn uniform_binding<T>(
    device: &wgpu::Device,
    name: &str,
    layout: &wgpu::BindGroupLayout,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{name}-uniform")),
        size: std::mem::size_of::<T>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{name}-bind-group")),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (buffer, bind_group)
}

/// Scene motes as GPU billboard instances.
fn particle_instances(field: &ParticleField) -> Vec<ParticleInstance> {
    field
        .particles()
        .iter()
        .map(|p| ParticleInstance {
            position: p.position.into(),
            size: p.size,
        })
        .collect()
}
