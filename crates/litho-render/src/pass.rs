//! Render pass configuration and per-frame command encoding.

use std::sync::Arc;

/// Clear color behind the preview, a near-black night blue.
pub const NIGHT_BACKDROP: wgpu::Color = wgpu::Color {
    r: 10.0 / 255.0,
    g: 10.0 / 255.0,
    b: 20.0 / 255.0,
    a: 1.0,
};

/// Depth attachment configuration for a render pass.
pub struct DepthAttachmentConfig {
    view: wgpu::TextureView,
    clear_value: f32,
}

/// Builder for configuring render passes with sensible defaults.
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth_attachment: Option<DepthAttachmentConfig>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    pub fn new() -> Self {
        Self {
            clear_color: NIGHT_BACKDROP,
            depth_attachment: None,
            label: None,
        }
    }

    /// Set the clear color for the color attachment.
    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Add a depth attachment with the given view and clear value.
    pub fn depth(mut self, view: wgpu::TextureView, clear_value: f32) -> Self {
        self.depth_attachment = Some(DepthAttachmentConfig { view, clear_value });
        self
    }

    /// Set a debug label for the render pass.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn create_render_pass<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth_attachment
                .as_ref()
                .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth.clear_value),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Manages per-frame command encoding lifecycle with automatic submission.
pub struct FrameEncoder {
    encoder: Option<wgpu::CommandEncoder>,
    queue: Arc<wgpu::Queue>,
    surface_texture: Option<wgpu::SurfaceTexture>,
    surface_view: Option<wgpu::TextureView>,
    submitted: bool,
}

impl FrameEncoder {
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder: Some(encoder),
            queue,
            surface_texture: Some(surface_texture),
            surface_view: Some(surface_view),
            submitted: false,
        }
    }

    /// Begin a render pass targeting the surface using the builder's
    /// configuration.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder,
    ) -> wgpu::RenderPass<'a> {
        let view = self
            .surface_view
            .as_ref()
            .expect("FrameEncoder already submitted");

        builder.create_render_pass(
            self.encoder
                .as_mut()
                .expect("FrameEncoder already submitted"),
            view,
        )
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Queue a copy of the surface texture into a readback buffer for the
    /// snapshot key. Returns `(buffer, width, height, padded_bytes_per_row)`,
    /// or `None` if the encoder has already been submitted.
    pub fn copy_surface_to_buffer(
        &mut self,
        device: &wgpu::Device,
    ) -> Option<(wgpu::Buffer, u32, u32, u32)> {
        let surface_tex = self.surface_texture.as_ref()?;
        let texture = &surface_tex.texture;
        let w = texture.width();
        let h = texture.height();
        let bpp = 4u32;
        let unpadded = w * bpp;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded = unpadded.div_ceil(align) * align;

        let buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("snapshot-readback"),
            size: u64::from(padded * h),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let encoder = self.encoder.as_mut()?;
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buf,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(h),
                },
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );

        Some((buf, w, h, padded))
    }

    /// Submit the command buffer and present the surface texture.
    /// Consumes self to prevent double-submission.
    pub fn submit(mut self) {
        if self.submitted {
            return;
        }

        if let (Some(encoder), Some(surface_texture)) =
            (self.encoder.take(), self.surface_texture.take())
        {
            let command_buffer = encoder.finish();
            self.queue.submit([command_buffer]);
            surface_texture.present();
            self.submitted = true;
        }
    }
}

impl Drop for FrameEncoder {
    fn drop(&mut self) {
        if !self.submitted
            && let (Some(encoder), Some(surface_texture)) =
                (self.encoder.take(), self.surface_texture.take())
        {
            log::warn!("FrameEncoder dropped without explicit submit() - auto-submitting");
            let command_buffer = encoder.finish();
            self.queue.submit([command_buffer]);
            surface_texture.present();
            self.submitted = true;
        }
    }
}
