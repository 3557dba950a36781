//! Depth buffer with reverse-Z mapping.
//!
//! Near plane maps to 1.0 and far plane to 0.0, so depth precision
//! concentrates where the float format has the least of it.

/// Reverse-Z depth buffer sized to the surface.
pub struct DepthBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    /// 32-bit float depth format.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Reverse-Z clear value: 0.0 is the far plane.
    pub const CLEAR_VALUE: f32 = 0.0;

    /// Reverse-Z comparison: closer fragments have higher depth values.
    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-buffer"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Recreate at the new size, no-op when unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width.max(1) && self.height == height.max(1) {
            return;
        }
        *self = Self::new(device, width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_device() -> Option<wgpu::Device> {
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

            let (device, _queue) = adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()?;

            Some(device)
        })
    }

    #[test]
    fn test_reverse_z_constants() {
        assert_eq!(DepthBuffer::FORMAT, wgpu::TextureFormat::Depth32Float);
        assert_eq!(DepthBuffer::CLEAR_VALUE, 0.0);
        assert_eq!(
            DepthBuffer::COMPARE_FUNCTION,
            wgpu::CompareFunction::GreaterEqual
        );
    }

    #[test]
    fn test_create_and_resize() {
        let Some(device) = create_test_device() else {
            // No adapter available (headless CI without GPU) — skip.
            return;
        };

        let mut depth = DepthBuffer::new(&device, 640, 480);
        assert_eq!((depth.width(), depth.height()), (640, 480));

        depth.resize(&device, 1024, 768);
        assert_eq!((depth.width(), depth.height()), (1024, 768));
    }

    #[test]
    fn test_zero_size_clamps_to_one() {
        let Some(device) = create_test_device() else {
            return;
        };

        let depth = DepthBuffer::new(&device, 0, 0);
        assert_eq!((depth.width(), depth.height()), (1, 1));
    }
}
