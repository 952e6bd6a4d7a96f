use winit::dpi::PhysicalSize;

/// Depth attachment format used by every render pass in the engine.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Owns the depth texture backing the render pass depth attachment.
///
/// The target lives beside the surface, not inside the frame driver: resize
/// events rebuild it together with the swapchain, and the driver only
/// attaches the current view each tick.
pub struct DepthTarget {
    view: wgpu::TextureView,
    size: PhysicalSize<u32>,
}

impl DepthTarget {
    pub fn new(device: &wgpu::Device, size: PhysicalSize<u32>) -> Self {
        let size = PhysicalSize::new(size.width.max(1), size.height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tiamat depth target"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { view, size }
    }

    /// View to attach as the pass depth target.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Rebuilds the texture when the drawable size changes.
    ///
    /// A 0x0 size is ignored, mirroring the surface layer: the old texture
    /// stays until the window becomes drawable again.
    pub fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        if new_size == self.size {
            return;
        }
        *self = Self::new(device, new_size);
    }
}
