use glam::UVec2;

pub struct Surface {
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
}

impl Surface {
    pub fn new(
        surface: wgpu::Surface<'static>,
        surface_config: wgpu::SurfaceConfiguration,
    ) -> Self {
        Self {
            surface,
            surface_config,
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    pub fn alpha_mode(&self) -> wgpu::CompositeAlphaMode {
        self.surface_config.alpha_mode
    }

    pub fn configure(&self, device: &wgpu::Device) {
        self.surface.configure(device, &self.surface_config);
    }

    pub fn resize(&mut self, device: &wgpu::Device, size: UVec2) {
        // A zero sized surface can not be configured.
        self.surface_config.width = size.x.max(1);
        self.surface_config.height = size.y.max(1);
        self.configure(device);
    }

    pub fn get_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }
}
