use std::{ops::Deref, sync::Arc};

use glam::UVec2;
use tracing::{info, warn};

use super::surface::Surface;

#[derive(Clone)]
pub struct RenderDevice(Arc<wgpu::Device>);

impl From<wgpu::Device> for RenderDevice {
    fn from(value: wgpu::Device) -> Self {
        Self(Arc::new(value))
    }
}

impl Deref for RenderDevice {
    type Target = wgpu::Device;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

#[derive(Clone)]
pub struct RenderQueue(Arc<wgpu::Queue>);

impl From<wgpu::Queue> for RenderQueue {
    fn from(value: wgpu::Queue) -> Self {
        Self(Arc::new(value))
    }
}

impl Deref for RenderQueue {
    type Target = wgpu::Queue;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

pub struct Renderer {
    pub device: RenderDevice,
    pub queue: RenderQueue,

    pub surface: Surface,

    /// A bind group layout used for all texture bind groups.
    texture_bind_group_layout: wgpu::BindGroupLayout,
}

/// Pick an alpha mode that lets the desktop show through transparent pixels.
fn choose_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    use wgpu::CompositeAlphaMode as Mode;

    [Mode::PreMultiplied, Mode::PostMultiplied, Mode::Inherit]
        .into_iter()
        .find(|mode| modes.contains(mode))
        .unwrap_or_else(|| {
            warn!("Surface does not support transparency, window will be opaque.");
            modes.first().copied().unwrap_or(Mode::Auto)
        })
}

impl Renderer {
    pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new(window: Arc<winit::window::Window>) -> Self {
        let winit::dpi::PhysicalSize { width, height } = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window).expect("create surface");

        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptionsBase {
                power_preference: wgpu::PowerPreference::LowPower,
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            }))
            .expect("Could not request an adapter.");

        info!("Using adapter: {}", adapter.get_info().name);

        let surface_caps = surface.get_capabilities(&adapter);

        // Find a sRGB surface format or use the first.
        let format = surface_caps
            .formats
            .iter()
            .find(|cap| cap.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let mut surface_config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .expect("surface get default configuration");
        surface_config.format = format;
        surface_config.present_mode = wgpu::PresentMode::AutoVsync;
        surface_config.alpha_mode = choose_alpha_mode(&surface_caps.alpha_modes);

        let surface = Surface::new(surface, surface_config);

        let (device, queue) = pollster::block_on(
            adapter.request_device(&wgpu::DeviceDescriptor::default(), None),
        )
        .expect("request device");

        surface.configure(&device);

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        Self {
            device: device.into(),
            queue: queue.into(),
            surface,
            texture_bind_group_layout,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = UVec2::new(width, height);
        self.surface.resize(&self.device, size);
    }

    pub fn create_shader_module(&self, label: &str, source: &str) -> wgpu::ShaderModule {
        let shader_module_label = format!("{label}_shader_module");
        self.device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&shader_module_label),
                source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(source)),
            })
    }

    #[must_use]
    pub fn build_render_pipeline<'a>(
        &'a self,
        label: &'a str,
        module: &'a wgpu::ShaderModule,
    ) -> RenderPipelineBuilder<'a> {
        RenderPipelineBuilder {
            renderer: self,
            label,
            bindings: vec![],
            module,
            primitive_state: None,
            blend: None,
            vertex_entry: None,
            fragment_entry: None,
        }
    }

    /// Upload an image as a sampled texture.
    pub fn create_texture_view(&self, label: &str, image: &image::RgbaImage) -> wgpu::TextureView {
        let (width, height) = (image.width(), image.height());

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::COPY_DST | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::default(),
                aspect: wgpu::TextureAspect::All,
            },
            image,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn texture_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_bind_group_layout
    }

    pub fn create_texture_bind_group(
        &self,
        label: &str,
        texture_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    pub fn create_sampler(
        &self,
        label: &str,
        address_mode: wgpu::AddressMode,
        mag_filter: wgpu::FilterMode,
        min_filter: wgpu::FilterMode,
    ) -> wgpu::Sampler {
        self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter,
            min_filter,
            ..Default::default()
        })
    }
}

/// A single object passed around during the rendering of a single frame.
pub struct Frame {
    pub queue: RenderQueue,

    /// The encoder to use for creating render passes.
    pub encoder: wgpu::CommandEncoder,

    /// The window surface.
    pub surface: wgpu::TextureView,
}

impl Frame {
    /// Begin a render pass targeting the window surface. When `clear` is set the surface is
    /// cleared to fully transparent first.
    pub fn begin_basic_render_pass(&mut self, label: &str, clear: bool) -> wgpu::RenderPass<'_> {
        let load = if clear {
            wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT)
        } else {
            wgpu::LoadOp::Load
        };

        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.surface,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}

pub struct RenderPipelineBuilder<'a> {
    renderer: &'a Renderer,

    label: &'a str,

    bindings: Vec<&'a wgpu::BindGroupLayout>,

    module: &'a wgpu::ShaderModule,

    /// A specific primitive state, otherwise use the default.
    primitive_state: Option<wgpu::PrimitiveState>,

    /// Blend state.
    blend: Option<wgpu::BlendState>,

    /// Fragment shader entry point.
    fragment_entry: Option<&'a str>,

    /// Vertex shader entry point.
    vertex_entry: Option<&'a str>,
}

impl<'a> RenderPipelineBuilder<'a> {
    pub fn with_primitive(mut self, primitive_state: wgpu::PrimitiveState) -> Self {
        self.primitive_state = Some(primitive_state);
        self
    }

    pub fn binding(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.bindings.push(layout);
        self
    }

    pub fn with_vertex_entry(mut self, entry: &'a str) -> Self {
        self.vertex_entry = Some(entry);
        self
    }

    pub fn with_fragment_entry(mut self, entry: &'a str) -> Self {
        self.fragment_entry = Some(entry);
        self
    }

    pub fn with_blend(mut self, blend: wgpu::BlendState) -> Self {
        self.blend = Some(blend);
        self
    }

    /// Vertices are generated in the vertex shader, so the pipeline takes no vertex buffers.
    pub fn build(self) -> wgpu::RenderPipeline {
        let layout = self
            .renderer
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(self.label),
                bind_group_layouts: &self.bindings,
                push_constant_ranges: &[],
            });

        self.renderer
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(self.label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: self.module,
                    entry_point: self.vertex_entry,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[],
                },
                primitive: self.primitive_state.unwrap_or_default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: self.module,
                    entry_point: self.fragment_entry,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.renderer.surface.format(),
                        blend: self.blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
                cache: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::CompositeAlphaMode as Mode;

    #[test]
    fn alpha_mode_prefers_transparency() {
        assert_eq!(
            choose_alpha_mode(&[Mode::Opaque, Mode::PostMultiplied, Mode::PreMultiplied]),
            Mode::PreMultiplied
        );
        assert_eq!(
            choose_alpha_mode(&[Mode::Opaque, Mode::PostMultiplied]),
            Mode::PostMultiplied
        );
        assert_eq!(choose_alpha_mode(&[Mode::Opaque]), Mode::Opaque);
        assert_eq!(choose_alpha_mode(&[]), Mode::Auto);
    }
}
