use glam::{UVec2, Vec4};

use crate::engine::renderer::{Frame, Renderer, UniformBuffer};

use super::sampler::Rect;

const SHADER: &str = r"
    struct Sprite {
        // xy: top left, zw: size. In texture coordinates.
        uv_rect: vec4<f32>,
        premultiply: u32,
    }

    @group(0) @binding(0) var t_sheet: texture_2d<f32>;
    @group(0) @binding(1) var s_sheet: sampler;

    @group(1) @binding(0) var<uniform> u_sprite: Sprite;

    struct VertexOutput {
        @builtin(position) position: vec4<f32>,
        @location(0) uv: vec2<f32>,
    }

    @vertex
    fn vertex_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
        // Triangle strip covering the whole surface.
        let corner = vec2<f32>(f32(vertex_index & 1u), f32(vertex_index >> 1u));

        var out: VertexOutput;
        out.position = vec4<f32>(corner.x * 2.0 - 1.0, 1.0 - corner.y * 2.0, 0.0, 1.0);
        out.uv = u_sprite.uv_rect.xy + corner * u_sprite.uv_rect.zw;
        return out;
    }

    @fragment
    fn fragment_main(in: VertexOutput) -> @location(0) vec4<f32> {
        let color = textureSample(t_sheet, s_sheet, in.uv);
        if u_sprite.premultiply != 0u {
            return vec4<f32>(color.rgb * color.a, color.a);
        }
        return color;
    }
";

#[derive(Clone, Copy, Default, bytemuck::NoUninit)]
#[repr(C)]
struct SpriteUniform {
    uv_rect: Vec4,
    premultiply: u32,
    _padding: [u32; 3],
}

struct SpriteSheet {
    bind_group: wgpu::BindGroup,
    /// Size of the uploaded texture, never zero.
    size: UVec2,
}

/// Blits a region of a sprite sheet so it fills the whole window.
pub struct SpriteRenderer {
    pipeline: wgpu::RenderPipeline,
    sprite: UniformBuffer<SpriteUniform>,
    sheets: Vec<SpriteSheet>,
}

impl SpriteRenderer {
    /// Upload `images` as sprite sheets. Sheets are referenced by their index afterwards.
    pub fn new(renderer: &Renderer, images: &[image::RgbaImage]) -> Self {
        let module = renderer.create_shader_module("sprite", SHADER);

        let sprite = UniformBuffer::<SpriteUniform>::new(
            renderer,
            "sprite_uniform",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );

        let premultiply =
            renderer.surface.alpha_mode() != wgpu::CompositeAlphaMode::PostMultiplied;
        sprite.upload(&renderer.queue, |data| {
            data.premultiply = premultiply as u32;
        });

        let blend = if premultiply {
            wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING
        } else {
            wgpu::BlendState::ALPHA_BLENDING
        };

        let pipeline = renderer
            .build_render_pipeline("sprite", &module)
            .binding(renderer.texture_bind_group_layout())
            .binding(&sprite.bind_group_layout)
            .with_primitive(wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            })
            .with_vertex_entry("vertex_main")
            .with_fragment_entry("fragment_main")
            .with_blend(blend)
            .build();

        let sampler = renderer.create_sampler(
            "sprite_sampler",
            wgpu::AddressMode::ClampToEdge,
            wgpu::FilterMode::Linear,
            wgpu::FilterMode::Linear,
        );

        let blank = image::RgbaImage::new(1, 1);

        let sheets = images
            .iter()
            .enumerate()
            .map(|(index, image)| {
                // Nothing to sample from an empty image, show a transparent pixel instead.
                let image = if image.width() == 0 || image.height() == 0 {
                    &blank
                } else {
                    image
                };

                let label = format!("sprite_sheet_{index}");
                let view = renderer.create_texture_view(&label, image);
                SpriteSheet {
                    bind_group: renderer.create_texture_bind_group(&label, &view, &sampler),
                    size: UVec2::new(image.width(), image.height()),
                }
            })
            .collect();

        Self {
            pipeline,
            sprite,
            sheets,
        }
    }

    /// Draw `source` from the sheet at `sheet` stretched over the whole surface.
    pub fn draw_frame(&self, frame: &mut Frame, sheet: usize, source: Rect) {
        let sheet = self.sheets.get(sheet);
        if let Some(sheet) = sheet {
            let uv_rect = uv_rect(source, sheet.size);
            self.sprite.upload(&frame.queue, |data| data.uv_rect = uv_rect);
        }

        let mut render_pass = frame.begin_basic_render_pass("sprite", true);

        let Some(sheet) = sheet else {
            return;
        };

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &sheet.bind_group, &[]);
        render_pass.set_bind_group(1, &self.sprite.bind_group, &[]);
        render_pass.draw(0..4, 0..1);
    }
}

/// `source` in normalized texture coordinates, packed as `(x, y, width, height)`.
fn uv_rect(source: Rect, sheet_size: UVec2) -> Vec4 {
    let sheet_size = sheet_size.max(UVec2::ONE).as_vec2();
    let pos = source.pos.as_vec2() / sheet_size;
    let size = source.size.as_vec2() / sheet_size;
    Vec4::new(pos.x, pos.y, size.x, size.y).clamp(Vec4::ZERO, Vec4::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_rect_is_normalized() {
        let uv = uv_rect(Rect::new(50, 0, 50, 50), UVec2::new(200, 100));
        assert_eq!(uv, Vec4::new(0.25, 0.0, 0.25, 0.5));
    }

    #[test]
    fn uv_rect_of_blank_sheet_is_clamped() {
        let uv = uv_rect(Rect::new(0, 0, 50, 50), UVec2::ZERO);
        assert_eq!(uv, Vec4::new(0.0, 0.0, 1.0, 1.0));
    }
}
