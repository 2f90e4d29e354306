use super::helpers;
use wgpu;

/// Format of the scene colour target.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Format of the velocity-field targets; signed, filterable, renderable.
pub const FIELD_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

const TARGET_USAGE: wgpu::TextureUsages = wgpu::TextureUsages::RENDER_ATTACHMENT
    .union(wgpu::TextureUsages::TEXTURE_BINDING);

/// An owned off-screen colour target. The texture is destroyed when the
/// target is dropped or replaced.
pub struct ColorTarget {
    pub(crate) tex: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl ColorTarget {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let (tex, view) =
            helpers::create_color_texture(device, label, width, height, format, TARGET_USAGE);
        Self {
            tex,
            view,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// 1×1 target that samples as zero; bound wherever a live velocity field
    /// is missing.
    pub fn neutral(device: &wgpu::Device) -> Self {
        // wgpu zero-initialises new textures.
        Self::new(device, "neutral_field", 1, 1, FIELD_FORMAT)
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for ColorTarget {
    fn drop(&mut self) {
        self.tex.destroy();
    }
}
