//! GPU mirror of the blue-noise cache: one R8 texture per size, uploaded
//! on first use and sampled with repeat addressing.

use super::helpers;
use drift_core::BlueNoiseCache;
use fnv::FnvHashMap;
use wgpu;

pub struct NoiseTextures {
    cache: BlueNoiseCache,
    textures: FnvHashMap<u32, (wgpu::Texture, wgpu::TextureView)>,
    sampler: wgpu::Sampler,
}

impl NoiseTextures {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            cache: BlueNoiseCache::new(),
            textures: FnvHashMap::default(),
            sampler: helpers::linear_sampler(device, "noise_repeat", wgpu::AddressMode::Repeat),
        }
    }

    /// Texture view for `size` (uploaded on first request) with the repeat
    /// sampler it must be read through.
    pub fn binding(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: u32,
    ) -> (&wgpu::TextureView, &wgpu::Sampler) {
        let cache = &mut self.cache;
        let (_, view) = self.textures.entry(size.max(1)).or_insert_with(|| {
            let noise = cache.get(size);
            let n = noise.size();
            let (tex, view) = helpers::create_color_texture(
                device,
                "blue_noise",
                n,
                n,
                wgpu::TextureFormat::R8Unorm,
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            );
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &tex,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                noise.data(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(n),
                    rows_per_image: Some(n),
                },
                wgpu::Extent3d {
                    width: n,
                    height: n,
                    depth_or_array_layers: 1,
                },
            );
            log::info!("[noise] uploaded {n}x{n} blue noise");
            (tex, view)
        });
        (view, &self.sampler)
    }

    pub fn is_uploaded(&self, size: u32) -> bool {
        self.textures.contains_key(&size.max(1))
    }

    /// Destroy every uploaded texture and clear the CPU cache.
    pub fn dispose(&mut self) {
        for (_, (tex, _)) in self.textures.drain() {
            tex.destroy();
        }
        self.cache.dispose();
    }
}

impl Drop for NoiseTextures {
    fn drop(&mut self) {
        self.dispose();
    }
}
