//! Morphing particle cloud: keyframes in storage buffers, selection code
//! generated for the keyframe count, optional velocity-field displacement.

use super::helpers;
use super::targets::HDR_FORMAT;
use drift_core::{
    morph_shader_source, KeyframeSet, MorphDriver, MorphMode, MorphShaderStyle, MORPH_WGSL,
};
use wgpu;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MorphUniforms {
    progress: f32,
    point_count: u32,
    field_strength: f32,
    point_size: f32,
}

pub struct MorphRenderer {
    driver: MorphDriver,
    keyframe_buffer: wgpu::Buffer,
    uv_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    point_count: u32,
    field_sampler: wgpu::Sampler,
    bgl0: wgpu::BindGroupLayout, // scene uniform + field tex + sampler
    bg0: Option<wgpu::BindGroup>,
    bg1: wgpu::BindGroup, // keyframes + uvs + morph uniform
    pipeline: wgpu::RenderPipeline,
    field_strength: f32,
    point_size: f32,
}

impl MorphRenderer {
    pub fn new(
        device: &wgpu::Device,
        keyframes: &KeyframeSet,
        mode: MorphMode,
        speed: f32,
    ) -> anyhow::Result<Self> {
        let ext = keyframes.with_wraparound();
        let style = MorphShaderStyle::for_keyframes(ext.len());
        let source = morph_shader_source(ext.len(), style, MORPH_WGSL)?;
        let shader = helpers::shader_module(device, "morph", &source);

        let keyframe_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("morph_keyframes"),
            contents: bytemuck::cast_slice(&ext.packed_positions()),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let uv_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("morph_uvs"),
            contents: bytemuck::cast_slice(&ext.packed_uvs()),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let uniform_buffer = helpers::uniform_buffer::<MorphUniforms>(device, "morph_uniforms");

        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("morph_bgl0"),
            entries: &[
                helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                helpers::texture_entry(1, wgpu::ShaderStages::VERTEX),
                helpers::sampler_entry(2, wgpu::ShaderStages::VERTEX),
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("morph_bgl1"),
            entries: &[
                helpers::storage_entry(0, wgpu::ShaderStages::VERTEX),
                helpers::storage_entry(1, wgpu::ShaderStages::VERTEX),
                helpers::uniform_entry(2, wgpu::ShaderStages::VERTEX),
            ],
        });
        let bg1 = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_morph_keyframes"),
            layout: &bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: keyframe_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uv_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_morph"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_scene_pipeline(
            device,
            "morph",
            &layout,
            &shader,
            "vs_morph",
            "fs_morph",
            &[],
            wgpu::PrimitiveTopology::TriangleList,
            HDR_FORMAT,
        );

        log::info!(
            "[morph] {} keyframes (+1 wrap) x {} points, {:?}, mode {:?}",
            keyframes.len(),
            keyframes.point_count(),
            style,
            mode
        );
        Ok(Self {
            driver: MorphDriver::new(keyframes.len(), mode, speed),
            keyframe_buffer,
            uv_buffer,
            uniform_buffer,
            point_count: keyframes.point_count() as u32,
            field_sampler: helpers::linear_sampler(
                device,
                "morph_field_sampler",
                wgpu::AddressMode::ClampToEdge,
            ),
            bgl0,
            bg0: None,
            bg1,
            pipeline,
            field_strength: 0.6,
            point_size: 1.6,
        })
    }

    pub fn driver(&self) -> &MorphDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut MorphDriver {
        &mut self.driver
    }

    /// Point group 0 at the scene uniform and a field texture. Pass the
    /// neutral texture when no live field exists.
    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        scene_buffer: &wgpu::Buffer,
        field: &wgpu::TextureView,
    ) {
        self.bg0 = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_morph_scene"),
            layout: &self.bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(field),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.field_sampler),
                },
            ],
        }));
    }

    /// Advance the progress pursuit and upload the uniform.
    pub fn update(&mut self, queue: &wgpu::Queue, dt_sec: f32, scroll_fraction: f32) {
        self.driver.set_scroll_fraction(scroll_fraction);
        self.driver.tick(dt_sec);
        let u = MorphUniforms {
            progress: self.driver.uniform(),
            point_count: self.point_count,
            field_strength: self.field_strength,
            point_size: self.point_size,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
    }

    /// Returns false until group 0 is bound.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(bg0) = self.bg0.as_ref() else {
            return false;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bg0, &[]);
        pass.set_bind_group(1, &self.bg1, &[]);
        pass.draw(0..6, 0..self.point_count);
        true
    }
}

impl Drop for MorphRenderer {
    fn drop(&mut self) {
        self.keyframe_buffer.destroy();
        self.uv_buffer.destroy();
        self.uniform_buffer.destroy();
    }
}
