use super::helpers;
use drift_core::{DISTORTION_STRENGTH, JITTER_STRENGTH};
use wgpu;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct CompositeUniforms {
    pub(crate) resolution: [f32; 2],
    pub(crate) time: f32,
    pub(crate) distortion: f32,
    pub(crate) jitter: f32,
    pub(crate) field_active: f32,
    pub(crate) noise_size: f32,
    pub(crate) _pad: f32,
}

impl CompositeUniforms {
    pub(crate) fn new(resolution: [f32; 2], time: f32, field_active: bool, noise_size: u32) -> Self {
        Self {
            resolution,
            time,
            distortion: DISTORTION_STRENGTH,
            jitter: JITTER_STRENGTH,
            field_active: if field_active { 1.0 } else { 0.0 },
            noise_size: noise_size as f32,
            _pad: 0.0,
        }
    }
}

/// Final distortion pass from the HDR scene to the swapchain.
pub(crate) struct CompositePass {
    pub(crate) bgl0: wgpu::BindGroupLayout, // scene tex + sampler + uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // field tex + noise tex + repeat sampler
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) bg0: Option<wgpu::BindGroup>,
    pub(crate) bg1: Option<wgpu::BindGroup>,
}

impl CompositePass {
    pub(crate) fn new(device: &wgpu::Device, swap_format: wgpu::TextureFormat) -> Self {
        let shader = helpers::shader_module(device, "composite", drift_core::COMPOSITE_WGSL);
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("composite_bgl0"),
            entries: &[
                helpers::texture_entry(0, wgpu::ShaderStages::FRAGMENT),
                helpers::sampler_entry(1, wgpu::ShaderStages::FRAGMENT),
                helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("composite_bgl1"),
            entries: &[
                helpers::texture_entry(0, wgpu::ShaderStages::FRAGMENT),
                helpers::texture_entry(1, wgpu::ShaderStages::FRAGMENT),
                helpers::sampler_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_composite"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_post_pipeline(
            device,
            "composite",
            &layout,
            &shader,
            "fs_composite",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );
        Self {
            bgl0,
            bgl1,
            uniform_buffer: helpers::uniform_buffer::<CompositeUniforms>(device, "composite_uniforms"),
            pipeline,
            bg0: None,
            bg1: None,
        }
    }

    /// Rebuild bind groups after any of the referenced views changed.
    pub(crate) fn rebind(
        &mut self,
        device: &wgpu::Device,
        scene: &wgpu::TextureView,
        linear: &wgpu::Sampler,
        field: &wgpu::TextureView,
        noise: &wgpu::TextureView,
        repeat: &wgpu::Sampler,
    ) {
        self.bg0 = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_composite_scene"),
            layout: &self.bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(scene),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(linear),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
            ],
        }));
        self.bg1 = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_composite_field"),
            layout: &self.bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(field),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(noise),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(repeat),
                },
            ],
        }));
    }

    /// Returns false when bind groups are not ready yet.
    pub(crate) fn encode(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        uniforms: &CompositeUniforms,
    ) -> bool {
        let (Some(bg0), Some(bg1)) = (self.bg0.as_ref(), self.bg1.as_ref()) else {
            return false;
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
        blit(
            encoder,
            "composite",
            target,
            wgpu::Color::BLACK,
            &self.pipeline,
            bg0,
            Some(bg1),
        );
        true
    }
}

impl Drop for CompositePass {
    fn drop(&mut self) {
        self.uniform_buffer.destroy();
    }
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    clear: wgpu::Color,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
    drop(r);
}
