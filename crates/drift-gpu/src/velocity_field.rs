//! GPU half of the velocity-field feedback loop.
//!
//! Per frame: paint into the high-res write target (sampling last frame's
//! low-res field), swap, blur the high-res read target down into the low-res
//! target. The low-res target is the published field.

use super::helpers;
use super::post::blit;
use super::targets::{ColorTarget, FIELD_FORMAT};
use drift_core::{BrushParams, FieldHandle, FieldResolution, PingPong, Slot};
use glam::Vec2;
use wgpu;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FieldUniforms {
    cursor_uv: [f32; 2],
    velocity: [f32; 2],
    texel: [f32; 2],
    aspect: f32,
    radius: f32,
    softness: f32,
    decay: f32,
    _pad: [f32; 2],
}

/// Size-dependent resources, rebuilt together on resize.
struct FieldTargets {
    hi: PingPong<ColorTarget>,
    lo: ColorTarget,
    bg_paint: wgpu::BindGroup,
    bg_blur_from_a: wgpu::BindGroup,
    bg_blur_from_b: wgpu::BindGroup,
}

impl FieldTargets {
    fn blur_source(&self, slot: Slot) -> &wgpu::BindGroup {
        match slot {
            Slot::A => &self.bg_blur_from_a,
            Slot::B => &self.bg_blur_from_b,
        }
    }
}

pub struct VelocityField {
    targets: Option<FieldTargets>,
    resolution: FieldResolution,
    bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniform_buffer: wgpu::Buffer,
    paint_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    brush: BrushParams,
    generation: u64,
}

impl VelocityField {
    pub fn new(device: &wgpu::Device, width: u32, height: u32, brush: BrushParams) -> Self {
        let shader = helpers::shader_module(device, "velocity_field", drift_core::VELOCITY_WGSL);
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("field_bgl"),
            entries: &[
                helpers::texture_entry(0, wgpu::ShaderStages::FRAGMENT),
                helpers::sampler_entry(1, wgpu::ShaderStages::FRAGMENT),
                helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_field"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let paint_pipeline = helpers::make_post_pipeline(
            device,
            "field_paint",
            &layout,
            &shader,
            "fs_paint",
            FIELD_FORMAT,
            None,
        );
        let blur_pipeline = helpers::make_post_pipeline(
            device,
            "field_blur",
            &layout,
            &shader,
            "fs_blur",
            FIELD_FORMAT,
            None,
        );
        let mut field = Self {
            targets: None,
            resolution: FieldResolution::for_viewport(0, 0),
            bgl,
            sampler: helpers::linear_sampler(device, "field_sampler", wgpu::AddressMode::ClampToEdge),
            uniform_buffer: helpers::uniform_buffer::<FieldUniforms>(device, "field_uniforms"),
            paint_pipeline,
            blur_pipeline,
            brush,
            generation: 0,
        };
        field.resize(device, width, height);
        field
    }

    pub fn resolution(&self) -> FieldResolution {
        self.resolution
    }

    /// Recreate targets for a new viewport. Too-small viewports drop the
    /// targets and later frames short-circuit.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let res = FieldResolution::for_viewport(width, height);
        if res == self.resolution && self.targets.is_some() {
            return;
        }
        self.resolution = res;
        // Drop old targets first so their textures are destroyed before the
        // replacements are allocated.
        self.targets = None;
        if !res.is_renderable() {
            log::info!("[field] viewport {width}x{height} too small, field disabled");
            return;
        }
        let (hw, hh) = res.hi;
        let (lw, lh) = res.lo;
        let hi = PingPong::from_fn(|slot| {
            let label = match slot {
                Slot::A => "field_hi_a",
                Slot::B => "field_hi_b",
            };
            ColorTarget::new(device, label, hw, hh, FIELD_FORMAT)
        });
        let lo = ColorTarget::new(device, "field_lo", lw, lh, FIELD_FORMAT);
        let bg_paint = self.bind_group(device, "bg_field_paint", lo.view());
        let bg_blur_from_a = self.bind_group(device, "bg_field_blur_a", hi.get(Slot::A).view());
        let bg_blur_from_b = self.bind_group(device, "bg_field_blur_b", hi.get(Slot::B).view());
        self.targets = Some(FieldTargets {
            hi,
            lo,
            bg_paint,
            bg_blur_from_a,
            bg_blur_from_b,
        });
        log::info!("[field] targets hi {hw}x{hh}, lo {lw}x{lh}");
    }

    fn bind_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        source: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// The published low-res field, if targets exist.
    pub fn published_view(&self) -> Option<&wgpu::TextureView> {
        self.targets.as_ref().map(|t| t.lo.view())
    }

    /// Encode paint → swap → blur. Returns the handle of the freshly
    /// published field, or `None` when there are no targets.
    pub fn encode(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        cursor_uv: Vec2,
        velocity: Vec2,
        aspect: f32,
    ) -> Option<FieldHandle> {
        let Some(t) = self.targets.as_mut() else {
            log::debug!("[field] no targets, skipping");
            return None;
        };
        let (hw, hh) = self.resolution.hi;
        let u = FieldUniforms {
            cursor_uv: cursor_uv.to_array(),
            velocity: velocity.to_array(),
            texel: [1.0 / hw as f32, 1.0 / hh as f32],
            aspect,
            radius: self.brush.radius,
            softness: self.brush.softness,
            decay: self.brush.decay,
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));

        blit(
            encoder,
            "field_paint",
            t.hi.write().view(),
            wgpu::Color::TRANSPARENT,
            &self.paint_pipeline,
            &t.bg_paint,
            None,
        );
        t.hi.swap();
        blit(
            encoder,
            "field_blur",
            t.lo.view(),
            wgpu::Color::TRANSPARENT,
            &self.blur_pipeline,
            t.blur_source(t.hi.read_slot()),
            None,
        );

        self.generation += 1;
        Some(FieldHandle(self.generation))
    }
}

impl Drop for VelocityField {
    fn drop(&mut self) {
        self.uniform_buffer.destroy();
    }
}
