use super::morph::MorphRenderer;
use super::noise::NoiseTextures;
use super::particles::ParticleRenderer;
use super::post::{CompositePass, CompositeUniforms};
use super::targets::{ColorTarget, HDR_FORMAT};
use super::velocity_field::VelocityField;
use super::helpers;
use drift_core::motion::smooth_calm;
use drift_core::morph::shapes;
use drift_core::{
    world_to_uv, CameraRig, FieldHandle, FrameUniforms, MorphDriver, ParticleGeometry,
    SceneConfig, SceneUniforms, SectionTable,
};
use glam::Vec2;
use wgpu;

/// Per-frame inputs from the front-end. `uniforms` is a copy of the store
/// mirror taken after the controllers ran this frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInputs {
    pub uniforms: FrameUniforms,
    /// Shader time in seconds; frozen by the caller under reduced motion.
    pub time_sec: f32,
    pub dt_sec: f32,
    /// Damped pointer delta in uv units per frame.
    pub pointer_velocity: Vec2,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    scene_buffer: wgpu::Buffer,
    scene_target: ColorTarget,
    neutral_field: ColorTarget,
    linear_sampler: wgpu::Sampler,

    field: VelocityField,
    particles: ParticleRenderer,
    morph: MorphRenderer,
    noise: NoiseTextures,
    composite: CompositePass,

    sections: SectionTable,
    rig: CameraRig,
    effective_calm: f32,
    point_size: f32,
    world_half_height: f32,
    noise_size: u32,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'a>>,
        width: u32,
        height: u32,
        scene: &SceneConfig,
        sections: SectionTable,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        log::info!("[gpu] adapter: {}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {e:?}"))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene_buffer = helpers::uniform_buffer::<SceneUniforms>(&device, "scene_uniforms");
        let geometry = ParticleGeometry::generate(&scene.particles);
        let particles = ParticleRenderer::new(&device, &scene_buffer, &geometry);
        let keyframes = shapes::default_set(scene.morph_particles)?;
        let morph = MorphRenderer::new(&device, &keyframes, scene.morph_mode, scene.morph_speed)?;

        let mut state = Self {
            scene_target: ColorTarget::new(&device, "hdr_tex", width, height, HDR_FORMAT),
            neutral_field: ColorTarget::neutral(&device),
            linear_sampler: helpers::linear_sampler(
                &device,
                "linear_clamp",
                wgpu::AddressMode::ClampToEdge,
            ),
            field: VelocityField::new(&device, width, height, scene.brush),
            noise: NoiseTextures::new(&device),
            composite: CompositePass::new(&device, format),
            particles,
            morph,
            scene_buffer,
            surface,
            device,
            queue,
            config,
            sections,
            rig: CameraRig::default(),
            effective_calm: 0.0,
            point_size: scene.point_size,
            world_half_height: scene.world_half_height,
            noise_size: scene.noise_size,
            width,
            height,
        };
        state.rebind();
        log::info!("[gpu] ready {width}x{height}, format {format:?}");
        Ok(state)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn morph(&self) -> &MorphDriver {
        self.morph.driver()
    }

    pub fn morph_mut(&mut self) -> &mut MorphDriver {
        self.morph.driver_mut()
    }

    /// Resize the surface and every size-dependent target. Zero sizes are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.scene_target = ColorTarget::new(&self.device, "hdr_tex", width, height, HDR_FORMAT);
        self.field.resize(&self.device, width, height);
        self.rebind();
        log::info!("[gpu] resized to {width}x{height}");
    }

    /// Reconfigure after the surface was lost or became outdated.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn rebind(&mut self) {
        let field = self
            .field
            .published_view()
            .unwrap_or(self.neutral_field.view());
        self.morph.rebind(&self.device, &self.scene_buffer, field);
        let (noise, repeat) = self.noise.binding(&self.device, &self.queue, self.noise_size);
        self.composite.rebind(
            &self.device,
            self.scene_target.view(),
            &self.linear_sampler,
            field,
            noise,
            repeat,
        );
    }

    /// Encode and present one frame. Returns the velocity-field handle the
    /// caller should publish into the store.
    pub fn render(&mut self, input: &FrameInputs) -> Result<Option<FieldHandle>, wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        let aspect = self.width as f32 / self.height as f32;
        let cursor_uv = world_to_uv(input.uniforms.cursor_position, aspect, self.world_half_height);
        let handle = self.field.encode(
            &self.queue,
            &mut encoder,
            cursor_uv,
            input.pointer_velocity,
            aspect,
        );

        let mut mirror = input.uniforms;
        mirror.velocity_field = handle;
        self.effective_calm = smooth_calm(self.effective_calm, mirror.calm_factor);
        let camera = self.rig.step(&self.sections, &mirror, aspect);
        let scene = SceneUniforms::new(
            &camera,
            [self.width as f32, self.height as f32],
            input.time_sec,
            &mirror,
            self.effective_calm,
            self.point_size,
        );
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));
        self.morph
            .update(&self.queue, input.dt_sec, mirror.scroll_progress);

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.scene_target.view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.01,
                            g: 0.012,
                            b: 0.025,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.particles.draw(&mut rpass);
            if !self.morph.draw(&mut rpass) {
                log::debug!("[gpu] morph not bound yet");
            }
        }

        let post = CompositeUniforms::new(
            [self.width as f32, self.height as f32],
            input.time_sec,
            handle.is_some(),
            self.noise_size,
        );
        if !self.composite.encode(&self.queue, &mut encoder, &view, &post) {
            log::debug!("[gpu] composite not bound yet");
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(handle)
    }
}

impl Drop for GpuState<'_> {
    fn drop(&mut self) {
        self.scene_buffer.destroy();
        log::info!("[gpu] released");
    }
}
