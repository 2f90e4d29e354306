//! Instanced point sprites for the particle field plus a line list for the
//! connections. Both read the shared scene uniform.

use super::helpers;
use super::targets::HDR_FORMAT;
use drift_core::{LineVertex, ParticleGeometry, ParticleVertex};
use wgpu;
use wgpu::util::DeviceExt;

const POINT_ATTRS: [wgpu::VertexAttribute; 4] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32, 3 => Float32];
const LINE_ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    0 => Float32x3, 1 => Float32, 2 => Float32, 3 => Float32, 4 => Float32, 5 => Float32
];

pub struct ParticleRenderer {
    point_buffer: wgpu::Buffer,
    line_buffer: wgpu::Buffer,
    point_count: u32,
    line_vertex_count: u32,
    bind_group: wgpu::BindGroup,
    points_pipeline: wgpu::RenderPipeline,
    lines_pipeline: wgpu::RenderPipeline,
}

impl ParticleRenderer {
    pub fn new(
        device: &wgpu::Device,
        scene_buffer: &wgpu::Buffer,
        geometry: &ParticleGeometry,
    ) -> Self {
        let shader = helpers::shader_module(device, "particles", drift_core::PARTICLES_WGSL);
        let lines = geometry.line_vertices();

        // Geometry is uploaded once; the CPU copy is not touched again.
        let point_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle_vb"),
            contents: bytemuck::cast_slice(&geometry.points),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let line_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("connection_vb"),
            contents: bytemuck::cast_slice(&lines),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particles_bgl"),
            entries: &[helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_particles"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_particles"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let points_pipeline = helpers::make_scene_pipeline(
            device,
            "particle_points",
            &layout,
            &shader,
            "vs_points",
            "fs_points",
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<ParticleVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &POINT_ATTRS,
            }],
            wgpu::PrimitiveTopology::TriangleList,
            HDR_FORMAT,
        );
        let lines_pipeline = helpers::make_scene_pipeline(
            device,
            "particle_lines",
            &layout,
            &shader,
            "vs_lines",
            "fs_lines",
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &LINE_ATTRS,
            }],
            wgpu::PrimitiveTopology::LineList,
            HDR_FORMAT,
        );

        log::info!(
            "[particles] uploaded {} points, {} line vertices",
            geometry.points.len(),
            lines.len()
        );
        Self {
            point_buffer,
            line_buffer,
            point_count: geometry.points.len() as u32,
            line_vertex_count: lines.len() as u32,
            bind_group,
            points_pipeline,
            lines_pipeline,
        }
    }

    /// Lines first so points sit on top of them.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
        if self.line_vertex_count > 0 {
            pass.set_pipeline(&self.lines_pipeline);
            pass.set_vertex_buffer(0, self.line_buffer.slice(..));
            pass.draw(0..self.line_vertex_count, 0..1);
        }
        if self.point_count > 0 {
            pass.set_pipeline(&self.points_pipeline);
            pass.set_vertex_buffer(0, self.point_buffer.slice(..));
            pass.draw(0..6, 0..self.point_count);
        }
    }
}

impl Drop for ParticleRenderer {
    fn drop(&mut self) {
        self.point_buffer.destroy();
        self.line_buffer.destroy();
    }
}
