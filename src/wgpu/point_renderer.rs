use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use wgpu::util::DeviceExt;

use crate::wgpu::{default_depth_stencil_state, Wgpu};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl PointVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub fn point_vertices(points: &[DVec3], color: [f32; 4]) -> Vec<PointVertex> {
    points
        .iter()
        .map(|point| PointVertex {
            position: point.as_vec3().to_array(),
            color,
        })
        .collect()
}

/// Smallest step through the points that keeps the vertex buffer within `max_buffer_size` bytes.
pub fn decimation_stride(point_count: usize, max_buffer_size: u64) -> usize {
    let vertex_size = size_of::<PointVertex>() as u64;
    let max_points = (max_buffer_size / vertex_size).max(1);
    (point_count as u64).div_ceil(max_points).max(1) as usize
}

/// Draws a point cloud as single pixels.
pub struct PointRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl PointRenderer {
    pub fn new(wgpu: &Wgpu) -> Self {
        let pipeline_layout = wgpu.create_pipeline_layout("Point Pipeline Layout");
        let pipeline = wgpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Point Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &wgpu.shader,
                    entry_point: Some("point_vertex"),
                    compilation_options: Default::default(),
                    buffers: &[PointVertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &wgpu.shader,
                    entry_point: Some("point_fragment"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: wgpu.surface_configuration.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::PointList,
                    ..Default::default()
                },
                depth_stencil: Some(default_depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });
        Self {
            pipeline,
            vertex_buffer: None,
            vertex_count: 0,
        }
    }

    pub fn update(&mut self, wgpu: &Wgpu, vertices: &[PointVertex]) {
        let stride = decimation_stride(vertices.len(), wgpu.device.limits().max_buffer_size);
        let decimated: Vec<PointVertex>;
        let vertices = if stride > 1 {
            decimated = vertices.iter().step_by(stride).copied().collect();
            log::warn!(
                "Drawing one in {stride} of {} points to fit the vertex buffer",
                vertices.len()
            );
            decimated.as_slice()
        } else {
            vertices
        };
        self.vertex_count = vertices.len() as u32;
        self.vertex_buffer = (self.vertex_count > 0).then(|| {
            wgpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Point Vertex Buffer"),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass, bind_group: &wgpu::BindGroup) {
        let Some(vertex_buffer) = &self.vertex_buffer else {
            return;
        };
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}
