use std::f32::consts::PI;
use std::mem::size_of;

use bytemuck::{cast_slice, Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::wgpu::Wgpu;

const SEGMENT_COUNT: usize = 12;
const RING_COUNT: usize = 6;

/// position, normal, uv
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Mesh {
    fn upload(wgpu: &Wgpu, name: &str, vertices: &[MeshVertex], indices: &[u32]) -> Self {
        let vertex_buffer = wgpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{name} Vertex Buffer")),
                contents: cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = wgpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{name} Index Buffer")),
                contents: cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

impl Wgpu {
    pub fn create_cylinder(&self) -> Mesh {
        let (vertices, indices) = cylinder_geometry();
        Mesh::upload(self, "Cylinder", &vertices, &indices)
    }

    pub fn create_sphere(&self) -> Mesh {
        let (vertices, indices) = sphere_geometry();
        Mesh::upload(self, "Sphere", &vertices, &indices)
    }
}

/// Open tube of unit radius along y from -0.5 to 0.5. The ends are covered by spheres.
pub fn cylinder_geometry() -> (Vec<MeshVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity((SEGMENT_COUNT + 1) * 2);
    let mut indices = Vec::with_capacity(SEGMENT_COUNT * 6);
    for i in 0..=SEGMENT_COUNT {
        let u = i as f32 / SEGMENT_COUNT as f32;
        let angle = u * 2.0 * PI;
        let (x, z) = (angle.cos(), angle.sin());
        let normal = [x, 0.0, z];
        vertices.push(MeshVertex {
            position: [x, 0.5, z],
            normal,
            uv: [u, 0.0],
        });
        vertices.push(MeshVertex {
            position: [x, -0.5, z],
            normal,
            uv: [u, 1.0],
        });
    }
    for i in 0..SEGMENT_COUNT as u32 {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
    }
    (vertices, indices)
}

/// Unit sphere, latitude rings from pole to pole.
pub fn sphere_geometry() -> (Vec<MeshVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity((RING_COUNT + 1) * (SEGMENT_COUNT + 1));
    let mut indices = Vec::with_capacity(RING_COUNT * SEGMENT_COUNT * 6);
    for ring in 0..=RING_COUNT {
        let v = ring as f32 / RING_COUNT as f32;
        let polar = v * PI;
        for i in 0..=SEGMENT_COUNT {
            let u = i as f32 / SEGMENT_COUNT as f32;
            let angle = u * 2.0 * PI;
            let point = [polar.sin() * angle.cos(), polar.cos(), polar.sin() * angle.sin()];
            vertices.push(MeshVertex {
                position: point,
                normal: point,
                uv: [u, v],
            });
        }
    }
    let stride = SEGMENT_COUNT as u32 + 1;
    for ring in 0..RING_COUNT as u32 {
        for i in 0..SEGMENT_COUNT as u32 {
            let a = ring * stride + i;
            let b = a + stride;
            indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
        }
    }
    (vertices, indices)
}
