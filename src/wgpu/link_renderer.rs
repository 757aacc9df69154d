use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use glam::{DVec3, Vec3};
use wgpu::util::DeviceExt;
use wgpu::PipelineCompilationOptions;

use crate::config::NamedColor;
use crate::session::ViewerSession;
use crate::wgpu::cylinder::{Mesh, MeshVertex};
use crate::wgpu::{default_depth_stencil_state, Wgpu, DEFAULT_PRIMITIVE_STATE};

const LINK_RADIUS: f32 = 0.012;
const TARGET_RADIUS: f32 = 0.005;
const TARGET_SIZE: f32 = 0.04;
const FRAME_RADIUS: f32 = 0.0015;
const FRAME_COLOR: [f32; 4] = [0.55, 0.55, 0.55, 1.0];

/// One stick between two points. A cap is drawn as a sphere around `start`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CylinderInstance {
    pub start: [f32; 3],
    pub radius: f32,
    pub end: [f32; 3],
    pub color: [f32; 4],
}

impl CylinderInstance {
    pub fn new(start: Vec3, end: Vec3, radius: f32, color: [f32; 4]) -> Self {
        Self {
            start: start.to_array(),
            radius,
            end: end.to_array(),
            color,
        }
    }

    pub fn cap(center: Vec3, radius: f32, color: [f32; 4]) -> Self {
        Self::new(center, center, radius, color)
    }

    fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<CylinderInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Sticks and the round caps that go with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sticks {
    pub bodies: Vec<CylinderInstance>,
    pub caps: Vec<CylinderInstance>,
}

impl Sticks {
    pub fn push(&mut self, start: Vec3, end: Vec3, radius: f32, color: [f32; 4], capped: bool) {
        self.bodies
            .push(CylinderInstance::new(start, end, radius, color));
        if capped {
            self.caps.push(CylinderInstance::cap(start, radius, color));
            self.caps.push(CylinderInstance::cap(end, radius, color));
        }
    }

    pub fn extend(&mut self, other: Sticks) {
        self.bodies.extend(other.bodies);
        self.caps.extend(other.caps);
    }
}

/// The twelve edges of the plot cube.
pub fn frame_sticks(axis_limit: f32) -> Sticks {
    let mut sticks = Sticks::default();
    let corner = |bits: usize| {
        Vec3::new(
            if bits & 1 == 0 { -axis_limit } else { axis_limit },
            if bits & 2 == 0 { -axis_limit } else { axis_limit },
            if bits & 4 == 0 { -axis_limit } else { axis_limit },
        )
    };
    for from in 0..8usize {
        for axis in [1, 2, 4] {
            if from & axis == 0 {
                sticks.push(
                    corner(from),
                    corner(from | axis),
                    FRAME_RADIUS * axis_limit,
                    FRAME_COLOR,
                    false,
                );
            }
        }
    }
    sticks
}

/// An X that reads from every side: the four body diagonals of a small cube.
pub fn target_sticks(target: DVec3, axis_limit: f32) -> Sticks {
    let center = target.as_vec3();
    let half = TARGET_SIZE * axis_limit;
    let color = NamedColor::Red.rgba();
    let mut sticks = Sticks::default();
    for diagonal in [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ] {
        let offset = diagonal * half;
        sticks.push(
            center - offset,
            center + offset,
            TARGET_RADIUS * axis_limit,
            color,
            false,
        );
    }
    sticks
}

/// One thick round-capped stick per plotted segment.
pub fn segment_sticks(session: &ViewerSession, axis_limit: f32) -> Sticks {
    let mut sticks = Sticks::default();
    for plot in session.segments() {
        if let Some((start, end)) = plot.endpoints() {
            sticks.push(
                start.as_vec3(),
                end.as_vec3(),
                LINK_RADIUS * axis_limit,
                plot.color.rgba(),
                true,
            );
        }
    }
    sticks
}

#[derive(Default)]
struct InstanceBuffer {
    buffer: Option<wgpu::Buffer>,
    count: u32,
}

impl InstanceBuffer {
    fn update(&mut self, wgpu: &Wgpu, label: &str, instances: &[CylinderInstance]) {
        self.count = instances.len() as u32;
        self.buffer = (self.count > 0).then(|| {
            wgpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(instances),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });
    }
}

pub struct LinkRenderer {
    cylinder: Mesh,
    sphere: Mesh,
    body_pipeline: wgpu::RenderPipeline,
    cap_pipeline: wgpu::RenderPipeline,
    bodies: InstanceBuffer,
    caps: InstanceBuffer,
}

impl LinkRenderer {
    pub fn new(wgpu: &Wgpu) -> Self {
        let pipeline_layout = wgpu.create_pipeline_layout("Link Pipeline Layout");
        Self {
            cylinder: wgpu.create_cylinder(),
            sphere: wgpu.create_sphere(),
            body_pipeline: create_pipeline(wgpu, &pipeline_layout, "Link Body Pipeline", "link_vertex"),
            cap_pipeline: create_pipeline(wgpu, &pipeline_layout, "Link Cap Pipeline", "cap_vertex"),
            bodies: InstanceBuffer::default(),
            caps: InstanceBuffer::default(),
        }
    }

    pub fn update(&mut self, wgpu: &Wgpu, sticks: &Sticks) {
        self.bodies
            .update(wgpu, "Link Body Instance Buffer", &sticks.bodies);
        self.caps
            .update(wgpu, "Link Cap Instance Buffer", &sticks.caps);
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass, bind_group: &wgpu::BindGroup) {
        for (pipeline, mesh, instances) in [
            (&self.body_pipeline, &self.cylinder, &self.bodies),
            (&self.cap_pipeline, &self.sphere, &self.caps),
        ] {
            let Some(buffer) = &instances.buffer else {
                continue;
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..instances.count);
        }
    }
}

fn create_pipeline(
    wgpu: &Wgpu,
    layout: &wgpu::PipelineLayout,
    label: &str,
    vertex_entry_point: &str,
) -> wgpu::RenderPipeline {
    wgpu.device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                compilation_options: PipelineCompilationOptions::default(),
                module: &wgpu.shader,
                entry_point: Some(vertex_entry_point),
                buffers: &[MeshVertex::layout(), CylinderInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                compilation_options: PipelineCompilationOptions::default(),
                module: &wgpu.shader,
                entry_point: Some("link_fragment"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu.surface_configuration.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: DEFAULT_PRIMITIVE_STATE,
            depth_stencil: Some(default_depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Palette, ViewerStyle};
    use crate::generation::parse;

    #[test]
    fn frame_has_twelve_unit_edges() {
        let sticks = frame_sticks(0.3);
        assert_eq!(sticks.bodies.len(), 12);
        assert!(sticks.caps.is_empty());
        for body in &sticks.bodies {
            let length = Vec3::from(body.start).distance(Vec3::from(body.end));
            assert!((length - 0.6).abs() < 1e-6);
        }
    }

    #[test]
    fn target_x_crosses_at_the_target() {
        let target = DVec3::new(0.1, -0.2, 0.05);
        let sticks = target_sticks(target, 0.3);
        assert_eq!(sticks.bodies.len(), 4);
        for body in &sticks.bodies {
            let middle = (Vec3::from(body.start) + Vec3::from(body.end)) / 2.0;
            assert!(middle.distance(target.as_vec3()) < 1e-6);
            assert_eq!(body.color, NamedColor::Red.rgba());
        }
    }

    #[test]
    fn one_stick_and_two_caps_per_segment() {
        let file = parse("0,0,0\n0,0,0\t0,0,0.1\t0,0.1,0.1\t0.1,0.1,0.1").unwrap();
        let session =
            crate::session::ViewerSession::new("t", file, ViewerStyle::Plain, &Palette::default())
                .unwrap();
        let sticks = segment_sticks(&session, 0.3);
        assert_eq!(sticks.bodies.len(), 3);
        assert_eq!(sticks.caps.len(), 6);
        assert_eq!(sticks.bodies[1].color, NamedColor::Red.rgba());
        assert_eq!(sticks.bodies[2].end, [0.1, 0.1, 0.1]);
    }
}
