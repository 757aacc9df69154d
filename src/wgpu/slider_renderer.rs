use std::mem::size_of;

use bytemuck::{cast_slice, Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::wgpu::Wgpu;

const TRACK_MARGIN: f32 = 0.2;
const TRACK_FROM_BOTTOM: f32 = 130.0;
const TRACK_THICKNESS: f32 = 6.0;
const THUMB_SIZE: [f32; 2] = [16.0, 32.0];
const PASSED_COLOR: [f32; 4] = [0.25, 0.4, 0.75, 1.0];
const REMAINING_COLOR: [f32; 4] = [0.75, 0.75, 0.75, 1.0];
const THUMB_COLOR: [f32; 4] = [0.15, 0.25, 0.55, 1.0];
const VERTEX_COUNT: usize = 18;

/// Where the slider sits in a window of a given pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderLayout {
    width: f32,
    height: f32,
}

impl SliderLayout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn track_left(&self) -> f32 {
        self.width * TRACK_MARGIN
    }

    pub fn track_right(&self) -> f32 {
        self.width * (1.0 - TRACK_MARGIN)
    }

    pub fn track_y(&self) -> f32 {
        self.height - TRACK_FROM_BOTTOM
    }

    /// Track fraction under the pointer, or None when the pointer is off the slider.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<f32> {
        let [thumb_width, thumb_height] = THUMB_SIZE;
        let horizontal = x >= self.track_left() - thumb_width && x <= self.track_right() + thumb_width;
        let vertical = (y - self.track_y()).abs() <= thumb_height / 2.0;
        (horizontal && vertical).then(|| self.fraction_at(x))
    }

    /// Track fraction for a horizontal pixel position, clamped to the track.
    pub fn fraction_at(&self, x: f32) -> f32 {
        ((x - self.track_left()) / (self.track_right() - self.track_left())).clamp(0.0, 1.0)
    }

    pub fn thumb_x(&self, fraction: f32) -> f32 {
        self.track_left() + fraction.clamp(0.0, 1.0) * (self.track_right() - self.track_left())
    }

    /// Above the middle of the track.
    pub fn label_position(&self) -> [f32; 2] {
        [self.width / 2.0, self.track_y() - THUMB_SIZE[1]]
    }

    /// Filled track, remaining track and thumb, in clip space.
    pub fn vertices(&self, fraction: f32) -> [OverlayVertex; VERTEX_COUNT] {
        let thumb_x = self.thumb_x(fraction);
        let half_track = TRACK_THICKNESS / 2.0;
        let [thumb_width, thumb_height] = THUMB_SIZE;
        let y = self.track_y();
        let passed = self.quad(
            [self.track_left(), y - half_track],
            [thumb_x, y + half_track],
            PASSED_COLOR,
        );
        let remaining = self.quad(
            [thumb_x, y - half_track],
            [self.track_right(), y + half_track],
            REMAINING_COLOR,
        );
        let thumb = self.quad(
            [thumb_x - thumb_width / 2.0, y - thumb_height / 2.0],
            [thumb_x + thumb_width / 2.0, y + thumb_height / 2.0],
            THUMB_COLOR,
        );
        let mut vertices = [OverlayVertex::zeroed(); VERTEX_COUNT];
        for (slot, vertex) in vertices
            .iter_mut()
            .zip(passed.into_iter().chain(remaining).chain(thumb))
        {
            *slot = vertex;
        }
        vertices
    }

    fn quad(&self, min: [f32; 2], max: [f32; 2], color: [f32; 4]) -> [OverlayVertex; 6] {
        let [left, top] = self.to_clip(min);
        let [right, bottom] = self.to_clip(max);
        let corner = |x: f32, y: f32| OverlayVertex {
            position: [x, y],
            color,
        };
        [
            corner(left, bottom),
            corner(right, bottom),
            corner(right, top),
            corner(left, bottom),
            corner(right, top),
            corner(left, top),
        ]
    }

    fn to_clip(&self, [x, y]: [f32; 2]) -> [f32; 2] {
        [x / self.width * 2.0 - 1.0, 1.0 - y / self.height * 2.0]
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct OverlayVertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl OverlayVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub struct SliderRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
}

impl SliderRenderer {
    pub fn new(wgpu: &Wgpu) -> Self {
        let pipeline_layout = wgpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Slider Pipeline Layout"),
                bind_group_layouts: &[],
                immediate_size: 0,
            });
        let pipeline = wgpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Slider Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &wgpu.shader,
                    entry_point: Some("overlay_vertex"),
                    compilation_options: Default::default(),
                    buffers: &[OverlayVertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &wgpu.shader,
                    entry_point: Some("overlay_fragment"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: wgpu.surface_configuration.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });
        let vertex_buffer = wgpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Slider Vertex Buffer"),
                contents: cast_slice(&[OverlayVertex::zeroed(); VERTEX_COUNT]),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        Self {
            pipeline,
            vertex_buffer,
        }
    }

    pub fn update(&self, wgpu: &Wgpu, layout: &SliderLayout, fraction: f32) {
        wgpu.queue
            .write_buffer(&self.vertex_buffer, 0, cast_slice(&layout.vertices(fraction)));
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..VERTEX_COUNT as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_only_near_the_track() {
        let layout = SliderLayout::new(1000.0, 800.0);
        let y = layout.track_y();
        assert_eq!(layout.hit_test(200.0, y), Some(0.0));
        assert_eq!(layout.hit_test(500.0, y + 5.0), Some(0.5));
        assert_eq!(layout.hit_test(800.0, y), Some(1.0));
        assert_eq!(layout.hit_test(500.0, y - 100.0), None);
        assert_eq!(layout.hit_test(50.0, y), None);
    }

    #[test]
    fn fraction_is_clamped_past_the_ends() {
        let layout = SliderLayout::new(1000.0, 800.0);
        assert_eq!(layout.fraction_at(0.0), 0.0);
        assert_eq!(layout.fraction_at(5000.0), 1.0);
        assert_eq!(layout.thumb_x(0.5), 500.0);
    }

    #[test]
    fn quads_stay_in_clip_space() {
        let layout = SliderLayout::new(640.0, 480.0);
        for vertex in layout.vertices(0.3) {
            assert!(vertex.position.iter().all(|c| (-1.0..=1.0).contains(c)));
        }
    }
}
