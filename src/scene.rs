use crate::camera::Camera;
use crate::config::NamedColor;
use crate::error::LabError;
use crate::messages::{PointerChange, ViewMode};
use crate::point_cloud::PointCloudScan;
use crate::session::ViewerSession;
use crate::wgpu::link_renderer::{frame_sticks, segment_sticks, target_sticks, LinkRenderer, Sticks};
use crate::wgpu::point_renderer::{point_vertices, PointRenderer};
use crate::wgpu::slider_renderer::{SliderLayout, SliderRenderer};
use crate::wgpu::text_renderer::TextRenderer;
use crate::wgpu::text_state::{ScreenLabel, TextChange};
use crate::wgpu::Wgpu;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.94,
    g: 0.94,
    b: 0.94,
    a: 1.0,
};

/// What the window shows.
#[derive(Debug)]
pub enum Subject {
    Generations(ViewerSession),
    PointCloud { title: String, scan: PointCloudScan },
}

impl Subject {
    pub fn mode(&self) -> ViewMode {
        match self {
            Subject::Generations(_) => ViewMode::Generations,
            Subject::PointCloud { .. } => ViewMode::PointCloud,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Subject::Generations(session) => session.title(),
            Subject::PointCloud { title, .. } => title,
        }
    }

    pub fn readout(&self) -> String {
        match self {
            Subject::Generations(session) => format!("Fitness: {}", session.fitness_text()),
            Subject::PointCloud { scan, .. } => format!(
                "{} points\nmax dist {:?}\nmax x {:?}\nmax y {:?}\nmax z {:?}",
                scan.count,
                scan.max_distance,
                scan.axis_maxima.x,
                scan.axis_maxima.y,
                scan.axis_maxima.z,
            ),
        }
    }

    pub fn slider_label(&self) -> Option<String> {
        match self {
            Subject::Generations(session) => Some(session.generation_label()),
            Subject::PointCloud { .. } => None,
        }
    }

    pub fn slider_fraction(&self) -> Option<f32> {
        match self {
            Subject::Generations(session) => Some(session.slider().fraction()),
            Subject::PointCloud { .. } => None,
        }
    }

    /// Frame, target marker and links, or just the frame for a point cloud.
    pub fn sticks(&self, axis_limit: f32, show_frame: bool) -> Sticks {
        let mut sticks = if show_frame {
            frame_sticks(axis_limit)
        } else {
            Sticks::default()
        };
        if let Subject::Generations(session) = self {
            sticks.extend(target_sticks(session.target(), axis_limit));
            sticks.extend(segment_sticks(session, axis_limit));
        }
        sticks
    }
}

pub struct Scene {
    wgpu: Wgpu,
    camera: Camera,
    axis_limit: f32,
    show_frame: bool,
    link_renderer: LinkRenderer,
    point_renderer: PointRenderer,
    slider_renderer: SliderRenderer,
    text_renderer: TextRenderer,
}

impl Scene {
    pub fn new(wgpu: Wgpu, subject: &Subject, axis_limit: f32, show_frame: bool) -> Result<Self, LabError> {
        let (width, height) = wgpu.size();
        let mut scene = Self {
            camera: Camera::new(axis_limit, width, height),
            axis_limit,
            show_frame,
            link_renderer: LinkRenderer::new(&wgpu),
            point_renderer: PointRenderer::new(&wgpu),
            slider_renderer: SliderRenderer::new(&wgpu),
            text_renderer: TextRenderer::new(&wgpu, subject.title().to_string())?,
            wgpu,
        };
        if let Subject::PointCloud { scan, .. } = subject {
            let vertices = point_vertices(&scan.points, NamedColor::Blue.rgba());
            scene.point_renderer.update(&scene.wgpu, &vertices);
        }
        scene.subject_changed(subject);
        Ok(scene)
    }

    /// Rebuilds geometry and text after the subject changed.
    pub fn subject_changed(&mut self, subject: &Subject) {
        let sticks = subject.sticks(self.axis_limit, self.show_frame);
        self.link_renderer.update(&self.wgpu, &sticks);
        self.text_renderer
            .change_happened(TextChange::Readout(subject.readout()));
        self.text_renderer
            .change_happened(TextChange::SliderLabel(subject.slider_label()));
        self.update_slider(subject);
    }

    pub fn set_legend(&mut self, legend: Vec<String>) {
        self.text_renderer
            .change_happened(TextChange::Legend(legend));
    }

    pub fn pointer_changed(&mut self, change: PointerChange) {
        match change {
            PointerChange::Orbit { dx, dy } => self.camera.orbit(dx, dy),
            PointerChange::Zoomed(amount) => self.camera.zoom(amount),
        }
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    pub fn resize(&mut self, width: u32, height: u32, subject: &Subject) {
        self.wgpu.resize((width, height));
        let (width, height) = self.wgpu.size();
        self.camera.set_size(width, height);
        self.text_renderer.resize(&self.wgpu);
        self.update_slider(subject);
    }

    fn update_slider(&mut self, subject: &Subject) {
        if let Some(fraction) = subject.slider_fraction() {
            let (width, height) = self.wgpu.size();
            let layout = SliderLayout::new(width as f32, height as f32);
            self.slider_renderer.update(&self.wgpu, &layout, fraction);
        }
    }

    fn screen_labels(&self, subject: &Subject) -> Vec<ScreenLabel> {
        let Subject::Generations(session) = subject else {
            return Vec::new();
        };
        session
            .annotations()
            .iter()
            .filter_map(|annotation| {
                let position = self.camera.project(annotation.anchor.as_vec3())?;
                Some(ScreenLabel {
                    text: annotation.text.clone(),
                    position,
                })
            })
            .collect()
    }

    pub fn render(&mut self, subject: &Subject) {
        self.wgpu.update_mvp_matrix(self.camera.mvp_matrix());
        let labels = self.screen_labels(subject);
        self.text_renderer
            .change_happened(TextChange::Annotations(labels));
        let surface_texture = match self.wgpu.get_surface_texture() {
            Ok(surface_texture) => surface_texture,
            Err(error) => {
                log::warn!("Skipping frame: {error}");
                return;
            }
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = self.wgpu.create_depth_view();
        let mut encoder = self.wgpu.create_encoder();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            self.link_renderer
                .render(&mut render_pass, &self.wgpu.uniform_bind_group);
            self.point_renderer
                .render(&mut render_pass, &self.wgpu.uniform_bind_group);
        }
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            if subject.slider_fraction().is_some() {
                self.slider_renderer.render(&mut render_pass);
            }
            self.text_renderer.draw(&mut render_pass, &self.wgpu);
        }
        self.wgpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }
}
