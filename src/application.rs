use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::ViewerConfig;
use crate::error::LabError;
use crate::keyboard::Keyboard;
use crate::messages::{LabEvent, Radio};
use crate::pointer::PointerHandler;
use crate::scene::{Scene, Subject};
use crate::wgpu::Wgpu;

pub struct Application {
    window_attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    subject: Subject,
    scene: Option<Scene>,
    keyboard: Keyboard,
    pointer_handler: Option<PointerHandler>,
    axis_limit: f32,
    show_frame: bool,
    radio: Radio,
    failure: Option<LabError>,
}

impl Application {
    pub fn new(
        window_attributes: WindowAttributes,
        subject: Subject,
        config: &ViewerConfig,
        radio: Radio,
    ) -> Self {
        Self {
            window_attributes,
            window: None,
            subject,
            scene: None,
            keyboard: Keyboard::new(radio.clone()),
            pointer_handler: None,
            axis_limit: config.axis_limit,
            show_frame: config.show_frame,
            radio,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: LabError) {
        log::error!("{error}");
        self.failure = Some(error);
        event_loop.exit();
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn context_created(&mut self, event_loop: &ActiveEventLoop, wgpu: Wgpu) {
        let (width, height) = wgpu.size();
        match Scene::new(wgpu, &self.subject, self.axis_limit, self.show_frame) {
            Ok(mut scene) => {
                scene.set_legend(self.keyboard.legend(self.subject.mode()));
                if let Subject::Generations(session) = &mut self.subject {
                    session.take_redraw();
                }
                let slider_enabled = matches!(self.subject, Subject::Generations(_));
                self.pointer_handler = Some(PointerHandler::new(
                    self.radio.clone(),
                    width,
                    height,
                    slider_enabled,
                ));
                self.scene = Some(scene);
                self.request_redraw();
            }
            Err(error) => self.fail(event_loop, error),
        }
    }

    /// The error that ended the event loop, if any.
    pub fn finish(self) -> Result<(), LabError> {
        match self.failure {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }
}

impl ApplicationHandler<LabEvent> for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = match event_loop.create_window(self.window_attributes.clone()) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                self.fail(event_loop, LabError::EventLoop(error.to_string()));
                return;
            }
        };
        self.window = Some(Arc::clone(&window));
        if let Err(error) = Wgpu::create_and_send(window, self.radio.clone()) {
            self.fail(event_loop, error);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: LabEvent) {
        match event {
            LabEvent::ContextCreated(wgpu) => self.context_created(event_loop, wgpu),
            LabEvent::Session(action) => {
                let changed = match &mut self.subject {
                    Subject::Generations(session) => {
                        session.apply(action);
                        session.take_redraw()
                    }
                    Subject::PointCloud { .. } => false,
                };
                if changed {
                    if let Some(scene) = &mut self.scene {
                        scene.subject_changed(&self.subject);
                    }
                    self.request_redraw();
                }
            }
            LabEvent::PointerChanged(change) => {
                if let Some(scene) = &mut self.scene {
                    scene.pointer_changed(change);
                    self.request_redraw();
                }
            }
            LabEvent::ResetView => {
                if let Some(scene) = &mut self.scene {
                    scene.reset_view();
                    self.request_redraw();
                }
            }
            LabEvent::Quit => event_loop.exit(),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(scene) = &mut self.scene {
                    scene.resize(width, height, &self.subject);
                }
                if let Some(pointer_handler) = &mut self.pointer_handler {
                    pointer_handler.resize(width, height);
                }
                self.request_redraw();
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                self.keyboard
                    .handle_key_event(&key_event, self.subject.mode());
            }
            WindowEvent::RedrawRequested => {
                if let Some(scene) = &mut self.scene {
                    scene.render(&self.subject);
                }
            }
            event => {
                if let Some(pointer_handler) = &mut self.pointer_handler {
                    pointer_handler.process_window_event(&event);
                }
            }
        }
    }
}

/// Opens the window and blocks until it is closed.
pub fn run(subject: Subject, config: &ViewerConfig) -> Result<(), LabError> {
    let event_loop = EventLoop::<LabEvent>::with_user_event()
        .build()
        .map_err(|error| LabError::EventLoop(error.to_string()))?;
    let window_attributes = Window::default_attributes()
        .with_title(format!("Manipulator Lab - {}", subject.title()))
        .with_inner_size(PhysicalSize::new(config.window_width, config.window_height));
    let radio = event_loop.create_proxy();
    let mut application = Application::new(window_attributes, subject, config, radio);
    event_loop
        .run_app(&mut application)
        .map_err(|error| LabError::EventLoop(error.to_string()))?;
    application.finish()
}
