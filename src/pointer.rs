use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::messages::{LabEvent, PointerChange, Radio, SessionAction};
use crate::wgpu::slider_renderer::SliderLayout;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Idle,
    Slider,
    Orbit,
}

/// A press on the slider track drags the slider until release; a press
/// anywhere else orbits the camera.
#[derive(Debug, Clone)]
pub struct DragTracker {
    mouse_position: Option<PhysicalPosition<f64>>,
    drag: Drag,
    layout: SliderLayout,
    slider_enabled: bool,
}

impl DragTracker {
    pub fn new(width: u32, height: u32, slider_enabled: bool) -> Self {
        Self {
            mouse_position: None,
            drag: Drag::Idle,
            layout: SliderLayout::new(width as f32, height as f32),
            slider_enabled,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.layout = SliderLayout::new(width as f32, height as f32);
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> Option<LabEvent> {
        let previous = self.mouse_position.replace(position);
        match self.drag {
            Drag::Idle => None,
            Drag::Slider => {
                let fraction = self.layout.fraction_at(position.x as f32);
                Some(LabEvent::Session(SessionAction::SelectFraction(fraction)))
            }
            Drag::Orbit => previous.map(|previous| {
                let dx = (position.x - previous.x) as f32;
                let dy = (position.y - previous.y) as f32;
                LabEvent::PointerChanged(PointerChange::Orbit { dx, dy })
            }),
        }
    }

    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> Option<LabEvent> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Released => {
                self.drag = Drag::Idle;
                None
            }
            ElementState::Pressed => {
                let on_slider = self.mouse_position.and_then(|position| {
                    self.layout
                        .hit_test(position.x as f32, position.y as f32)
                        .filter(|_| self.slider_enabled)
                });
                match on_slider {
                    Some(fraction) => {
                        self.drag = Drag::Slider;
                        Some(LabEvent::Session(SessionAction::SelectFraction(fraction)))
                    }
                    None => {
                        self.drag = Drag::Orbit;
                        None
                    }
                }
            }
        }
    }

    pub fn mouse_wheel(&self, delta: MouseScrollDelta) -> LabEvent {
        let change = match delta {
            MouseScrollDelta::LineDelta(_, y) => PointerChange::Zoomed(y),
            MouseScrollDelta::PixelDelta(position) => PointerChange::Zoomed(position.y as f32 * 0.05),
        };
        LabEvent::PointerChanged(change)
    }

    pub fn cursor_left(&mut self) {
        self.drag = Drag::Idle;
        self.mouse_position = None;
    }
}

/// Turns mouse events into lab events.
pub struct PointerHandler {
    tracker: DragTracker,
    radio: Radio,
}

impl PointerHandler {
    pub fn new(radio: Radio, width: u32, height: u32, slider_enabled: bool) -> Self {
        Self {
            tracker: DragTracker::new(width, height, slider_enabled),
            radio,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.tracker.resize(width, height);
    }

    /// Returns true when the event was a pointer event.
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        let lab_event = match event {
            WindowEvent::CursorMoved { position, .. } => self.tracker.cursor_moved(*position),
            WindowEvent::MouseInput { state, button, .. } => {
                self.tracker.mouse_input(*state, *button)
            }
            WindowEvent::MouseWheel { delta, .. } => Some(self.tracker.mouse_wheel(*delta)),
            WindowEvent::CursorLeft { .. } => {
                self.tracker.cursor_left();
                None
            }
            _ => return false,
        };
        if let Some(lab_event) = lab_event {
            lab_event.send(&self.radio);
        }
        true
    }
}
