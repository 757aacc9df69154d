use std::fmt::{Debug, Formatter};

use crate::wgpu::Wgpu;

/// Changes to the selected generation. All of them end in `ViewerSession::on_index_changed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionAction {
    Step(isize),
    First,
    Last,
    /// Position along the slider track, 0 at the left end
    SelectFraction(f32),
}

/// What the window is showing, which decides the active keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Generations,
    PointCloud,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerChange {
    /// Pixel motion while dragging the scene
    Orbit { dx: f32, dy: f32 },
    Zoomed(f32),
}

pub enum LabEvent {
    ContextCreated(Wgpu),
    Session(SessionAction),
    PointerChanged(PointerChange),
    ResetView,
    Quit,
}

impl Debug for LabEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LabEvent::ContextCreated(_) => write!(f, "LabEvent::ContextCreated"),
            LabEvent::Session(action) => write!(f, "LabEvent::Session({action:?})"),
            LabEvent::PointerChanged(change) => write!(f, "LabEvent::PointerChanged({change:?})"),
            LabEvent::ResetView => write!(f, "LabEvent::ResetView"),
            LabEvent::Quit => write!(f, "LabEvent::Quit"),
        }
    }
}

pub type Radio = winit::event_loop::EventLoopProxy<LabEvent>;

impl LabEvent {
    pub fn send(self, radio: &Radio) {
        if let Err(closed) = radio.send_event(self) {
            log::warn!("Event loop closed, dropped {:?}", closed.0);
        }
    }
}
