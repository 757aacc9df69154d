use wgpu::RenderPass;
use wgpu_text::glyph_brush::ab_glyph::FontRef;
use wgpu_text::{BrushBuilder, TextBrush};

use crate::error::LabError;
use crate::wgpu::text_state::{TextChange, TextState};
use crate::wgpu::Wgpu;

pub struct TextRenderer {
    text_state: TextState,
    brush: TextBrush<FontRef<'static>>,
}

impl TextRenderer {
    pub fn new(wgpu: &Wgpu, title: String) -> Result<Self, LabError> {
        let (width, height) = wgpu.size();
        let brush = BrushBuilder::using_font_bytes(include_bytes!("../../assets/DejaVuSans.ttf"))
            .map_err(|error| LabError::Graphics(format!("font: {error:?}")))?
            .build(
                &wgpu.device,
                width,
                height,
                wgpu.surface_configuration.format,
            );
        let text_state = TextState::new(title, width, height);
        Ok(TextRenderer { brush, text_state })
    }

    pub fn change_happened(&mut self, change: TextChange) {
        self.text_state.change_happened(change);
    }

    pub fn resize(&mut self, wgpu: &Wgpu) {
        let (width, height) = wgpu.size();
        self.brush
            .resize_view(width as f32, height as f32, &wgpu.queue);
        self.text_state
            .change_happened(TextChange::Resize { width, height });
    }

    pub fn draw<'a>(&'a mut self, render_pass: &mut RenderPass<'a>, wgpu: &Wgpu) {
        if let Err(error) = self
            .brush
            .queue(&wgpu.device, &wgpu.queue, self.text_state.sections())
        {
            log::error!("Unable to queue text: {error:?}");
            return;
        }
        self.brush.draw(render_pass);
    }
}
