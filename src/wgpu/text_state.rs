use wgpu_text::glyph_brush::{
    BuiltInLineBreaker, HorizontalAlign, Layout, OwnedSection, OwnedText, VerticalAlign,
};

use crate::wgpu::slider_renderer::SliderLayout;

const MARGIN: f32 = 40.0;
const TEXT_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
const ANNOTATION_COLOR: [f32; 4] = [0.2, 0.2, 0.45, 1.0];

#[derive(Clone, Debug, Copy)]
pub enum SectionName {
    Top = 0,
    Readout = 1,
    Slider = 2,
    Bottom = 3,
}

impl SectionName {
    const fn count() -> usize {
        4
    }
}

/// Text pinned to a window position, usually a projected scene point.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenLabel {
    pub text: String,
    pub position: [f32; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub enum TextChange {
    Readout(String),
    SliderLabel(Option<String>),
    Legend(Vec<String>),
    Annotations(Vec<ScreenLabel>),
    Resize { width: u32, height: u32 },
}

enum TextInstance {
    Nothing,
    Normal(String),
    Large(String),
}

impl TextInstance {
    pub fn scale_factor(&self) -> f32 {
        match self {
            TextInstance::Nothing => 10.0,
            TextInstance::Normal(_) => 24.0,
            TextInstance::Large(_) => 40.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TextState {
    width: f32,
    height: f32,
    title: String,
    readout: String,
    slider_label: Option<String>,
    keyboard_legend: Vec<String>,
    annotations: Vec<ScreenLabel>,
    sections: [Option<OwnedSection>; SectionName::count()],
    annotation_sections: Vec<OwnedSection>,
}

impl TextState {
    pub fn new(title: String, width: u32, height: u32) -> Self {
        let mut fresh = Self {
            width: width as f32,
            height: height as f32,
            title,
            readout: String::new(),
            slider_label: None,
            keyboard_legend: Vec::new(),
            annotations: Vec::new(),
            sections: Default::default(),
            annotation_sections: Vec::new(),
        };
        fresh.update_sections();
        fresh
    }

    pub fn change_happened(&mut self, change: TextChange) {
        use TextChange::*;
        match change {
            Readout(readout) => self.readout = readout,
            SliderLabel(label) => self.slider_label = label,
            Legend(legend) => self.keyboard_legend = legend,
            Annotations(annotations) => self.annotations = annotations,
            Resize { width, height } => {
                self.width = width as f32;
                self.height = height as f32;
            }
        }
        self.update_sections()
    }

    pub fn sections(&self) -> Vec<&OwnedSection> {
        self.sections
            .iter()
            .flatten()
            .chain(self.annotation_sections.iter())
            .collect()
    }

    /// Every string currently on screen, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.sections()
            .into_iter()
            .flat_map(|section| section.text.iter().map(|text| text.text.as_str()))
            .collect()
    }

    fn update_sections(&mut self) {
        use TextInstance::*;
        self.update_section(SectionName::Top, Large(self.title.clone()));
        self.update_section(
            SectionName::Readout,
            if self.readout.is_empty() {
                Nothing
            } else {
                Normal(self.readout.clone())
            },
        );
        self.update_section(
            SectionName::Slider,
            match &self.slider_label {
                None => Nothing,
                Some(label) => Normal(label.clone()),
            },
        );
        self.update_section(
            SectionName::Bottom,
            if self.keyboard_legend.is_empty() {
                Nothing
            } else {
                Normal(self.keyboard_legend.join("   "))
            },
        );
        self.annotation_sections = self
            .annotations
            .iter()
            .map(|label| {
                OwnedSection::default()
                    .with_layout(
                        Layout::default()
                            .v_align(VerticalAlign::Bottom)
                            .h_align(HorizontalAlign::Left),
                    )
                    .with_screen_position([label.position[0] + 12.0, label.position[1] - 8.0])
                    .add_text(
                        OwnedText::new(label.text.clone())
                            .with_color(ANNOTATION_COLOR)
                            .with_scale(20.0),
                    )
            })
            .collect();
    }

    fn update_section(&mut self, section_name: SectionName, text_instance: TextInstance) {
        use TextInstance::*;
        let section = self.create_section(section_name);
        let scale_factor = text_instance.scale_factor();
        self.sections[section_name as usize] = match text_instance {
            Nothing => None,
            Normal(text) | Large(text) => Some(
                section.add_text(
                    OwnedText::new(text)
                        .with_color(TEXT_COLOR)
                        .with_scale(scale_factor),
                ),
            ),
        }
    }

    fn create_section(&self, section_name: SectionName) -> OwnedSection {
        OwnedSection::default()
            .with_layout(Self::create_layout(section_name))
            .with_bounds([self.width, self.height])
            .with_screen_position(self.create_position(section_name))
    }

    fn create_layout(section_name: SectionName) -> Layout<BuiltInLineBreaker> {
        use SectionName::*;
        Layout::default()
            .v_align(match section_name {
                Top | Readout => VerticalAlign::Top,
                Slider | Bottom => VerticalAlign::Bottom,
            })
            .h_align(match section_name {
                Readout => HorizontalAlign::Left,
                Top | Slider | Bottom => HorizontalAlign::Center,
            })
    }

    fn create_position(&self, section_name: SectionName) -> [f32; 2] {
        use SectionName::*;
        let middle_h = self.width / 2.0;
        match section_name {
            Top => [middle_h, MARGIN],
            Readout => [MARGIN, MARGIN * 3.0],
            Slider => SliderLayout::new(self.width, self.height).label_position(),
            Bottom => [middle_h, self.height - MARGIN],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_parts_are_not_drawn() {
        let state = TextState::new("example_output.txt".into(), 800, 600);
        assert_eq!(state.texts(), vec!["example_output.txt"]);
    }

    #[test]
    fn changes_show_up_in_order() {
        let mut state = TextState::new("run".into(), 800, 600);
        state.change_happened(TextChange::Readout("Fitness: 2.23607".into()));
        state.change_happened(TextChange::SliderLabel(Some("Generation 1 / 3".into())));
        state.change_happened(TextChange::Legend(vec!["R reset view".into(), "Esc quit".into()]));
        state.change_happened(TextChange::Annotations(vec![ScreenLabel {
            text: "end (+1.000, +1.000, +1.000)".into(),
            position: [10.0, 20.0],
        }]));
        assert_eq!(
            state.texts(),
            vec![
                "run",
                "Fitness: 2.23607",
                "Generation 1 / 3",
                "R reset view   Esc quit",
                "end (+1.000, +1.000, +1.000)",
            ]
        );
        state.change_happened(TextChange::SliderLabel(None));
        assert!(!state.texts().contains(&"Generation 1 / 3"));
    }
}
