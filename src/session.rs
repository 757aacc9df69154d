use glam::DVec3;

use crate::config::{NamedColor, Palette, ViewerStyle};
use crate::error::LabError;
use crate::generation::{Generation, GenerationFile};
use crate::messages::SessionAction;

/// Integer slider with unit step, always holding a value in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    value: usize,
    min: usize,
    max: usize,
}

impl Slider {
    pub fn new(min: usize, max: usize) -> Self {
        let max = max.max(min);
        Self {
            value: min,
            min,
            max,
        }
    }

    pub fn value(&self) -> usize {
        self.value
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn clamp(&self, value: usize) -> usize {
        value.clamp(self.min, self.max)
    }

    pub fn set(&mut self, value: usize) -> usize {
        self.value = self.clamp(value);
        self.value
    }

    /// Position of the thumb along the track, from 0 to 1.
    pub fn fraction(&self) -> f32 {
        if self.max == self.min {
            0.0
        } else {
            (self.value - self.min) as f32 / (self.max - self.min) as f32
        }
    }

    pub fn value_at_fraction(&self, fraction: f32) -> usize {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let offset = (fraction * (self.max - self.min) as f32).round() as usize;
        self.clamp(self.min + offset)
    }
}

/// Display handle for one link segment. Empty until a generation is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPlot {
    pub color: NamedColor,
    endpoints: Option<(DVec3, DVec3)>,
}

impl SegmentPlot {
    fn new(color: NamedColor) -> Self {
        Self {
            color,
            endpoints: None,
        }
    }

    pub fn set_data(&mut self, start: DVec3, end: DVec3) {
        self.endpoints = Some((start, end));
    }

    pub fn endpoints(&self) -> Option<(DVec3, DVec3)> {
        self.endpoints
    }
}

/// Text anchored to a point in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub anchor: DVec3,
}

pub fn format_coordinates(point: DVec3) -> String {
    format!("({:+.3}, {:+.3}, {:+.3})", point.x, point.y, point.z)
}

/// Everything the viewer shows for one generation file. The only state that
/// changes after construction is the selected generation and what is derived from it.
#[derive(Debug, Clone)]
pub struct ViewerSession {
    title: String,
    file: GenerationFile,
    style: ViewerStyle,
    slider: Slider,
    segments: Vec<SegmentPlot>,
    fitness: f64,
    fitness_text: String,
    annotations: Vec<Annotation>,
    needs_redraw: bool,
}

impl ViewerSession {
    /// Selects and draws generation 1 right away.
    pub fn new(
        title: impl Into<String>,
        file: GenerationFile,
        style: ViewerStyle,
        palette: &Palette,
    ) -> Result<Self, LabError> {
        let link_count = file.link_count().ok_or(LabError::NoGenerations)?;
        let segments = (0..link_count.saturating_sub(1))
            .map(|index| SegmentPlot::new(palette.color_for(index)))
            .collect();
        let mut session = Self {
            title: title.into(),
            slider: Slider::new(1, file.len()),
            file,
            style,
            segments,
            fitness: 0.0,
            fitness_text: style.format_fitness(0.0),
            annotations: Vec::new(),
            needs_redraw: true,
        };
        session.on_index_changed(1);
        Ok(session)
    }

    /// Selects a generation by its 1-based number, clamped to the slider range,
    /// and recomputes the segments, fitness and annotations. Returns the clamped number.
    pub fn on_index_changed(&mut self, new_index: usize) -> usize {
        let index = self.slider.set(new_index);
        let target = self.file.target;
        let Some(generation) = self.file.generation(index) else {
            return index;
        };
        for segment in generation.segments() {
            if let Some(plot) = self.segments.get_mut(segment.index) {
                plot.set_data(segment.start, segment.end);
            }
        }
        if let Some(end_effector) = generation.end_effector() {
            self.fitness = crate::generation::fitness(end_effector, target);
            self.fitness_text = self.style.format_fitness(self.fitness);
            if self.style.annotates() {
                self.annotations = vec![
                    Annotation {
                        text: format!("target {}", format_coordinates(target)),
                        anchor: target,
                    },
                    Annotation {
                        text: format!("end {}", format_coordinates(end_effector)),
                        anchor: end_effector,
                    },
                ];
            }
        }
        log::debug!("Generation {index}: fitness {}", self.fitness_text);
        self.needs_redraw = true;
        index
    }

    pub fn step(&mut self, delta: isize) -> usize {
        let current = self.slider.value();
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as usize)
        };
        self.on_index_changed(next)
    }

    pub fn first(&mut self) -> usize {
        self.on_index_changed(self.slider.min())
    }

    pub fn last(&mut self) -> usize {
        self.on_index_changed(self.slider.max())
    }

    pub fn select_fraction(&mut self, fraction: f32) -> usize {
        let index = self.slider.value_at_fraction(fraction);
        if index == self.slider.value() {
            return index;
        }
        self.on_index_changed(index)
    }

    pub fn apply(&mut self, action: SessionAction) -> usize {
        match action {
            SessionAction::Step(delta) => self.step(delta),
            SessionAction::First => self.first(),
            SessionAction::Last => self.last(),
            SessionAction::SelectFraction(fraction) => self.select_fraction(fraction),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn style(&self) -> ViewerStyle {
        self.style
    }

    pub fn index(&self) -> usize {
        self.slider.value()
    }

    pub fn generation_count(&self) -> usize {
        self.file.len()
    }

    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    pub fn selected_generation(&self) -> Option<&Generation> {
        self.file.generation(self.slider.value())
    }

    pub fn target(&self) -> DVec3 {
        self.file.target
    }

    pub fn segments(&self) -> &[SegmentPlot] {
        &self.segments
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn fitness_text(&self) -> &str {
        &self.fitness_text
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn generation_label(&self) -> String {
        format!("Generation {} / {}", self.slider.value(), self.slider.max())
    }

    /// True once after every change.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::parse;

    const THREE_GENERATIONS: &str = "1.0,2.0,3.0\n\
        0,0,0\t0,0,1\t0,1,1\t1,1,1\t1,2,2\n\
        0,0,0\t0,0,1\t0,1,1\t1,1,1\t1,2,3\n\
        0,0,0\t0,0,1\t0,1,1\t1,1,1\t1,1,1";

    fn session(style: ViewerStyle) -> ViewerSession {
        let file = parse(THREE_GENERATIONS).unwrap();
        ViewerSession::new("test", file, style, &Palette::default()).unwrap()
    }

    #[test]
    fn first_generation_is_drawn_on_construction() {
        let mut session = session(ViewerStyle::Plain);
        assert_eq!(session.index(), 1);
        assert!(session.segments().iter().all(|plot| plot.endpoints().is_some()));
        assert!(session.take_redraw());
        assert!(!session.take_redraw());
    }

    #[test]
    fn one_plot_per_segment_colored_by_palette() {
        let session = session(ViewerStyle::Plain);
        let colors: Vec<NamedColor> = session.segments().iter().map(|plot| plot.color).collect();
        use NamedColor::*;
        assert_eq!(colors, vec![Black, Red, Yellow, Blue]);
    }

    #[test]
    fn selecting_k_shows_generation_k_minus_one() {
        let mut session = session(ViewerStyle::Plain);
        assert_eq!(session.on_index_changed(2), 2);
        let (start, end) = session.segments()[3].endpoints().unwrap();
        assert_eq!(start, DVec3::ONE);
        assert_eq!(end, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(session.fitness_text(), "0.00000");
    }

    #[test]
    fn index_is_clamped_to_the_slider_range() {
        let mut session = session(ViewerStyle::Plain);
        assert_eq!(session.on_index_changed(0), 1);
        assert_eq!(session.on_index_changed(99), 3);
        assert_eq!(session.step(-10), 1);
        assert_eq!(session.step(1), 2);
        assert_eq!(session.last(), 3);
        assert_eq!(session.first(), 1);
    }

    #[test]
    fn fitness_follows_the_end_effector() {
        let mut session = session(ViewerStyle::Annotated);
        session.on_index_changed(3);
        assert!((session.fitness() - 5f64.sqrt()).abs() < 1e-12);
        assert_eq!(session.fitness_text(), "+2.23607");
    }

    #[test]
    fn annotations_only_in_annotated_style() {
        let plain = session(ViewerStyle::Plain);
        assert!(plain.annotations().is_empty());
        let mut annotated = session(ViewerStyle::Annotated);
        annotated.on_index_changed(3);
        let annotations = annotated.annotations();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].text, "target (+1.000, +2.000, +3.000)");
        assert_eq!(annotations[1].anchor, DVec3::ONE);
        assert_eq!(annotations[1].text, "end (+1.000, +1.000, +1.000)");
    }

    #[test]
    fn fraction_maps_to_nearest_generation() {
        let mut session = session(ViewerStyle::Plain);
        assert_eq!(session.select_fraction(0.0), 1);
        assert_eq!(session.select_fraction(0.4), 2);
        assert_eq!(session.select_fraction(0.8), 3);
        assert_eq!(session.select_fraction(7.0), 3);
        assert_eq!(session.select_fraction(-1.0), 1);
    }

    #[test]
    fn actions_drive_the_same_transition() {
        let mut session = session(ViewerStyle::Plain);
        assert_eq!(session.apply(SessionAction::Last), 3);
        assert_eq!(session.apply(SessionAction::Step(-1)), 2);
        assert_eq!(session.apply(SessionAction::First), 1);
        assert_eq!(session.generation_label(), "Generation 1 / 3");
    }

    #[test]
    fn target_only_file_cannot_be_viewed() {
        let file = parse("0,0,0").unwrap();
        let result = ViewerSession::new("empty", file, ViewerStyle::Plain, &Palette::default());
        assert!(matches!(result, Err(LabError::NoGenerations)));
    }

    #[test]
    fn slider_fraction_with_single_value() {
        let slider = Slider::new(1, 1);
        assert_eq!(slider.fraction(), 0.0);
        assert_eq!(slider.value_at_fraction(0.9), 1);
    }
}
