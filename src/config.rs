use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use strum::{Display, EnumIter};

use crate::error::LabError;

/// How the viewer labels what it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewerStyle {
    /// Fitness only, printed plainly; a file argument is required
    Plain,
    /// Signed fitness plus target and end effector coordinates in the scene
    #[default]
    Annotated,
}

impl ViewerStyle {
    pub fn format_fitness(self, fitness: f64) -> String {
        match self {
            ViewerStyle::Plain => format!("{fitness:.5}"),
            ViewerStyle::Annotated => format!("{fitness:+.5}"),
        }
    }

    pub fn annotates(self) -> bool {
        matches!(self, ViewerStyle::Annotated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NamedColor {
    Black,
    Red,
    Yellow,
    Blue,
    Green,
    Cyan,
    Magenta,
    Orange,
    Gray,
    White,
}

impl NamedColor {
    pub fn rgba(self) -> [f32; 4] {
        use NamedColor::*;
        match self {
            Black => [0.0, 0.0, 0.0, 1.0],
            Red => [1.0, 0.0, 0.0, 1.0],
            Yellow => [1.0, 1.0, 0.0, 1.0],
            Blue => [0.0, 0.0, 1.0, 1.0],
            Green => [0.0, 0.5, 0.0, 1.0],
            Cyan => [0.0, 0.75, 0.75, 1.0],
            Magenta => [0.75, 0.0, 0.75, 1.0],
            Orange => [1.0, 0.5, 0.0, 1.0],
            Gray => [0.5, 0.5, 0.5, 1.0],
            White => [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Segment colors, cycled by segment index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<NamedColor>);

impl Default for Palette {
    fn default() -> Self {
        use NamedColor::*;
        Self(vec![Black, Red, Yellow, Blue])
    }
}

impl Palette {
    /// An empty list falls back to the default palette.
    pub fn new(colors: Vec<NamedColor>) -> Self {
        if colors.is_empty() {
            Self::default()
        } else {
            Self(colors)
        }
    }

    pub fn color_for(&self, segment_index: usize) -> NamedColor {
        self.0[segment_index % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub style: Option<ViewerStyle>,
    pub palette: Option<Vec<NamedColor>>,
    pub axis_limit: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub style: ViewerStyle,
    pub default_generation_file: PathBuf,
    pub default_point_cloud_file: PathBuf,
    pub palette: Palette,
    /// Half the edge of the plot cube
    pub axis_limit: f32,
    pub window_width: u32,
    pub window_height: u32,
    pub show_frame: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            style: ViewerStyle::default(),
            default_generation_file: "example_output.txt".into(),
            default_point_cloud_file: "search_space.txt".into(),
            palette: Palette::default(),
            axis_limit: 0.3,
            window_width: 1600,
            window_height: 1200,
            show_frame: true,
        }
    }
}

impl ViewerConfig {
    /// Missing fields keep their defaults.
    pub fn from_json(source: &str, path: &Path) -> Result<Self, LabError> {
        let config: ViewerConfig =
            serde_json::from_str(source).map_err(|error| LabError::Config {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?;
        config.validated(path)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LabError::io(path, source))?;
        Self::from_json(&source, path)
    }

    /// The config file when given, the defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, LabError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => Self::load(path),
        }
    }

    /// Command line values win over the file.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self, LabError> {
        if let Some(style) = overrides.style {
            self.style = style;
        }
        if let Some(colors) = overrides.palette {
            self.palette = Palette::new(colors);
        }
        if let Some(axis_limit) = overrides.axis_limit {
            self.axis_limit = axis_limit;
        }
        self.validated(Path::new("command line"))
    }

    /// The given path, or the default file for styles that have one.
    pub fn generation_path(&self, path: Option<PathBuf>) -> Result<PathBuf, LabError> {
        match (path, self.style) {
            (Some(path), _) => Ok(path),
            (None, ViewerStyle::Plain) => Err(LabError::MissingPath),
            (None, ViewerStyle::Annotated) => Ok(self.default_generation_file.clone()),
        }
    }

    pub fn point_cloud_path(&self, path: Option<PathBuf>) -> PathBuf {
        path.unwrap_or_else(|| self.default_point_cloud_file.clone())
    }

    fn validated(mut self, path: &Path) -> Result<Self, LabError> {
        if !(self.axis_limit.is_finite() && self.axis_limit > 0.0) {
            return Err(LabError::Config {
                path: path.to_path_buf(),
                message: format!("axis_limit must be positive, not {}", self.axis_limit),
            });
        }
        if self.palette.is_empty() {
            self.palette = Palette::default();
        }
        self.window_width = self.window_width.max(1);
        self.window_height = self.window_height.max(1);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn palette_cycles_by_segment_index() {
        let palette = Palette::default();
        let expected = [
            NamedColor::Black,
            NamedColor::Red,
            NamedColor::Yellow,
            NamedColor::Blue,
        ];
        for index in 0..12 {
            assert_eq!(palette.color_for(index), expected[index % 4]);
        }
    }

    #[test]
    fn empty_palette_falls_back() {
        assert_eq!(Palette::new(vec![]), Palette::default());
    }

    #[test]
    fn fitness_formatting_per_style() {
        let fitness = 5f64.sqrt();
        assert_eq!(ViewerStyle::Plain.format_fitness(fitness), "2.23607");
        assert_eq!(ViewerStyle::Annotated.format_fitness(fitness), "+2.23607");
        assert_eq!(ViewerStyle::Annotated.format_fitness(0.0), "+0.00000");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(
            r#"{ "style": "plain", "palette": ["green", "orange"] }"#,
            Path::new("config.json"),
        )
        .unwrap();
        assert_eq!(config.style, ViewerStyle::Plain);
        assert_eq!(config.palette.color_for(3), NamedColor::Orange);
        assert_eq!(config.axis_limit, 0.3);
        assert_eq!(config.default_generation_file, PathBuf::from("example_output.txt"));
    }

    #[test]
    fn bad_json_names_the_file() {
        let error = ViewerConfig::from_json(r#"{ "axis_limit": -1.0 }"#, Path::new("lab.json"))
            .unwrap_err();
        assert!(error.to_string().contains("lab.json"));
        let error = ViewerConfig::from_json("{", Path::new("lab.json")).unwrap_err();
        assert!(matches!(error, LabError::Config { .. }));
    }

    #[test]
    fn command_line_wins() {
        let config = ViewerConfig::default()
            .with_overrides(Overrides {
                style: Some(ViewerStyle::Plain),
                palette: Some(vec![NamedColor::Green]),
                axis_limit: Some(1.5),
            })
            .unwrap();
        assert_eq!(config.style, ViewerStyle::Plain);
        assert_eq!(config.palette.color_for(7), NamedColor::Green);
        assert_eq!(config.axis_limit, 1.5);
        let error = ViewerConfig::default()
            .with_overrides(Overrides {
                axis_limit: Some(0.0),
                ..Overrides::default()
            })
            .unwrap_err();
        assert!(matches!(error, LabError::Config { .. }));
    }

    #[test]
    fn plain_style_needs_a_path() {
        let plain = ViewerConfig {
            style: ViewerStyle::Plain,
            ..ViewerConfig::default()
        };
        assert!(matches!(plain.generation_path(None), Err(LabError::MissingPath)));
        assert_eq!(
            plain.generation_path(Some("run.txt".into())).unwrap(),
            PathBuf::from("run.txt")
        );
        let annotated = ViewerConfig::default();
        assert_eq!(
            annotated.generation_path(None).unwrap(),
            PathBuf::from("example_output.txt")
        );
        assert_eq!(annotated.point_cloud_path(None), PathBuf::from("search_space.txt"));
    }

    #[test]
    fn color_names_round_trip_through_display() {
        for color in NamedColor::iter() {
            let parsed = NamedColor::from_str(&color.to_string(), true).unwrap();
            assert_eq!(parsed, color);
        }
    }
}
