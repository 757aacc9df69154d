use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::DVec3;

use crate::error::LabError;
use crate::generation::parser::parse_point;

/// Printed whenever a point lies farther from the origin than every point before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewMaximum {
    pub distance: f64,
    pub previous: f64,
}

impl Display for NewMaximum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "new max dist: {:?}>{:?}", self.distance, self.previous)
    }
}

#[derive(Debug, Clone)]
pub struct PointCloudScanner {
    max_distance: f64,
    axis_maxima: Option<DVec3>,
    count: usize,
    points: Option<Vec<DVec3>>,
}

impl Default for PointCloudScanner {
    fn default() -> Self {
        Self {
            max_distance: f64::NEG_INFINITY,
            axis_maxima: None,
            count: 0,
            points: None,
        }
    }
}

impl PointCloudScanner {
    /// A scanner that also keeps every point, for plotting afterwards.
    pub fn retaining() -> Self {
        Self {
            points: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn observe(&mut self, point: DVec3) -> Option<NewMaximum> {
        self.count += 1;
        self.axis_maxima = Some(match self.axis_maxima {
            None => point,
            Some(maxima) => maxima.max(point),
        });
        if let Some(points) = &mut self.points {
            points.push(point);
        }
        let distance = point.length();
        if distance > self.max_distance {
            let previous = self.max_distance;
            self.max_distance = distance;
            Some(NewMaximum { distance, previous })
        } else {
            None
        }
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Maxima taken separately along x, y and z; not the farthest point.
    pub fn axis_maxima(&self) -> Option<DVec3> {
        self.axis_maxima
    }

    pub fn finish(self) -> Result<PointCloudScan, LabError> {
        let axis_maxima = self.axis_maxima.ok_or(LabError::EmptyPointCloud)?;
        Ok(PointCloudScan {
            count: self.count,
            max_distance: self.max_distance,
            axis_maxima,
            points: self.points.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointCloudScan {
    pub count: usize,
    pub max_distance: f64,
    pub axis_maxima: DVec3,
    /// Empty unless the scanner was retaining
    pub points: Vec<DVec3>,
}

/// Three whitespace-separated coordinates.
pub fn parse_line(text: &str, line: usize) -> Result<DVec3, LabError> {
    parse_point(text.split_whitespace(), line, 1)
}

/// Streams the points through a scanner, handing each new maximum to `on_maximum`
/// in file order.
pub fn scan<R: BufRead>(
    reader: R,
    origin: &Path,
    mut scanner: PointCloudScanner,
    mut on_maximum: impl FnMut(NewMaximum),
) -> Result<PointCloudScan, LabError> {
    for (index, text) in reader.lines().enumerate() {
        let text = text.map_err(|source| LabError::io(origin, source))?;
        let point = parse_line(&text, index + 1)?;
        if let Some(maximum) = scanner.observe(point) {
            on_maximum(maximum);
        }
    }
    scanner.finish()
}

pub fn scan_file(
    path: impl AsRef<Path>,
    scanner: PointCloudScanner,
    on_maximum: impl FnMut(NewMaximum),
) -> Result<PointCloudScan, LabError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LabError::io(path, source))?;
    let scan = scan(BufReader::new(file), path, scanner, on_maximum)?;
    log::info!("Scanned {} points from {}", scan.count, path.display());
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_text(text: &str) -> (Vec<NewMaximum>, Result<PointCloudScan, LabError>) {
        let mut maxima = Vec::new();
        let result = scan(
            text.as_bytes(),
            Path::new("test"),
            PointCloudScanner::default(),
            |maximum| maxima.push(maximum),
        );
        (maxima, result)
    }

    #[test]
    fn new_maxima_in_file_order() {
        let (maxima, result) = scan_text("3 0 0\n0 4 0\n1 1 1\n");
        let distances: Vec<f64> = maxima.iter().map(|maximum| maximum.distance).collect();
        assert_eq!(distances, vec![3.0, 4.0]);
        assert_eq!(maxima[0].previous, f64::NEG_INFINITY);
        assert_eq!(maxima[1].previous, 3.0);
        let scan = result.unwrap();
        assert_eq!(scan.axis_maxima, DVec3::new(3.0, 4.0, 1.0));
        assert_eq!(scan.max_distance, 4.0);
        assert_eq!(scan.count, 3);
        assert!(scan.points.is_empty());
    }

    #[test]
    fn equal_distance_is_not_a_new_maximum() {
        let (maxima, _) = scan_text("0 0 2\n2 0 0\n");
        assert_eq!(maxima.len(), 1);
    }

    #[test]
    fn axis_maxima_can_be_negative() {
        let (_, result) = scan_text("-1 -2 -3\n-4 -0.5 -6\n");
        assert_eq!(result.unwrap().axis_maxima, DVec3::new(-1.0, -0.5, -3.0));
    }

    #[test]
    fn maximum_prints_like_the_console_log() {
        let maximum = NewMaximum {
            distance: 3.0,
            previous: f64::NEG_INFINITY,
        };
        assert_eq!(maximum.to_string(), "new max dist: 3.0>-inf");
    }

    #[test]
    fn any_whitespace_separates() {
        assert_eq!(parse_line("1\t2   3", 1).unwrap(), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn bad_lines_report_their_number() {
        let (_, result) = scan_text("1 2 3\n1 2\n");
        assert!(matches!(result, Err(LabError::Dimensionality { line: 2, found: 2, .. })));
        let (_, result) = scan_text("1 2 3\n1 two 3\n");
        assert!(matches!(result, Err(LabError::MalformedNumber { line: 2, .. })));
    }

    #[test]
    fn empty_cloud_has_no_maxima() {
        let (maxima, result) = scan_text("");
        assert!(maxima.is_empty());
        assert!(matches!(result, Err(LabError::EmptyPointCloud)));
    }

    #[test]
    fn retaining_scanner_keeps_points() {
        let mut scanner = PointCloudScanner::retaining();
        scanner.observe(DVec3::X);
        scanner.observe(DVec3::Y);
        let scan = scanner.finish().unwrap();
        assert_eq!(scan.points, vec![DVec3::X, DVec3::Y]);
    }
}
