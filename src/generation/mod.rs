use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

use glam::DVec3;

use crate::error::LabError;

pub mod parser;

pub use parser::{load, parse};

/// Distance from a point to the target. Lower is better.
pub fn fitness(point: DVec3, target: DVec3) -> f64 {
    point.distance(target)
}

/// One candidate configuration: link 0 is the base, the last link is the end effector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Generation {
    links: Vec<DVec3>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start: DVec3,
    pub end: DVec3,
}

impl Generation {
    pub fn new(links: Vec<DVec3>) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &[DVec3] {
        &self.links
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn end_effector(&self) -> Option<DVec3> {
        self.links.last().copied()
    }

    /// Consecutive link pairs, so N links give N-1 segments.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.links
            .windows(2)
            .enumerate()
            .map(|(index, pair)| Segment {
                index,
                start: pair[0],
                end: pair[1],
            })
    }

    pub fn fitness(&self, target: DVec3) -> Option<f64> {
        self.end_effector().map(|end| fitness(end, target))
    }
}

/// Everything in one output file of the search: the target and one generation per line.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationFile {
    pub target: DVec3,
    pub generations: Vec<Generation>,
}

impl GenerationFile {
    pub fn new(target: DVec3, generations: Vec<Generation>) -> Self {
        Self {
            target,
            generations,
        }
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Generation by its 1-based slider number.
    pub fn generation(&self, number: usize) -> Option<&Generation> {
        number
            .checked_sub(1)
            .and_then(|index| self.generations.get(index))
    }

    pub fn link_count(&self) -> Option<usize> {
        self.generations.first().map(Generation::link_count)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LabError> {
        let path = path.as_ref();
        fs::write(path, self.to_string()).map_err(|source| LabError::io(path, source))
    }
}

struct PointText(DVec3);

impl Display for PointText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let DVec3 { x, y, z } = self.0;
        write!(f, "{x},{y},{z}")
    }
}

impl Display for GenerationFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", PointText(self.target))?;
        for generation in &self.generations {
            writeln!(f)?;
            for (index, link) in generation.links.iter().enumerate() {
                if index > 0 {
                    write!(f, "\t")?;
                }
                write!(f, "{}", PointText(*link))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arm() -> Generation {
        Generation::new(vec![
            DVec3::ZERO,
            DVec3::new(0.0, 0.0, 0.03),
            DVec3::new(0.1, 0.0, 0.03),
            DVec3::new(0.2, 0.0, 0.03),
            DVec3::new(0.38, 0.0, 0.03),
        ])
    }

    #[test]
    fn segments_pair_consecutive_links() {
        let generation = arm();
        let segments: Vec<Segment> = generation.segments().collect();
        assert_eq!(segments.len(), generation.link_count() - 1);
        for (index, segment) in segments.iter().enumerate() {
            assert_eq!(segment.index, index);
            assert_eq!(segment.start, generation.links()[index]);
            assert_eq!(segment.end, generation.links()[index + 1]);
        }
    }

    #[test]
    fn single_link_has_no_segments() {
        let generation = Generation::new(vec![DVec3::ONE]);
        assert_eq!(generation.segments().count(), 0);
        assert_eq!(generation.fitness(DVec3::ONE), Some(0.0));
    }

    #[test]
    fn fitness_is_distance_from_end_effector() {
        let generation = Generation::new(vec![DVec3::ZERO, DVec3::ONE]);
        let fitness = generation.fitness(DVec3::new(1.0, 2.0, 3.0)).unwrap();
        assert!((fitness - 5f64.sqrt()).abs() < 1e-12);
        assert_eq!(format!("{fitness:.5}"), "2.23607");
    }

    #[test]
    fn generation_numbers_are_one_based() {
        let file = GenerationFile::new(
            DVec3::ZERO,
            vec![
                Generation::new(vec![DVec3::X]),
                Generation::new(vec![DVec3::Y]),
            ],
        );
        assert!(file.generation(0).is_none());
        assert_eq!(file.generation(1).unwrap().links(), &[DVec3::X]);
        assert_eq!(file.generation(2).unwrap().links(), &[DVec3::Y]);
        assert!(file.generation(3).is_none());
    }

    #[test]
    fn display_writes_tabs_and_commas() {
        let file = GenerationFile::new(
            DVec3::new(1.0, 2.0, 3.0),
            vec![Generation::new(vec![DVec3::ZERO, DVec3::new(0.5, -1.25, 1.0)])],
        );
        assert_eq!(file.to_string(), "1,2,3\n0,0,0\t0.5,-1.25,1");
    }
}
