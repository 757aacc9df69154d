use std::fs;
use std::path::Path;

use glam::DVec3;

use crate::error::LabError;
use crate::generation::{Generation, GenerationFile};

const FIELD_SEPARATOR: char = '\t';
const COORDINATE_SEPARATOR: char = ',';

pub fn load(path: impl AsRef<Path>) -> Result<GenerationFile, LabError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| LabError::io(path, source))?;
    let file = parse(&source)?;
    log::info!(
        "Loaded {} generations of {} links from {}",
        file.len(),
        file.link_count().unwrap_or(0),
        path.display()
    );
    Ok(file)
}

/// Line 1 is the target `x,y,z`, every following line is one generation of
/// tab-separated `x,y,z` links. Every generation must have as many links as the first.
pub fn parse(source: &str) -> Result<GenerationFile, LabError> {
    let mut lines = source.lines().enumerate().map(|(index, text)| (index + 1, text));
    let Some((line, target_text)) = lines.next() else {
        return Err(LabError::MissingTarget);
    };
    let target = parse_point(target_text.split(COORDINATE_SEPARATOR), line, 1)?;
    let mut generations = Vec::new();
    let mut link_count = None;
    for (line, text) in lines {
        let links = text
            .split(FIELD_SEPARATOR)
            .enumerate()
            .map(|(index, field)| parse_point(field.split(COORDINATE_SEPARATOR), line, index + 1))
            .collect::<Result<Vec<_>, _>>()?;
        match link_count {
            None => link_count = Some(links.len()),
            Some(expected) if expected != links.len() => {
                return Err(LabError::LinkCountMismatch {
                    line,
                    expected,
                    found: links.len(),
                })
            }
            Some(_) => {}
        }
        generations.push(Generation::new(links));
    }
    Ok(GenerationFile::new(target, generations))
}

/// Numbers are checked before the count, so an empty field is a malformed number.
pub(crate) fn parse_point<'a>(
    parts: impl Iterator<Item = &'a str>,
    line: usize,
    field: usize,
) -> Result<DVec3, LabError> {
    let coordinates = parts
        .map(|text| {
            text.parse::<f64>().map_err(|_| LabError::MalformedNumber {
                line,
                field,
                text: text.to_string(),
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;
    match coordinates.as_slice() {
        [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
        _ => Err(LabError::Dimensionality {
            line,
            field,
            found: coordinates.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_and_one_generation() {
        let file = parse("1.0,2.0,3.0\n0,0,0\t1,1,1").unwrap();
        assert_eq!(file.target, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(file.len(), 1);
        assert_eq!(file.generations[0].links(), &[DVec3::ZERO, DVec3::ONE]);
    }

    #[test]
    fn trailing_newline_adds_nothing() {
        let file = parse("1,2,3\n0,0,0\t1,1,1\n").unwrap();
        assert_eq!(file.len(), 1);
        let file = parse("1,2,3\r\n0,0,0\t1,1,1\r\n").unwrap();
        assert_eq!(file.generations[0].link_count(), 2);
    }

    #[test]
    fn target_only_is_not_an_error_here() {
        let file = parse("0.1,-0.2,0.05").unwrap();
        assert!(file.is_empty());
        assert_eq!(file.link_count(), None);
    }

    #[test]
    fn empty_source_has_no_target() {
        assert!(matches!(parse(""), Err(LabError::MissingTarget)));
    }

    #[test]
    fn malformed_number_reports_line_and_field() {
        match parse("1,2,3\n0,0,0\t1,x,1") {
            Err(LabError::MalformedNumber { line, field, text }) => {
                assert_eq!((line, field), (2, 2));
                assert_eq!(text, "x");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        let error = parse("1,2,3\n0,0,0\t 1,1,1").unwrap_err();
        assert!(matches!(error, LabError::MalformedNumber { line: 2, field: 2, .. }));
    }

    #[test]
    fn wrong_dimensionality_is_reported() {
        match parse("1,2\n0,0,0") {
            Err(LabError::Dimensionality { line, field, found }) => {
                assert_eq!((line, field, found), (1, 1, 2));
            }
            other => panic!("unexpected {other:?}"),
        }
        let error = parse("1,2,3\n0,0,0\t1,1,1,1").unwrap_err();
        assert_eq!(error.line(), Some(2));
    }

    #[test]
    fn link_count_must_match_first_generation() {
        let source = "0,0,0\n0,0,0\t1,1,1\n0,0,0\t1,1,1\n0,0,0\t1,1,1\t2,2,2";
        match parse(source) {
            Err(LabError::LinkCountMismatch {
                line,
                expected,
                found,
            }) => assert_eq!((line, expected, found), (4, 2, 3)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blank_line_between_generations_is_malformed() {
        let error = parse("0,0,0\n1,1,1\n\n2,2,2").unwrap_err();
        assert_eq!(error.line(), Some(3));
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("manipulator-lab-no-such-file.txt");
        let error = load(&path).unwrap_err();
        assert!(error.to_string().starts_with("File not found"));
    }
}
