use std::fmt;
use std::io;
use std::path::PathBuf;

/// Fatal errors. Nothing here is retried: the viewer and the scanner are
/// one-shot tools reading locally produced files.
#[derive(Debug)]
pub enum LabError {
    /// The file could not be opened or read
    Io { path: PathBuf, source: io::Error },
    /// The generation file has no target line
    MissingTarget,
    /// A coordinate did not parse as a float
    MalformedNumber {
        line: usize,
        field: usize,
        text: String,
    },
    /// A point did not have exactly three coordinates
    Dimensionality {
        line: usize,
        field: usize,
        found: usize,
    },
    /// A generation has a different number of links than the first one
    LinkCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    NoGenerations,
    EmptyPointCloud,
    /// The plain style has no default file
    MissingPath,
    Config { path: PathBuf, message: String },
    Graphics(String),
    EventLoop(String),
}

impl LabError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LabError::Io {
            path: path.into(),
            source,
        }
    }

    /// The 1-based line number the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            LabError::MalformedNumber { line, .. }
            | LabError::Dimensionality { line, .. }
            | LabError::LinkCountMismatch { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl fmt::Display for LabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabError::Io { path, source } => {
                if source.kind() == io::ErrorKind::NotFound {
                    write!(f, "File not found: {}", path.display())
                } else {
                    write!(f, "Unable to read {}: {source}", path.display())
                }
            }
            LabError::MissingTarget => write!(f, "Missing target on line 1"),
            LabError::MalformedNumber { line, field, text } => {
                write!(f, "Malformed number {text:?} at line {line}, field {field}")
            }
            LabError::Dimensionality { line, field, found } => write!(
                f,
                "Expected 3 coordinates at line {line}, field {field}, found {found}"
            ),
            LabError::LinkCountMismatch {
                line,
                expected,
                found,
            } => write!(
                f,
                "Expected {expected} links at line {line} like the first generation, found {found}"
            ),
            LabError::NoGenerations => write!(f, "No generations after the target line"),
            LabError::EmptyPointCloud => write!(f, "Point cloud is empty"),
            LabError::MissingPath => write!(f, "The plain style needs a file argument"),
            LabError::Config { path, message } => {
                write!(f, "Bad config {}: {message}", path.display())
            }
            LabError::Graphics(message) => write!(f, "Graphics: {message}"),
            LabError::EventLoop(message) => write!(f, "Event loop: {message}"),
        }
    }
}

impl std::error::Error for LabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LabError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
