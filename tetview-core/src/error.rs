/// Error types for mesh loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading a VTK tetrahedral mesh.
#[derive(Error, Debug)]
pub enum VtkError {
    /// The mesh file could not be opened.
    #[error("cannot open mesh file '{}': {source}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the file failed after it was opened.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unexpected token or structure in a POINTS or CELLS block.
    #[error("parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },

    /// A VTK section this reader does not interpret.
    #[error("unsupported VTK section '{keyword}' on line {line}")]
    UnsupportedSection { line: usize, keyword: String },
}

impl VtkError {
    pub(crate) fn parse(line: usize, kind: ParseErrorKind) -> Self {
        Self::Parse { line, kind }
    }

    /// True for every decoding failure, as opposed to I/O failures.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// The concrete reason a parse failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("malformed {section} header: '{text}'")]
    BadHeader { section: &'static str, text: String },

    #[error("expected {expected}, found '{found}'")]
    BadToken { expected: &'static str, found: String },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("cell has {0} points, only tetrahedra (4) are supported")]
    CellArity(u32),

    #[error("CELLS declares {declared} integers but {cells} tetrahedra need {expected}")]
    CellSizeMismatch {
        cells: usize,
        declared: usize,
        expected: usize,
    },

    #[error("tetrahedron {tetra} references point {index}, but there are only {num_points} points")]
    IndexOutOfRange {
        tetra: usize,
        index: u32,
        num_points: usize,
    },

    #[error("tetrahedron {tetra} repeats point {index}")]
    DegenerateTetra { tetra: usize, index: u32 },

    #[error("duplicate {0} section")]
    DuplicateSection(&'static str),

    #[error("missing {0} section")]
    MissingSection(&'static str),
}

/// A specialized Result type for mesh loading.
pub type Result<T> = std::result::Result<T, VtkError>;
