/// Reader for the tetrahedral subset of the legacy VTK ASCII format
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info, trace};
use nalgebra::Vector3;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{
        multispace0, multispace1, space0, space1, u32 as decimal_u32,
        u64 as decimal_u64,
    },
    combinator::{eof, opt, peek, verify},
    number::complete::double,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::{ParseErrorKind, Result, VtkError};
use crate::geometry::{Point, TetMesh, Tetra};

/// Keywords that open a legacy VTK section or dataset block. Only `POINTS`,
/// `CELLS` and `DATASET` are accepted in strict mode.
const SECTION_KEYWORDS: &[&str] = &[
    "CELL_TYPES",
    "POINT_DATA",
    "CELL_DATA",
    "FIELD",
    "SCALARS",
    "VECTORS",
    "NORMALS",
    "TENSORS",
    "LOOKUP_TABLE",
    "TEXTURE_COORDINATES",
    "COLOR_SCALARS",
    "METADATA",
    "OFFSETS",
    "CONNECTIVITY",
    "VERTICES",
    "LINES",
    "POLYGONS",
    "TRIANGLE_STRIPS",
    "DIMENSIONS",
    "SPACING",
    "ORIGIN",
    "ASPECT_RATIO",
    "X_COORDINATES",
    "Y_COORDINATES",
    "Z_COORDINATES",
];

/// Every tetrahedron record is an arity followed by four indices
const TETRA_ARITY: u32 = 4;

/// Configurable VTK reader.
///
/// The default reader ignores any section other than `POINTS` and `CELLS`.
/// A strict reader rejects them with [`VtkError::UnsupportedSection`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VtkReader {
    strict: bool,
}

impl VtkReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Read and parse the file at `path`
    pub fn read_file(&self, path: impl AsRef<Path>, offset: Vector3<f64>) -> Result<TetMesh> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|source| VtkError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let mut text = String::new();
        file.read_to_string(&mut text)?;

        debug!("read {} bytes from {}", text.len(), path.display());
        self.parse(&text, offset)
    }

    /// Parse VTK text in a single forward pass
    pub fn parse(&self, input: &str, offset: Vector3<f64>) -> Result<TetMesh> {
        let mut scanner = Scanner::new(input);
        let mut points: Option<Vec<Point>> = None;
        let mut cells: Option<Vec<(usize, Tetra)>> = None;

        while let Some((line, text)) = scanner.next_line() {
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "ASCII" {
                continue;
            }

            let keyword = trimmed.split_whitespace().next().unwrap_or_default();
            match keyword {
                "POINTS" => {
                    if points.is_some() {
                        return Err(VtkError::parse(line, ParseErrorKind::DuplicateSection("POINTS")));
                    }
                    let count = points_count(trimmed, line)?;
                    points = Some(scanner.read_points(count)?);
                    debug!("line {line}: read {count} points");
                }
                "CELLS" => {
                    if cells.is_some() {
                        return Err(VtkError::parse(line, ParseErrorKind::DuplicateSection("CELLS")));
                    }
                    let count = cells_count(trimmed, line)?;
                    cells = Some(scanner.read_tetras(count)?);
                    debug!("line {line}: read {count} tetrahedra");
                }
                "BINARY" => {
                    return Err(VtkError::UnsupportedSection {
                        line,
                        keyword: keyword.to_string(),
                    });
                }
                "DATASET" if self.strict => {
                    let kind = trimmed.split_whitespace().nth(1).unwrap_or_default();
                    if kind != "UNSTRUCTURED_GRID" {
                        return Err(VtkError::UnsupportedSection {
                            line,
                            keyword: format!("DATASET {kind}"),
                        });
                    }
                }
                _ if self.strict && SECTION_KEYWORDS.contains(&keyword) => {
                    return Err(VtkError::UnsupportedSection {
                        line,
                        keyword: keyword.to_string(),
                    });
                }
                _ => trace!("line {line}: ignoring '{trimmed}'"),
            }
        }

        let end = scanner.line;
        let points = points
            .ok_or_else(|| VtkError::parse(end, ParseErrorKind::MissingSection("POINTS")))?;
        let records = cells
            .ok_or_else(|| VtkError::parse(end, ParseErrorKind::MissingSection("CELLS")))?;

        // Indices can only be checked once both sections are known.
        for (position, (line, tetra)) in records.iter().enumerate() {
            tetra
                .validate(position, points.len())
                .map_err(|kind| VtkError::parse(*line, kind))?;
        }
        let tetras = records.into_iter().map(|(_, tetra)| tetra).collect();
        let mesh = TetMesh::new(points, tetras, offset).map_err(|kind| VtkError::parse(end, kind))?;
        info!(
            "loaded tetrahedral mesh: {} points, {} tetrahedra",
            mesh.num_points(),
            mesh.num_tetras()
        );
        Ok(mesh)
    }
}

/// Read a VTK file with the default reader
pub fn read_vtk_file(path: impl AsRef<Path>, offset: Vector3<f64>) -> Result<TetMesh> {
    VtkReader::new().read_file(path, offset)
}

/// Parse VTK text with the default reader
pub fn parse_vtk(input: &str, offset: Vector3<f64>) -> Result<TetMesh> {
    VtkReader::new().parse(input, offset)
}

/// Position in the input, tracking the 1-based line number
struct Scanner<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            line: 1,
        }
    }

    /// Next line and its number, without the line terminator
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        if self.rest.is_empty() {
            return None;
        }
        let line = self.line;
        let text = match self.rest.split_once('\n') {
            Some((text, rest)) => {
                self.rest = rest;
                self.line += 1;
                text
            }
            None => std::mem::take(&mut self.rest),
        };
        Some((line, text.strip_suffix('\r').unwrap_or(text)))
    }

    /// Apply a token parser to the raw stream, ignoring line structure
    fn token<O>(
        &mut self,
        parser: fn(&'a str) -> IResult<&'a str, O>,
        expected: &'static str,
    ) -> Result<O> {
        match parser(self.rest) {
            Ok((rest, value)) => {
                let consumed = &self.rest[..self.rest.len() - rest.len()];
                self.line += consumed.matches('\n').count();
                self.rest = rest;
                Ok(value)
            }
            Err(_) => Err(self.token_error(expected)),
        }
    }

    fn token_error(&self, expected: &'static str) -> VtkError {
        let token_start = self.rest.trim_start();
        let skipped = &self.rest[..self.rest.len() - token_start.len()];
        let line = self.line + skipped.matches('\n').count();

        let kind = match token_start.split_whitespace().next() {
            Some(found) => ParseErrorKind::BadToken {
                expected,
                found: found.to_string(),
            },
            None => ParseErrorKind::UnexpectedEof { expected },
        };
        VtkError::parse(line, kind)
    }

    fn read_points(&mut self, count: usize) -> Result<Vec<Point>> {
        // Each point takes at least "0 0 0\n".
        let mut points = Vec::with_capacity(count.min(self.rest.len() / 6));
        for _ in 0..count {
            let x = self.token(real, "a coordinate")?;
            let y = self.token(real, "a coordinate")?;
            let z = self.token(real, "a coordinate")?;
            points.push(Point::new(x, y, z));
        }
        Ok(points)
    }

    /// Tetrahedron records, each paired with the line its arity appears on
    fn read_tetras(&mut self, count: usize) -> Result<Vec<(usize, Tetra)>> {
        // Each record takes at least "4 0 1 2 3\n".
        let mut tetras = Vec::with_capacity(count.min(self.rest.len() / 10));
        for _ in 0..count {
            let arity = self.token(index, "a cell size")?;
            let line = self.line;
            if arity != TETRA_ARITY {
                return Err(VtkError::parse(line, ParseErrorKind::CellArity(arity)));
            }
            let mut corners = [0; 4];
            for corner in &mut corners {
                *corner = self.token(index, "a point index")?;
            }
            tetras.push((line, Tetra::from(corners)));
        }
        Ok(tetras)
    }
}

fn token_end(input: &str) -> IResult<&str, &str> {
    peek(alt((multispace1, eof)))(input)
}

fn real(input: &str) -> IResult<&str, f64> {
    // nom reads `nan`, `inf` and overflowing literals as non-finite values
    let finite = verify(double, |value: &f64| value.is_finite());
    preceded(multispace0, terminated(finite, token_end))(input)
}

fn index(input: &str) -> IResult<&str, u32> {
    preceded(multispace0, terminated(decimal_u32, token_end))(input)
}

fn is_type_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `POINTS <count> [<datatype>]`
fn points_header(input: &str) -> IResult<&str, u64> {
    let (input, _) = tag("POINTS")(input)?;
    let (input, count) = preceded(space1, decimal_u64)(input)?;
    let (input, _) = opt(preceded(space1, take_while1(is_type_char)))(input)?;
    let (input, _) = terminated(space0, eof)(input)?;
    Ok((input, count))
}

/// `CELLS <count> [<total integers>]`
fn cells_header(input: &str) -> IResult<&str, (u64, Option<u64>)> {
    let (input, _) = tag("CELLS")(input)?;
    let (input, count) = preceded(space1, decimal_u64)(input)?;
    let (input, total) = opt(preceded(space1, decimal_u64))(input)?;
    let (input, _) = terminated(space0, eof)(input)?;
    Ok((input, (count, total)))
}

fn bad_header(section: &'static str, text: &str, line: usize) -> VtkError {
    VtkError::parse(
        line,
        ParseErrorKind::BadHeader {
            section,
            text: text.to_string(),
        },
    )
}

fn points_count(text: &str, line: usize) -> Result<usize> {
    let (_, count) = points_header(text).map_err(|_| bad_header("POINTS", text, line))?;
    usize::try_from(count).map_err(|_| bad_header("POINTS", text, line))
}

fn cells_count(text: &str, line: usize) -> Result<usize> {
    let (_, (count, declared)) = cells_header(text).map_err(|_| bad_header("CELLS", text, line))?;
    let count = usize::try_from(count).map_err(|_| bad_header("CELLS", text, line))?;

    if let Some(declared) = declared {
        let expected = count.saturating_mul(TETRA_ARITY as usize + 1);
        let declared = usize::try_from(declared).unwrap_or(usize::MAX);
        if declared != expected {
            return Err(VtkError::parse(
                line,
                ParseErrorKind::CellSizeMismatch {
                    cells: count,
                    declared,
                    expected,
                },
            ));
        }
    }
    Ok(count)
}
