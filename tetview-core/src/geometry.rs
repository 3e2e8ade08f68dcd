/// Geometry primitives for tetrahedral meshes
use nalgebra::{Point3, Vector3};

use crate::error::ParseErrorKind;

/// A mesh point in local (file) coordinates
pub type Point = Point3<f64>;

/// A tetrahedron given by four indices into the mesh's point list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetra {
    pub points: [u32; 4],
}

impl Tetra {
    pub fn new(p0: u32, p1: u32, p2: u32, p3: u32) -> Self {
        Self {
            points: [p0, p1, p2, p3],
        }
    }

    /// Check the index invariants against a mesh of `num_points` points.
    /// `position` is only used to name the tetrahedron in the error.
    pub fn validate(&self, position: usize, num_points: usize) -> Result<(), ParseErrorKind> {
        for (i, &index) in self.points.iter().enumerate() {
            if index as usize >= num_points {
                return Err(ParseErrorKind::IndexOutOfRange {
                    tetra: position,
                    index,
                    num_points,
                });
            }
            if self.points[..i].contains(&index) {
                return Err(ParseErrorKind::DegenerateTetra {
                    tetra: position,
                    index,
                });
            }
        }
        Ok(())
    }
}

impl From<[u32; 4]> for Tetra {
    fn from(points: [u32; 4]) -> Self {
        Self { points }
    }
}

/// A tetrahedral mesh placed in world space by a translation offset.
///
/// Point and tetrahedron counts are fixed once the mesh is built. The offset
/// is applied when coordinates are exported, so it can be moved freely.
#[derive(Debug, Clone, PartialEq)]
pub struct TetMesh {
    points: Vec<Point>,
    tetras: Vec<Tetra>,
    offset: Vector3<f64>,
}

impl TetMesh {
    /// Build a mesh, checking that every tetrahedron references four
    /// distinct, existing points.
    pub fn new(
        points: Vec<Point>,
        tetras: Vec<Tetra>,
        offset: Vector3<f64>,
    ) -> Result<Self, ParseErrorKind> {
        for (position, tetra) in tetras.iter().enumerate() {
            tetra.validate(position, points.len())?;
        }
        Ok(Self {
            points,
            tetras,
            offset,
        })
    }

    pub fn empty(offset: Vector3<f64>) -> Self {
        Self {
            points: Vec::new(),
            tetras: Vec::new(),
            offset,
        }
    }

    /// A cube of edge `size` centered on the local origin, split into five
    /// tetrahedra (four corner tetrahedra around one central one).
    pub fn cube(size: f64, offset: Vector3<f64>) -> Self {
        let half = size / 2.0;
        // Corner i has x from bit 0, y from bit 1, z from bit 2.
        let points = (0..8u32)
            .map(|i| {
                let coord = |bit: u32| if i & bit == 0 { -half } else { half };
                Point::new(coord(1), coord(2), coord(4))
            })
            .collect();
        let tetras = vec![
            Tetra::new(0, 1, 2, 4),
            Tetra::new(3, 2, 1, 7),
            Tetra::new(5, 1, 4, 7),
            Tetra::new(6, 4, 2, 7),
            Tetra::new(1, 2, 4, 7),
        ];

        Self {
            points,
            tetras,
            offset,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn tetras(&self) -> &[Tetra] {
        &self.tetras
    }

    pub fn offset(&self) -> Vector3<f64> {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vector3<f64>) {
        self.offset = offset;
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_tetras(&self) -> usize {
        self.tetras.len()
    }

    /// Four triangles of three indices per tetrahedron
    pub fn num_indices(&self) -> usize {
        12 * self.tetras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounding box in world space, `None` for a mesh without points
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = self.points.first()?;
        let (min, max) = self
            .points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)));
        Some((min + self.offset, max + self.offset))
    }

    /// Signed volume of `tetra`, positive when `p1 - p0`, `p2 - p0` and
    /// `p3 - p0` form a right-handed frame.
    pub fn signed_volume(&self, tetra: &Tetra) -> f64 {
        let [a, b, c, d] = tetra.points.map(|i| self.points[i as usize]);
        (b - a).cross(&(c - a)).dot(&(d - a)) / 6.0
    }
}

impl Default for TetMesh {
    fn default() -> Self {
        Self::empty(Vector3::zeros())
    }
}
