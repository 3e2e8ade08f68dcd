/// Expansion of tetrahedra into drawable index and coordinate buffers
use crate::geometry::{TetMesh, Tetra};

/// Which triangle enumeration to emit for each tetrahedron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceOrder {
    /// `(p0,p1,p2) (p0,p1,p3) (p1,p2,p3) (p0,p2,p3)`, not consistently wound
    #[default]
    Legacy,
    /// Same faces, each counter-clockwise seen from outside the tetrahedron
    Outward,
}

/// Flat buffers ready to hand to a renderer.
///
/// `positions` holds `x, y, z` per point in world space and `indices` holds
/// twelve point indices per tetrahedron.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawBuffers {
    pub positions: Vec<f64>,
    pub indices: Vec<u32>,
}

impl DrawBuffers {
    pub fn num_points(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// World-space position of point `index`
    pub fn position(&self, index: u32) -> Option<[f64; 3]> {
        let start = 3 * index as usize;
        let xyz = self.positions.get(start..start + 3)?;
        Some([xyz[0], xyz[1], xyz[2]])
    }

    /// The index buffer read as a line list.
    ///
    /// For legacy-ordered tetrahedra the six pairs are exactly the six edges.
    pub fn line_segments(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.indices.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// The index buffer read as a triangle list
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }
}

fn legacy_faces(tetra: &Tetra) -> [u32; 12] {
    let [p0, p1, p2, p3] = tetra.points;
    [p0, p1, p2, p0, p1, p3, p1, p2, p3, p0, p2, p3]
}

fn outward_faces(tetra: &Tetra, positive: bool) -> [u32; 12] {
    let [p0, p1, p2, p3] = tetra.points;
    if positive {
        [p0, p2, p1, p0, p1, p3, p1, p2, p3, p0, p3, p2]
    } else {
        [p0, p1, p2, p0, p3, p1, p1, p3, p2, p0, p2, p3]
    }
}

impl TetMesh {
    /// Point coordinates in world space, `offset + local`, three values per point
    pub fn world_points(&self) -> Vec<f64> {
        let offset = self.offset();
        let mut result = Vec::with_capacity(3 * self.num_points());
        for point in self.points() {
            let world = *point + offset;
            result.extend_from_slice(&[world.x, world.y, world.z]);
        }
        result
    }

    /// Four triangles per tetrahedron in legacy order
    pub fn indices(&self) -> Vec<u32> {
        self.face_indices(FaceOrder::Legacy)
    }

    /// Four triangles per tetrahedron, wound outward
    pub fn oriented_indices(&self) -> Vec<u32> {
        self.face_indices(FaceOrder::Outward)
    }

    pub fn face_indices(&self, order: FaceOrder) -> Vec<u32> {
        let mut result = Vec::with_capacity(self.num_indices());
        for tetra in self.tetras() {
            let faces = match order {
                FaceOrder::Legacy => legacy_faces(tetra),
                FaceOrder::Outward => outward_faces(tetra, self.signed_volume(tetra) >= 0.0),
            };
            result.extend_from_slice(&faces);
        }
        result
    }

    pub fn draw_buffers(&self, order: FaceOrder) -> DrawBuffers {
        DrawBuffers {
            positions: self.world_points(),
            indices: self.face_indices(order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use nalgebra::{Point3, Vector3};

    fn unit_tetra(offset: Vector3<f64>) -> TetMesh {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ];
        TetMesh::new(points, vec![Tetra::new(0, 1, 2, 3)], offset).unwrap()
    }

    #[test]
    fn test_legacy_indices() {
        let mesh = unit_tetra(Vector3::zeros());
        assert_eq!(mesh.indices(), vec![0, 1, 2, 0, 1, 3, 1, 2, 3, 0, 2, 3]);
        assert_eq!(mesh.indices().len(), mesh.num_indices());
    }

    #[test]
    fn test_offset_applied_at_export() {
        let mut mesh = unit_tetra(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(&mesh.world_points()[..3], &[1.0, 2.0, 3.0]);

        mesh.set_offset(Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(&mesh.world_points()[..6], &[-1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(mesh.points()[0], Point::origin());
    }

    #[test]
    fn test_line_segments_cover_all_edges() {
        let buffers = unit_tetra(Vector3::zeros()).draw_buffers(FaceOrder::Legacy);
        let mut edges: Vec<(u32, u32)> = buffers
            .line_segments()
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_outward_faces_point_away_from_centroid() {
        let mut mesh = TetMesh::cube(2.0, Vector3::zeros());
        // Flip one tetrahedron so both orientations are exercised.
        let mut tetras = mesh.tetras().to_vec();
        tetras[0].points.swap(0, 1);
        mesh = TetMesh::new(mesh.points().to_vec(), tetras, Vector3::zeros()).unwrap();

        let buffers = mesh.draw_buffers(FaceOrder::Outward);
        for (tetra, faces) in mesh.tetras().iter().zip(buffers.indices.chunks_exact(12)) {
            let corners = tetra.points.map(|i| mesh.points()[i as usize]);
            let centroid = Point3::from(
                corners.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / 4.0,
            );
            for face in faces.chunks_exact(3) {
                let [a, b, c] = [face[0], face[1], face[2]].map(|i| mesh.points()[i as usize]);
                let normal = (b - a).cross(&(c - a));
                assert!(normal.dot(&(a - centroid)) > 0.0);
            }
        }
    }

    #[test]
    fn test_position_lookup() {
        let buffers = unit_tetra(Vector3::new(1.0, 1.0, 1.0)).draw_buffers(FaceOrder::Legacy);
        assert_eq!(buffers.num_points(), 4);
        assert_eq!(buffers.position(3), Some([1.0, 1.0, 2.0]));
        assert_eq!(buffers.position(4), None);
        assert_eq!(buffers.triangles().count(), 4);
    }
}
