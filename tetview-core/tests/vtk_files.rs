use std::fmt::Write;

use nalgebra::Vector3;
use proptest::prelude::*;
use tetview_core::{parse_vtk, read_vtk_file, FaceOrder, TetMesh, VtkError};

const CUBE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../resources/cube.vtk");

fn to_vtk(points: &[[f64; 3]], tetras: &[[u32; 4]]) -> String {
    let mut text = String::from("# vtk DataFile Version 3.0\ngenerated\nASCII\n");
    text.push_str("DATASET UNSTRUCTURED_GRID\n");
    writeln!(text, "POINTS {} double", points.len()).unwrap();
    for [x, y, z] in points {
        writeln!(text, "{x:?} {y:?} {z:?}").unwrap();
    }
    writeln!(text, "CELLS {} {}", tetras.len(), 5 * tetras.len()).unwrap();
    for [a, b, c, d] in tetras {
        writeln!(text, "4 {a} {b} {c} {d}").unwrap();
    }
    writeln!(text, "CELL_TYPES {}", tetras.len()).unwrap();
    for _ in tetras {
        text.push_str("10\n");
    }
    text
}

/// Points plus tetrahedra whose four indices are distinct and in range
fn mesh_strategy() -> impl Strategy<Value = (Vec<[f64; 3]>, Vec<[u32; 4]>)> {
    (4usize..40).prop_flat_map(|num_points| {
        let points = prop::collection::vec(prop::array::uniform3(-1e3f64..1e3), num_points);
        let tetra = Just((0..num_points as u32).collect::<Vec<_>>())
            .prop_shuffle()
            .prop_map(|order| [order[0], order[1], order[2], order[3]]);
        (points, prop::collection::vec(tetra, 0..30))
    })
}

#[test]
fn test_cube_file() {
    let mesh = read_vtk_file(CUBE_PATH, Vector3::zeros()).unwrap();
    assert_eq!(mesh, TetMesh::cube(2.0, Vector3::zeros()));

    let buffers = mesh.draw_buffers(FaceOrder::Legacy);
    assert_eq!(buffers.num_points(), 8);
    assert_eq!(buffers.num_indices(), 60);
}

#[test]
fn test_single_tetra_round_trip() {
    let points = [[0.0; 3]; 4];
    let text = to_vtk(&points, &[[0, 1, 2, 3]]);
    let mesh = parse_vtk(&text, Vector3::zeros()).unwrap();

    assert_eq!(mesh.world_points(), vec![0.0; 12]);
    assert_eq!(mesh.indices(), vec![0, 1, 2, 0, 1, 3, 1, 2, 3, 0, 2, 3]);
}

#[test]
fn test_offset_moves_exported_points() {
    let text = to_vtk(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], &[]);
    let mesh = parse_vtk(&text, Vector3::new(1.0, 2.0, 3.0)).unwrap();
    assert_eq!(&mesh.world_points()[..3], &[1.0, 2.0, 3.0]);
}

#[test]
fn test_out_of_range_index() {
    let text = to_vtk(&[[0.0; 3]; 4], &[[0, 1, 2, 9]]);
    let err = parse_vtk(&text, Vector3::zeros()).unwrap_err();
    assert!(err.is_parse_error());
    assert!(matches!(err, VtkError::Parse { line: 11, .. }));
}

#[test]
fn test_missing_file() {
    let err = read_vtk_file("resources/missing.vtk", Vector3::zeros()).unwrap_err();
    assert!(matches!(err, VtkError::FileNotFound { .. }));
}

proptest! {
    #[test]
    fn prop_counts_match_declared((points, tetras) in mesh_strategy()) {
        let mesh = parse_vtk(&to_vtk(&points, &tetras), Vector3::zeros()).unwrap();

        prop_assert_eq!(mesh.num_points(), points.len());
        prop_assert_eq!(mesh.world_points().len(), 3 * points.len());
        prop_assert_eq!(mesh.indices().len(), 12 * tetras.len());
        prop_assert_eq!(mesh.oriented_indices().len(), 12 * tetras.len());
    }

    #[test]
    fn prop_coordinates_survive_parsing((points, tetras) in mesh_strategy()) {
        let offset = Vector3::new(0.5, -2.0, 10.0);
        let mesh = parse_vtk(&to_vtk(&points, &tetras), offset).unwrap();
        let exported = mesh.world_points();

        for (point, world) in points.iter().zip(exported.chunks_exact(3)) {
            for axis in 0..3 {
                prop_assert_eq!(world[axis], point[axis] + offset[axis]);
            }
        }
    }
}
