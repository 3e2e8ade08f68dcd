/// Example: Load a VTK file and print the buffers a renderer would upload
///
/// Usage: cargo run --example dump_buffers -- path/to/mesh.vtk

use std::env;
use std::process;

use nalgebra::Vector3;
use tetview_core::{read_vtk_file, FaceOrder, TetMesh};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mesh = match env::args().nth(1) {
        Some(path) => match read_vtk_file(&path, Vector3::zeros()) {
            Ok(mesh) => mesh,
            Err(e) => {
                eprintln!("Failed to load {path}: {e}");
                process::exit(1);
            }
        },
        None => {
            eprintln!("No VTK file provided, using the demo cube...");
            TetMesh::cube(2.0, Vector3::zeros())
        }
    };

    let buffers = mesh.draw_buffers(FaceOrder::Legacy);

    println!("{} points:", buffers.num_points());
    for xyz in buffers.positions.chunks_exact(3) {
        println!("  {:>10.4} {:>10.4} {:>10.4}", xyz[0], xyz[1], xyz[2]);
    }

    println!("{} indices (one tetrahedron per row):", buffers.num_indices());
    for faces in buffers.indices.chunks_exact(12) {
        let row: Vec<String> = faces
            .chunks_exact(3)
            .map(|face| format!("{} {} {}", face[0], face[1], face[2]))
            .collect();
        println!("  {}", row.join(" | "));
    }
}
