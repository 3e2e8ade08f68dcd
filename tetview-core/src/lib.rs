/// tetview core library - tetrahedral mesh loading and drawable buffers
///
/// This library provides the stateless core of the viewer: the VTK reader,
/// the tetrahedral mesh model, its expansion into index buffers, and the
/// transformation and projection math used by renderers.

pub mod error;
pub mod faces;
pub mod geometry;
pub mod projection;
pub mod transform;
pub mod vtk;

// Re-export commonly used types
pub use error::{ParseErrorKind, Result, VtkError};
pub use faces::{DrawBuffers, FaceOrder};
pub use geometry::{Point, TetMesh, Tetra};
pub use projection::{Camera, ProjectionMode};
pub use transform::{RotationState, Transform};
pub use vtk::{parse_vtk, read_vtk_file, VtkReader};
