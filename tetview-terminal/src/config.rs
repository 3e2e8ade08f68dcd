/// Viewer configuration, loaded from TOML.
///
/// Every key is optional; missing keys take the defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tetview_core::{Camera, FaceOrder};

use crate::error::ViewerError;

/// Triangle enumeration used for the index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceOrderSetting {
    #[default]
    Legacy,
    Outward,
}

impl From<FaceOrderSetting> for FaceOrder {
    fn from(setting: FaceOrderSetting) -> Self {
        match setting {
            FaceOrderSetting::Legacy => FaceOrder::Legacy,
            FaceOrderSetting::Outward => FaceOrder::Outward,
        }
    }
}

/// Fixed camera looking at the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [10.0, 8.0, 10.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    /// Build a camera for a viewport of `width` x `height` cells
    pub fn to_camera(&self, width: u32, height: u32) -> Camera {
        Camera {
            position: Point3::from(self.eye),
            target: Point3::from(self.target),
            fov: self.fov_degrees.to_radians(),
            near: self.near,
            far: self.far,
            ..Camera::new(width, height)
        }
    }
}

/// Top-level viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// VTK file to load.
    pub mesh: PathBuf,
    /// World-space translation applied to every point on export.
    pub offset: [f64; 3],
    /// Spin rate around the vertical axis.
    pub degrees_per_second: f32,
    pub target_fps: u32,
    /// Reject VTK sections other than POINTS and CELLS.
    pub strict: bool,
    pub face_order: FaceOrderSetting,
    pub camera: CameraConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mesh: PathBuf::from("resources/cube.vtk"),
            offset: [0.0; 3],
            degrees_per_second: 90.0,
            target_fps: 30,
            strict: false,
            face_order: FaceOrderSetting::Legacy,
            camera: CameraConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ViewerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ViewerError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn offset_vector(&self) -> Vector3<f64> {
        Vector3::from(self.offset)
    }
}
