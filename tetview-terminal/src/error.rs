/// Error types for the terminal viewer.

use std::io;
use std::path::PathBuf;

use tetview_core::VtkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    /// The mesh could not be loaded.
    #[error(transparent)]
    Mesh(#[from] VtkError),

    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    /// The configuration file could not be read.
    #[error("cannot read config '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::ViewerConfig`].
    #[error("invalid config '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
