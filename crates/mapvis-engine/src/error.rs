//! Engine error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::png::PngError;

/// Errors from loading, saving or rendering a map.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse style {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid style: {0}")]
    InvalidStyle(String),

    #[error("no style loaded")]
    NoStyle,

    #[error("render surface {width}x{height} is empty")]
    EmptySurface { width: u32, height: u32 },

    #[error("render surface {width}x{height} exceeds {limit} pixels")]
    SurfaceTooLarge { width: u32, height: u32, limit: u64 },

    #[error("layer index {index} out of range ({count} layers)")]
    LayerOutOfRange { index: usize, count: usize },

    #[error("grid resolution must be at least 1")]
    InvalidResolution,

    #[error("too many distinct grid keys ({0})")]
    TooManyGridKeys(usize),

    #[error(transparent)]
    Png(#[from] PngError),
}

impl EngineError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
