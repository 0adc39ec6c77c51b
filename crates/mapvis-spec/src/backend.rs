//! Renderer backend kinds.

use serde::{Deserialize, Serialize};

/// Renderer backend used for a render job.
///
/// The declaration order is the order in which backends are dispatched for
/// each (size, scale) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Raster renderer writing an RGBA PNG.
    Raster,
    /// Vector-graphics renderer writing an opaque PNG.
    Vector,
    /// Interactivity grid renderer writing UTF-grid JSON.
    Grid,
}

impl BackendKind {
    /// All backends in dispatch order.
    pub const ALL: [BackendKind; 3] = [BackendKind::Raster, BackendKind::Vector, BackendKind::Grid];

    /// Returns the backend name used in artifact file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Raster => "raster",
            BackendKind::Vector => "vector",
            BackendKind::Grid => "grid",
        }
    }

    /// Returns the file extension of this backend's artifacts.
    pub fn extension(&self) -> &'static str {
        match self.category() {
            ArtifactCategory::Image => "png",
            ArtifactCategory::Grid => "json",
        }
    }

    /// Returns the kind of artifact this backend produces.
    pub fn category(&self) -> ArtifactCategory {
        match self {
            BackendKind::Raster | BackendKind::Vector => ArtifactCategory::Image,
            BackendKind::Grid => ArtifactCategory::Grid,
        }
    }

    /// Whether pixel comparison for this backend takes the alpha channel into account.
    pub fn compares_alpha(&self) -> bool {
        matches!(self, BackendKind::Raster)
    }

    /// Whether this backend can render at the given scale factor.
    ///
    /// The grid renderer has no scale-factor support, so grid jobs only
    /// exist at scale 1.0.
    pub fn supports_scale(&self, scale: f64) -> bool {
        match self {
            BackendKind::Grid => scale == 1.0,
            BackendKind::Raster | BackendKind::Vector => true,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raster" => Ok(BackendKind::Raster),
            "vector" => Ok(BackendKind::Vector),
            "grid" => Ok(BackendKind::Grid),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

/// Category of artifact a backend produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCategory {
    /// A raster image (PNG).
    Image,
    /// A structured interactivity grid (JSON).
    Grid,
}

impl ArtifactCategory {
    /// Folder under the reference root holding artifacts of this category.
    pub fn reference_dir(&self) -> &'static str {
        match self {
            ArtifactCategory::Image => "images",
            ArtifactCategory::Grid => "grids",
        }
    }
}

/// Maximum accepted difference per backend.
///
/// A job passes iff its difference is less than or equal to the threshold of
/// its backend. Every threshold defaults to 0 (exact match).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub raster: u64,
    pub vector: u64,
    pub grid: u64,
}

impl Thresholds {
    /// Returns the threshold configured for a backend.
    pub fn for_backend(&self, backend: BackendKind) -> u64 {
        match backend {
            BackendKind::Raster => self.raster,
            BackendKind::Vector => self.vector,
            BackendKind::Grid => self.grid,
        }
    }
}
