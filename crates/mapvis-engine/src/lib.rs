//! mapvis Map Engine
//!
//! This crate defines the narrow interface the visual-test driver uses to
//! talk to a map renderer ([`Map`]) and ships a small reference
//! implementation of it ([`SketchMap`]).
//!
//! # Features
//!
//! - **Map interface**: load/save a style, resize the surface, zoom to a box
//!   or to the full data extent, render an image, render a UTF grid
//! - **Sketch engine**: flat-colour polygons, stroked lines and square point
//!   markers read from a JSON style document
//! - **Deterministic PNG**: fixed compression settings for byte-identical output
//! - **UTF grids**: per-cell feature ids encoded as printable characters
//!
//! # Example
//!
//! ```no_run
//! use mapvis_engine::{ImageFormat, Map, SketchMap};
//! use std::path::Path;
//!
//! let mut map = SketchMap::new(16, 16);
//! map.load_style(Path::new("visual_tests/styles/simple.json")).unwrap();
//! map.resize(500, 100);
//! map.zoom_all();
//! map.render_image(Path::new("/tmp/simple.png"), ImageFormat::Rgba, 1.0).unwrap();
//! ```
//!
//! The sketch engine has no antialiasing and no text shaping. Any other
//! renderer can drive the same test matrix by implementing [`Map`].

pub mod canvas;
pub mod color;
pub mod error;
pub mod grid;
pub mod png;
pub mod raster;
pub mod render;
pub mod sketch;
pub mod style;
pub mod viewport;

use std::path::Path;

use mapvis_spec::BoundingBox;

pub use canvas::Canvas;
pub use color::Color;
pub use error::EngineError;
pub use grid::{encode_key, UtfGrid, DEFAULT_GRID_RESOLUTION};
pub use sketch::{SketchMap, MAX_SURFACE_PIXELS};
pub use style::{Feature, Geometry, Layer, StyleDocument};
pub use viewport::Viewport;

/// Pixel layout of a rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// 8-bit RGBA with the surface's own alpha.
    Rgba,
    /// 8-bit RGB, flattened onto an opaque white background.
    Rgb,
}

/// A map object the driver renders through.
///
/// One map is created per fixture, loaded once, and then resized and
/// re-zoomed for every size/scale pair of that fixture. Rendering borrows the
/// map immutably.
pub trait Map {
    /// Loads a style definition, replacing any previously loaded style.
    fn load_style(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Writes the currently loaded style back out.
    fn save_style(&self, path: &Path) -> Result<(), EngineError>;

    /// Current surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resizes the render surface.
    fn resize(&mut self, width: u32, height: u32);

    /// Sets the visible extent to a bounding box.
    fn zoom_to_box(&mut self, bbox: BoundingBox);

    /// Sets the visible extent to the full data extent.
    fn zoom_all(&mut self);

    /// Renders the map to an image file.
    fn render_image(&self, path: &Path, format: ImageFormat, scale: f64) -> Result<(), EngineError>;

    /// Renders one layer's feature ids as a UTF grid.
    fn render_grid(&self, layer: usize, resolution: u32) -> Result<UtfGrid, EngineError>;
}
