//! The reference [`Map`] implementation.

use std::path::Path;

use mapvis_spec::BoundingBox;

use crate::error::EngineError;
use crate::grid::{encode_grid, UtfGrid};
use crate::png::{write_canvas, PngConfig};
use crate::render::render_canvas;
use crate::style::StyleDocument;
use crate::viewport::Viewport;
use crate::{ImageFormat, Map};

/// Extent used by `zoom_all` when the style has no features.
const EMPTY_EXTENT: BoundingBox = BoundingBox::new(-1.0, -1.0, 1.0, 1.0);

/// Largest surface, in pixels, the sketch rasterizer will allocate.
pub const MAX_SURFACE_PIXELS: u64 = 8192 * 8192;

/// A map backed by a [`StyleDocument`] and drawn by the sketch rasterizer.
#[derive(Debug, Clone)]
pub struct SketchMap {
    width: u32,
    height: u32,
    extent: BoundingBox,
    style: Option<StyleDocument>,
    png: PngConfig,
}

impl SketchMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            extent: EMPTY_EXTENT,
            style: None,
            png: PngConfig::default(),
        }
    }

    /// Creates a map with an already parsed style, zoomed to its extent.
    pub fn with_style(width: u32, height: u32, style: StyleDocument) -> Self {
        let mut map = Self::new(width, height);
        map.style = Some(style);
        map.zoom_all();
        map
    }

    pub fn style(&self) -> Option<&StyleDocument> {
        self.style.as_ref()
    }

    /// The current extent after fitting to the surface.
    pub fn viewport(&self) -> Viewport {
        Viewport::fit(self.width, self.height, self.extent)
    }

    fn drawable(&self) -> Result<(&StyleDocument, Viewport), EngineError> {
        let style = self.style.as_ref().ok_or(EngineError::NoStyle)?;
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::EmptySurface {
                width: self.width,
                height: self.height,
            });
        }
        if u64::from(self.width) * u64::from(self.height) > MAX_SURFACE_PIXELS {
            return Err(EngineError::SurfaceTooLarge {
                width: self.width,
                height: self.height,
                limit: MAX_SURFACE_PIXELS,
            });
        }
        Ok((style, self.viewport()))
    }
}

impl Map for SketchMap {
    fn load_style(&mut self, path: &Path) -> Result<(), EngineError> {
        self.style = Some(StyleDocument::load(path)?);
        self.zoom_all();
        Ok(())
    }

    fn save_style(&self, path: &Path) -> Result<(), EngineError> {
        self.style.as_ref().ok_or(EngineError::NoStyle)?.save(path)
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn zoom_to_box(&mut self, bbox: BoundingBox) {
        self.extent = bbox;
    }

    fn zoom_all(&mut self) {
        let extent = self.style.as_ref().and_then(StyleDocument::extent);
        self.extent = match extent {
            None => EMPTY_EXTENT,
            Some(mut b) => {
                if b.width() <= 0.0 {
                    b.minx -= 1.0;
                    b.maxx += 1.0;
                }
                if b.height() <= 0.0 {
                    b.miny -= 1.0;
                    b.maxy += 1.0;
                }
                b
            }
        };
    }

    fn render_image(&self, path: &Path, format: ImageFormat, scale: f64) -> Result<(), EngineError> {
        let (style, viewport) = self.drawable()?;
        let canvas = render_canvas(style, &viewport, scale);
        write_canvas(&canvas, format, path, &self.png)?;
        Ok(())
    }

    fn render_grid(&self, layer: usize, resolution: u32) -> Result<UtfGrid, EngineError> {
        let (style, viewport) = self.drawable()?;
        encode_grid(style, &viewport, layer, resolution)
    }
}
