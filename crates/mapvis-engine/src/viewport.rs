//! Map-space to pixel-space transform.

use mapvis_spec::BoundingBox;

/// A surface size together with the visible map extent.
///
/// The extent is always grown to the surface aspect ratio, so one map unit
/// covers the same number of pixels on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub extent: BoundingBox,
}

impl Viewport {
    /// Fits `requested` into a `width` x `height` surface.
    pub fn fit(width: u32, height: u32, requested: BoundingBox) -> Self {
        Self {
            width,
            height,
            extent: grow_to_aspect(requested, width, height),
        }
    }

    /// Pixels per map unit.
    pub fn resolution(&self) -> f64 {
        if self.extent.width() <= 0.0 {
            return 0.0;
        }
        self.width as f64 / self.extent.width()
    }

    /// Maps a coordinate to pixel space. The y axis points down.
    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let res = self.resolution();
        ((x - self.extent.minx) * res, (self.extent.maxy - y) * res)
    }
}

/// Grows the shorter side of a box around its centre until the box matches
/// the surface aspect ratio.
pub fn grow_to_aspect(bbox: BoundingBox, width: u32, height: u32) -> BoundingBox {
    if width == 0 || height == 0 || !bbox.is_valid() {
        return bbox;
    }
    let surface_ratio = width as f64 / height as f64;
    let box_ratio = bbox.width() / bbox.height();
    let cx = (bbox.minx + bbox.maxx) / 2.0;
    let cy = (bbox.miny + bbox.maxy) / 2.0;

    if box_ratio < surface_ratio {
        let half = bbox.height() * surface_ratio / 2.0;
        BoundingBox::new(cx - half, bbox.miny, cx + half, bbox.maxy)
    } else {
        let half = bbox.width() / surface_ratio / 2.0;
        BoundingBox::new(bbox.minx, cy - half, bbox.maxx, cy + half)
    }
}
