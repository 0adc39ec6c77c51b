//! Draws a style document onto a canvas.

use crate::canvas::Canvas;
use crate::raster::{fill_polygon, square_marker, stroke_polyline, PixelPoint};
use crate::style::{Feature, Geometry, Layer, StyleDocument};
use crate::viewport::Viewport;

/// Pixels covered by one feature, split by the paint applied to them.
#[derive(Debug, Default)]
pub struct Coverage {
    pub fill: Vec<(u32, u32)>,
    pub stroke: Vec<(u32, u32)>,
}

impl Coverage {
    /// All covered pixels, sorted and de-duplicated.
    pub fn union(&self) -> Vec<(u32, u32)> {
        let mut all: Vec<(u32, u32)> = self.fill.iter().chain(&self.stroke).copied().collect();
        all.sort_unstable_by_key(|&(x, y)| (y, x));
        all.dedup();
        all
    }
}

/// Computes the pixels a feature covers at the given scale factor.
///
/// Stroke widths and marker sizes are in logical pixels and are multiplied by
/// `scale`. Line strings without a stroke colour are drawn with the fill.
pub fn feature_coverage(feature: &Feature, layer: &Layer, viewport: &Viewport, scale: f64) -> Coverage {
    let (w, h) = (viewport.width, viewport.height);
    let project = |coords: &[[f64; 2]]| -> Vec<PixelPoint> {
        coords.iter().map(|[x, y]| viewport.to_pixel(*x, *y)).collect()
    };

    match &feature.geometry {
        Geometry::Point(p) => {
            let centre = viewport.to_pixel(p[0], p[1]);
            Coverage {
                fill: square_marker(centre, layer.marker_size * scale, w, h),
                stroke: Vec::new(),
            }
        }
        Geometry::LineString(coords) => {
            let line = stroke_polyline(&project(coords), layer.stroke_width * scale, w, h);
            if layer.stroke.is_some() {
                Coverage { fill: Vec::new(), stroke: line }
            } else {
                Coverage { fill: line, stroke: Vec::new() }
            }
        }
        Geometry::Polygon(coords) => {
            let ring = project(coords);
            let fill = fill_polygon(&ring, w, h);
            let stroke = if layer.stroke.is_some() && layer.stroke_width > 0.0 {
                let mut closed = ring;
                if let Some(&first) = closed.first() {
                    closed.push(first);
                }
                stroke_polyline(&closed, layer.stroke_width * scale, w, h)
            } else {
                Vec::new()
            };
            Coverage { fill, stroke }
        }
    }
}

/// Renders every layer of `style` in order over its background.
pub fn render_canvas(style: &StyleDocument, viewport: &Viewport, scale: f64) -> Canvas {
    let mut canvas = Canvas::new(viewport.width, viewport.height, style.background);

    for layer in &style.layers {
        for feature in &layer.features {
            let coverage = feature_coverage(feature, layer, viewport, scale);
            canvas.blend_pixels(&coverage.fill, layer.fill);
            if let Some(stroke) = layer.stroke {
                canvas.blend_pixels(&coverage.stroke, stroke);
            }
        }
    }

    canvas
}
