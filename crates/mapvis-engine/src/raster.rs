//! Coverage rasterization for polygons, stroked polylines and square markers.
//!
//! Every primitive returns the sorted, de-duplicated list of pixels whose
//! centres it covers, clipped to the surface. Covering is binary; there is no
//! antialiasing.

/// A point in pixel space.
pub type PixelPoint = (f64, f64);

fn finish(mut pixels: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    pixels.sort_unstable_by_key(|&(x, y)| (y, x));
    pixels.dedup();
    pixels
}

/// Pixels inside a closed ring, using the even-odd rule.
pub fn fill_polygon(ring: &[PixelPoint], width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut pixels = Vec::new();
    if ring.len() < 3 {
        return pixels;
    }

    let mut crossings: Vec<f64> = Vec::new();
    for y in 0..height {
        let cy = y as f64 + 0.5;
        crossings.clear();
        for i in 0..ring.len() {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % ring.len()];
            if (y0 <= cy && y1 > cy) || (y1 <= cy && y0 > cy) {
                let t = (cy - y0) / (y1 - y0);
                crossings.push(x0 + t * (x1 - x0));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().max(0.0);
            let end = (span[1] - 0.5).ceil().min(width as f64);
            if start >= end {
                continue;
            }
            for x in start as u32..end as u32 {
                pixels.push((x, y));
            }
        }
    }
    finish(pixels)
}

/// Pixels within `width / 2` of any segment of a polyline.
///
/// Widths below one pixel are widened to one pixel so thin lines stay visible.
pub fn stroke_polyline(
    points: &[PixelPoint],
    line_width: f64,
    width: u32,
    height: u32,
) -> Vec<(u32, u32)> {
    let half = (line_width / 2.0).max(0.5);
    let mut pixels = Vec::new();

    let segments: Vec<(PixelPoint, PixelPoint)> = match points {
        [] => return pixels,
        [only] => vec![(*only, *only)],
        _ => points.windows(2).map(|w| (w[0], w[1])).collect(),
    };

    for (a, b) in segments {
        let min_x = (a.0.min(b.0) - half).floor().max(0.0);
        let max_x = (a.0.max(b.0) + half).ceil().min(width as f64);
        let min_y = (a.1.min(b.1) - half).floor().max(0.0);
        let max_y = (a.1.max(b.1) + half).ceil().min(height as f64);
        if min_x >= max_x || min_y >= max_y {
            continue;
        }

        for y in min_y as u32..max_y as u32 {
            for x in min_x as u32..max_x as u32 {
                let centre = (x as f64 + 0.5, y as f64 + 0.5);
                if distance_to_segment(centre, a, b) <= half {
                    pixels.push((x, y));
                }
            }
        }
    }
    finish(pixels)
}

/// Pixels of an axis-aligned square marker centred on a point.
pub fn square_marker(centre: PixelPoint, size: f64, width: u32, height: u32) -> Vec<(u32, u32)> {
    let half = (size / 2.0).max(0.5);
    let start_x = (centre.0 - half - 0.5).ceil().max(0.0);
    let end_x = (centre.0 + half - 0.5).ceil().min(width as f64);
    let start_y = (centre.1 - half - 0.5).ceil().max(0.0);
    let end_y = (centre.1 + half - 0.5).ceil().min(height as f64);

    let mut pixels = Vec::new();
    if start_x >= end_x || start_y >= end_y {
        return pixels;
    }
    for y in start_y as u32..end_y as u32 {
        for x in start_x as u32..end_x as u32 {
            pixels.push((x, y));
        }
    }
    pixels
}

fn distance_to_segment(p: PixelPoint, a: PixelPoint, b: PixelPoint) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (px, py) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - px).powi(2) + (p.1 - py).powi(2)).sqrt()
}
