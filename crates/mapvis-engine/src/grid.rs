//! UTF grid encoding of feature ids.
//!
//! A grid has one row string per `resolution` pixels of height and one
//! character per `resolution` pixels of width. Each character indexes into
//! `keys`; the empty key `""` marks cells with no feature.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::render::feature_coverage;
use crate::style::StyleDocument;
use crate::viewport::Viewport;

/// Pixels per grid cell used by the test driver.
pub const DEFAULT_GRID_RESOLUTION: u32 = 4;

/// An encoded UTF grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtfGrid {
    pub grid: Vec<String>,
    pub keys: Vec<String>,
    pub data: BTreeMap<String, serde_json::Value>,
}

/// Encodes a key index as a grid character.
///
/// Code points start at 32 and skip `"` (34) and `\` (92) so rows stay valid
/// JSON strings without escaping. Returns `None` once the index runs into the
/// surrogate range.
pub fn encode_key(index: usize) -> Option<char> {
    let mut code = u32::try_from(index).ok()?.checked_add(32)?;
    if code >= 34 {
        code += 1;
    }
    if code >= 92 {
        code += 1;
    }
    char::from_u32(code)
}

/// Renders the features of one layer into a UTF grid.
///
/// Later features win where coverage overlaps, matching paint order.
pub fn encode_grid(
    style: &StyleDocument,
    viewport: &Viewport,
    layer_index: usize,
    resolution: u32,
) -> Result<UtfGrid, EngineError> {
    if resolution == 0 {
        return Err(EngineError::InvalidResolution);
    }
    let layer = style.layers.get(layer_index).ok_or(EngineError::LayerOutOfRange {
        index: layer_index,
        count: style.layers.len(),
    })?;

    let (width, height) = (viewport.width, viewport.height);
    let mut owner: Vec<Option<usize>> = vec![None; width as usize * height as usize];
    for (i, feature) in layer.features.iter().enumerate() {
        for (x, y) in feature_coverage(feature, layer, viewport, 1.0).union() {
            owner[y as usize * width as usize + x as usize] = Some(i);
        }
    }

    let cols = width.div_ceil(resolution);
    let rows = height.div_ceil(resolution);
    let mut keys: Vec<String> = Vec::new();
    let mut data = BTreeMap::new();
    let mut grid = Vec::with_capacity(rows as usize);

    for cy in 0..rows {
        let mut row = String::with_capacity(cols as usize);
        for cx in 0..cols {
            let (x, y) = (cx * resolution, cy * resolution);
            let key = match owner[y as usize * width as usize + x as usize] {
                Some(i) => {
                    let feature = &layer.features[i];
                    let key = feature.id.to_string();
                    data.entry(key.clone()).or_insert_with(|| {
                        serde_json::Value::Object(feature.properties.clone().into_iter().collect())
                    });
                    key
                }
                None => String::new(),
            };
            let index = match keys.iter().position(|k| *k == key) {
                Some(index) => index,
                None => {
                    keys.push(key);
                    keys.len() - 1
                }
            };
            row.push(encode_key(index).ok_or_else(|| EngineError::TooManyGridKeys(keys.len()))?);
        }
        grid.push(row);
    }

    Ok(UtfGrid { grid, keys, data })
}
