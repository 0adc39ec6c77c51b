//! Style document model for the sketch engine.

use std::collections::BTreeMap;
use std::path::Path;

use mapvis_spec::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::EngineError;

/// A complete style: background colour plus layers drawn in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleDocument {
    #[serde(default = "Color::transparent")]
    pub background: Color,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

/// A named group of features sharing one symbolizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layer {
    pub name: String,
    #[serde(default = "Color::black")]
    pub fill: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
    #[serde(default)]
    pub features: Vec<Feature>,
}

fn default_stroke_width() -> f64 {
    1.0
}

fn default_marker_size() -> f64 {
    4.0
}

/// A single feature with an integer id used by the grid renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Feature {
    pub id: i64,
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// Feature geometry in map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "snake_case")]
pub enum Geometry {
    Point([f64; 2]),
    LineString(Vec<[f64; 2]>),
    /// A single closed ring; the closing vertex is implied.
    Polygon(Vec<[f64; 2]>),
}

impl Geometry {
    pub fn coordinates(&self) -> &[[f64; 2]] {
        match self {
            Geometry::Point(p) => std::slice::from_ref(p),
            Geometry::LineString(points) | Geometry::Polygon(points) => points,
        }
    }

    fn min_points(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::LineString(_) => 2,
            Geometry::Polygon(_) => 3,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "point",
            Geometry::LineString(_) => "line_string",
            Geometry::Polygon(_) => "polygon",
        }
    }
}

impl StyleDocument {
    /// Parses and validates a style document.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let doc: StyleDocument = serde_json::from_str(json).map_err(|source| EngineError::Parse {
            path: "<memory>".into(),
            source,
        })?;
        doc.validate()?;
        Ok(doc)
    }

    /// Reads, parses and validates a style document from disk.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let doc: StyleDocument = serde_json::from_str(&json).map_err(|source| EngineError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        doc.validate()?;
        Ok(doc)
    }

    /// Writes the document as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| EngineError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| EngineError::io(path, e))
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for layer in &self.layers {
            if layer.name.is_empty() {
                return Err(EngineError::InvalidStyle("layer name is empty".into()));
            }
            for (field, value) in [("stroke_width", layer.stroke_width), ("marker_size", layer.marker_size)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(EngineError::InvalidStyle(format!(
                        "layer '{}': {} must be a non-negative number",
                        layer.name, field
                    )));
                }
            }
            for feature in &layer.features {
                let geometry = &feature.geometry;
                let coords = geometry.coordinates();
                if coords.len() < geometry.min_points() {
                    return Err(EngineError::InvalidStyle(format!(
                        "layer '{}' feature {}: {} needs at least {} points",
                        layer.name,
                        feature.id,
                        geometry.type_name(),
                        geometry.min_points()
                    )));
                }
                if coords.iter().flatten().any(|v| !v.is_finite()) {
                    return Err(EngineError::InvalidStyle(format!(
                        "layer '{}' feature {}: non-finite coordinate",
                        layer.name, feature.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Union of all feature coordinates, or `None` when there are none.
    pub fn extent(&self) -> Option<BoundingBox> {
        let mut coords = self
            .layers
            .iter()
            .flat_map(|layer| &layer.features)
            .flat_map(|feature| feature.geometry.coordinates());

        let first = coords.next()?;
        let init = BoundingBox::new(first[0], first[1], first[0], first[1]);
        Some(coords.fold(init, |b, [x, y]| {
            BoundingBox::new(b.minx.min(*x), b.miny.min(*y), b.maxx.max(*x), b.maxy.max(*y))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r##"{
        "background": "#ffffff",
        "layers": [{
            "name": "roads",
            "fill": "#3366cc",
            "stroke": "#000000",
            "features": [
                { "id": 1, "geometry": { "type": "point", "coordinates": [0, 0] } },
                { "id": 2, "geometry": { "type": "line_string", "coordinates": [[0, 0], [4, 2]] } },
                { "id": 3, "geometry": { "type": "polygon", "coordinates": [[-1, -1], [1, -1], [1, 3]] },
                  "properties": { "name": "park" } }
            ]
        }]
    }"##;

    #[test]
    fn test_parse_sample() {
        let doc = StyleDocument::from_json(SAMPLE).unwrap();
        assert_eq!(doc.background, Color::white());
        assert_eq!(doc.layers.len(), 1);

        let layer = &doc.layers[0];
        assert_eq!(layer.stroke_width, 1.0);
        assert_eq!(layer.marker_size, 4.0);
        assert_eq!(layer.features[2].properties["name"], "park");
        assert_eq!(layer.features[0].geometry, Geometry::Point([0.0, 0.0]));
    }

    #[test]
    fn test_extent() {
        let doc = StyleDocument::from_json(SAMPLE).unwrap();
        assert_eq!(doc.extent(), Some(BoundingBox::new(-1.0, -1.0, 4.0, 3.0)));
    }

    #[test]
    fn test_empty_document() {
        let doc = StyleDocument::from_json("{}").unwrap();
        assert_eq!(doc.background, Color::transparent());
        assert_eq!(doc.extent(), None);
    }

    #[test]
    fn test_rejects_short_line() {
        let json = r#"{"layers":[{"name":"l","features":[
            {"id":1,"geometry":{"type":"line_string","coordinates":[[0,0]]}}]}]}"#;
        assert!(matches!(
            StyleDocument::from_json(json),
            Err(EngineError::InvalidStyle(_))
        ));
    }

    #[test]
    fn test_rejects_negative_width() {
        let json = r#"{"layers":[{"name":"l","stroke_width":-1}]}"#;
        assert!(matches!(
            StyleDocument::from_json(json),
            Err(EngineError::InvalidStyle(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_field() {
        assert!(matches!(
            StyleDocument::from_json(r#"{"layerz":[]}"#),
            Err(EngineError::Parse { .. })
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let doc = StyleDocument::from_json(SAMPLE).unwrap();

        doc.save(&path).unwrap();
        assert_eq!(StyleDocument::load(&path).unwrap(), doc);
    }

    #[test]
    fn test_load_missing_file() {
        let err = StyleDocument::load(Path::new("/nonexistent/style.json")).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }
}
