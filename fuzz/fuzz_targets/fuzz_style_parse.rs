#![no_main]

use libfuzzer_sys::fuzz_target;
use mapvis_engine::{Map, SketchMap, StyleDocument};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(style) = StyleDocument::from_json(text) else {
        return;
    };

    let mut map = SketchMap::with_style(32, 16, style);
    map.zoom_all();
    let _ = map.render_grid(0, 4);
});
