#![no_main]

use libfuzzer_sys::fuzz_target;
use mapvis_spec::{expand_jobs, Catalog};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(catalog) = Catalog::from_json(text) {
        for fixture in catalog.fixture_configs().iter().take(8) {
            let _ = expand_jobs(fixture);
        }
    }
});
