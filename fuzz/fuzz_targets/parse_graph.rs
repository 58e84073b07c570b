#![no_main]

use dagsched_core::{NoopMetrics, analyze, parse_graph};
use libfuzzer_sys::fuzz_target;

// Arbitrary documents must either be rejected or analyze without panicking.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(input) = parse_graph(text) else {
        return;
    };
    if let Ok(report) = analyze(&input, &mut NoopMetrics) {
        let _ = serde_json::to_string(&report);
    }
});
