#![no_main]
use libfuzzer_sys::fuzz_target;
use loc_diff::AnalysisOptions;

/// Fuzz option string parsing.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = AnalysisOptions::parse(s);
    }
});
