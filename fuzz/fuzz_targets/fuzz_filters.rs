#![no_main]
use libfuzzer_sys::fuzz_target;
use loc_diff::filter::{FilterOptions, FilterRegistry};
use loc_diff::Version;

/// Fuzz comment recognition in every built-in language filter.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(registry) = FilterRegistry::builtin() else {
        return;
    };
    let options = FilterOptions::default();
    for filter in registry.iter() {
        let _ = Version::tokenize("fuzz", text, filter, &options);
    }
});
