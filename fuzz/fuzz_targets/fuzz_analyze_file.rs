#![no_main]
use libfuzzer_sys::fuzz_target;
use loc_diff::{AnalysisOptions, DiffAnalyzer, FilterRegistry, VersionInput};

/// Fuzz whole-file analysis.
///
/// The input is split at its first `0xFF` byte into a before and an after
/// version, so decoding, filter selection, alignment and accounting all see
/// arbitrary bytes. Counts must always close.
fuzz_target!(|data: &[u8]| {
    let (before, after) = match data.iter().position(|&b| b == 0xFF) {
        Some(split) => (&data[..split], &data[split + 1..]),
        None => (data, &[][..]),
    };

    let Ok(registry) = FilterRegistry::builtin() else {
        return;
    };
    let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
    let versions = [
        VersionInput::new("before", before),
        VersionInput::new("after", after),
    ];
    if let Ok(Some(result)) = analyzer.analyze_file("fuzz.c", &versions) {
        let counts = result.counts();
        assert_eq!(counts.total(), counts.base + counts.modified + counts.added);
    }
});
