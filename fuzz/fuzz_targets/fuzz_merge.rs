#![no_main]
use libfuzzer_sys::fuzz_target;
use loc_diff::diff::merge;

/// Fuzz the three-way merger.
///
/// Bytes are read as three sequences separated by `0xFF`. Every item of each
/// input must appear in the merge exactly once, in order.
fuzz_target!(|data: &[u8]| {
    let mut parts = data.split(|&b| b == 0xFF);
    let base = parts.next().unwrap_or_default();
    let a = parts.next().unwrap_or_default();
    let b = parts.next().unwrap_or_default();

    let merged = merge(base, a, b, |l, r| l == r);

    let a_positions: Vec<usize> = merged.iter().filter_map(|item| item.a_pos).collect();
    let b_positions: Vec<usize> = merged.iter().filter_map(|item| item.b_pos).collect();
    assert_eq!(a_positions, (0..a.len()).collect::<Vec<_>>());
    assert_eq!(b_positions, (0..b.len()).collect::<Vec<_>>());
});
