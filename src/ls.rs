//! Implements a simple exhaustive search algorithm for comparison with
//! the multi-index.

use crate::distance;
use crate::popcnt::PopcountBackend;

/// Finds the vectors in `items` whose normalized Hamming distances to
/// `query` are within `range`. Returns `(key, distance)` pairs sorted
/// by ascending distance (ties by ascending key).
pub fn range_scan<I: AsRef<[u8]>>(
    keys: &[u32],
    items: &[I],
    query: &[u8],
    range: f32,
) -> Vec<(u32, f32)> {
    let mut answers = Vec::new();
    range_scan_with_buf(keys, items, query, range, &mut answers);
    answers
}

/// Finds the vectors in `items` whose normalized Hamming distances to
/// `query` are within `range`. The `(key, distance)` pairs are stored
/// in `answers`.
pub fn range_scan_with_buf<I: AsRef<[u8]>>(
    keys: &[u32],
    items: &[I],
    query: &[u8],
    range: f32,
    answers: &mut Vec<(u32, f32)>,
) {
    debug_assert_eq!(keys.len(), items.len());

    answers.clear();
    for (&key, item) in keys.iter().zip(items) {
        let bits = distance::hamming_bits(query, item.as_ref(), PopcountBackend::Native);
        let dist = distance::normalized(bits, query.len());
        if dist <= range {
            answers.push((key, dist));
        }
    }
    answers.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
}
