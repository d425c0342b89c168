//! Tests for the ring.


use crate::Ring;

/// Hashes a decimal string to its integer value, so point positions can be
/// worked out by hand. Panics on anything that is not a `u32` literal.
pub(super) fn decimal_hash(data: &[u8]) -> u32 {
    let s = std::str::from_utf8(data).expect("utf-8 key");
    s.parse().expect("decimal key")
}

/// Replicas 3, nodes "6", "4", "2" at weight 1.
///
/// Points: 2, 4, 6, 12, 14, 16, 22, 24, 26.
pub(super) fn hand_ring() -> Ring {
    let mut ring = Ring::with_hasher(3, decimal_hash);
    ring.build([("6", 1u32), ("4", 1), ("2", 1)]);
    ring
}

/// `n` distinct lookup keys.
pub(super) fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("key-{i}")).collect()
}

/// A ring of `count` equally weighted nodes named `node-0`, `node-1`, ...
pub(super) fn equal_ring(replicas: u32, count: usize) -> Ring {
    let mut ring = Ring::new(replicas);
    ring.build((0..count).map(|i| (format!("node-{i}"), 1u32)));
    ring
}
