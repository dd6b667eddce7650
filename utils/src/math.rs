//! Integer helpers for row and chunk bookkeeping.

/// Returns `ceil(n / d)`. Panics if `d = 0`.
pub fn ceil_div(n: usize, d: usize) -> usize {
    assert!(d != 0);
    n / d + usize::from(n % d != 0)
}

/// Returns ceil(log2(d)) but panics if d = 0.
pub fn ceil_log2(d: usize) -> usize {
    assert!(d != 0);
    (usize::BITS - (d - 1).leading_zeros()) as usize
}
