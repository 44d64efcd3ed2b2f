//! Power-of-two alignment checks and offset rounding.
//!
//! Every function here treats a zero or non-power-of-two alignment as a
//! caller bug and panics, rather than returning an error.

/// The strictest alignment any allocation can request, in bytes.
///
/// Matches `alignof(max_align_t)` on mainstream 64-bit targets. Chunk
/// storage is always allocated at this alignment, so offset 0 of every
/// chunk satisfies any valid request.
pub const MAX_ALIGN: usize = 16;

/// Returns `true` iff `n` is a non-zero power of two.
#[inline]
pub const fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Smallest multiple of `alignment` that is `>= value`.
///
/// # Panics
///
/// Panics if `alignment` is not a power of two, or if the result does not
/// fit in a `usize`.
#[inline]
pub fn round_up(alignment: usize, value: usize) -> usize {
    checked_round_up(alignment, value)
        .unwrap_or_else(|| panic!("round_up({alignment}, {value}) overflows usize"))
}

/// Like [`round_up`], but returns `None` when the result overflows.
///
/// # Panics
///
/// Panics if `alignment` is not a power of two.
#[inline]
pub fn checked_round_up(alignment: usize, value: usize) -> Option<usize> {
    assert!(
        is_power_of_two(alignment),
        "alignment must be a power of two (got {alignment})"
    );
    let mask = alignment - 1;
    value.checked_add(mask).map(|v| v & !mask)
}

/// Padding needed to bring `value` up to the next multiple of `alignment`.
///
/// # Panics
///
/// Panics if `alignment` is not a power of two.
#[inline]
pub fn padding_for(alignment: usize, value: usize) -> usize {
    assert!(
        is_power_of_two(alignment),
        "alignment must be a power of two (got {alignment})"
    );
    value.wrapping_neg() & (alignment - 1)
}
