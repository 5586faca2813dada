//! Byte-order-independent fixed-width integer packing.
//!
//! Every on-disk field in a SATIRE index is stored least-significant-byte
//! first, in a fixed number of bytes, regardless of host endianness. This is
//! the only encoding primitive used by the indexer and the querier, so that
//! both sides agree on the wire format without caring what machine built it.

use byteorder::{ByteOrder, LittleEndian};

/// Write `value mod 256^N` into `buf`, index 0 holding the least
/// significant byte.
///
/// # Panics
/// Panics if `N` is 0 or greater than 8 (the width of a `u64`).
pub fn store(value: u64, buf: &mut [u8]) {
    let n = buf.len();
    assert!((1..=8).contains(&n), "store: width must be in 1..=8, got {n}");
    // `write_uint` panics if `value` doesn't fit in `n` bytes; the spec's
    // contract is silent truncation (`value mod 256^n`), so mask first.
    let truncated = if n == 8 { value } else { value & ((1u64 << (8 * n)) - 1) };
    LittleEndian::write_uint(buf, truncated, n);
}

/// Inverse of [`store`]: reassemble a little-endian-packed integer.
///
/// # Panics
/// Panics if `buf` is empty or longer than 8 bytes.
pub fn load(buf: &[u8]) -> u64 {
    let n = buf.len();
    assert!((1..=8).contains(&n), "load: width must be in 1..=8, got {n}");
    LittleEndian::read_uint(buf, n)
}
