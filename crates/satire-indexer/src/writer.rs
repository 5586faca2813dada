//! Buffered, byte-order-independent writer used for both `.vocab` and `.if`.
//!
//! The original indexer grew its own buffer (`buffered_write`/
//! `buffered_flush` over a raw `byte *vbuf`) to batch writes into 2 MiB
//! chunks. `std::io::BufWriter` already does exactly this; we just fix the
//! capacity to match and add the small-fixed-width helper the rest of the
//! indexer calls.

use std::io::{self, Write};

/// Matches the original's `TWOMEG` buffer size for `.vocab`/`.if` writes.
pub const WRITE_BUFFER_CAPACITY: usize = 2 * 1024 * 1024;

pub struct RecordWriter<W: Write> {
    inner: io::BufWriter<W>,
    bytes_written: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: io::BufWriter::with_capacity(WRITE_BUFFER_CAPACITY, inner),
            bytes_written: 0,
        }
    }

    /// Write `value` packed into `width` bytes, least-significant-byte-first.
    pub fn write_field(&mut self, value: u64, width: usize) -> io::Result<()> {
        let mut buf = [0u8; 8];
        satire_format::codec::store(value, &mut buf[..width]);
        self.inner.write_all(&buf[..width])?;
        self.bytes_written += width as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush the buffer and fsync the underlying file. Mandatory before the
    /// index is considered durably written.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}
