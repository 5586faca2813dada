//! Vocabulary lookup (spec.md §4.4): binary search over the memory-mapped
//! `.vocab` file's 15-byte records by ascending TERMID.

use satire_format::layout::{VocabEntry, BYTES_IN_VOCAB_ENTRY};
use satire_format::{SatireError, SatireResult};

/// A read-only view over the `.vocab` bytes. Holds no allocation of its own;
/// the caller (the mmap owner) must outlive every borrow.
pub struct Vocab<'a> {
    bytes: &'a [u8],
}

impl<'a> Vocab<'a> {
    /// Wrap the raw `.vocab` bytes. Fails with `IndexCorrupt` if the length
    /// is not a whole number of 15-byte records.
    pub fn new(bytes: &'a [u8]) -> SatireResult<Self> {
        if bytes.len() % BYTES_IN_VOCAB_ENTRY != 0 {
            return Err(SatireError::IndexCorrupt(format!(
                ".vocab length {} is not a multiple of the {}-byte record size",
                bytes.len(),
                BYTES_IN_VOCAB_ENTRY
            )));
        }
        Ok(Self { bytes })
    }

    pub fn num_entries(&self) -> usize {
        self.bytes.len() / BYTES_IN_VOCAB_ENTRY
    }

    fn entry_at(&self, idx: usize) -> VocabEntry {
        let start = idx * BYTES_IN_VOCAB_ENTRY;
        let mut buf = [0u8; BYTES_IN_VOCAB_ENTRY];
        buf.copy_from_slice(&self.bytes[start..start + BYTES_IN_VOCAB_ENTRY]);
        VocabEntry::unpack(&buf)
    }

    /// Binary search for `termid`. `None` is a soft not-found condition, not
    /// an error: the caller marks the query term exhausted.
    pub fn lookup(&self, termid: u32) -> Option<VocabEntry> {
        let n = self.num_entries();
        let (mut lo, mut hi) = (0usize, n);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let entry = self.entry_at(mid);
            match entry.termid.cmp(&termid) {
                std::cmp::Ordering::Equal => return Some(entry),
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_vocab(entries: &[VocabEntry]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(entries.len() * BYTES_IN_VOCAB_ENTRY);
        for e in entries {
            let mut buf = [0u8; BYTES_IN_VOCAB_ENTRY];
            e.pack(&mut buf);
            bytes.extend_from_slice(&buf);
        }
        bytes
    }

    #[test]
    fn finds_present_term_and_misses_absent_term() {
        let entries = [
            VocabEntry { termid: 1, postings_count: 2, index_offset: 0 },
            VocabEntry { termid: 5, postings_count: 3, index_offset: 10 },
            VocabEntry { termid: 9, postings_count: 1, index_offset: 30 },
        ];
        let bytes = build_vocab(&entries);
        let vocab = Vocab::new(&bytes).unwrap();
        assert_eq!(vocab.lookup(5), Some(entries[1]));
        assert_eq!(vocab.lookup(1), Some(entries[0]));
        assert_eq!(vocab.lookup(9), Some(entries[2]));
        assert_eq!(vocab.lookup(3), None);
        assert_eq!(vocab.lookup(100), None);
    }

    #[test]
    fn rejects_truncated_vocab() {
        let bytes = vec![0u8; BYTES_IN_VOCAB_ENTRY - 1];
        assert!(Vocab::new(&bytes).is_err());
    }
}
