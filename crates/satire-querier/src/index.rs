//! Owns the memory-mapped `.vocab`/`.if` files for the lifetime of the
//! querier process (spec.md §4.5 "Startup"), grounded in the teacher's
//! `index.rs` mmap-and-warm-pages pattern.

use std::fs::File;
use std::path::Path;

use memmap2::{Mmap, MmapOptions};
use satire_format::SatireResult;

use crate::vocab::Vocab;

/// Touch every page of `bytes` so the OS resident set is warm before the
/// first query. Matches the original's explicit page-touching loop rather
/// than relying on eventual lazy fault-in during query processing.
fn warm_pages(bytes: &[u8]) {
    const PAGE_SIZE: usize = 4096;
    let mut checksum: u8 = 0;
    let mut i = 0;
    while i < bytes.len() {
        checksum ^= bytes[i];
        i += PAGE_SIZE;
    }
    std::hint::black_box(checksum);
}

pub struct MappedIndex {
    vocab_mmap: Mmap,
    if_mmap: Mmap,
}

impl MappedIndex {
    pub fn open(index_stem: &str) -> SatireResult<Self> {
        let vocab_mmap = Self::mmap_file(format!("{index_stem}.vocab"))?;
        let if_mmap = Self::mmap_file(format!("{index_stem}.if"))?;
        warm_pages(&vocab_mmap);
        warm_pages(&if_mmap);
        Ok(Self { vocab_mmap, if_mmap })
    }

    fn mmap_file(path: impl AsRef<Path>) -> SatireResult<Mmap> {
        let file = File::open(path)?;
        // SAFETY: the index files are not mutated by another process while
        // the querier holds this mapping; they are published atomically and
        // never modified in place after a build completes.
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        Ok(mmap)
    }

    pub fn vocab(&self) -> SatireResult<Vocab<'_>> {
        Vocab::new(&self.vocab_mmap)
    }

    pub fn if_bytes(&self) -> &[u8] {
        &self.if_mmap
    }
}
