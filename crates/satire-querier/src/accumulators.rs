//! Score accumulators (spec.md §4.5, §4.7): one running score per document,
//! lazily zeroed in 1024-entry blocks so that resetting between queries
//! costs time proportional to how much of the array the *previous* query
//! actually touched, not `numDocs`.
//!
//! Dirty-bit lifecycle: `dirty[b] == true` means block `b` holds stale
//! nonzero data and must be zeroed before its first use. A block is zeroed
//! (and its bit cleared) lazily, on the first write that touches it within
//! a query — not in an eager up-front pass. At the end of a query, every
//! block that query wrote to has its bit set again, so the *next* query's
//! first touch will re-zero it. Blocks nobody writes to stay clear and,
//! per the invariant, stay all-zero forever.

use satire_format::{Counters, ACC_BLOCK_SIZE};

pub struct Accumulators {
    values: Vec<i32>,
    dirty: Vec<bool>,
    touched_this_query: Vec<usize>,
    num_docs: usize,
}

impl Accumulators {
    pub fn new(num_docs: usize) -> Self {
        let num_blocks = num_docs / ACC_BLOCK_SIZE + 1;
        Self {
            values: vec![0i32; num_blocks * ACC_BLOCK_SIZE],
            dirty: vec![true; num_blocks],
            touched_this_query: Vec::new(),
            num_docs,
        }
    }

    fn block_of(&self, docid: usize) -> usize {
        docid / ACC_BLOCK_SIZE
    }

    pub fn num_blocks(&self) -> usize {
        self.dirty.len()
    }

    /// Zero a docid's block on first touch this query, then add `delta` to
    /// its accumulator. Returns the accumulator's new value.
    pub fn add(&mut self, docid: u32, delta: i32, counters: &mut Counters) -> i32 {
        let docid = docid as usize;
        let block = self.block_of(docid);
        if self.dirty[block] {
            let start = block * ACC_BLOCK_SIZE;
            let end = (start + ACC_BLOCK_SIZE).min(self.values.len());
            self.values[start..end].fill(0);
            self.dirty[block] = false;
            self.touched_this_query.push(block);
            counters.acc_blocks_used += 1;
        }
        if self.values[docid] == 0 {
            counters.accumulators_used += 1;
        }
        self.values[docid] += delta;
        self.values[docid]
    }

    pub fn get(&self, docid: u32) -> i32 {
        self.values[docid as usize]
    }

    /// Raw backing array, for the fake heap's score comparisons.
    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    /// Called once per query, before any `add()` for that query. Re-dirties
    /// every block the *previous* query wrote to, and reports the total
    /// block count ("blocks defined") for the counter stream.
    pub fn begin_query(&mut self, counters: &mut Counters) {
        for &b in &self.touched_this_query {
            self.dirty[b] = true;
        }
        self.touched_this_query.clear();
        counters.acc_blocks = self.dirty.len() as u64;
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }
}
