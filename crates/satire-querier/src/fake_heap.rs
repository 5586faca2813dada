//! The "fake heap" (spec.md §4.6): an insertion-sorted top-k buffer, not a
//! classical binary heap. Its exact shift-and-insert semantics — including
//! the tie-break that places newly arriving ties above earlier ones — are
//! preserved byte-for-byte from `original_source/satire/src/q/q.c`'s
//! `insert_in_fake_heap`. This is a specification contract, not an
//! optimization target: a "correct" binary max-heap would rank equal
//! scores differently and silently change query output.

use satire_format::Counters;

/// Up to `k` `(docid, score)` pairs kept in descending score order.
pub struct FakeHeap {
    k: usize,
    docids: Vec<u32>,
}

impl FakeHeap {
    pub fn new(k: usize) -> Self {
        Self { k, docids: Vec::with_capacity(k) }
    }

    pub fn len(&self) -> usize {
        self.docids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docids.is_empty()
    }

    /// Reset to empty, ready for the next query. Does not reallocate.
    pub fn clear(&mut self) {
        self.docids.clear();
    }

    /// Iterate `(rank, docid)` pairs, rank starting at 1, in descending
    /// score order.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.docids.iter().enumerate().map(|(i, &d)| (i + 1, d))
    }

    /// Insert or update `docid`'s score. `accumulators` is consulted (not
    /// stored) to read the current score of items already in the heap,
    /// matching the original's direct indexing into the shared
    /// accumulator array rather than carrying scores inside the heap
    /// itself.
    pub fn insert(&mut self, docid: u32, score: i64, accumulators: &[i32], counters: &mut Counters) {
        if self.docids.len() == self.k {
            if let Some(&last) = self.docids.last() {
                if score <= accumulators[last as usize] as i64 {
                    return;
                }
            }
        }

        // Remove an existing entry for this docid, if present (score update
        // for a doc seen in an earlier run).
        let mut items = self.docids.len();
        if let Some(pos) = self.docids[..items].iter().position(|&d| d == docid) {
            counters.already_in_heap_comparisons += (pos + 1) as u64;
            self.docids.remove(pos);
            items -= 1;
        } else {
            counters.already_in_heap_comparisons += items as u64;
        }

        if items == 0 {
            counters.insert_into_empty_heap += 1;
            self.docids.push(docid);
            return;
        }

        if items == self.k {
            counters.insert_into_full_heap += 1;
            for i in 0..items {
                counters.other_heap_comparisons += 1;
                if score >= accumulators[self.docids[i] as usize] as i64 {
                    counters.heap_items_moved += (self.k - 1 - i) as u64;
                    self.docids.pop();
                    self.docids.insert(i, docid);
                    return;
                }
            }
            return;
        }

        counters.insert_into_partial_heap += 1;
        for i in 0..items {
            counters.other_heap_comparisons += 1;
            if score >= accumulators[self.docids[i] as usize] as i64 {
                counters.heap_items_moved += (items - i) as u64;
                self.docids.insert(i, docid);
                return;
            }
        }
        self.docids.push(docid);
    }
}
