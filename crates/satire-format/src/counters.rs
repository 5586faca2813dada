//! Query-processing counters (spec.md §4.5), recast from the original's
//! `static u_ll per_query_counter[NUM_COUNTERS]` into a named-field struct.
//! The counter *stream* line format is a public interface and is kept
//! byte-for-byte stable.

/// The ten counters tracked per query and summed globally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub postings_processed: u64,
    pub already_in_heap_comparisons: u64,
    pub other_heap_comparisons: u64,
    pub heap_items_moved: u64,
    pub insert_into_empty_heap: u64,
    pub insert_into_full_heap: u64,
    pub insert_into_partial_heap: u64,
    pub acc_blocks_used: u64,
    pub acc_blocks: u64,
    pub accumulators_used: u64,
}

const NUM_COUNTERS: usize = 10;

impl Counters {
    fn as_array(&self) -> [u64; NUM_COUNTERS] {
        [
            self.postings_processed,
            self.already_in_heap_comparisons,
            self.other_heap_comparisons,
            self.heap_items_moved,
            self.insert_into_empty_heap,
            self.insert_into_full_heap,
            self.insert_into_partial_heap,
            self.acc_blocks_used,
            self.acc_blocks,
            self.accumulators_used,
        ]
    }

    /// Add another counter set's values into self (global accumulation).
    pub fn add(&mut self, other: &Counters) {
        self.postings_processed += other.postings_processed;
        self.already_in_heap_comparisons += other.already_in_heap_comparisons;
        self.other_heap_comparisons += other.other_heap_comparisons;
        self.heap_items_moved += other.heap_items_moved;
        self.insert_into_empty_heap += other.insert_into_empty_heap;
        self.insert_into_full_heap += other.insert_into_full_heap;
        self.insert_into_partial_heap += other.insert_into_partial_heap;
        self.acc_blocks_used += other.acc_blocks_used;
        self.acc_blocks += other.acc_blocks;
        self.accumulators_used += other.accumulators_used;
    }

    fn format_line(&self, prefix: &str) -> String {
        let mut line = String::with_capacity(16 + NUM_COUNTERS * 12);
        line.push_str(prefix);
        for v in self.as_array() {
            line.push_str(&format!(" {v:>10}"));
        }
        line
    }

    /// `COUNTERS-PQ###<10 integers>` for a single query.
    pub fn format_per_query(&self, query_number: u64) -> String {
        self.format_line(&format!("COUNTERS-PQ{query_number:03}"))
    }

    /// `COUNTERS-GB<10 integers>` emitted once at shutdown.
    pub fn format_global(&self) -> String {
        self.format_line("COUNTERS-GB")
    }
}
