pub mod accumulators;
pub mod fake_heap;
pub mod index;
pub mod saat;
pub mod vocab;

use satire_format::{Counters, QuerierConfig, SatireResult};

use accumulators::Accumulators;
use fake_heap::FakeHeap;
use index::MappedIndex;
use saat::QueryResult;

/// Maximum termids accepted per query line; extras are discarded with a
/// warning rather than rejected.
pub const MAX_QTERMS: usize = satire_format::MAX_QTERMS;

/// Ties together the mapped index and the per-process mutable query state
/// (accumulators, fake heap, running counters) so `main` only has to drive
/// the query loop.
pub struct Engine {
    index: MappedIndex,
    accumulators: Accumulators,
    heap: FakeHeap,
    config: QuerierConfig,
    global_counters: Counters,
}

impl Engine {
    pub fn open(config: QuerierConfig) -> SatireResult<Self> {
        let index = MappedIndex::open(&config.index_stem)?;
        let accumulators = Accumulators::new(config.num_docs as usize);
        let heap = FakeHeap::new(config.k as usize);
        Ok(Self { index, accumulators, heap, config, global_counters: Counters::default() })
    }

    /// Run one query's termids, returning ranked results and that query's
    /// own counters (already folded into the running global total).
    pub fn run_query(&mut self, termids: &[u32]) -> SatireResult<(Vec<QueryResult>, Counters)> {
        let mut counters = Counters::default();
        self.accumulators.begin_query(&mut counters);
        let vocab = self.index.vocab()?;

        let results = saat::process_query(
            termids,
            &vocab,
            self.index.if_bytes(),
            &mut self.accumulators,
            &mut self.heap,
            self.config.low_score_cutoff,
            self.config.postings_count_cutoff,
            &mut counters,
        )?;

        self.global_counters.add(&counters);
        Ok((results, counters))
    }

    pub fn global_counters(&self) -> &Counters {
        &self.global_counters
    }
}
