//! Score-At-A-Time query evaluation (spec.md §4.5): per-term control blocks
//! with descending-score cursors, the main selection loop, and the two
//! early-termination mechanisms (ETM-1 low-score cutoff, ETM-2
//! postings-count cutoff).

use log::warn;
use satire_format::layout::{RunHeader, BYTES_FOR_DOCID, BYTES_IN_RUN_HEADER};
use satire_format::{codec, Counters, SatireError, SatireResult};

use crate::accumulators::Accumulators;
use crate::fake_heap::FakeHeap;
use crate::vocab::Vocab;

/// Per-term cursor into the `.if` file: the next run to process, and how
/// many postings remain for this term including the current run.
struct TermControlBlock {
    if_offset: usize,
    postings_remaining: u64,
    current_run_len: u32,
    highest_unprocessed_score: u32,
}

impl TermControlBlock {
    fn exhausted(&self) -> bool {
        self.postings_remaining == 0
    }
}

fn read_run_header(if_bytes: &[u8], offset: usize) -> SatireResult<RunHeader> {
    if offset + BYTES_IN_RUN_HEADER > if_bytes.len() {
        return Err(SatireError::IndexCorrupt(format!(
            "run header at offset {offset} runs past end of .if ({} bytes)",
            if_bytes.len()
        )));
    }
    let mut buf = [0u8; BYTES_IN_RUN_HEADER];
    buf.copy_from_slice(&if_bytes[offset..offset + BYTES_IN_RUN_HEADER]);
    Ok(RunHeader::unpack(&buf))
}

fn read_docid(if_bytes: &[u8], offset: usize, num_docs: u32) -> SatireResult<u32> {
    if offset + BYTES_FOR_DOCID > if_bytes.len() {
        return Err(SatireError::IndexCorrupt(format!(
            "docid at offset {offset} runs past end of .if ({} bytes)",
            if_bytes.len()
        )));
    }
    let docid = codec::load(&if_bytes[offset..offset + BYTES_FOR_DOCID]) as u32;
    if docid >= num_docs {
        return Err(SatireError::IndexCorrupt(format!(
            "docid {docid} at offset {offset} is out of range for numDocs ({num_docs})"
        )));
    }
    Ok(docid)
}

fn setup_control_block(vocab: &Vocab, if_bytes: &[u8], termid: u32) -> SatireResult<TermControlBlock> {
    match vocab.lookup(termid) {
        None => {
            warn!("query term {termid} not found in vocabulary; treated as exhausted");
            Ok(TermControlBlock {
                if_offset: 0,
                postings_remaining: 0,
                current_run_len: 0,
                highest_unprocessed_score: 0,
            })
        }
        Some(entry) => {
            if entry.postings_count == 0 {
                return Err(SatireError::IndexCorrupt(format!(
                    "vocab entry for termid {termid} has postings_count == 0"
                )));
            }
            let header = read_run_header(if_bytes, entry.index_offset as usize)?;
            Ok(TermControlBlock {
                if_offset: entry.index_offset as usize + BYTES_IN_RUN_HEADER,
                postings_remaining: entry.postings_count as u64,
                current_run_len: header.run_len,
                highest_unprocessed_score: header.qscore,
            })
        }
    }
}

/// Select the active term with the highest `highest_unprocessed_score`,
/// breaking ties by lowest term index. Returns `None` if every term is
/// exhausted.
fn select_term(tcbs: &[TermControlBlock]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, tcb) in tcbs.iter().enumerate() {
        if tcb.exhausted() {
            continue;
        }
        match best {
            None => best = Some(i),
            Some(b) if tcb.highest_unprocessed_score > tcbs[b].highest_unprocessed_score => best = Some(i),
            _ => {}
        }
    }
    best
}

/// One ranked result: `(docid, rank)`, rank starting at 1.
pub struct QueryResult {
    pub docid: u32,
    pub rank: usize,
}

/// Evaluate one query's termids against the index, returning ranked
/// results. `heap` and `accumulators` are reused across queries by the
/// caller; `accumulators.begin_query` must already have been called for
/// this query before this function runs.
pub fn process_query(
    termids: &[u32],
    vocab: &Vocab,
    if_bytes: &[u8],
    accumulators: &mut Accumulators,
    heap: &mut FakeHeap,
    low_score_cutoff: u32,
    postings_count_cutoff: u64,
    counters: &mut Counters,
) -> SatireResult<Vec<QueryResult>> {
    heap.clear();
    let num_docs = accumulators.num_docs() as u32;

    let mut tcbs = Vec::with_capacity(termids.len());
    for &termid in termids {
        tcbs.push(setup_control_block(vocab, if_bytes, termid)?);
    }

    loop {
        let Some(selected) = select_term(&tcbs) else { break };
        let max_score = tcbs[selected].highest_unprocessed_score;

        if max_score < low_score_cutoff {
            break;
        }

        let run_len = tcbs[selected].current_run_len;
        let mut cursor = tcbs[selected].if_offset;
        for _ in 0..run_len {
            let docid = read_docid(if_bytes, cursor, num_docs)?;
            cursor += BYTES_FOR_DOCID;

            let new_score = accumulators.add(docid, max_score as i32, counters);
            heap.insert(docid, new_score as i64, accumulators.as_slice(), counters);
        }

        counters.postings_processed += run_len as u64;
        tcbs[selected].if_offset = cursor;
        tcbs[selected].postings_remaining -= run_len as u64;

        if postings_count_cutoff > 0 && counters.postings_processed > postings_count_cutoff {
            break;
        }

        if tcbs[selected].postings_remaining > 0 {
            let header = read_run_header(if_bytes, tcbs[selected].if_offset)?;
            tcbs[selected].current_run_len = header.run_len;
            tcbs[selected].highest_unprocessed_score = header.qscore;
            tcbs[selected].if_offset += BYTES_IN_RUN_HEADER;
        }
    }

    Ok(heap.ranked().map(|(rank, docid)| QueryResult { docid, rank }).collect())
}
