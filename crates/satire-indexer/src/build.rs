//! The indexer's single streaming pass (spec.md §4.3), grounded in
//! `original_source/satire/src/i/i.c`.
//!
//! Input lines are `termid\tdocid\tscore\n`, sorted ascending by termid,
//! then descending by score, then ascending by docid. This pass never
//! re-reads or re-sorts the input; each line is consumed exactly once.

use std::io::BufRead;
use std::time::Instant;

use satire_format::layout::{
    quantize_score, BYTES_FOR_DOCID, BYTES_FOR_POSTINGS_COUNT, BYTES_FOR_QSCORE, BYTES_FOR_RUN_LEN,
    BYTES_FOR_TERMID,
};
use satire_format::{IndexerConfig, SatireError, SatireResult};

use crate::writer::RecordWriter;

/// Summary counters returned after a successful build; printed by the CLI
/// as the same "lines read / postings indexed / postings ignored / bytes
/// written" line the original indexer logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexerReport {
    pub lines_read: u64,
    pub distinct_terms: u64,
    pub total_postings_count: u64,
    pub postings_ignored_count: u64,
    pub if_bytes_written: u64,
    pub elapsed: std::time::Duration,
}

/// Per-term streaming state. Reset every time the input advances to a new
/// termid; this is the only state `build()` carries across lines besides
/// the run buffer.
struct TermState {
    cur_term: Option<u32>,
    cur_qscore: u32,
    runlen: usize,
    postings_count: u32,
    if_offset: u64,
    if_bytes_written: u64,
}

impl TermState {
    fn new() -> Self {
        Self { cur_term: None, cur_qscore: 0, runlen: 0, postings_count: 0, if_offset: 0, if_bytes_written: 0 }
    }
}

fn parse_line(line: &str, line_no: u64, num_docs: u32) -> SatireResult<(u32, u32, f64)> {
    let mut fields = line.splitn(3, '\t');
    let term_s = fields.next().unwrap_or("");
    let doc_s = fields.next().ok_or_else(|| SatireError::InvalidInput {
        line: line_no,
        message: "missing second tab (docid field)".into(),
    })?;
    let score_s = fields.next().ok_or_else(|| SatireError::InvalidInput {
        line: line_no,
        message: "missing third tab (score field)".into(),
    })?;

    let termid: u32 = term_s.trim().parse().map_err(|_| SatireError::InvalidInput {
        line: line_no,
        message: format!("missing or non-numeric termid: {term_s:?}"),
    })?;
    let docid: u32 = doc_s.trim().parse().map_err(|_| SatireError::InvalidInput {
        line: line_no,
        message: format!("missing or non-numeric docid: {doc_s:?}"),
    })?;
    let score: f64 = score_s.trim().parse().map_err(|_| SatireError::InvalidInput {
        line: line_no,
        message: format!("missing or non-numeric score: {score_s:?}"),
    })?;

    if docid >= num_docs {
        return Err(SatireError::InvalidInput {
            line: line_no,
            message: format!("docid {docid} is not in range 0..{num_docs}"),
        });
    }
    if !(0.0..=1.0).contains(&score) {
        return Err(SatireError::InvalidInput {
            line: line_no,
            message: format!("score {score} is not in range 0..1"),
        });
    }
    Ok((termid, docid, score))
}

/// Flush the pending run (if non-empty) to the `.if` writer. Returns the
/// number of bytes written.
fn flush_run<W: std::io::Write>(
    if_writer: &mut RecordWriter<W>,
    qscore: u32,
    run_buf: &[u32],
) -> SatireResult<u64> {
    if run_buf.is_empty() {
        return Ok(0);
    }
    if_writer.write_field(qscore as u64, BYTES_FOR_QSCORE)?;
    if_writer.write_field(run_buf.len() as u64, BYTES_FOR_RUN_LEN)?;
    for &docid in run_buf {
        if_writer.write_field(docid as u64, BYTES_FOR_DOCID)?;
    }
    Ok((BYTES_FOR_QSCORE + BYTES_FOR_RUN_LEN + run_buf.len() * BYTES_FOR_DOCID) as u64)
}

fn emit_vocab_entry<W: std::io::Write>(
    vocab_writer: &mut RecordWriter<W>,
    termid: u32,
    postings_count: u32,
    if_offset: u64,
) -> SatireResult<()> {
    // VocabEntry::pack/unpack defines the on-disk contract; writing field by
    // field here keeps a single buffered writer in play instead of an extra
    // intermediate byte array.
    vocab_writer.write_field(termid as u64, BYTES_FOR_TERMID)?;
    vocab_writer.write_field(postings_count as u64, BYTES_FOR_POSTINGS_COUNT)?;
    vocab_writer.write_field(if_offset, satire_format::layout::BYTES_FOR_INDEX_OFFSET)?;
    Ok(())
}

/// Run the single streaming pass described in spec.md §4.3, writing
/// directly into the supplied `.vocab` and `.if` sinks. The caller owns
/// atomicity (temp-file + rename); this function only guarantees that, on
/// `Ok`, every byte has been handed to the underlying writers (callers must
/// still call `RecordWriter::finish` to flush/close).
pub fn build<R: BufRead, WV: std::io::Write, WI: std::io::Write>(
    input: R,
    cfg: &IndexerConfig,
    vocab_out: WV,
    if_out: WI,
) -> SatireResult<(IndexerReport, WV, WI)> {
    let start = Instant::now();
    let mut vocab_writer = RecordWriter::new(vocab_out);
    let mut if_writer = RecordWriter::new(if_out);

    let mut state = TermState::new();
    let mut run_buf: Vec<u32> = Vec::with_capacity(1024);

    let mut report = IndexerReport::default();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx as u64 + 1;
        let line = line?;
        if line.is_empty() {
            continue;
        }
        report.lines_read += 1;

        let (termid, docid, score) = parse_line(&line, line_no, cfg.num_docs)?;
        let qscore = quantize_score(score);
        if qscore < cfg.low_score_cutoff {
            report.postings_ignored_count += 1;
            continue;
        }

        if Some(termid) != state.cur_term {
            report.distinct_terms += 1;
            if let Some(prev_term) = state.cur_term {
                let bytes = flush_run(&mut if_writer, state.cur_qscore, &run_buf)?;
                state.if_bytes_written += bytes;
                state.postings_count += run_buf.len() as u32;
                emit_vocab_entry(&mut vocab_writer, prev_term, state.postings_count, state.if_offset)?;
                report.total_postings_count += state.postings_count as u64;
            }
            run_buf.clear();
            state.cur_qscore = qscore;
            state.cur_term = Some(termid);
            state.postings_count = 0;
            state.if_offset += state.if_bytes_written;
            state.if_bytes_written = 0;
        } else if qscore != state.cur_qscore {
            let bytes = flush_run(&mut if_writer, state.cur_qscore, &run_buf)?;
            state.if_bytes_written += bytes;
            state.postings_count += run_buf.len() as u32;
            run_buf.clear();
            state.cur_qscore = qscore;
        }

        run_buf.push(docid);
    }

    if let Some(last_term) = state.cur_term {
        let bytes = flush_run(&mut if_writer, state.cur_qscore, &run_buf)?;
        state.if_bytes_written += bytes;
        state.postings_count += run_buf.len() as u32;
        emit_vocab_entry(&mut vocab_writer, last_term, state.postings_count, state.if_offset)?;
        report.total_postings_count += state.postings_count as u64;
        state.if_offset += state.if_bytes_written;
    }

    report.if_bytes_written = state.if_offset;
    report.elapsed = start.elapsed();

    let vocab_out = vocab_writer.finish()?;
    let if_out = if_writer.finish()?;
    Ok((report, vocab_out, if_out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use satire_format::layout::{RunHeader, VocabEntry, BYTES_IN_RUN_HEADER, BYTES_IN_VOCAB_ENTRY};
    use std::io::Cursor;

    fn cfg(num_docs: u32, low_score_cutoff: u32) -> IndexerConfig {
        IndexerConfig {
            input_file_name: "in.tsv".into(),
            output_stem: "stem".into(),
            num_docs,
            low_score_cutoff,
            max_quantised_value: 10_000,
        }
    }

    #[test]
    fn scenario_a_single_term_single_run() {
        let input = "5\t0\t0.5\n5\t1\t0.5\n5\t2\t0.5\n";
        let (report, vocab, ifdata) =
            build(Cursor::new(input), &cfg(3, 1), Vec::new(), Vec::new()).unwrap();
        assert_eq!(report.lines_read, 3);
        assert_eq!(report.distinct_terms, 1);
        assert_eq!(report.total_postings_count, 3);

        assert_eq!(vocab.len(), BYTES_IN_VOCAB_ENTRY);
        let mut buf = [0u8; BYTES_IN_VOCAB_ENTRY];
        buf.copy_from_slice(&vocab);
        let entry = VocabEntry::unpack(&buf);
        assert_eq!(entry, VocabEntry { termid: 5, postings_count: 3, index_offset: 0 });

        assert_eq!(ifdata.len(), BYTES_IN_RUN_HEADER + 3 * BYTES_FOR_DOCID);
        let header = RunHeader::unpack(&ifdata[0..BYTES_IN_RUN_HEADER].try_into().unwrap());
        assert_eq!(header, RunHeader { qscore: 5000, run_len: 3 });
    }

    #[test]
    fn scenario_b_single_term_two_runs() {
        let input = "7\t9\t0.9\n7\t2\t0.3\n7\t4\t0.3\n";
        let (report, _vocab, ifdata) =
            build(Cursor::new(input), &cfg(10, 1), Vec::new(), Vec::new()).unwrap();
        assert_eq!(report.total_postings_count, 3);
        // run 1: qscore 9000, runlen 1, docid 9
        let h1 = RunHeader::unpack(&ifdata[0..BYTES_IN_RUN_HEADER].try_into().unwrap());
        assert_eq!(h1, RunHeader { qscore: 9000, run_len: 1 });
        let off = BYTES_IN_RUN_HEADER + BYTES_FOR_DOCID;
        let h2 = RunHeader::unpack(&ifdata[off..off + BYTES_IN_RUN_HEADER].try_into().unwrap());
        assert_eq!(h2, RunHeader { qscore: 3000, run_len: 2 });
    }

    #[test]
    fn low_score_cutoff_drops_postings() {
        let input = "1\t0\t0.0001\n1\t1\t0.9\n";
        let (report, _vocab, _ifdata) =
            build(Cursor::new(input), &cfg(5, 100), Vec::new(), Vec::new()).unwrap();
        assert_eq!(report.postings_ignored_count, 1);
        assert_eq!(report.total_postings_count, 1);
    }

    #[test]
    fn rejects_docid_out_of_range() {
        let input = "1\t10\t0.5\n";
        let err = build(Cursor::new(input), &cfg(5, 1), Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, SatireError::InvalidInput { .. }));
    }

    #[test]
    fn rejects_score_out_of_range() {
        let input = "1\t0\t1.5\n";
        let err = build(Cursor::new(input), &cfg(5, 1), Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, SatireError::InvalidInput { .. }));
    }

    #[test]
    fn rejects_malformed_line() {
        let input = "not-a-number\t0\t0.5\n";
        let err = build(Cursor::new(input), &cfg(5, 1), Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, SatireError::InvalidInput { .. }));
    }

    #[test]
    fn multi_term_offsets_are_contiguous() {
        let input = "1\t0\t0.9\n2\t0\t0.5\n2\t1\t0.5\n";
        let (_report, vocab, ifdata) =
            build(Cursor::new(input), &cfg(5, 1), Vec::new(), Vec::new()).unwrap();
        assert_eq!(vocab.len(), 2 * BYTES_IN_VOCAB_ENTRY);
        let e1 = VocabEntry::unpack(&vocab[0..BYTES_IN_VOCAB_ENTRY].try_into().unwrap());
        let e2 = VocabEntry::unpack(
            &vocab[BYTES_IN_VOCAB_ENTRY..2 * BYTES_IN_VOCAB_ENTRY].try_into().unwrap(),
        );
        assert_eq!(e1.index_offset, 0);
        let term1_bytes = BYTES_IN_RUN_HEADER + BYTES_FOR_DOCID;
        assert_eq!(e2.index_offset, term1_bytes as u64);
        assert_eq!(e2.index_offset as usize + BYTES_IN_RUN_HEADER + 2 * BYTES_FOR_DOCID, ifdata.len());
    }
}
