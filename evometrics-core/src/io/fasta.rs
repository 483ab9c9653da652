//! Lenient FASTA reading into a namespaced [`SequenceSet`].
//!
//! Nothing in a FASTA body is treated as fatal: text before the first header
//! is ignored and a header without an identifier drops its record. Only the
//! reader/path entry points can fail, and only on I/O.

use crate::error::EvoResult;
use crate::io::{ReadReport, SkippedRecord};
use crate::seq::record::Sequence;
use crate::seq::set::SequenceSet;
use memchr::memchr_iter;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse `data`, storing each record as `<source_label>|<raw id>`.
pub fn parse_fasta(data: &[u8], source_label: &str) -> SequenceSet {
    parse_fasta_report(data, source_label).data
}

/// Like [`parse_fasta`], also returning the records that were skipped.
pub fn parse_fasta_report(data: &[u8], source_label: &str) -> ReadReport<SequenceSet> {
    collect_records(data, RecordIds::Namespaced(source_label))
}

pub fn parse_fasta_reader<R: BufRead>(mut reader: R, source_label: &str) -> EvoResult<SequenceSet> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(parse_fasta(&data, source_label))
}

pub fn parse_fasta_path(path: impl AsRef<Path>, source_label: &str) -> EvoResult<SequenceSet> {
    let file = File::open(path)?;
    parse_fasta_reader(BufReader::new(file), source_label)
}

/// How a header line becomes a record id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RecordIds<'a> {
    /// `<label>|<whole header>`.
    Namespaced(&'a str),
    /// First whitespace-delimited token of the header; the rest is description.
    Raw,
}

pub(crate) fn collect_records(data: &[u8], ids: RecordIds<'_>) -> ReadReport<SequenceSet> {
    let mut set = SequenceSet::new();
    let mut skipped = Vec::new();
    let mut current: Option<(String, usize)> = None;
    let mut residues: Vec<u8> = Vec::new();
    let mut preamble_reported = false;

    for (idx, raw_line) in lines(data).enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_ascii();

        if let Some(header) = line.strip_prefix(b">") {
            if let Some((id, header_line)) = current.take() {
                finish_record(&mut set, &mut skipped, ids, id, header_line, &mut residues);
            }
            let id = String::from_utf8_lossy(header).trim().to_string();
            current = Some((id, line_no));
            continue;
        }

        if current.is_some() {
            residues.extend_from_slice(line);
        } else if !line.is_empty() && !preamble_reported {
            preamble_reported = true;
            skipped.push(SkippedRecord {
                line: line_no,
                id: None,
                message: "content before first header".into(),
            });
        }
    }

    if let Some((id, header_line)) = current.take() {
        finish_record(&mut set, &mut skipped, ids, id, header_line, &mut residues);
    }

    ReadReport { data: set, skipped }
}

fn finish_record(
    set: &mut SequenceSet,
    skipped: &mut Vec<SkippedRecord>,
    ids: RecordIds<'_>,
    id: String,
    header_line: usize,
    residues: &mut Vec<u8>,
) {
    let seq = std::mem::take(residues);
    if id.is_empty() {
        skipped.push(SkippedRecord {
            line: header_line,
            id: None,
            message: "empty identifier".into(),
        });
        return;
    }
    let id = match ids {
        RecordIds::Namespaced(label) => format!("{label}|{id}"),
        RecordIds::Raw => id.split_whitespace().next().unwrap_or_default().to_string(),
    };
    set.insert(Sequence::new(id, seq));
}

/// Split on `\n`; a trailing `\r` is removed by the caller's trim.
fn lines(data: &[u8]) -> impl Iterator<Item = &[u8]> + '_ {
    let mut start = 0usize;
    let mut breaks = memchr_iter(b'\n', data);
    std::iter::from_fn(move || {
        if start > data.len() {
            return None;
        }
        match breaks.next() {
            Some(end) => {
                let line = &data[start..end];
                start = end + 1;
                Some(line)
            }
            None => {
                let line = &data[start..];
                start = data.len() + 1;
                if line.is_empty() {
                    None
                } else {
                    Some(line)
                }
            }
        }
    })
}
