//! Collects sequences from uploaded files, pasted FASTA text and manual entry
//! into one [`SequenceSet`].
//!
//! Every source is namespaced by default: a record `>X` from the second file
//! is stored as `File2|X`, manual entries as `Manual|<id>`. Files are added
//! first, then pasted text, then manual entries, regardless of the order the
//! builder methods are called in.

use log::debug;

use crate::io::fasta::{collect_records, RecordIds};
use crate::io::normalize_seq_bytes;
use crate::seq::record::Sequence;
use crate::seq::set::SequenceSet;

pub const MANUAL_LABEL: &str = "Manual";
pub const PASTED_LABEL: &str = "Pasted";

#[derive(Clone, Debug)]
struct FastaSource {
    label: Option<Box<str>>,
    data: Vec<u8>,
}

#[derive(Clone, Debug)]
struct ManualEntry {
    id: String,
    residues: String,
}

#[derive(Clone, Debug)]
pub struct SequenceInputs {
    files: Vec<FastaSource>,
    pasted: Vec<Vec<u8>>,
    manual: Vec<ManualEntry>,
    namespaced: bool,
}

impl Default for SequenceInputs {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            pasted: Vec::new(),
            manual: Vec::new(),
            namespaced: true,
        }
    }
}

impl SequenceInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// An uploaded file. Labeled `File<n>` by its position among files.
    pub fn with_file(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.files.push(FastaSource {
            label: None,
            data: data.into(),
        });
        self
    }

    /// A FASTA source with an explicit namespace label.
    pub fn with_labeled_fasta(mut self, label: impl Into<Box<str>>, data: impl Into<Vec<u8>>) -> Self {
        self.files.push(FastaSource {
            label: Some(label.into()),
            data: data.into(),
        });
        self
    }

    pub fn with_pasted(mut self, text: impl Into<Vec<u8>>) -> Self {
        self.pasted.push(text.into());
        self
    }

    pub fn with_manual(mut self, id: impl Into<String>, residues: impl Into<String>) -> Self {
        self.manual.push(ManualEntry {
            id: id.into(),
            residues: residues.into(),
        });
        self
    }

    /// Key FASTA records by the first word of their header instead of
    /// `<label>|<header>`. Manual entries keep their id as typed.
    pub fn without_namespaces(mut self) -> Self {
        self.namespaced = false;
        self
    }

    pub fn collect(&self) -> SequenceSet {
        let mut set = SequenceSet::new();

        for (i, source) in self.files.iter().enumerate() {
            let default_label;
            let label = match &source.label {
                Some(label) => label.as_ref(),
                None => {
                    default_label = format!("File{}", i + 1);
                    default_label.as_str()
                }
            };
            self.merge_fasta(&mut set, &source.data, label);
        }

        for text in &self.pasted {
            self.merge_fasta(&mut set, text, PASTED_LABEL);
        }

        for entry in &self.manual {
            let id = entry.id.trim();
            let mut residues = normalize_seq_bytes(&entry.residues);
            residues.make_ascii_uppercase();
            if id.is_empty() || residues.is_empty() {
                debug!("skipping incomplete manual entry '{}'", id);
                continue;
            }
            set.insert(Sequence::new(self.qualify(MANUAL_LABEL, id), residues));
        }

        set
    }

    fn merge_fasta(&self, set: &mut SequenceSet, data: &[u8], label: &str) {
        let ids = if self.namespaced {
            RecordIds::Namespaced(label)
        } else {
            RecordIds::Raw
        };
        let report = collect_records(data, ids);
        for skipped in &report.skipped {
            debug!("{}: skipped record at line {}: {}", label, skipped.line, skipped.message);
        }
        set.extend_from(report.data);
    }

    fn qualify(&self, label: &str, id: &str) -> String {
        if self.namespaced {
            format!("{label}|{id}")
        } else {
            id.to_string()
        }
    }
}
