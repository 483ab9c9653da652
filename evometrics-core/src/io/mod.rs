pub mod csv;
pub mod fasta;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    pub line: usize,
    pub id: Option<Box<str>>,
    pub message: Box<str>,
}

#[derive(Clone, Debug)]
pub struct ReadReport<T> {
    pub data: T,
    pub skipped: Vec<SkippedRecord>,
}

pub fn normalize_seq_bytes(input: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for b in input.bytes() {
        if !b.is_ascii_whitespace() {
            out.push(b);
        }
    }
    out
}
