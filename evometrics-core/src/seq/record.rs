use std::borrow::Cow;

/// A labeled residue string. Residues are kept as raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    id: Box<str>,
    residues: Vec<u8>,
}

impl Sequence {
    pub fn new(id: impl Into<Box<str>>, residues: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            residues: residues.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    pub fn residues_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.residues)
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn into_parts(self) -> (Box<str>, Vec<u8>) {
        (self.id, self.residues)
    }
}
