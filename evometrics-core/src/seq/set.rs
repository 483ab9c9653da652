use std::collections::HashMap;

use log::debug;

use crate::seq::record::Sequence;

/// Insertion-ordered sequences keyed by id. The first sequence stored under an
/// id is kept; later ones with the same id are dropped.
#[derive(Clone, Debug, Default)]
pub struct SequenceSet {
    records: Vec<Sequence>,
    index: HashMap<Box<str>, usize>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the id was already present.
    pub fn insert(&mut self, seq: Sequence) -> bool {
        if self.index.contains_key(seq.id()) {
            debug!("dropping duplicate sequence id '{}'", seq.id());
            return false;
        }
        self.index.insert(seq.id().into(), self.records.len());
        self.records.push(seq);
        true
    }

    /// Merge `other` into `self`, keeping existing entries on id collisions.
    pub fn extend_from(&mut self, other: SequenceSet) {
        for seq in other.records {
            self.insert(seq);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Sequence> {
        self.index.get(id).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|s| s.id())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Sequence] {
        &self.records
    }
}

impl Extend<Sequence> for SequenceSet {
    fn extend<T: IntoIterator<Item = Sequence>>(&mut self, iter: T) {
        for seq in iter {
            self.insert(seq);
        }
    }
}

impl FromIterator<Sequence> for SequenceSet {
    fn from_iter<T: IntoIterator<Item = Sequence>>(iter: T) -> Self {
        let mut set = SequenceSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a SequenceSet {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_wins() {
        let mut set = SequenceSet::new();
        assert!(set.insert(Sequence::new("a", "ACGT")));
        assert!(!set.insert(Sequence::new("a", "TTTT")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").unwrap().residues(), b"ACGT");
    }

    #[test]
    fn keeps_insertion_order() {
        let set: SequenceSet = ["c", "a", "b"]
            .iter()
            .map(|id| Sequence::new(*id, "A"))
            .collect();
        assert_eq!(set.ids().collect::<Vec<_>>(), vec!["c", "a", "b"]);
    }

    #[test]
    fn extend_from_keeps_existing() {
        let mut left: SequenceSet = vec![Sequence::new("x", "AA")].into_iter().collect();
        let right: SequenceSet = vec![Sequence::new("x", "CC"), Sequence::new("y", "GG")]
            .into_iter()
            .collect();
        left.extend_from(right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.get("x").unwrap().residues(), b"AA");
        assert!(left.contains("y"));
    }

    #[test]
    fn lookup_by_borrowed_id() {
        let set: SequenceSet = (0..500)
            .map(|i| Sequence::new(format!("seq{i}"), "ACGT"))
            .collect();
        assert_eq!(set.len(), 500);
        let key = String::from("seq499");
        assert!(set.contains(key.as_str()));
        assert_eq!(set.get("seq0").unwrap().id(), "seq0");
        assert!(set.get("seq500").is_none());
        assert_eq!(set.ids().last(), Some("seq499"));
    }
}
