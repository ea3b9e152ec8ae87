//! Deduplicated, insertion-ordered collection of product records

use indexmap::IndexSet;
use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::product::ProductRecord;

#[derive(Debug, Clone, Default)]
pub struct ProductSet {
    records: IndexSet<ProductRecord>,
}

impl ProductSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record; returns `false` if a structurally identical record is already present.
    pub fn insert(&mut self, record: ProductRecord) -> bool {
        self.records.insert(record)
    }

    #[must_use]
    pub fn contains(&self, record: &ProductRecord) -> bool {
        self.records.contains(record)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter()
    }

    /// Compact JSON array, one object per record
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }
}

impl Extend<ProductRecord> for ProductSet {
    fn extend<T: IntoIterator<Item = ProductRecord>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}

impl FromIterator<ProductRecord> for ProductSet {
    fn from_iter<T: IntoIterator<Item = ProductRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ProductSet {
    type Item = &'a ProductRecord;
    type IntoIter = indexmap::set::Iter<'a, ProductRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Serialize for ProductSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}
