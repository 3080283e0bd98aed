//! The newsletter dataset value type

use crate::storage::NewsletterRecord;
use std::collections::HashSet;
use std::hash::Hash;

/// An ordered collection of newsletters keyed by id
///
/// A dataset is never edited in place; [`Dataset::merge`] consumes both sides
/// and returns a new value. Records are kept sorted by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<NewsletterRecord>,
}

impl Dataset {
    /// Builds a dataset from records in any order
    ///
    /// The records are stably sorted by id; duplicates are kept as given.
    pub fn from_records(mut records: Vec<NewsletterRecord>) -> Self {
        records.sort_by_key(|r| r.id);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[NewsletterRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NewsletterRecord> {
        self.records.iter()
    }

    /// Ids already present; used to skip cached ids during a harvest
    pub fn ids(&self) -> HashSet<i64> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Records whose sender URL equals `source_url` exactly
    pub fn filter_by_source(&self, source_url: &str) -> Dataset {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| r.source_url == source_url)
                .cloned()
                .collect(),
        }
    }

    /// Combines this dataset with newer records
    ///
    /// # Merge Rules
    ///
    /// 1. `self` is followed by `incoming`, then stably sorted by id
    /// 2. Rows sharing an id keep the last one (the incoming row)
    /// 3. Rows sharing a title keep the last one in id order
    ///
    /// Titles are a weak identity: two different issues with the same title
    /// collapse into one row.
    pub fn merge(self, incoming: Dataset) -> Dataset {
        let mut records = self.records;
        records.extend(incoming.records);
        records.sort_by_key(|r| r.id);

        let records = keep_last_by(records, |r| r.id);
        let records = keep_last_by(records, |r| r.title.clone());

        Self { records }
    }
}

impl FromIterator<NewsletterRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = NewsletterRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

impl IntoIterator for Dataset {
    type Item = NewsletterRecord;
    type IntoIter = std::vec::IntoIter<NewsletterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a NewsletterRecord;
    type IntoIter = std::slice::Iter<'a, NewsletterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Drops every row whose key reappears later, preserving order
fn keep_last_by<K, F>(records: Vec<NewsletterRecord>, key: F) -> Vec<NewsletterRecord>
where
    K: Eq + Hash,
    F: Fn(&NewsletterRecord) -> K,
{
    let mut seen = HashSet::new();
    let mut kept: Vec<_> = records
        .into_iter()
        .rev()
        .filter(|r| seen.insert(key(r)))
        .collect();
    kept.reverse();
    kept
}
