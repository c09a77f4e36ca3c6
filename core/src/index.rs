use crate::document::DocumentId;
use std::collections::BTreeMap;

/// Term frequencies of one word, keyed by document id in ascending order.
pub type Postings = BTreeMap<DocumentId, f64>;

/// word -> (document id -> term frequency)
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: BTreeMap<String, Postings>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record one document's content words. The words must already be validated and
    /// stripped of stop words; an empty slice leaves the index untouched.
    pub fn add_document(&mut self, doc_id: DocumentId, words: &[&str]) {
        if words.is_empty() {
            return;
        }
        let inv_word_count = 1.0 / words.len() as f64;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for &word in words {
            *counts.entry(word).or_insert(0) += 1;
        }
        for (word, count) in counts {
            self.postings
                .entry(word.to_string())
                .or_default()
                .insert(doc_id, count as f64 * inv_word_count);
        }
    }

    pub fn postings(&self, word: &str) -> Option<&Postings> { self.postings.get(word) }

    /// Number of documents containing `word`.
    pub fn document_frequency(&self, word: &str) -> usize {
        self.postings.get(word).map_or(0, |p| p.len())
    }

    pub fn contains(&self, word: &str, doc_id: DocumentId) -> bool {
        self.postings.get(word).is_some_and(|p| p.contains_key(&doc_id))
    }

    /// Term frequencies of every word of one document.
    pub fn word_frequencies(&self, doc_id: DocumentId) -> BTreeMap<&str, f64> {
        self.postings
            .iter()
            .filter_map(|(word, p)| p.get(&doc_id).map(|&tf| (word.as_str(), tf)))
            .collect()
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }
}
