use crate::config::{MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
use crate::document::{average_rating, DocumentId, DocumentRecord, DocumentStatus, RankedDocument};
use crate::error::{Result, SearchError};
use crate::index::InvertedIndex;
use crate::query::{parse_query, Query};
use crate::stop_words::StopWords;
use crate::tokenizer::{split_into_words, validate_word};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Result of matching a query against one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMatch {
    pub words: BTreeSet<String>,
    pub status: DocumentStatus,
}

/// Ranked top documents plus the number of matches before the top-K cut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHits {
    pub documents: Vec<RankedDocument>,
    pub total_hits: usize,
}

/// In-memory TF-IDF search over a growing set of documents.
#[derive(Debug, Default)]
pub struct SearchServer {
    stop_words: StopWords,
    index: InvertedIndex,
    documents: BTreeMap<DocumentId, DocumentRecord>,
}

impl SearchServer {
    pub fn new() -> Self { Self::default() }

    pub fn with_stop_words(text: &str) -> Result<Self> {
        let mut server = Self::new();
        server.set_stop_words(text)?;
        Ok(server)
    }

    /// Configure the stop-word set. Refused once any document has been indexed.
    pub fn set_stop_words(&mut self, text: &str) -> Result<()> {
        if !self.documents.is_empty() {
            return Err(SearchError::InvalidArgument(
                "stop words cannot change after documents are added".into(),
            ));
        }
        self.stop_words = StopWords::from_text(text)?;
        Ok(())
    }

    pub fn is_stop_word(&self, word: &str) -> bool { self.stop_words.contains(word) }

    /// Index a document. Nothing is written unless the id and every word are valid.
    pub fn add_document(
        &mut self,
        document_id: DocumentId,
        document: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if document_id < 0 {
            return Err(SearchError::InvalidArgument(format!("negative document id {document_id}")));
        }
        if self.documents.contains_key(&document_id) {
            return Err(SearchError::InvalidArgument(format!("duplicate document id {document_id}")));
        }
        let words = self.split_into_words_no_stop(document)?;
        self.index.add_document(document_id, &words);
        self.documents.insert(document_id, DocumentRecord { rating: average_rating(ratings), status });
        tracing::debug!(document_id, words = words.len(), %status, "document added");
        Ok(())
    }

    pub fn document_count(&self) -> usize { self.documents.len() }

    /// Id of the document at `index` in ascending id order.
    pub fn document_id(&self, index: i32) -> Result<DocumentId> {
        let count = self.documents.len();
        usize::try_from(index)
            .ok()
            .and_then(|i| self.documents.keys().nth(i))
            .copied()
            .ok_or(SearchError::OutOfRange { index, count })
    }

    /// Term frequencies of one document's words; empty for unknown ids.
    pub fn word_frequencies(&self, document_id: DocumentId) -> BTreeMap<&str, f64> {
        self.index.word_frequencies(document_id)
    }

    pub fn parse_query(&self, raw_query: &str) -> Result<Query> {
        parse_query(raw_query, &self.stop_words)
    }

    /// Top documents with status `Actual`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<RankedDocument>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<RankedDocument>> {
        self.find_top_documents_with(raw_query, |_, document_status, _| document_status == status)
    }

    /// Top documents accepted by `filter(id, status, rating)`, best first.
    pub fn find_top_documents_with<F>(&self, raw_query: &str, filter: F) -> Result<Vec<RankedDocument>>
    where
        F: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        Ok(self.search_with(raw_query, filter)?.documents)
    }

    /// Like `find_top_documents_with`, also reporting how many documents matched before truncation.
    pub fn search_with<F>(&self, raw_query: &str, filter: F) -> Result<SearchHits>
    where
        F: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let query = self.parse_query(raw_query)?;
        let mut matched = self.find_all_documents(&query, filter);
        let total_hits = matched.len();
        sort_by_relevance(&mut matched);
        matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
        tracing::debug!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            total_hits,
            "ranked query"
        );
        Ok(SearchHits { documents: matched, total_hits })
    }

    /// Query plus-words present in the document, or none when any minus-word is present.
    pub fn match_document(&self, raw_query: &str, document_id: DocumentId) -> Result<DocumentMatch> {
        if document_id < 0 {
            return Err(SearchError::InvalidArgument(format!("negative document id {document_id}")));
        }
        let query = self.parse_query(raw_query)?;
        let record = self.documents.get(&document_id).ok_or(SearchError::NotFound(document_id))?;
        let words = if query.minus_words.iter().any(|w| self.index.contains(w, document_id)) {
            BTreeSet::new()
        } else {
            query
                .plus_words
                .into_iter()
                .filter(|w| self.index.contains(w, document_id))
                .collect()
        };
        Ok(DocumentMatch { words, status: record.status })
    }

    fn split_into_words_no_stop<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        let words = split_into_words(text);
        for word in &words {
            validate_word(word)?;
        }
        Ok(words.into_iter().filter(|w| !self.is_stop_word(w)).collect())
    }

    // word must be present in the index
    fn inverse_document_freq(&self, word: &str) -> f64 {
        (self.document_count() as f64 / self.index.document_frequency(word) as f64).ln()
    }

    fn find_all_documents<F>(&self, query: &Query, filter: F) -> Vec<RankedDocument>
    where
        F: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let mut relevance: BTreeMap<DocumentId, f64> = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.index.postings(word) else { continue };
            let idf = self.inverse_document_freq(word);
            for (&doc_id, &tf) in postings {
                let Some(record) = self.documents.get(&doc_id) else { continue };
                if filter(doc_id, record.status, record.rating) {
                    *relevance.entry(doc_id).or_insert(0.0) += tf * idf;
                }
            }
        }
        for word in &query.minus_words {
            let Some(postings) = self.index.postings(word) else { continue };
            for doc_id in postings.keys() {
                relevance.remove(doc_id);
            }
        }
        relevance
            .into_iter()
            .filter_map(|(id, relevance)| {
                self.documents
                    .get(&id)
                    .map(|record| RankedDocument { id, relevance, rating: record.rating })
            })
            .collect()
    }
}

/// Descending relevance; relevances within `RELEVANCE_EPSILON` of the first document of
/// their run are ordered by descending rating. Both passes are stable.
fn sort_by_relevance(docs: &mut [RankedDocument]) {
    docs.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    let mut start = 0;
    while start < docs.len() {
        let anchor = docs[start].relevance;
        let mut end = start + 1;
        while end < docs.len() && (anchor - docs[end].relevance).abs() < RELEVANCE_EPSILON {
            end += 1;
        }
        docs[start..end].sort_by(|a, b| b.rating.cmp(&a.rating));
        start = end;
    }
}
