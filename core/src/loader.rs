//! Bulk ingestion of JSON Lines documents.
//!
//! Each non-blank line holds one document:
//! `{"id": 3, "text": "...", "status": "actual", "ratings": [1, 2]}`.
//! `status` defaults to `actual` and `ratings` to an empty list.

use crate::document::{DocumentId, DocumentStatus};
use crate::error::SearchError;
use crate::search::SearchServer;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDocument {
    pub id: DocumentId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: malformed document: {source}")]
    Json { line: usize, source: serde_json::Error },

    #[error("line {line}: {source}")]
    Search { line: usize, source: SearchError },
}

impl SearchServer {
    pub fn add_input_document(&mut self, doc: &InputDocument) -> Result<(), SearchError> {
        self.add_document(doc.id, &doc.text, doc.status, &doc.ratings)
    }
}

/// Ingest every document of a JSON Lines stream, stopping at the first bad line.
/// Returns the number of documents added.
pub fn load_jsonl<R: BufRead>(server: &mut SearchServer, reader: R) -> Result<usize, LoadError> {
    let mut added = 0;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDocument =
            serde_json::from_str(&line).map_err(|source| LoadError::Json { line: i + 1, source })?;
        server
            .add_input_document(&doc)
            .map_err(|source| LoadError::Search { line: i + 1, source })?;
        added += 1;
    }
    Ok(added)
}

pub fn load_jsonl_file<P: AsRef<Path>>(server: &mut SearchServer, path: P) -> Result<usize, LoadError> {
    let path = path.as_ref();
    let f = File::open(path)?;
    let added = load_jsonl(server, BufReader::new(f))?;
    tracing::info!(path = %path.display(), added, "loaded documents");
    Ok(added)
}
