//! In-memory full-text search with TF-IDF ranking, plus/minus query words and
//! caller-supplied result filters.

pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod loader;
pub mod query;
pub mod search;
pub mod shared;
pub mod stop_words;
pub mod tokenizer;

pub use config::{MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
pub use document::{DocumentId, DocumentStatus, RankedDocument};
pub use error::{Result, SearchError};
pub use loader::{load_jsonl, load_jsonl_file, InputDocument, LoadError};
pub use query::Query;
pub use search::{DocumentMatch, SearchHits, SearchServer};
pub use shared::SharedSearchServer;
