//! Fixed ranking parameters.

/// Maximum number of documents returned by a ranked query.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are considered equal and ordered by rating instead.
pub const RELEVANCE_EPSILON: f64 = 1e-6;
