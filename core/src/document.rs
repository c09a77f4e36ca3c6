use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type DocumentId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Actual => "actual",
            DocumentStatus::Irrelevant => "irrelevant",
            DocumentStatus::Banned => "banned",
            DocumentStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "actual" => Ok(DocumentStatus::Actual),
            "irrelevant" => Ok(DocumentStatus::Irrelevant),
            "banned" => Ok(DocumentStatus::Banned),
            "removed" => Ok(DocumentStatus::Removed),
            other => Err(format!("unknown document status: {other}")),
        }
    }
}

/// Per-document metadata kept by the search server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRecord {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// One hit of a ranked query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedDocument {
    pub id: DocumentId,
    pub relevance: f64,
    pub rating: i32,
}

impl fmt::Display for RankedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Integer mean of the ratings, truncated toward zero; 0 for no ratings.
pub fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| r as i64).sum();
    (sum / ratings.len() as i64) as i32
}
