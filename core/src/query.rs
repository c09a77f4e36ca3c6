use crate::error::{Result, SearchError};
use crate::stop_words::StopWords;
use crate::tokenizer::{split_into_words, validate_word};
use std::collections::BTreeSet;

/// A parsed query. Stop words never appear in either set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

#[derive(Debug)]
struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
}

fn parse_query_word(text: &str) -> Result<QueryWord<'_>> {
    let (data, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if is_minus && data.is_empty() {
        return Err(SearchError::InvalidQuery(format!("empty minus-word in {text:?}")));
    }
    if is_minus && data.starts_with('-') {
        return Err(SearchError::InvalidQuery(format!("double minus in {text:?}")));
    }
    validate_word(data)?;
    Ok(QueryWord { data, is_minus })
}

/// Parse raw query text into plus- and minus-words.
pub fn parse_query(text: &str, stop_words: &StopWords) -> Result<Query> {
    let mut query = Query::default();
    for word in split_into_words(text) {
        let word = parse_query_word(word)?;
        if stop_words.contains(word.data) {
            continue;
        }
        if word.is_minus {
            query.minus_words.insert(word.data.to_string());
        } else {
            query.plus_words.insert(word.data.to_string());
        }
    }
    Ok(query)
}
