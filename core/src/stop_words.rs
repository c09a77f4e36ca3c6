use crate::error::Result;
use crate::tokenizer::{split_into_words, validate_word};
use std::collections::BTreeSet;

/// Words excluded from both indexing and queries.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    pub fn new() -> Self { Self::default() }

    /// Build from space separated text. Every word is validated before any is kept.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_words(split_into_words(text))
    }

    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() { continue; }
            validate_word(word)?;
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    pub fn contains(&self, word: &str) -> bool { self.words.contains(word) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}
