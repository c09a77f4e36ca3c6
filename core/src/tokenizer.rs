use crate::error::{Result, SearchError};

/// Split text on spaces into words, left to right. Runs of spaces never produce empty words.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|w| !w.is_empty()).collect()
}

/// A word is valid when none of its characters is below U+0020.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| (c as u32) < 0x20)
}

pub fn validate_word(word: &str) -> Result<()> {
    if is_valid_word(word) {
        Ok(())
    } else {
        Err(SearchError::InvalidWord(word.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_space_runs() {
        assert_eq!(split_into_words("  cat in   the city "), vec!["cat", "in", "the", "city"]);
        assert!(split_into_words("").is_empty());
        assert!(split_into_words("    ").is_empty());
    }

    #[test]
    fn only_space_is_a_separator() {
        // tabs are not separators, they are control characters inside a word
        assert_eq!(split_into_words("cat\tdog"), vec!["cat\tdog"]);
    }

    #[test]
    fn rejects_control_characters() {
        assert!(is_valid_word("пушистый"));
        assert!(is_valid_word("a-b"));
        assert!(!is_valid_word("ca\u{12}t"));
        assert!(!is_valid_word("\n"));
        assert_eq!(validate_word("do\u{1}g"), Err(SearchError::InvalidWord("do\u{1}g".into())));
    }
}
