use crate::error::{Result, SearchError};
use lazy_static::lazy_static;
use std::collections::BTreeSet;

lazy_static! {
    static ref ENGLISH_STOPWORDS: BTreeSet<String> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().map(|w| w.to_string()).collect()
    };
}

/// Split text into the non-empty runs between space characters.
///
/// Only U+0020 separates words. Tabs, newlines and other control characters
/// stay inside the returned slices so that validation can reject them.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split(' ').filter(|word| !word.is_empty())
}

/// A word is valid when it contains no character below the space code point.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| c < ' ')
}

/// Collect strings into an ordered set, dropping empty ones.
pub fn make_unique_non_empty_strings<I, S>(strings: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    strings
        .into_iter()
        .filter(|s| !s.as_ref().is_empty())
        .map(|s| s.as_ref().to_string())
        .collect()
}

/// Immutable set of words excluded from both indexing and querying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = make_unique_non_empty_strings(words);
        if let Some(bad) = words.iter().find(|w| !is_valid_word(w)) {
            return Err(SearchError::InvalidArgument(format!(
                "stop word {bad:?} contains a control character"
            )));
        }
        Ok(Self { words })
    }

    /// Build from space-separated text.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    /// Common English function words.
    pub fn english() -> Self {
        Self { words: ENGLISH_STOPWORDS.clone() }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_spaces_only() {
        let words: Vec<&str> = split_into_words("  white cat\tand  collar ").collect();
        assert_eq!(words, vec!["white", "cat\tand", "collar"]);
    }

    #[test]
    fn empty_text_has_no_words() {
        assert_eq!(split_into_words("").count(), 0);
        assert_eq!(split_into_words("   ").count(), 0);
    }

    #[test]
    fn control_characters_invalidate_word() {
        assert!(is_valid_word("cat"));
        assert!(is_valid_word("кот"));
        assert!(!is_valid_word("ca\u{12}t"));
        assert!(!is_valid_word("line\n"));
    }

    #[test]
    fn stop_words_dedup_and_skip_empty() {
        let stop = StopWords::new(["in", "", "the", "in"]).unwrap();
        assert_eq!(stop.len(), 2);
        assert!(stop.contains("in"));
        assert!(!stop.contains(""));
    }

    #[test]
    fn stop_word_with_control_character_is_rejected() {
        let err = StopWords::from_text("in t\u{1}he").unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
    }
}
