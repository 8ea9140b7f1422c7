use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};
use std::collections::BTreeSet;

/// A parsed query: words a document should contain and words that disqualify
/// it. Both sets borrow from the raw query text and never overlap.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Query<'a> {
    plus_words: BTreeSet<&'a str>,
    minus_words: BTreeSet<&'a str>,
}

impl<'a> Query<'a> {
    pub fn parse(text: &'a str, stop_words: &StopWords) -> Result<Self> {
        let mut query = Query::default();
        for token in split_into_words(text) {
            let word = QueryWord::parse(token, stop_words)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus_words.insert(word.data);
            } else {
                query.plus_words.insert(word.data);
            }
        }
        // exclusion wins over a repeated required word
        let minus_words = &query.minus_words;
        query.plus_words.retain(|word| !minus_words.contains(word));
        Ok(query)
    }

    pub fn plus_words(&self) -> &BTreeSet<&'a str> {
        &self.plus_words
    }

    pub fn minus_words(&self) -> &BTreeSet<&'a str> {
        &self.minus_words
    }
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
    is_stop: bool,
}

impl<'a> QueryWord<'a> {
    fn parse(token: &'a str, stop_words: &StopWords) -> Result<Self> {
        if token.is_empty() {
            return Err(SearchError::InvalidArgument("query word is empty".into()));
        }
        let (data, is_minus) = match token.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        if data.is_empty() || data.starts_with('-') || !is_valid_word(data) {
            tracing::warn!(word = token, "rejected query word");
            return Err(SearchError::InvalidArgument(format!("query word {token:?} is invalid")));
        }
        Ok(Self { data, is_minus, is_stop: stop_words.contains(data) })
    }
}
