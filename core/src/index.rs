use crate::document::DocumentStatus;
use crate::error::{Result, SearchError};
use crate::policy::ExecutionPolicy;
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};
use crate::{DocId, Rating};
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::{btree_map, BTreeMap, HashMap};
use std::iter::Copied;
use std::sync::Arc;

/// Word -> share of the document's indexable tokens equal to that word.
pub type WordFrequencies = BTreeMap<Arc<str>, f64>;

/// Document -> term frequency, for one word.
pub type Postings = BTreeMap<DocId, f64>;

/// Live document ids, ascending.
pub type DocumentIds<'a> = Copied<btree_map::Keys<'a, DocId, DocumentData>>;

static EMPTY_WORD_FREQUENCIES: WordFrequencies = BTreeMap::new();

#[derive(Debug)]
pub struct DocumentData {
    rating: Rating,
    status: DocumentStatus,
    text: String,
    word_frequencies: WordFrequencies,
}

impl DocumentData {
    pub fn rating(&self) -> Rating { self.rating }
    pub fn status(&self) -> DocumentStatus { self.status }
    pub fn text(&self) -> &str { &self.text }
    pub fn word_frequencies(&self) -> &WordFrequencies { &self.word_frequencies }
}

/// Forward and reverse index over the live documents.
///
/// Word keys are shared between both directions. Each posting list sits
/// behind its own lock so removal can clear postings of different words in
/// parallel; everything else only ever reads them.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    word_to_document_freqs: HashMap<Arc<str>, RwLock<Postings>>,
    documents: BTreeMap<DocId, DocumentData>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Index a document. Nothing is mutated unless every check passes.
    pub(crate) fn insert(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[Rating],
        stop_words: &StopWords,
    ) -> Result<()> {
        if id < 0 {
            return Err(SearchError::InvalidArgument(format!("negative document id {id}")));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::InvalidArgument(format!("document id {id} already indexed")));
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut total = 0usize;
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidArgument(format!(
                    "word {word:?} contains a control character"
                )));
            }
            if stop_words.contains(word) { continue; }
            *counts.entry(word).or_insert(0) += 1;
            total += 1;
        }

        let mut word_frequencies = WordFrequencies::new();
        for (word, count) in counts {
            let freq = count as f64 / total as f64;
            let key = match self.word_to_document_freqs.get_key_value(word) {
                Some((existing, _)) => Arc::clone(existing),
                None => Arc::from(word),
            };
            self.word_to_document_freqs
                .entry(Arc::clone(&key))
                .or_default()
                .get_mut()
                .insert(id, freq);
            word_frequencies.insert(key, freq);
        }

        tracing::debug!(doc_id = id, words = word_frequencies.len(), tokens = total, "indexed document");
        self.documents.insert(
            id,
            DocumentData {
                rating: compute_average_rating(ratings),
                status,
                text: text.to_string(),
                word_frequencies,
            },
        );
        Ok(())
    }

    /// Drop a document and all of its postings. Returns false for unknown ids.
    pub(crate) fn remove(&mut self, id: DocId, policy: ExecutionPolicy) -> bool {
        let Some(data) = self.documents.remove(&id) else {
            return false;
        };

        let reverse = &self.word_to_document_freqs;
        policy.for_each(&data.word_frequencies, |(word, _)| {
            if let Some(postings) = reverse.get(word) {
                postings.write().remove(&id);
            }
        });

        for word in data.word_frequencies.keys() {
            let emptied = self
                .word_to_document_freqs
                .get_mut(word)
                .is_some_and(|postings| postings.get_mut().is_empty());
            if emptied {
                self.word_to_document_freqs.remove(word);
            }
        }

        tracing::debug!(doc_id = id, words = data.word_frequencies.len(), "removed document");
        true
    }

    pub fn document_count(&self) -> usize { self.documents.len() }

    pub fn contains(&self, id: DocId) -> bool { self.documents.contains_key(&id) }

    pub fn document(&self, id: DocId) -> Option<&DocumentData> { self.documents.get(&id) }

    pub fn ids(&self) -> DocumentIds<'_> {
        self.documents.keys().copied()
    }

    pub fn word_frequencies(&self, id: DocId) -> &WordFrequencies {
        self.documents
            .get(&id)
            .map_or(&EMPTY_WORD_FREQUENCIES, |data| &data.word_frequencies)
    }

    /// Indexed vocabulary, in no particular order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.word_to_document_freqs.keys().map(|word| &**word)
    }

    pub fn postings(&self, word: &str) -> Option<RwLockReadGuard<'_, Postings>> {
        self.word_to_document_freqs.get(word).map(|postings| postings.read_recursive())
    }

    /// Number of documents containing `word`.
    pub fn document_frequency(&self, word: &str) -> usize {
        self.postings(word).map_or(0, |postings| postings.len())
    }

    pub fn has_posting(&self, word: &str, id: DocId) -> bool {
        self.postings(word).is_some_and(|postings| postings.contains_key(&id))
    }
}

/// Truncating integer mean; zero for an empty slice.
pub fn compute_average_rating(ratings: &[Rating]) -> Rating {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as Rating
}
