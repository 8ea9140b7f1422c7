use crate::document::{Document, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::index::{DocumentIds, InvertedIndex, WordFrequencies};
use crate::policy::ExecutionPolicy;
use crate::query::Query;
use crate::ranking;
use crate::tokenizer::StopWords;
use crate::{DocId, Rating};

/// Words of a query found in a document, and the document's status.
pub type MatchDocumentResult<'a> = (Vec<&'a str>, DocumentStatus);

/// In-memory TF-IDF search engine.
///
/// Mutation (`add_document`, `remove_document*`) needs `&mut self`; queries
/// borrow the engine shared and may fan out internally when given
/// [`ExecutionPolicy::Parallel`].
#[derive(Debug)]
pub struct SearchServer {
    stop_words: StopWords,
    index: InvertedIndex,
}

impl SearchServer {
    /// Build an engine ignoring the given stop words. Empty strings are
    /// skipped; a word with a control character is an error.
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_stop_words(StopWords::new(stop_words)?))
    }

    /// Stop words given as space-separated text.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Ok(Self::with_stop_words(StopWords::from_text(text)?))
    }

    pub fn with_default_stop_words() -> Self {
        Self::with_stop_words(StopWords::english())
    }

    pub fn with_stop_words(stop_words: StopWords) -> Self {
        Self { stop_words, index: InvertedIndex::new() }
    }

    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[Rating],
    ) -> Result<()> {
        self.index
            .insert(id, text, status, ratings, &self.stop_words)
            .inspect_err(|err| tracing::warn!(doc_id = id, %err, "rejected document"))
    }

    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_policy(ExecutionPolicy::Sequential, raw_query)
    }

    pub fn find_top_documents_with_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by_status_with_policy(policy, raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by_status_with_policy(ExecutionPolicy::Sequential, raw_query, status)
    }

    pub fn find_top_documents_by_status_with_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_filtered_with_policy(policy, raw_query, move |_, doc_status, _| {
            doc_status == status
        })
    }

    pub fn find_top_documents_filtered<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        self.find_top_documents_filtered_with_policy(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    /// Rank documents accepted by `predicate` against the query. At most
    /// [`MAX_RESULT_DOCUMENT_COUNT`](crate::config::MAX_RESULT_DOCUMENT_COUNT)
    /// results, best first.
    pub fn find_top_documents_filtered_with_policy<P>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        let query = Query::parse(raw_query, &self.stop_words)?;
        Ok(ranking::find_top_documents(&self.index, &query, &predicate, policy))
    }

    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<MatchDocumentResult<'_>> {
        self.match_document_with_policy(ExecutionPolicy::Sequential, raw_query, id)
    }

    /// Required query words present in the document, in ascending order. Empty
    /// when the document holds any excluded word.
    pub fn match_document_with_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        id: DocId,
    ) -> Result<MatchDocumentResult<'_>> {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let data = self.index.document(id).ok_or(SearchError::NotFound(id))?;

        if policy.any(query.minus_words(), |word| self.index.has_posting(word, id)) {
            return Ok((Vec::new(), data.status()));
        }

        let words = data.word_frequencies();
        let matched = policy
            .filter_collect(query.plus_words(), |word| self.index.has_posting(word, id))
            .into_iter()
            .filter_map(|word| words.get_key_value(*word).map(|(key, _)| &**key))
            .collect();
        Ok((matched, data.status()))
    }

    /// Unknown ids are ignored.
    pub fn remove_document(&mut self, id: DocId) {
        self.remove_document_with_policy(ExecutionPolicy::Sequential, id);
    }

    pub fn remove_document_with_policy(&mut self, policy: ExecutionPolicy, id: DocId) {
        if !self.index.remove(id, policy) {
            tracing::debug!(doc_id = id, "remove of unknown document ignored");
        }
    }

    /// Word frequencies of a document; empty for unknown ids.
    pub fn word_frequencies(&self, id: DocId) -> &WordFrequencies {
        self.index.word_frequencies(id)
    }

    pub fn document_count(&self) -> usize {
        self.index.document_count()
    }

    pub fn iter(&self) -> DocumentIds<'_> {
        self.index.ids()
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Read-only view of the underlying index.
    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_words_are_not_searchable() {
        let mut server = SearchServer::from_stop_words_text("in the").unwrap();
        server.add_document(42, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        assert!(server.find_top_documents("in").unwrap().is_empty());
        let found = server.find_top_documents("city").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 42);
        assert_eq!(found[0].rating, 2);
    }

    #[test]
    fn invalid_stop_word_fails_construction() {
        let res = SearchServer::new(["ok", "b\u{3}ad"]);
        assert!(matches!(res, Err(SearchError::InvalidArgument(_))));
    }

    #[test]
    fn default_stop_words_drop_english_function_words() {
        let mut server = SearchServer::with_default_stop_words();
        server.add_document(1, "the quick brown fox", DocumentStatus::Actual, &[]).unwrap();
        assert!(server.word_frequencies(1).get("the").is_none());
        assert_eq!(server.word_frequencies(1).len(), 3);
    }

    #[test]
    fn iterates_ids_in_ascending_order() {
        let mut server = SearchServer::new(Vec::<String>::new()).unwrap();
        for id in [5, 1, 3] {
            server.add_document(id, "word", DocumentStatus::Actual, &[]).unwrap();
        }
        let ids: Vec<DocId> = (&server).into_iter().collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }
}
