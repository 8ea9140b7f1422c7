//! TF-IDF scoring over the inverted index.

use crate::concurrent_map::ConcurrentMap;
use crate::config::{MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
use crate::document::{Document, DocumentStatus};
use crate::index::InvertedIndex;
use crate::policy::ExecutionPolicy;
use crate::query::Query;
use crate::{DocId, Rating};

/// `ln(total / containing)`: rarer words weigh more.
pub fn compute_inverse_document_freq(total_documents: usize, containing_documents: usize) -> f64 {
    (total_documents as f64 / containing_documents as f64).ln()
}

/// Score every document matching a required word and accepted by `predicate`,
/// then drop every document holding an excluded word. Unordered.
pub fn find_all_documents<P>(
    index: &InvertedIndex,
    query: &Query<'_>,
    predicate: &P,
    policy: ExecutionPolicy,
) -> Vec<Document>
where
    P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
{
    let document_to_relevance = ConcurrentMap::<DocId, f64>::new();
    let total_documents = index.document_count();

    policy.for_each(query.plus_words(), |word| {
        let Some(postings) = index.postings(word) else {
            return;
        };
        let idf = compute_inverse_document_freq(total_documents, postings.len());
        policy.for_each(&*postings, |(&id, &term_freq)| {
            let Some(data) = index.document(id) else {
                return;
            };
            if predicate(id, data.status(), data.rating()) {
                document_to_relevance.accumulate(id, term_freq * idf);
            }
        });
    });

    // runs after accumulation has finished so an erase can't be undone
    policy.for_each(query.minus_words(), |word| {
        let Some(postings) = index.postings(word) else {
            return;
        };
        policy.for_each(&*postings, |(id, _)| {
            document_to_relevance.erase(id);
        });
    });

    let relevance = document_to_relevance.into_ordinary_map();
    policy.map_collect(relevance, |(id, relevance)| {
        let rating = index.document(id).map_or(0, |data| data.rating());
        Document::new(id, relevance, rating)
    })
}

/// Best matches first, at most [`MAX_RESULT_DOCUMENT_COUNT`] of them.
pub fn find_top_documents<P>(
    index: &InvertedIndex,
    query: &Query<'_>,
    predicate: &P,
    policy: ExecutionPolicy,
) -> Vec<Document>
where
    P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
{
    let mut matched = find_all_documents(index, query, predicate, policy);
    sort_by_relevance(&mut matched, policy);
    matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
    tracing::debug!(
        plus_words = query.plus_words().len(),
        minus_words = query.minus_words().len(),
        hits = matched.len(),
        "ranked documents"
    );
    matched
}

/// Descending relevance. A run of documents whose relevance lies within
/// [`RELEVANCE_EPSILON`] of the run's best is ordered by descending rating.
pub fn sort_by_relevance(documents: &mut [Document], policy: ExecutionPolicy) {
    policy.sort_by(documents, |lhs, rhs| {
        rhs.relevance
            .total_cmp(&lhs.relevance)
            .then(rhs.rating.cmp(&lhs.rating))
            .then(lhs.id.cmp(&rhs.id))
    });

    let mut start = 0;
    while start < documents.len() {
        let anchor = documents[start].relevance;
        let run = documents[start..]
            .iter()
            .take_while(|doc| anchor - doc.relevance < RELEVANCE_EPSILON)
            .count();
        documents[start..start + run].sort_by(|lhs, rhs| {
            rhs.rating
                .cmp(&lhs.rating)
                .then(rhs.relevance.total_cmp(&lhs.relevance))
                .then(lhs.id.cmp(&rhs.id))
        });
        start += run;
    }
}
