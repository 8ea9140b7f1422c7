//! Many queries against one engine, evaluated on rayon's pool.

use crate::document::Document;
use crate::error::Result;
use crate::search_server::SearchServer;
use rayon::prelude::*;

/// Top documents for every query, in query order. If any query is malformed
/// one of the errors is returned.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    let results = queries
        .par_iter()
        .map(|query| server.find_top_documents(query.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(queries = queries.len(), "processed query batch");
    Ok(results)
}

/// Like [`process_queries`] with the per-query lists concatenated.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}
