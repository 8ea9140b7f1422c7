//! Ranking and accumulation tunables.

/// Upper bound on the number of documents a top-documents query returns.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are considered equal and ordered by rating.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Number of independently locked shards in a relevance accumulator.
pub const DEFAULT_SHARD_COUNT: usize = 64;
