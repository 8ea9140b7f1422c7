//! In-memory TF-IDF search core.
//!
//! A [`SearchServer`] keeps an inverted index over short text documents and
//! ranks them against free-text queries. Ranking, matching and removal can run
//! sequentially or fan out over rayon's pool, selected per call with an
//! [`ExecutionPolicy`].

pub mod batch;
pub mod concurrent_map;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod policy;
pub mod query;
pub mod ranking;
pub mod search_server;
pub mod tokenizer;

pub use batch::{process_queries, process_queries_joined};
pub use concurrent_map::ConcurrentMap;
pub use document::{Document, DocumentStatus};
pub use error::{Result, SearchError};
pub use index::WordFrequencies;
pub use policy::ExecutionPolicy;
pub use search_server::SearchServer;

pub type DocId = i32;
pub type Rating = i32;
