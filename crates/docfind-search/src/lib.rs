//! docfind Search Library
//!
//! Full-text search over the embedded documentation corpus.
//!
//! # Features
//!
//! - **Lazy build**: [`SearchService`] builds its index on first use only
//! - **TermIndex**: in-memory inverted index with a lunr-style query syntax,
//!   usable from WebAssembly
//! - **TantivyIndex**: in-RAM Tantivy backend for native targets (`tantivy`
//!   feature)
//!
//! # Example
//!
//! ```no_run
//! use docfind_core::{Corpus, SearchConfig};
//! use docfind_search::{SearchService, TermIndex};
//!
//! let corpus = Corpus::embedded().unwrap();
//! let mut service = SearchService::<TermIndex>::new(corpus, SearchConfig::default());
//! let results = service.query("motivations").unwrap();
//! assert_eq!(results[0].name, "Intro");
//! ```

#[cfg(feature = "tantivy")]
pub mod indexer;
pub mod query;
#[cfg(feature = "tantivy")]
pub mod schema;
pub mod service;
pub mod simple;
pub mod tokenize;

use docfind_core::{Corpus, CoreError, SearchField};
#[cfg(feature = "tantivy")]
pub use indexer::TantivyIndex;
pub use query::{Clause, Presence, parse_query, prepare_query};
pub use service::{SearchResult, SearchService};
pub use simple::TermIndex;
use thiserror::Error;

/// Search-related errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Index construction or lookup error.
    #[error("Index error: {0}")]
    Index(String),

    /// The query could not be parsed.
    #[error("Query error: {0}")]
    Query(String),

    /// Corpus or configuration error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SearchError {
    /// Create a new query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// A ranked match: the reference (title) of a document and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Document reference.
    pub reference: String,

    /// Relevance score (higher is better).
    pub score: f32,
}

/// A full-text index over a corpus.
///
/// The ranking algorithm belongs to the implementation; callers only rely on
/// hits coming back best first.
pub trait DocIndex: Sized {
    /// Build an index over `fields` of every document in `corpus`.
    fn build(corpus: &Corpus, fields: &[SearchField]) -> Result<Self>;

    /// Run a query and return hits, best first.
    fn search(&self, query: &str) -> Result<Vec<Hit>>;

    /// Number of indexed documents.
    fn document_count(&self) -> usize;
}
