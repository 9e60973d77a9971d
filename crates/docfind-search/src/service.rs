//! Lazily built search service.
//!
//! Owns the corpus, builds the index and the title to URL map on first use,
//! and turns typed input into ordered `{name, url}` results.

use std::collections::HashSet;

use docfind_core::{Corpus, DocMap, SearchConfig};
use tracing::{debug, info, warn};

use crate::{DocIndex, Result, query::prepare_query};

/// A single search result, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Document title.
    pub name: String,

    /// Document URL.
    pub url: String,
}

impl SearchResult {
    /// Create a new result.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Index and lookup built together, once.
#[derive(Debug)]
struct Loaded<I> {
    index: I,
    doc_map: DocMap,
}

/// Search over a fixed corpus with an index built on first use.
#[derive(Debug)]
pub struct SearchService<I> {
    corpus: Corpus,
    config: SearchConfig,
    loaded: Option<Loaded<I>>,
    builds: usize,
}

impl<I: DocIndex> SearchService<I> {
    /// Create a service; nothing is indexed until [`Self::ensure_built`].
    pub fn new(corpus: Corpus, config: SearchConfig) -> Self {
        Self {
            corpus,
            config,
            loaded: None,
            builds: 0,
        }
    }

    /// Create a service over the corpus compiled into the binary.
    pub fn embedded(config: SearchConfig) -> Result<Self> {
        Ok(Self::new(Corpus::embedded()?, config))
    }

    /// Whether the index has been built.
    pub fn is_built(&self) -> bool {
        self.loaded.is_some()
    }

    /// How many times the index has been built (never more than once).
    pub fn build_count(&self) -> usize {
        self.builds
    }

    /// The search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Build the index and doc map unless already built.
    pub fn ensure_built(&mut self) -> Result<()> {
        if self.loaded.is_some() {
            return Ok(());
        }

        info!(documents = self.corpus.len(), "Building search index...");
        let index = I::build(&self.corpus, &self.config.fields)?;
        let doc_map = self.corpus.doc_map();
        self.loaded = Some(Loaded { index, doc_map });
        self.builds += 1;
        info!("Search index built.");

        Ok(())
    }

    /// Run typed input against the index.
    ///
    /// Blank input yields no results without touching the index. Query
    /// syntax errors from the index are returned to the caller.
    pub fn query(&mut self, input: &str) -> Result<Vec<SearchResult>> {
        let Some(query) = prepare_query(input, self.config.mode) else {
            return Ok(Vec::new());
        };

        self.ensure_built()?;
        let Some(loaded) = self.loaded.as_ref() else {
            return Ok(Vec::new());
        };

        let hits = loaded.index.search(&query)?;
        let limit = self.config.limit.unwrap_or(usize::MAX);

        // Documents sharing a title share a reference; keep the best-ranked
        let mut seen = HashSet::new();
        let results: Vec<SearchResult> = hits
            .into_iter()
            .filter(|hit| seen.insert(hit.reference.clone()))
            .filter_map(|hit| match loaded.doc_map.url_for(&hit.reference) {
                Some(url) => Some(SearchResult::new(hit.reference.as_str(), url)),
                None => {
                    warn!(reference = %hit.reference, "Hit has no URL");
                    None
                }
            })
            .take(limit)
            .collect();

        debug!(query = %query, results = results.len(), "Query complete");
        Ok(results)
    }
}
