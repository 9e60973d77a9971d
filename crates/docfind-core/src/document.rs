//! Searchable documents and the title to URL lookup.
//!
//! The corpus is a fixed list produced by the site generator and compiled
//! into the binary. Titles double as document identifiers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// JSON list of documents embedded at compile time.
const EMBEDDED_CORPUS: &str = include_str!("../data/docs.json");

/// A single page of the documentation site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Page title, also the document reference returned by the index.
    pub title: String,

    /// Site-relative URL of the page.
    pub url: String,

    /// Plain text body.
    #[serde(default)]
    pub content: String,
}

impl Document {
    /// Create a new document.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
        }
    }
}

/// The ordered set of documents the widget searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Build a corpus from an explicit document list.
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Parse the corpus compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CORPUS)
    }

    /// Parse a corpus from a JSON array of `{title, url, content}` records.
    pub fn from_json(json: &str) -> Result<Self> {
        let documents: Vec<Document> = serde_json::from_str(json)?;
        Ok(Self { documents })
    }

    /// All documents in corpus order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Build the title to URL lookup for this corpus.
    pub fn doc_map(&self) -> DocMap {
        DocMap::from_documents(&self.documents)
    }
}

/// Lookup from document title to its canonical URL.
///
/// Titles are unique keys; a later document with the same title replaces the
/// earlier mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocMap {
    urls: HashMap<String, String>,
}

impl DocMap {
    /// Build the map from documents in order.
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut urls = HashMap::with_capacity(documents.len());
        for doc in documents {
            if let Some(previous) = urls.insert(doc.title.clone(), doc.url.clone()) {
                tracing::debug!(
                    title = %doc.title,
                    replaced = %previous,
                    url = %doc.url,
                    "Duplicate document title"
                );
            }
        }
        Self { urls }
    }

    /// Resolve a document reference to its URL.
    pub fn url_for(&self, title: &str) -> Option<&str> {
        self.urls.get(title).map(String::as_str)
    }

    /// Number of distinct titles.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_corpus_parses() {
        let corpus = Corpus::embedded().expect("embedded corpus");
        assert_eq!(corpus.len(), 12);

        let intro = corpus
            .documents()
            .iter()
            .find(|d| d.title == "Intro")
            .expect("intro page");
        assert_eq!(intro.url, "/docs/");
        assert!(intro.content.contains("motivations"));
    }

    #[test]
    fn test_corpus_from_json_defaults_content() {
        let corpus = Corpus::from_json(r#"[{"title": "Empty", "url": "/empty"}]"#).unwrap();
        assert_eq!(corpus.documents()[0].content, "");
    }

    #[test]
    fn test_corpus_from_invalid_json() {
        assert!(Corpus::from_json(r#"{"title": "not a list"}"#).is_err());
    }

    #[test]
    fn test_doc_map_lookup() {
        let corpus = Corpus::new(vec![
            Document::new("Intro", "/docs/", "hello"),
            Document::new("Getting Started", "/docs/getting-started", "setup"),
        ]);
        let map = corpus.doc_map();

        assert_eq!(map.len(), 2);
        assert_eq!(map.url_for("Intro"), Some("/docs/"));
        assert_eq!(map.url_for("Missing"), None);
    }

    #[test]
    fn test_doc_map_duplicate_title_last_wins() {
        let corpus = Corpus::embedded().unwrap();
        let map = corpus.doc_map();

        assert_eq!(map.len(), corpus.len() - 1);
        assert_eq!(map.url_for("Slack Events API"), Some("/docs/events-api"));
    }
}
