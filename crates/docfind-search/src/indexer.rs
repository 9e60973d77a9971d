//! Tantivy-backed index for native targets.
//!
//! Builds an in-RAM index in one commit. Plain queries go through Tantivy's
//! query parser, so its full syntax is available. Queries containing `*` are
//! parsed as clauses and their wildcard terms run as regular expressions
//! over the unstemmed fields, since the parser has no leading wildcards.

use docfind_core::{Corpus, SearchField};
use tantivy::{
    Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
    collector::TopDocs,
    query::{AllQuery, BooleanQuery, BoostQuery, Occur, Query, QueryParser, RegexQuery, TermQuery},
    schema::{Field, IndexRecordOption, Value},
};
use tracing::{debug, info};

use crate::{
    DocIndex, Hit, Result, SearchError,
    query::{Clause, Presence, parse_query},
    schema::{SearchFields, create_search_schema, register_tokenizers},
    tokenize::Analyzer,
};

/// Memory budget for the single indexing thread (in bytes).
const MEMORY_BUDGET: usize = 50_000_000;

/// In-RAM Tantivy index over the corpus.
pub struct TantivyIndex {
    index: Index,
    reader: IndexReader,
    fields: SearchFields,
    document_count: usize,
}

impl std::fmt::Debug for TantivyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyIndex")
            .field("fields", &self.fields)
            .field("document_count", &self.document_count)
            .finish()
    }
}

impl TantivyIndex {
    /// Build a boolean query from lunr-style clauses.
    ///
    /// Returns `None` when no clause survives parsing.
    fn clause_query(&self, query: &str) -> Result<Option<Box<dyn Query>>> {
        let clauses = parse_query(query)?;
        if clauses.is_empty() {
            return Ok(None);
        }

        let analyzer = Analyzer::new();
        let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(clauses.len() + 1);
        let mut any_positive = false;

        for clause in &clauses {
            let occur = match clause.presence {
                Presence::Optional => Occur::Should,
                Presence::Required => Occur::Must,
                Presence::Prohibited => Occur::MustNot,
            };
            any_positive |= clause.presence != Presence::Prohibited;
            subqueries.push((occur, self.single_clause(&analyzer, clause)?));
        }

        // A purely negative boolean query matches nothing on its own
        if !any_positive {
            subqueries.push((Occur::Must, Box::new(AllQuery)));
        }

        Ok(Some(Box::new(BooleanQuery::new(subqueries))))
    }

    /// One clause across every field it is scoped to.
    fn single_clause(&self, analyzer: &Analyzer, clause: &Clause) -> Result<Box<dyn Query>> {
        let fields: Vec<SearchField> = match clause.field {
            Some(field) => vec![field],
            None => self.fields.search_fields().collect(),
        };

        let mut alternatives: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(fields.len());
        for field in fields {
            let query: Box<dyn Query> = if clause.is_wildcard() {
                let raw = self.indexed(self.fields.raw_field_for(field), field)?;
                let regex = RegexQuery::from_pattern(&wildcard_pattern(clause), raw)
                    .map_err(|e| SearchError::Query(e.to_string()))?;
                Box::new(regex)
            } else {
                let stemmed = self.indexed(self.fields.field_for(field), field)?;
                let term = Term::from_field_text(stemmed, &analyzer.stem(&clause.term));
                Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs))
            };
            alternatives.push((Occur::Should, query));
        }

        let query: Box<dyn Query> = Box::new(BooleanQuery::new(alternatives));
        if clause.boost == 1.0 {
            Ok(query)
        } else {
            Ok(Box::new(BoostQuery::new(query, clause.boost)))
        }
    }

    fn indexed(&self, handle: Option<Field>, field: SearchField) -> Result<Field> {
        handle.ok_or_else(|| {
            SearchError::query(format!("field '{}' is not indexed", field.as_str()))
        })
    }
}

/// Regular expression for a wildcard clause.
///
/// Clause terms are alphanumeric, so they need no escaping.
fn wildcard_pattern(clause: &Clause) -> String {
    let mut pattern = String::with_capacity(clause.term.len() + 4);
    if clause.leading_wildcard {
        pattern.push_str(".*");
    }
    pattern.push_str(&clause.term);
    if clause.trailing_wildcard && !clause.term.is_empty() {
        pattern.push_str(".*");
    }
    pattern
}

impl DocIndex for TantivyIndex {
    fn build(corpus: &Corpus, fields: &[SearchField]) -> Result<Self> {
        let (schema, search_fields) = create_search_schema(fields);
        let index = Index::create_in_ram(schema);
        register_tokenizers(&index);

        let mut writer: IndexWriter = index
            .writer_with_num_threads(1, MEMORY_BUDGET)
            .map_err(|e| SearchError::Index(e.to_string()))?;

        for doc in corpus.documents() {
            let mut tantivy_doc = TantivyDocument::new();
            tantivy_doc.add_text(search_fields.reference, &doc.title);

            for (field, handle) in &search_fields.text {
                let text = match field {
                    SearchField::Title => &doc.title,
                    SearchField::Content => &doc.content,
                };
                tantivy_doc.add_text(*handle, text);
                if let Some(raw) = search_fields.raw_field_for(*field) {
                    tantivy_doc.add_text(raw, text);
                }
            }

            writer
                .add_document(tantivy_doc)
                .map_err(|e| SearchError::Index(e.to_string()))?;
        }

        writer
            .commit()
            .map_err(|e| SearchError::Index(e.to_string()))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e: tantivy::TantivyError| SearchError::Index(e.to_string()))?;

        info!(documents = corpus.len(), "Built Tantivy index");
        Ok(Self {
            index,
            reader,
            fields: search_fields,
            document_count: corpus.len(),
        })
    }

    fn search(&self, query: &str) -> Result<Vec<Hit>> {
        let parsed_query = if query.contains('*') {
            match self.clause_query(query)? {
                Some(parsed) => parsed,
                None => return Ok(Vec::new()),
            }
        } else {
            QueryParser::for_index(&self.index, self.fields.text_fields())
                .parse_query(query)
                .map_err(|e| SearchError::Query(e.to_string()))?
        };

        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&parsed_query, &TopDocs::with_limit(self.document_count.max(1)))
            .map_err(|e| SearchError::Index(e.to_string()))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let retrieved: TantivyDocument = searcher
                .doc(doc_address)
                .map_err(|e| SearchError::Index(e.to_string()))?;

            if let Some(reference) = retrieved
                .get_first(self.fields.reference)
                .and_then(|v| v.as_str())
            {
                hits.push(Hit {
                    reference: reference.to_string(),
                    score,
                });
            }
        }

        debug!(query, hits = hits.len(), "Tantivy search");
        Ok(hits)
    }

    fn document_count(&self) -> usize {
        self.document_count
    }
}

#[cfg(test)]
mod tests {
    use docfind_core::Document;

    use super::*;

    fn create_test_corpus() -> Corpus {
        Corpus::new(vec![
            Document::new(
                "Getting Started",
                "/docs/getting-started",
                "Add the dependency to your build and create a client.",
            ),
            Document::new(
                "Intro",
                "/docs/",
                "The motivations behind a type-safe Slack client.",
            ),
        ])
    }

    #[test]
    fn test_build_and_search() {
        let index = TantivyIndex::build(&create_test_corpus(), &[SearchField::Content]).unwrap();
        assert_eq!(index.document_count(), 2);

        let hits = index.search("motivations").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reference, "Intro");
        assert!(hits[0].score > 0.0);
    }

    #[test]
    fn test_stemmed_match() {
        let index = TantivyIndex::build(&create_test_corpus(), &[SearchField::Content]).unwrap();
        let hits = index.search("motivation").unwrap();
        assert_eq!(hits[0].reference, "Intro");
    }

    #[test]
    fn test_client_matches_both() {
        let index = TantivyIndex::build(&create_test_corpus(), &[SearchField::Content]).unwrap();
        assert_eq!(index.search("client").unwrap().len(), 2);
    }

    #[test]
    fn test_title_field() {
        let fields = [SearchField::Title, SearchField::Content];
        let index = TantivyIndex::build(&create_test_corpus(), &fields).unwrap();
        let hits = index.search("title:started").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reference, "Getting Started");
    }

    #[test]
    fn test_wildcard_fragments_and_whole_words() {
        let index = TantivyIndex::build(&create_test_corpus(), &[SearchField::Content]).unwrap();
        for query in ["*motiv*", "*motivation*", "*motivations*", "motiv*", "*ations"] {
            let hits = index.search(query).unwrap();
            assert_eq!(hits.len(), 1, "expected one hit for {query:?}");
            assert_eq!(hits[0].reference, "Intro");
        }
        assert_eq!(index.search("*").unwrap().len(), 2);
    }

    #[test]
    fn test_wildcard_with_presence_and_field() {
        let fields = [SearchField::Title, SearchField::Content];
        let index = TantivyIndex::build(&create_test_corpus(), &fields).unwrap();

        let hits = index.search("*client* -*motiv*").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reference, "Getting Started");

        let hits = index.search("title:*start*").unwrap();
        assert_eq!(hits[0].reference, "Getting Started");

        let hits = index.search("-*motiv*").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_wildcard_on_unindexed_field_is_a_query_error() {
        let index = TantivyIndex::build(&create_test_corpus(), &[SearchField::Content]).unwrap();
        for query in ["title:*start*", "nosuchfield:*slack*"] {
            let err = index.search(query).unwrap_err();
            assert!(matches!(err, SearchError::Query(_)), "{query:?}");
        }
    }

    #[test]
    fn test_wildcard_pattern() {
        let clauses = parse_query("*rate* pagin* *ing *").unwrap();
        let patterns: Vec<String> = clauses.iter().map(wildcard_pattern).collect();
        assert_eq!(patterns, vec![".*rate.*", "pagin.*", ".*ing", ".*"]);
    }

    #[test]
    fn test_unknown_field_is_a_query_error() {
        let index = TantivyIndex::build(&create_test_corpus(), &[SearchField::Content]).unwrap();
        let err = index.search("nosuchfield:slack").unwrap_err();
        assert!(matches!(err, SearchError::Query(_)));
    }
}
