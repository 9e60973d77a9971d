//! In-memory inverted index for the browser.
//!
//! Provides a lightweight alternative to Tantivy that builds in a single
//! pass and has no threading requirements, so it runs unchanged in
//! WebAssembly.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use docfind_core::{Corpus, SearchField};
use tracing::{debug, info};

use crate::{
    DocIndex, Hit, Result, SearchError,
    query::{Clause, Presence, parse_query},
    tokenize::Analyzer,
};

/// One occurrence record: a term appears `frequency` times in `field` of `doc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Document position in the corpus.
    pub doc: usize,

    /// Field the term occurs in.
    pub field: SearchField,

    /// Number of occurrences.
    pub frequency: u32,
}

/// A simple inverted index keyed by stemmed term.
#[derive(Debug, Clone)]
pub struct TermIndex {
    /// Indexed fields.
    pub fields: Vec<SearchField>,

    /// Document references (titles) in corpus order.
    pub references: Vec<String>,

    /// Inverted index: term -> postings. Ordered so wildcard scans are stable.
    pub postings: BTreeMap<String, Vec<Posting>>,

    /// Lowercased words as written -> the terms they were indexed under.
    /// Wildcard clauses match against these, so a whole typed word still
    /// finds its stem.
    pub words: BTreeMap<String, BTreeSet<String>>,
}

impl TermIndex {
    /// Create an empty index over the given fields.
    pub fn new(fields: &[SearchField]) -> Self {
        Self {
            fields: fields.to_vec(),
            references: Vec::new(),
            postings: BTreeMap::new(),
            words: BTreeMap::new(),
        }
    }

    /// Add one document, returning its position.
    pub fn add_document(
        &mut self,
        analyzer: &Analyzer,
        reference: &str,
        title: &str,
        content: &str,
    ) -> usize {
        let doc = self.references.len();
        self.references.push(reference.to_string());

        for &field in &self.fields {
            let text = match field {
                SearchField::Title => title,
                SearchField::Content => content,
            };

            let mut counts: HashMap<String, u32> = HashMap::new();
            for (word, term) in analyzer.tokens(text) {
                self.words.entry(word).or_default().insert(term.clone());
                *counts.entry(term).or_insert(0) += 1;
            }

            for (term, frequency) in counts {
                self.postings.entry(term).or_default().push(Posting {
                    doc,
                    field,
                    frequency,
                });
            }
        }

        doc
    }

    /// Get term count.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Inverse document frequency of a term with `df` matching documents.
    fn idf(&self, df: usize) -> f32 {
        let n = self.references.len() as f32;
        let df = df as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Score every document matching a single clause.
    fn score_clause(&self, analyzer: &Analyzer, clause: &Clause) -> HashMap<usize, f32> {
        let mut scores = HashMap::new();

        let terms: Vec<(&String, &Vec<Posting>)> = if clause.is_wildcard() {
            let mut matched: BTreeSet<&String> = self
                .postings
                .keys()
                .filter(|term| clause.matches_term(term))
                .collect();
            for (word, indexed_as) in &self.words {
                if clause.matches_term(word) {
                    matched.extend(indexed_as);
                }
            }
            matched
                .into_iter()
                .filter_map(|term| self.postings.get_key_value(term))
                .collect()
        } else {
            let stemmed = analyzer.stem(&clause.term);
            self.postings
                .get_key_value(&stemmed)
                .into_iter()
                .collect()
        };

        for (_, postings) in terms {
            let in_scope: Vec<&Posting> = postings
                .iter()
                .filter(|p| clause.field.is_none_or(|f| f == p.field))
                .collect();
            let df = in_scope
                .iter()
                .map(|p| p.doc)
                .collect::<HashSet<_>>()
                .len();
            let idf = self.idf(df);

            for posting in in_scope {
                let tf = 1.0 + (posting.frequency as f32).ln();
                *scores.entry(posting.doc).or_insert(0.0) += tf * idf * clause.boost;
            }
        }

        scores
    }
}

impl DocIndex for TermIndex {
    fn build(corpus: &Corpus, fields: &[SearchField]) -> Result<Self> {
        let analyzer = Analyzer::new();
        let mut index = Self::new(fields);

        for doc in corpus.documents() {
            index.add_document(&analyzer, &doc.title, &doc.title, &doc.content);
        }

        info!(
            documents = index.references.len(),
            terms = index.postings.len(),
            "Built term index"
        );
        Ok(index)
    }

    /// Search the index.
    ///
    /// With required clauses, documents must match all of them; otherwise any
    /// optional clause is enough. Prohibited clauses always exclude.
    fn search(&self, query: &str) -> Result<Vec<Hit>> {
        let clauses = parse_query(query)?;
        for clause in &clauses {
            if let Some(field) = clause.field
                && !self.fields.contains(&field)
            {
                return Err(SearchError::query(format!(
                    "field '{}' is not indexed",
                    field.as_str()
                )));
            }
        }

        if clauses.is_empty() {
            return Ok(Vec::new());
        }

        let analyzer = Analyzer::new();
        let mut scores: HashMap<usize, f32> = HashMap::new();
        let mut required: Option<HashSet<usize>> = None;
        let mut prohibited: HashSet<usize> = HashSet::new();
        let mut any_positive = false;

        for clause in &clauses {
            let matches = self.score_clause(&analyzer, clause);
            match clause.presence {
                Presence::Prohibited => prohibited.extend(matches.keys().copied()),
                Presence::Required => {
                    any_positive = true;
                    let docs: HashSet<usize> = matches.keys().copied().collect();
                    required = Some(match required {
                        None => docs,
                        Some(current) => current.intersection(&docs).copied().collect(),
                    });
                    for (doc, score) in matches {
                        *scores.entry(doc).or_insert(0.0) += score;
                    }
                }
                Presence::Optional => {
                    any_positive = true;
                    for (doc, score) in matches {
                        *scores.entry(doc).or_insert(0.0) += score;
                    }
                }
            }
        }

        // Only prohibited clauses: everything else matches with no score.
        if !any_positive {
            scores = (0..self.references.len()).map(|doc| (doc, 0.0)).collect();
        }

        let mut ranked: Vec<(usize, f32)> = scores
            .into_iter()
            .filter(|(doc, _)| !prohibited.contains(doc))
            .filter(|(doc, _)| required.as_ref().is_none_or(|r| r.contains(doc)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        debug!(query, hits = ranked.len(), "Term index search");

        Ok(ranked
            .into_iter()
            .map(|(doc, score)| Hit {
                reference: self.references[doc].clone(),
                score,
            })
            .collect())
    }

    fn document_count(&self) -> usize {
        self.references.len()
    }
}
