//! Search schema definition for Tantivy.
//!
//! Defines a stored reference field plus, per configured [`SearchField`], a
//! stemmed full-text field and an unstemmed `<name>_raw` field that wildcard
//! patterns run against.

use docfind_core::SearchField;
use tantivy::{
    Index,
    schema::{
        Field, IndexRecordOption, STORED, STRING, Schema, SchemaBuilder, TextFieldIndexing,
        TextOptions,
    },
    tokenizer::{Language, LowerCaser, SimpleTokenizer, Stemmer, TextAnalyzer},
};

/// Name of the stemming tokenizer registered by [`register_tokenizers`].
pub const TOKENIZER_NAME: &str = "docfind";

/// Name of the lowercase-only tokenizer used by the raw fields.
pub const RAW_TOKENIZER_NAME: &str = "docfind_raw";

/// Search schema field references.
#[derive(Debug, Clone)]
pub struct SearchFields {
    /// Document reference, the page title (STRING | STORED).
    pub reference: Field,

    /// Stemmed full-text fields, in configuration order.
    pub text: Vec<(SearchField, Field)>,

    /// Lowercased, unstemmed copies of the text fields.
    pub raw: Vec<(SearchField, Field)>,
}

impl SearchFields {
    /// Stemmed schema field backing a configured search field.
    pub fn field_for(&self, field: SearchField) -> Option<Field> {
        lookup(&self.text, field)
    }

    /// Unstemmed schema field backing a configured search field.
    pub fn raw_field_for(&self, field: SearchField) -> Option<Field> {
        lookup(&self.raw, field)
    }

    /// Configured search fields, in order.
    pub fn search_fields(&self) -> impl Iterator<Item = SearchField> + '_ {
        self.text.iter().map(|(field, _)| *field)
    }

    /// All full-text fields, used as the query parser defaults.
    pub fn text_fields(&self) -> Vec<Field> {
        self.text.iter().map(|(_, handle)| *handle).collect()
    }
}

/// Create the search schema for the given fields.
///
/// Returns the schema and field references for indexing.
pub fn create_search_schema(fields: &[SearchField]) -> (Schema, SearchFields) {
    let mut builder = SchemaBuilder::new();

    // Reference field: exact match, stored to map hits back to documents
    let reference = builder.add_text_field("ref", STRING | STORED);

    // Text fields: searchable, not stored
    let text_options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(TOKENIZER_NAME)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );

    let mut text = Vec::with_capacity(fields.len());
    for &field in fields {
        if text.iter().any(|(f, _)| *f == field) {
            continue;
        }
        let handle = builder.add_text_field(field.as_str(), text_options.clone());
        text.push((field, handle));
    }

    let raw_options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(RAW_TOKENIZER_NAME)
            .set_index_option(IndexRecordOption::Basic),
    );
    let raw = text
        .iter()
        .map(|&(field, _)| {
            let name = format!("{}_raw", field.as_str());
            (field, builder.add_text_field(&name, raw_options.clone()))
        })
        .collect();

    (builder.build(), SearchFields { reference, text, raw })
}

fn lookup(fields: &[(SearchField, Field)], field: SearchField) -> Option<Field> {
    fields
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, handle)| *handle)
}

/// Register the tokenizer used by every text field.
///
/// Lowercases and applies English stemming, matching [`crate::TermIndex`].
pub fn register_tokenizers(index: &Index) {
    let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(Stemmer::new(Language::English))
        .build();

    index.tokenizers().register(TOKENIZER_NAME, tokenizer);

    let raw = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .build();
    index.tokenizers().register(RAW_TOKENIZER_NAME, raw);
}
