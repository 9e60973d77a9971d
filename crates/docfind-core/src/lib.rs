//! docfind Core Library
//!
//! Documents, the embedded corpus, configuration, and error handling shared by
//! the docfind search widget.

pub mod config;
pub mod document;
pub mod error;

pub use config::{Config, QueryMode, SearchConfig, SearchField, WidgetConfig};
pub use document::{Corpus, DocMap, Document};
pub use error::{CoreError, Result};
