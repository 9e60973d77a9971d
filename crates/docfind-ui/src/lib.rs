//! docfind UI
//!
//! The in-page search dropdown for a static documentation site.
//!
//! # Pieces
//!
//! - [`SearchWidget`] - dispatcher owning widget state; one handler per event
//! - [`DropdownView`] - what the widget needs from the page
//! - [`DomView`] / [`attach`] - `web-sys` implementation wired to existing markup
//! - [`SearchDropdown`] - Leptos component that renders the markup and attaches
//!
//! # Example
//!
//! ```ignore
//! use docfind_core::Config;
//!
//! // Page already contains #search-bar and #search-dropdown-content
//! docfind_ui::attach(Config::default())?.leak();
//! ```

pub mod component;
pub mod dom;
pub mod view;
pub mod widget;

pub use component::SearchDropdown;
pub use dom::{DomView, DomWidget, WidgetHandle, attach};
pub use view::{DropdownView, ResultEntry};
pub use widget::{Focus, Handled, Key, SearchWidget, Target};
