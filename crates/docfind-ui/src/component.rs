//! Leptos component rendering the search box markup.

use docfind_core::Config;
use leptos::prelude::*;

use crate::dom::attach;

/// Search input plus an empty results panel, wired to the widget on mount.
///
/// Use on pages whose template does not already contain the search markup.
#[component]
pub fn SearchDropdown(
    /// Widget configuration; element ids are taken from `config.widget`.
    #[prop(optional)]
    config: Option<Config>,
    /// Placeholder text for the input.
    #[prop(default = "Search the docs...".to_string())]
    placeholder: String,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let input_id = config.widget.input_id.clone();
    let dropdown_id = config.widget.dropdown_id.clone();

    // Attach once the markup is in the document
    let pending = StoredValue::new(Some(config));
    Effect::new(move |_| {
        let Some(config) = pending.try_update_value(Option::take).flatten() else {
            return;
        };
        match attach(config) {
            Ok(handle) => handle.leak(),
            Err(err) => tracing::error!(error = ?err, "Failed to attach search widget"),
        }
    });

    view! {
      <div id="search-dropdown" class="dropdown">
        <input
          id=input_id
          type="search"
          class="search-input"
          placeholder=placeholder
          autocomplete="off"
          aria-label="Search"
        />
        <ul id=dropdown_id class="dropdown-content"></ul>
      </div>
    }
}
