//! Search widget dispatcher.
//!
//! [`SearchWidget`] owns the widget state and exposes one handler per page
//! event. Handlers run to completion and mutate the page only through a
//! [`DropdownView`].

use docfind_core::WidgetConfig;
use docfind_search::{DocIndex, SearchResult, SearchService};
use tracing::{debug, error, warn};

use crate::view::{DropdownView, ResultEntry};

/// Keys the widget distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Move to the next result.
    ArrowDown,
    /// Move to the previous result.
    ArrowUp,
    /// Close the dropdown.
    Escape,
    /// Anything else; may change the query text.
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }

    /// Keys that navigate instead of editing the query.
    pub fn is_navigation(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Where an event happened, as far as the widget cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The search text input.
    SearchInput,
    /// The link of the result row at this position.
    Entry(usize),
    /// Anywhere else on the page.
    Elsewhere,
}

/// Which part of the widget holds keyboard focus after the last move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// The search input.
    #[default]
    Input,
    /// The result row at this position.
    Entry(usize),
}

/// Whether a handler consumed the event.
///
/// `Consumed` means the caller should prevent the default action and stop
/// propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Handled {
    /// The widget acted on the event.
    Consumed,
    /// The event is not the widget's concern.
    Ignored,
}

/// The search dropdown: lazy index, typeahead query loop and keyboard
/// navigation over the rendered results.
pub struct SearchWidget<I, V> {
    service: SearchService<I>,
    view: V,
    config: WidgetConfig,
    open: bool,
    click_listening: bool,
    keys_listening: bool,
    entries: Vec<ResultEntry>,
    focus: Focus,
}

impl<I: DocIndex, V: DropdownView> SearchWidget<I, V> {
    /// Create a closed widget. The index is not built yet.
    pub fn new(service: SearchService<I>, view: V, config: WidgetConfig) -> Self {
        Self {
            service,
            view,
            config,
            open: false,
            click_listening: false,
            keys_listening: false,
            entries: Vec::new(),
            focus: Focus::Input,
        }
    }

    /// Whether the results panel is visible.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the outside-click listener is registered.
    pub fn is_listening_for_clicks(&self) -> bool {
        self.click_listening
    }

    /// Currently rendered rows.
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    /// Focus after the last navigation or render.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// The search service.
    pub fn service(&self) -> &SearchService<I> {
        &self.service
    }

    /// The view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the view.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Open the dropdown; the search input was clicked.
    ///
    /// Builds the index on first use. If the build fails the dropdown stays
    /// closed.
    pub fn open(&mut self) -> Handled {
        if let Err(err) = self.service.ensure_built() {
            error!(error = %err, "Failed to build search index");
            return Handled::Consumed;
        }

        if !self.open {
            self.view.show();
            self.open = true;
        }
        if !self.click_listening {
            self.view.listen_outside_click();
            self.click_listening = true;
        }
        if !self.keys_listening {
            self.view.listen_keys();
            self.keys_listening = true;
        }

        Handled::Consumed
    }

    /// Close the dropdown and stop listening for page clicks.
    ///
    /// Key listeners stay registered.
    pub fn close(&mut self) {
        if self.open {
            self.view.hide();
            self.open = false;
        }
        if self.click_listening {
            self.view.unlisten_outside_click();
            self.click_listening = false;
        }
        self.focus = Focus::Input;
    }

    /// A click anywhere on the page.
    pub fn on_click(&mut self, target: Target) {
        if target != Target::SearchInput {
            self.close();
        }
    }

    /// A key went down; handles navigation and Escape.
    pub fn on_key_down(&mut self, key: Key, target: Target) -> Handled {
        if !self.open || target == Target::Elsewhere {
            return Handled::Ignored;
        }

        match key {
            Key::ArrowDown => {
                let next = match target {
                    Target::Entry(i) => i + 1,
                    _ => 0,
                };
                self.move_focus(next);
            }
            Key::ArrowUp => {
                if let Target::Entry(i) = target
                    && i > 0
                {
                    self.move_focus(i - 1);
                }
            }
            Key::Escape => self.close(),
            Key::Other => return Handled::Ignored,
        }

        Handled::Consumed
    }

    /// A key came up; re-runs the query for anything but navigation keys.
    pub fn on_key_up(&mut self, key: Key, target: Target, value: &str) {
        if target != Target::SearchInput || key.is_navigation() || !self.open {
            return;
        }
        self.run_query(value);
    }

    /// Query the index and render the results.
    ///
    /// A failing query is logged and leaves the current rows in place.
    pub fn run_query(&mut self, value: &str) {
        match self.service.query(value) {
            Ok(results) => self.apply_results(results),
            Err(err) => warn!(query = value, error = %err, "Search query failed"),
        }
    }

    fn apply_results(&mut self, results: Vec<SearchResult>) {
        self.entries = results
            .into_iter()
            .enumerate()
            .map(|(i, result)| ResultEntry {
                id: self.config.entry_id(i),
                name: result.name,
                url: result.url,
            })
            .collect();

        if self.open {
            self.view.render(&self.entries);
        }
        self.focus = Focus::Input;
        debug!(entries = self.entries.len(), "Rendered search results");
    }

    fn move_focus(&mut self, index: usize) {
        if index < self.entries.len() && self.view.focus_entry(index) {
            self.focus = Focus::Entry(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_key_name("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_key_name("Down"), Key::ArrowDown);
        assert_eq!(Key::from_key_name("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::from_key_name("Esc"), Key::Escape);
        assert_eq!(Key::from_key_name("Escape"), Key::Escape);
        assert_eq!(Key::from_key_name("m"), Key::Other);
        assert_eq!(Key::from_key_name("Enter"), Key::Other);
    }

    #[test]
    fn test_navigation_keys() {
        assert!(Key::ArrowDown.is_navigation());
        assert!(Key::Escape.is_navigation());
        assert!(!Key::Other.is_navigation());
    }

    #[test]
    fn test_default_focus_is_input() {
        assert_eq!(Focus::default(), Focus::Input);
    }
}
