//! The seam between the widget's logic and the page it draws on.

/// One rendered result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// Positional element id, e.g. `result-0`.
    pub id: String,

    /// Document title, used as link text and tooltip.
    pub name: String,

    /// Link target.
    pub url: String,
}

/// Operations the search widget performs on its results panel.
///
/// Implementations hold whatever handles they need to the rendered rows;
/// the widget addresses rows by position only.
pub trait DropdownView {
    /// Make the results panel visible.
    fn show(&mut self);

    /// Hide the results panel.
    fn hide(&mut self);

    /// Start listening for clicks anywhere on the page.
    fn listen_outside_click(&mut self);

    /// Stop listening for page clicks.
    fn unlisten_outside_click(&mut self);

    /// Start listening for key-down and key-up on the page.
    fn listen_keys(&mut self);

    /// Replace every row of the panel with `entries`, in order.
    fn render(&mut self, entries: &[ResultEntry]);

    /// Move keyboard focus to the row at `index`; `false` if there is none.
    fn focus_entry(&mut self, index: usize) -> bool;
}
