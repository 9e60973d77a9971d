//! Browser implementation of the dropdown, on top of `web-sys`.
//!
//! The page provides the search input and the results container; rows are
//! created here and kept as element handles for keyboard navigation.

use std::{cell::RefCell, rc::Rc};

use docfind_core::{Config, WidgetConfig};
use docfind_search::{SearchService, TermIndex};
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent,
};

use crate::{
    view::{DropdownView, ResultEntry},
    widget::{Handled, Key, SearchWidget, Target},
};

/// The widget as wired into a browser page.
pub type DomWidget = SearchWidget<TermIndex, DomView>;

/// Event callbacks registered on the document.
struct Listeners {
    input_click: Closure<dyn FnMut(MouseEvent)>,
    click: Closure<dyn FnMut(MouseEvent)>,
    keydown: Closure<dyn FnMut(KeyboardEvent)>,
    keyup: Closure<dyn FnMut(KeyboardEvent)>,
}

impl Listeners {
    fn new(widget: &Rc<RefCell<DomWidget>>) -> Self {
        let weak = Rc::downgrade(widget);
        let input_click = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
            ev.prevent_default();
            ev.stop_propagation();
            if let Some(widget) = weak.upgrade()
                && let Ok(mut widget) = widget.try_borrow_mut()
            {
                let _ = widget.open();
            }
        });

        let weak = Rc::downgrade(widget);
        let click = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
            if let Some(widget) = weak.upgrade()
                && let Ok(mut widget) = widget.try_borrow_mut()
            {
                let target = widget.view().classify(ev.target());
                widget.on_click(target);
            }
        });

        let weak = Rc::downgrade(widget);
        let keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |ev: KeyboardEvent| {
            if let Some(widget) = weak.upgrade()
                && let Ok(mut widget) = widget.try_borrow_mut()
            {
                let target = widget.view().classify(ev.target());
                let key = Key::from_key_name(&ev.key());
                if widget.on_key_down(key, target) == Handled::Consumed {
                    ev.prevent_default();
                    ev.stop_propagation();
                }
            }
        });

        let weak = Rc::downgrade(widget);
        let keyup = Closure::<dyn FnMut(KeyboardEvent)>::new(move |ev: KeyboardEvent| {
            if let Some(widget) = weak.upgrade()
                && let Ok(mut widget) = widget.try_borrow_mut()
            {
                let target = widget.view().classify(ev.target());
                let key = Key::from_key_name(&ev.key());
                let value = ev
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                widget.on_key_up(key, target, &value);
            }
        });

        Self {
            input_click,
            click,
            keydown,
            keyup,
        }
    }
}

/// Results panel backed by real DOM nodes.
pub struct DomView {
    document: Document,
    config: WidgetConfig,
    entries: Vec<HtmlElement>,
    listeners: Option<Listeners>,
}

impl DomView {
    /// Create a view over the given document.
    pub fn new(document: Document, config: WidgetConfig) -> Self {
        Self {
            document,
            config,
            entries: Vec::new(),
            listeners: None,
        }
    }

    /// Map an event target to the part of the widget it belongs to.
    pub fn classify(&self, target: Option<EventTarget>) -> Target {
        let Some(element) = target.and_then(|t| t.dyn_into::<Element>().ok()) else {
            return Target::Elsewhere;
        };

        if element.id() == self.config.input_id {
            return Target::SearchInput;
        }

        self.entries
            .iter()
            .position(|link| link.is_same_node(Some(&*element)))
            .map_or(Target::Elsewhere, Target::Entry)
    }

    fn dropdown(&self) -> Option<Element> {
        self.document.get_element_by_id(&self.config.dropdown_id)
    }

    fn listen(&self, event: &str, callback: &JsValue) {
        if let Err(err) = self
            .document
            .add_event_listener_with_callback(event, callback.unchecked_ref())
        {
            tracing::warn!(event, error = ?err, "Failed to add listener");
        }
    }

    fn unlisten(&self, event: &str, callback: &JsValue) {
        if let Err(err) = self
            .document
            .remove_event_listener_with_callback(event, callback.unchecked_ref())
        {
            tracing::warn!(event, error = ?err, "Failed to remove listener");
        }
    }

    fn try_render(&mut self, dropdown: &Element, entries: &[ResultEntry]) -> Result<(), JsValue> {
        while let Some(child) = dropdown.first_child() {
            dropdown.remove_child(&child)?;
        }
        self.entries.clear();

        for entry in entries {
            let item = self.document.create_element("li")?;
            item.set_attribute("class", "dropdown-item")?;
            item.set_attribute("id", &entry.id)?;

            let link: HtmlElement = self.document.create_element("a")?.dyn_into()?;
            link.set_attribute("title", &entry.name)?;
            link.set_attribute("href", &entry.url)?;
            link.set_attribute("class", "dropdown-item-link")?;

            let text = self.document.create_element("span")?;
            text.set_attribute("class", "dropdown-item-link-text")?;
            text.set_text_content(Some(&entry.name));

            link.append_child(&text)?;
            item.append_child(&link)?;
            dropdown.append_child(&item)?;
            self.entries.push(link);
        }

        Ok(())
    }
}

impl DropdownView for DomView {
    fn show(&mut self) {
        if let Some(dropdown) = self.dropdown() {
            let _ = dropdown.class_list().add_1(&self.config.show_class);
        }
    }

    fn hide(&mut self) {
        if let Some(dropdown) = self.dropdown() {
            let _ = dropdown.class_list().remove_1(&self.config.show_class);
        }
    }

    fn listen_outside_click(&mut self) {
        if let Some(listeners) = &self.listeners {
            self.listen("click", listeners.click.as_ref());
        }
    }

    fn unlisten_outside_click(&mut self) {
        if let Some(listeners) = &self.listeners {
            self.unlisten("click", listeners.click.as_ref());
        }
    }

    fn listen_keys(&mut self) {
        if let Some(listeners) = &self.listeners {
            self.listen("keydown", listeners.keydown.as_ref());
            self.listen("keyup", listeners.keyup.as_ref());
        }
    }

    fn render(&mut self, entries: &[ResultEntry]) {
        let Some(dropdown) = self.dropdown() else {
            return;
        };
        if let Err(err) = self.try_render(&dropdown, entries) {
            tracing::warn!(error = ?err, "Failed to render search results");
        }
    }

    fn focus_entry(&mut self, index: usize) -> bool {
        self.entries
            .get(index)
            .is_some_and(|link| link.focus().is_ok())
    }
}

/// Keeps an attached widget and its callbacks alive.
pub struct WidgetHandle {
    widget: Rc<RefCell<DomWidget>>,
}

impl WidgetHandle {
    /// Shared access to the widget.
    pub fn widget(&self) -> &Rc<RefCell<DomWidget>> {
        &self.widget
    }

    /// Keep the widget alive for the rest of the page session.
    pub fn leak(self) {
        std::mem::forget(self);
    }
}

/// Wire the search widget into the current page.
///
/// Expects the input and results container named in `config.widget` to
/// exist. The index over the embedded corpus is built on the first click.
pub fn attach(config: Config) -> Result<WidgetHandle, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let input = document
        .get_element_by_id(&config.widget.input_id)
        .ok_or_else(|| {
            JsValue::from_str(&format!("missing element #{}", config.widget.input_id))
        })?;

    let service = SearchService::<TermIndex>::embedded(config.search)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let view = DomView::new(document, config.widget.clone());
    let widget = Rc::new(RefCell::new(SearchWidget::new(service, view, config.widget)));

    let listeners = Listeners::new(&widget);
    input.add_event_listener_with_callback(
        "click",
        listeners.input_click.as_ref().unchecked_ref(),
    )?;
    widget.borrow_mut().view_mut().listeners = Some(listeners);

    tracing::debug!("Search widget attached");
    Ok(WidgetHandle { widget })
}
