//! Browser tests for the `web-sys` dropdown view.
//!
//! Run with `wasm-pack test --headless --firefox crates/docfind-ui`.

#![cfg(target_arch = "wasm32")]

use docfind_core::WidgetConfig;
use docfind_ui::{DomView, DropdownView, ResultEntry, Target};
use wasm_bindgen_test::*;
use web_sys::{Document, Element};

wasm_bindgen_test_configure!(run_in_browser);

struct Page {
    document: Document,
    input: Element,
    list: Element,
}

/// Fresh search markup appended to the body.
fn create_page() -> Page {
    let document = web_sys::window().unwrap().document().unwrap();
    if let Some(old) = document.get_element_by_id("search-dropdown") {
        old.remove();
    }

    let container = document.create_element("div").unwrap();
    container.set_id("search-dropdown");
    let input = document.create_element("input").unwrap();
    input.set_id("search-bar");
    let list = document.create_element("ul").unwrap();
    list.set_id("search-dropdown-content");

    container.append_child(&input).unwrap();
    container.append_child(&list).unwrap();
    document.body().unwrap().append_child(&container).unwrap();

    Page {
        document,
        input,
        list,
    }
}

fn create_entries() -> Vec<ResultEntry> {
    vec![
        ResultEntry {
            id: "result-0".to_string(),
            name: "Intro".to_string(),
            url: "/docs/".to_string(),
        },
        ResultEntry {
            id: "result-1".to_string(),
            name: "<b>Pagination</b>".to_string(),
            url: "/docs/web-api/pagination".to_string(),
        },
    ]
}

fn select(document: &Document, selector: &str) -> Element {
    document
        .query_selector(selector)
        .unwrap()
        .unwrap_or_else(|| panic!("no element matches {selector}"))
}

#[wasm_bindgen_test]
fn test_render_builds_linked_rows() {
    let page = create_page();
    let mut view = DomView::new(page.document.clone(), WidgetConfig::default());
    view.render(&create_entries());

    assert_eq!(page.list.child_element_count(), 2);

    let item = select(&page.document, "#search-dropdown-content > li#result-0");
    assert_eq!(item.get_attribute("class").as_deref(), Some("dropdown-item"));

    let link = select(&page.document, "#result-0 > a.dropdown-item-link");
    assert_eq!(link.get_attribute("href").as_deref(), Some("/docs/"));
    assert_eq!(link.get_attribute("title").as_deref(), Some("Intro"));

    let text = select(&page.document, "#result-0 > a > span.dropdown-item-link-text");
    assert_eq!(text.text_content().as_deref(), Some("Intro"));
}

#[wasm_bindgen_test]
fn test_render_sets_titles_as_text() {
    let page = create_page();
    let mut view = DomView::new(page.document.clone(), WidgetConfig::default());
    view.render(&create_entries());

    let text = select(&page.document, "#result-1 span.dropdown-item-link-text");
    assert_eq!(text.child_element_count(), 0);
    assert_eq!(text.text_content().as_deref(), Some("<b>Pagination</b>"));
}

#[wasm_bindgen_test]
fn test_render_replaces_previous_rows() {
    let page = create_page();
    let mut view = DomView::new(page.document.clone(), WidgetConfig::default());
    view.render(&create_entries());
    view.render(&create_entries()[..1]);

    assert_eq!(page.list.child_element_count(), 1);
    assert!(page.document.get_element_by_id("result-1").is_none());

    view.render(&[]);
    assert_eq!(page.list.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn test_classify_targets() {
    let page = create_page();
    let mut view = DomView::new(page.document.clone(), WidgetConfig::default());
    view.render(&create_entries());

    assert_eq!(view.classify(Some(page.input.clone().into())), Target::SearchInput);

    let second = select(&page.document, "#result-1 > a");
    assert_eq!(view.classify(Some(second.into())), Target::Entry(1));

    let body = page.document.body().unwrap();
    assert_eq!(view.classify(Some(body.into())), Target::Elsewhere);
    assert_eq!(view.classify(Some(page.list.clone().into())), Target::Elsewhere);
    assert_eq!(view.classify(None), Target::Elsewhere);
}

#[wasm_bindgen_test]
fn test_show_hide_and_focus() {
    let page = create_page();
    let mut view = DomView::new(page.document.clone(), WidgetConfig::default());

    view.show();
    assert!(page.list.class_list().contains("show"));
    view.hide();
    assert!(!page.list.class_list().contains("show"));

    view.render(&create_entries());
    assert!(view.focus_entry(1));
    let second = select(&page.document, "#result-1 > a");
    assert!(second.is_same_node(page.document.active_element().as_deref()));
    assert!(!view.focus_entry(2));
}
