//! Browser entrypoint for the docfind search dropdown.
//!
//! If the page template already contains the search input the widget is
//! attached to it; otherwise the [`SearchDropdown`] component is mounted.

use docfind_core::Config;
use docfind_ui::{SearchDropdown, attach};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

const CONFIG: &str = include_str!("../docfind.toml");

/// Settings compiled into the bundle, or the defaults if they do not parse.
pub fn load_config() -> Config {
    Config::from_toml_str(CONFIG).unwrap_or_else(|err| {
        log::warn!("Invalid docfind.toml, using defaults: {err}");
        Config::default()
    })
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    let config = load_config();
    let has_markup = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&config.widget.input_id))
        .is_some();

    if has_markup {
        match attach(config) {
            Ok(handle) => handle.leak(),
            Err(err) => log::error!("Failed to attach search widget: {err:?}"),
        }
    } else {
        leptos::mount::mount_to_body(move || view! { <SearchDropdown config=config.clone() /> });
    }
}
