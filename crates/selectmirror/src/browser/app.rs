//! WASM entry point.

use super::web_dom::WebDom;
use selectmirror_core::Dom;
use selectmirror_widgets::{ChangeSubscription, Dropdown, DropdownConfig};
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::prelude::*;

/// A dropdown driven from JavaScript.
///
/// ```javascript
/// import init, { JsDropdown } from './selectmirror.js';
///
/// await init();
/// const dd = new JsDropdown('country', '{"firstOptionIsPlaceholder": true}');
/// const sub = dd.on_change(() => console.log(dd.selected_value()));
/// dd.select(2);
/// ```
#[wasm_bindgen]
pub struct JsDropdown {
    dropdown: Dropdown,
    subscriptions: Vec<ChangeSubscription>,
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
impl JsDropdown {
    /// Build a dropdown over the `<select>` with the given element ID.
    /// `config` is a JSON object of dropdown options; empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(select_id: &str, config: &str) -> Result<JsDropdown, JsValue> {
        console_error_panic_hook::set_once();

        let config = if config.trim().is_empty() {
            DropdownConfig::default()
        } else {
            DropdownConfig::from_json(config).map_err(to_js)?
        };
        let dom = Rc::new(WebDom::new()?);
        let select = dom
            .by_id(select_id)
            .ok_or_else(|| format!("Element '{select_id}' not found"))?;
        let host: Rc<dyn Dom> = dom;
        let dropdown = Dropdown::new(host, select, config).map_err(to_js)?;
        Ok(Self {
            dropdown,
            subscriptions: Vec::new(),
        })
    }

    /// Build a native `<select>` from a JSON description inside the element
    /// with ID `parent_id`, then a dropdown over it.
    pub fn from_json(parent_id: &str, description: &str, config: &str) -> Result<JsDropdown, JsValue> {
        console_error_panic_hook::set_once();

        let config = if config.trim().is_empty() {
            DropdownConfig::default()
        } else {
            DropdownConfig::from_json(config).map_err(to_js)?
        };
        let dom = Rc::new(WebDom::new()?);
        let parent = dom
            .by_id(parent_id)
            .ok_or_else(|| format!("Element '{parent_id}' not found"))?;
        let host: Rc<dyn Dom> = dom;
        let dropdown = Dropdown::from_json(host, parent, description, config).map_err(to_js)?;
        Ok(Self {
            dropdown,
            subscriptions: Vec::new(),
        })
    }

    /// Select by index. Returns false when nothing was selected.
    pub fn select(&self, index: usize) -> bool {
        self.dropdown
            .select(index)
            .is_some_and(|option| !option.is_disabled(false))
    }

    /// Select the first option with the given value.
    pub fn select_by_value(&self, value: &str) -> bool {
        self.dropdown.select_option_by_value(value).is_some()
    }

    /// Select option 0.
    pub fn reset(&self) {
        self.dropdown.reset_selection();
    }

    /// Index of the selected option.
    pub fn selected_index(&self) -> usize {
        self.dropdown.get_selected_index()
    }

    /// Label of the selected option.
    pub fn selected_label(&self) -> String {
        self.dropdown.get_selected_label()
    }

    /// Value of the selected option.
    pub fn selected_value(&self) -> Option<String> {
        self.dropdown.get_selected_value()
    }

    /// Open the menu.
    pub fn open(&self) {
        self.dropdown.open_mock();
    }

    /// Close the menu.
    pub fn close(&self) {
        self.dropdown.close_mock();
    }

    /// Whether the menu is open.
    pub fn is_open(&self) -> bool {
        self.dropdown.is_mock_open()
    }

    /// Enable the dropdown.
    pub fn enable(&self) {
        self.dropdown.enable();
    }

    /// Disable the dropdown.
    pub fn disable(&self) {
        self.dropdown.disable();
    }

    /// Register a change callback; returns a handle for `off_change`.
    pub fn on_change(&mut self, callback: js_sys::Function) -> f64 {
        let subscription = self.dropdown.on_change(move |event| {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(event.kind.as_str())) {
                warn!(?err, "change callback threw");
            }
        });
        self.subscriptions.push(subscription);
        subscription.as_u64() as f64
    }

    /// Remove a change callback registered with `on_change`.
    pub fn off_change(&mut self, handle: f64) -> bool {
        let Some(at) = self
            .subscriptions
            .iter()
            .position(|s| s.as_u64() as f64 == handle)
        else {
            return false;
        };
        let subscription = self.subscriptions.remove(at);
        self.dropdown.off_change(subscription).is_some()
    }

    /// Tear the dropdown down.
    pub fn destroy(&mut self) {
        self.subscriptions.clear();
        self.dropdown.destroy();
    }
}
