//! WASM browser tests - run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use selectmirror::{Dom, Dropdown, DropdownConfig, EventKind, JsDropdown, WebDom};
use std::cell::Cell;
use std::rc::Rc;

fn fixture(labels: &[&str]) -> (Rc<WebDom>, selectmirror::NodeId) {
    let dom = Rc::new(WebDom::new().expect("document"));
    let container = dom.create_element("div");
    dom.append_child(dom.body().expect("body"), container);
    let select = dom.create_element("select");
    dom.append_child(container, select);
    for label in labels {
        let option = dom.create_element("option");
        dom.set_text(option, label);
        dom.append_child(select, option);
    }
    (dom, select)
}

// ============================================================================
// WebDom Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_web_dom_native_select_semantics() {
    let (dom, select) = fixture(&["A", "B", "C"]);
    let options = dom.find(select, "option");
    assert_eq!(options.len(), 3);
    assert_eq!(dom.tag_name(select).as_deref(), Some("SELECT"));
    assert_eq!(dom.value(options[1]), "B");

    dom.set_selected(options[2], true);
    assert!(dom.is_selected(options[2]));
    assert!(!dom.is_selected(options[0]));
}

#[wasm_bindgen_test]
fn test_web_dom_listen_and_unlisten() {
    let (dom, select) = fixture(&["A"]);
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let id = dom.listen(
        select,
        EventKind::Change,
        Rc::new(move |_| seen.set(seen.get() + 1)),
    );
    dom.dispatch(select, EventKind::Change);
    dom.unlisten(id);
    dom.dispatch(select, EventKind::Change);
    assert_eq!(calls.get(), 1);
}

#[wasm_bindgen_test]
fn test_web_dom_unknown_event_target_not_adopted() {
    let (dom, select) = fixture(&["A", "B"]);
    let host: Rc<dyn Dom> = dom.clone();
    let dd = Dropdown::new(host, select, DropdownConfig::default()).expect("dropdown");
    dd.open_mock();
    let before = dom.node_count();

    let document = web_sys::window().and_then(|w| w.document()).expect("document");
    let stranger = document.create_element("span").expect("span");
    document.body().expect("body").append_child(&stranger).expect("append");
    let init = web_sys::EventInit::new();
    init.set_bubbles(true);
    let event = web_sys::Event::new_with_event_init_dict("pointerdown", &init).expect("event");
    stranger.dispatch_event(&event).expect("dispatch");

    assert!(!dd.is_mock_open());
    assert_eq!(dom.node_count(), before);
}

#[wasm_bindgen_test]
fn test_web_dom_remove_releases_subtree() {
    let (dom, select) = fixture(&["A", "B", "C"]);
    let host: Rc<dyn Dom> = dom.clone();
    let dd = Dropdown::new(host, select, DropdownConfig::default()).expect("dropdown");
    let before = dom.node_count();
    let items = dd.mock_items().len();

    dd.destroy();
    assert!(dom.element(dd.mock_element()).is_none());
    assert!(dom.element(dd.toggle_element()).is_none());
    assert!(dom.node_count() <= before - items - 2);
    assert!(dom.element(select).is_some());
}

// ============================================================================
// Dropdown Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_dropdown_over_browser_select() {
    let (dom, select) = fixture(&["A", "B", "C"]);
    let host: Rc<dyn Dom> = dom.clone();
    let dd = Dropdown::new(host, select, DropdownConfig::default()).expect("dropdown");

    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    dd.on_change(move |_| seen.set(seen.get() + 1));

    dd.select(2usize);
    assert_eq!(dd.get_selected_index(), 2);
    assert_eq!(dom.text(dd.toggle_element()), "C");
    assert_eq!(calls.get(), 1);

    dom.dispatch(dd.toggle_element(), EventKind::Click);
    assert!(dd.is_mock_open());
    dom.dispatch(dd.mock_items()[0], EventKind::Click);
    assert!(!dd.is_mock_open());
    assert_eq!(dd.get_selected_index(), 0);

    dd.destroy();
    assert!(dom.parent(dd.mock_element()).is_none());
}

#[wasm_bindgen_test]
fn test_js_dropdown_survives_throwing_callback() {
    let (dom, select) = fixture(&["A", "B", "C"]);
    let element = dom.element(select).expect("select");
    element.set_id("throwing-callback-select");

    let mut dd = JsDropdown::new("throwing-callback-select", "").expect("dropdown");
    let handle = dd.on_change(js_sys::Function::new_no_args("throw new Error('boom')"));
    assert!(dd.select(2));
    assert_eq!(dd.selected_index(), 2);
    assert!(dd.off_change(handle));
    dd.destroy();
}
