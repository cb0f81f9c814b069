//! Test harness for dropdowns running on a [`MemoryDom`].
//!
//! Zero host dependencies - pure Rust testing. The harness builds native
//! `<select>` fixtures and simulates what a user does to them: clicking
//! elements, picking an option through the native control, and clicking
//! somewhere else on the page.

use crate::memory_dom::MemoryDom;
use selectmirror_core::{Dom, EventKind, NodeId};
use std::rc::Rc;

/// Description of one `<option>` in a fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureOption {
    /// Text content
    pub label: String,
    /// Explicit value attribute
    pub value: Option<String>,
    /// Disabled property
    pub disabled: bool,
    /// Selected property
    pub selected: bool,
}

impl FixtureOption {
    /// Option with a label and no value attribute.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set the value attribute.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set selected state.
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Test harness for interacting with a document.
pub struct Harness {
    dom: Rc<MemoryDom>,
    /// Element outside every fixture, target of outside clicks
    outside: NodeId,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Create a harness over a fresh document.
    #[must_use]
    pub fn new() -> Self {
        let dom = Rc::new(MemoryDom::new());
        let outside = dom.create_element("div");
        dom.set_attribute(outside, "id", "outside");
        dom.append_child(dom.body(), outside);
        Self { dom, outside }
    }

    /// The document, shareable with the code under test.
    #[must_use]
    pub fn dom(&self) -> Rc<MemoryDom> {
        Rc::clone(&self.dom)
    }

    /// The document as a `Dom` trait object.
    #[must_use]
    pub fn host(&self) -> Rc<dyn Dom> {
        self.dom.clone()
    }

    /// The element outside clicks land on.
    #[must_use]
    pub const fn outside(&self) -> NodeId {
        self.outside
    }

    // === Fixtures ===

    /// Append a `<select>` whose options have the given labels.
    pub fn add_select(&self, labels: &[&str]) -> NodeId {
        let options: Vec<FixtureOption> = labels.iter().map(|&l| FixtureOption::new(l)).collect();
        self.add_select_with(&options)
    }

    /// Append a `<select>` built from full option descriptions.
    pub fn add_select_with(&self, options: &[FixtureOption]) -> NodeId {
        let select = self.dom.create_element("select");
        self.dom.append_child(self.dom.body(), select);
        for fixture in options {
            let option = self.dom.create_element("option");
            self.dom.append_child(select, option);
            self.dom.set_text(option, &fixture.label);
            if let Some(value) = &fixture.value {
                self.dom.set_value(option, value);
            }
            self.dom.set_disabled(option, fixture.disabled);
            if fixture.selected {
                self.dom.set_selected(option, true);
            }
        }
        select
    }

    // === Event Simulation ===

    /// Simulate a user click: pointer-down followed by click.
    pub fn click(&self, node: NodeId) -> &Self {
        self.dom.dispatch(node, EventKind::PointerDown);
        self.dom.dispatch(node, EventKind::Click);
        self
    }

    /// Simulate a click somewhere outside every fixture.
    pub fn click_outside(&self) -> &Self {
        self.click(self.outside)
    }

    /// Simulate the user picking option `index` through the native control.
    pub fn choose_native(&self, select: NodeId, index: usize) -> &Self {
        if let Some(&option) = self.dom.find(select, "option").get(index) {
            self.dom.set_selected(option, true);
            self.dom.dispatch(select, EventKind::Change);
        }
        self
    }

    // === Queries ===

    /// Index of the natively selected option.
    #[must_use]
    pub fn native_selected_index(&self, select: NodeId) -> Option<usize> {
        self.dom
            .find(select, "option")
            .iter()
            .position(|&o| self.dom.is_selected(o))
    }

    /// Text content of `node`.
    #[must_use]
    pub fn text(&self, node: NodeId) -> String {
        self.dom.text(node)
    }

    // === Assertions ===

    /// Assert that text matches exactly.
    ///
    /// # Panics
    ///
    /// Panics if the text does not match.
    pub fn assert_text(&self, node: NodeId, expected: &str) -> &Self {
        let actual = self.text(node);
        assert_eq!(
            actual, expected,
            "Expected text '{expected}' but got '{actual}' for node {}",
            node.0
        );
        self
    }

    /// Assert that a class marker is present.
    ///
    /// # Panics
    ///
    /// Panics if the class is missing.
    pub fn assert_class(&self, node: NodeId, class: &str) -> &Self {
        assert!(
            self.dom.has_class(node, class),
            "Expected node {} to have class '{class}', has {:?}",
            node.0,
            self.dom.classes(node)
        );
        self
    }

    /// Assert that a class marker is absent.
    ///
    /// # Panics
    ///
    /// Panics if the class is present.
    pub fn assert_no_class(&self, node: NodeId, class: &str) -> &Self {
        assert!(
            !self.dom.has_class(node, class),
            "Expected node {} not to have class '{class}'",
            node.0
        );
        self
    }

    /// Assert which option the native control has selected.
    ///
    /// # Panics
    ///
    /// Panics if a different option is selected.
    pub fn assert_native_selected(&self, select: NodeId, expected: usize) -> &Self {
        let actual = self.native_selected_index(select);
        assert_eq!(
            actual,
            Some(expected),
            "Expected native option {expected} to be selected but got {actual:?}"
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selectmirror_core::DomEvent;
    use std::cell::Cell;

    #[test]
    fn test_fixture_option_builder() {
        let opt = FixtureOption::new("Label").value("v").disabled(true).selected(true);
        assert_eq!(opt.label, "Label");
        assert_eq!(opt.value.as_deref(), Some("v"));
        assert!(opt.disabled);
        assert!(opt.selected);
    }

    #[test]
    fn test_add_select() {
        let h = Harness::new();
        let select = h.add_select(&["A", "B"]);
        let dom = h.dom();
        assert_eq!(dom.tag_name(select).as_deref(), Some("SELECT"));
        assert_eq!(dom.find(select, "option").len(), 2);
        h.assert_native_selected(select, 0);
    }

    #[test]
    fn test_add_select_with() {
        let h = Harness::new();
        let select = h.add_select_with(&[
            FixtureOption::new("A").value("a"),
            FixtureOption::new("B").disabled(true),
            FixtureOption::new("C").selected(true),
        ]);
        let dom = h.dom();
        let options = dom.find(select, "option");
        assert_eq!(dom.value(options[0]), "a");
        assert!(dom.is_disabled(options[1]));
        h.assert_native_selected(select, 2);
    }

    #[test]
    fn test_choose_native_dispatches_change() {
        let h = Harness::new();
        let select = h.add_select(&["A", "B"]);
        let changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&changes);
        h.dom().listen(
            select,
            EventKind::Change,
            Rc::new(move |_: &DomEvent| counter.set(counter.get() + 1)),
        );
        h.choose_native(select, 1);
        assert_eq!(changes.get(), 1);
        h.assert_native_selected(select, 1);
    }

    #[test]
    fn test_choose_native_out_of_range_is_noop() {
        let h = Harness::new();
        let select = h.add_select(&["A"]);
        h.choose_native(select, 5);
        assert_eq!(h.dom().dispatch_count(select, EventKind::Change), 0);
    }

    #[test]
    fn test_click_sends_pointer_down_then_click() {
        let h = Harness::new();
        h.click_outside();
        let dispatched = h.dom().dispatched();
        assert_eq!(dispatched.len(), 2);
        assert_eq!(dispatched[0].kind, EventKind::PointerDown);
        assert_eq!(dispatched[1].kind, EventKind::Click);
        assert_eq!(dispatched[0].target, h.outside());
    }

    #[test]
    #[should_panic(expected = "Expected text")]
    fn test_assert_text_fails() {
        let h = Harness::new();
        h.assert_text(h.outside(), "something");
    }

    #[test]
    fn test_assert_classes() {
        let h = Harness::new();
        h.dom().add_class(h.outside(), "x");
        h.assert_class(h.outside(), "x").assert_no_class(h.outside(), "y");
    }
}
