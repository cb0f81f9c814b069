//! Event wiring between the document and a dropdown.
//!
//! Four kinds of listener drive the engine: the toggle button, each mock
//! item, the real control's change channel and the document-wide
//! pointer-down observer. Every closure holds a [`WeakDropdown`] so the
//! document never keeps a dropdown alive, and a listener that fires after
//! the dropdown is gone does nothing.

use crate::dropdown::{Dropdown, WeakDropdown};
use selectmirror_core::{Dom, DomEvent, EventKind, Listener, ListenerId};
use std::rc::Rc;

/// Host listeners registered for one dropdown.
#[derive(Debug)]
pub(crate) struct Bindings {
    toggle: ListenerId,
    items: Vec<ListenerId>,
    change: ListenerId,
    outside: ListenerId,
}

fn handler(weak: &WeakDropdown, run: fn(&Dropdown, &DomEvent)) -> Listener {
    let weak = weak.clone();
    Rc::new(move |event: &DomEvent| {
        if let Some(dropdown) = weak.upgrade() {
            run(&dropdown, event);
        }
    })
}

impl Bindings {
    /// Register every listener the dropdown needs.
    pub(crate) fn bind(dropdown: &Dropdown) -> Self {
        let dom = dropdown.dom();
        let weak = dropdown.downgrade();

        let toggle = dom.listen(
            dropdown.toggle_element(),
            EventKind::Click,
            handler(&weak, Dropdown::handle_toggle_click),
        );
        let items = dropdown
            .mock_items()
            .iter()
            .map(|&item| {
                dom.listen(
                    item,
                    EventKind::Click,
                    handler(&weak, Dropdown::handle_item_click),
                )
            })
            .collect();
        let change = dom.listen(
            dropdown.real_element(),
            EventKind::Change,
            handler(&weak, Dropdown::handle_native_change),
        );
        let outside =
            dom.listen_global_pointer_down(handler(&weak, Dropdown::handle_pointer_down));

        Self {
            toggle,
            items,
            change,
            outside,
        }
    }

    /// Remove every listener registered by [`bind`](Self::bind).
    pub(crate) fn unbind(self, dom: &dyn Dom) {
        dom.unlisten(self.toggle);
        for item in self.items {
            dom.unlisten(item);
        }
        dom.unlisten(self.change);
        dom.unlisten(self.outside);
    }

    /// Number of host listeners held.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.items.len() + 3
    }
}
