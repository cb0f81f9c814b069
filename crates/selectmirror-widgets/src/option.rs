//! Options of a dropdown.
//!
//! Each option is represented twice: by an `<option>` of the real control
//! and by an item of the mock menu, paired by position for the lifetime of
//! the dropdown. [`SelectOption`] holds that pair plus cached copies of the
//! option's index, label, value and disabled flag; [`OptionHandle`] is the
//! public view used to read and change them.

use crate::cached::Cached;
use crate::dropdown::DropdownInner;
use crate::resolver::OptionId;
use selectmirror_core::{classes, position_of, NodeId};
use std::fmt;
use tracing::warn;

/// Per-option state owned by a dropdown.
#[derive(Debug)]
pub(crate) struct SelectOption {
    pub(crate) id: OptionId,
    /// Position at construction
    pub(crate) slot: usize,
    pub(crate) real: NodeId,
    pub(crate) mock: NodeId,
    pub(crate) index: Cached<usize>,
    pub(crate) label: Cached<String>,
    pub(crate) value: Cached<String>,
    pub(crate) disabled: Cached<bool>,
}

impl SelectOption {
    pub(crate) fn new(id: OptionId, slot: usize, real: NodeId, mock: NodeId) -> Self {
        Self {
            id,
            slot,
            real,
            mock,
            index: Cached::empty(),
            label: Cached::empty(),
            value: Cached::empty(),
            disabled: Cached::empty(),
        }
    }
}

/// Borrowed view of one option of a [`Dropdown`](crate::Dropdown).
#[derive(Clone, Copy)]
pub struct OptionHandle<'a> {
    dropdown: &'a DropdownInner,
    position: usize,
}

impl fmt::Debug for OptionHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionHandle")
            .field("id", &self.data().id)
            .field("position", &self.position)
            .finish()
    }
}

impl PartialEq for OptionHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.data().id == other.data().id
    }
}

impl Eq for OptionHandle<'_> {}

impl<'a> OptionHandle<'a> {
    pub(crate) const fn new(dropdown: &'a DropdownInner, position: usize) -> Self {
        Self { dropdown, position }
    }

    fn data(&self) -> &'a SelectOption {
        &self.dropdown.options[self.position]
    }

    /// Stable identity, usable as an [`OptionRef`](crate::OptionRef).
    #[must_use]
    pub fn id(&self) -> OptionId {
        self.data().id
    }

    /// The real `<option>` element.
    #[must_use]
    pub fn real_element(&self) -> NodeId {
        self.data().real
    }

    /// The mock menu item.
    #[must_use]
    pub fn mock_element(&self) -> NodeId {
        self.data().mock
    }

    // =========================================================================
    // Cached Reads
    // =========================================================================

    /// Position among the real control's options.
    ///
    /// With `refresh` the position is recomputed from the document; an
    /// option that was moved out of the control keeps its original slot.
    pub fn get_index(&self, refresh: bool) -> usize {
        let data = self.data();
        data.index.get(refresh, || {
            let dom = &self.dropdown.dom;
            let live: Vec<NodeId> = dom
                .children(self.dropdown.select)
                .into_iter()
                .filter(|&n| dom.tag_name(n).as_deref() == Some("OPTION"))
                .collect();
            position_of(&live, data.real).unwrap_or(data.slot)
        })
    }

    /// Text shown for the option.
    pub fn get_label(&self, refresh: bool) -> String {
        let data = self.data();
        data.label.get(refresh, || self.dropdown.dom.text(data.real))
    }

    /// Underlying value; the label when the option has none.
    pub fn get_value(&self, refresh: bool) -> String {
        let data = self.data();
        data.value.get(refresh, || {
            let value = self.dropdown.dom.value(data.real);
            if value.is_empty() {
                self.get_label(false)
            } else {
                value
            }
        })
    }

    /// Disabled flag.
    pub fn is_disabled(&self, refresh: bool) -> bool {
        let data = self.data();
        data.disabled
            .get(refresh, || self.dropdown.dom.is_disabled(data.real))
    }

    /// Live selected property of the real element. Never cached.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.dropdown.dom.is_selected(self.data().real)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    fn writable(&self, operation: &str) -> bool {
        if self.dropdown.destroyed.get() {
            warn!(operation, "option write on destroyed dropdown ignored");
            return false;
        }
        true
    }

    /// Replace the label on both elements, and in the header when this
    /// option is selected. Returns the label.
    pub fn set_label(&self, label: &str) -> String {
        if !self.writable("set_label") {
            return self.get_label(false);
        }
        let data = self.data();
        data.label.set(label.to_string());
        let dom = &self.dropdown.dom;
        dom.set_text(data.real, label);
        dom.set_text(data.mock, label);
        if self.is_selected() {
            self.dropdown.show_in_header(label);
        }
        label.to_string()
    }

    /// Replace the value of the real element. Returns the value.
    pub fn set_value(&self, value: &str) -> String {
        if !self.writable("set_value") {
            return self.get_value(false);
        }
        let data = self.data();
        data.value.set(value.to_string());
        self.dropdown.dom.set_value(data.real, value);
        value.to_string()
    }

    /// Enable the option on both elements.
    pub fn enable(&self) -> &Self {
        self.set_disabled(false);
        self
    }

    /// Disable the option on both elements.
    pub fn disable(&self) -> &Self {
        self.set_disabled(true);
        self
    }

    fn set_disabled(&self, disabled: bool) {
        if !self.writable(if disabled { "disable" } else { "enable" }) {
            return;
        }
        let data = self.data();
        let dom = &self.dropdown.dom;
        data.disabled.set(disabled);
        dom.set_disabled(data.real, disabled);
        if disabled {
            dom.add_class(data.mock, classes::DISABLED);
        } else {
            dom.remove_class(data.mock, classes::DISABLED);
        }
    }
}
