//! Host document capability.
//!
//! The dropdown never touches a concrete DOM. Everything it needs from the
//! host (finding elements, reading and writing text, attributes, form
//! properties and class markers, and registering listeners) goes through the
//! [`Dom`] trait. The browser implementation lives in `selectmirror::browser`;
//! `selectmirror-test` provides an in-memory one.
//!
//! # Re-entrancy
//!
//! All methods take `&self`. A host must not hold internal borrows while it
//! runs listeners from [`Dom::dispatch`]: a change observer is allowed to
//! call straight back into the dropdown, which calls back into the host.

use crate::event::{DomEvent, EventKind, Listener};
use crate::node::{ListenerId, NodeId};

/// Operations the host document must provide.
pub trait Dom {
    // === Structure ===

    /// Upper-case tag name (`"SELECT"`, `"OPTION"`, ...), `None` for an
    /// unknown node.
    fn tag_name(&self, node: NodeId) -> Option<String>;

    /// Direct element children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Descendants of `node` with the given tag, in document order.
    fn find(&self, node: NodeId, tag: &str) -> Vec<NodeId>;

    /// Parent element, if attached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> NodeId;

    /// Append `child` as the last child of `parent`.
    fn append_child(&self, parent: NodeId, child: NodeId);

    /// Insert `node` as the previous sibling of `reference`.
    fn insert_before(&self, reference: NodeId, node: NodeId);

    /// Detach `node` and its subtree from the document. A host may release
    /// the handles of the removed subtree; later calls on them are no-ops.
    fn remove(&self, node: NodeId);

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    // === Content ===

    /// Text content.
    fn text(&self, node: NodeId) -> String;

    /// Replace the text content.
    fn set_text(&self, node: NodeId, text: &str);

    /// Attribute value, `None` when absent.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Set an attribute.
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    // === Form properties ===

    /// Value property. An `<option>` without a value attribute reports its
    /// text, as native controls do.
    fn value(&self, node: NodeId) -> String;

    /// Set the value property.
    fn set_value(&self, node: NodeId, value: &str);

    /// Disabled property.
    fn is_disabled(&self, node: NodeId) -> bool;

    /// Set the disabled property.
    fn set_disabled(&self, node: NodeId, disabled: bool);

    /// Selected property of an `<option>`.
    fn is_selected(&self, node: NodeId) -> bool;

    /// Set the selected property of an `<option>`. Selecting an option of a
    /// single-select control deselects its siblings.
    fn set_selected(&self, node: NodeId, selected: bool);

    // === Styling ===

    /// Add a class marker.
    fn add_class(&self, node: NodeId, class: &str);

    /// Remove a class marker.
    fn remove_class(&self, node: NodeId, class: &str);

    /// Whether the class marker is present.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    // === Events ===

    /// Register a listener on `node`.
    fn listen(&self, node: NodeId, kind: EventKind, listener: Listener) -> ListenerId;

    /// Register a document-wide pointer-down observer. Removed with
    /// [`unlisten`](Self::unlisten) like any other listener.
    fn listen_global_pointer_down(&self, listener: Listener) -> ListenerId;

    /// Remove a listener. Unknown IDs are ignored.
    fn unlisten(&self, id: ListenerId);

    /// Synchronously fire `kind` at `node` and return the event the
    /// listeners saw. The event bubbles: listeners on `node` run first, then
    /// those on each ancestor up to the document, each group in registration
    /// order. Global pointer-down listeners run last. `current_target` names
    /// the node whose listener is running.
    fn dispatch(&self, node: NodeId, kind: EventKind) -> DomEvent;
}

/// Index of `node` within `siblings`.
#[must_use]
pub fn position_of(siblings: &[NodeId], node: NodeId) -> Option<usize> {
    siblings.iter().position(|&n| n == node)
}
