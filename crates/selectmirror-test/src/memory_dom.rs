//! In-memory document implementing [`Dom`].
//!
//! Zero host dependencies: elements live in an arena keyed by [`NodeId`],
//! listeners in a flat table. Events bubble from the target to the document
//! root; pointer-down additionally reaches the global observers.

use selectmirror_core::{Dom, DomEvent, EventKind, Listener, ListenerId, NodeId};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// One element of the arena.
#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    disabled: bool,
    selected: bool,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Node(NodeId),
    Global,
}

struct ListenerEntry {
    id: ListenerId,
    scope: Scope,
    kind: EventKind,
    listener: Listener,
}

/// A recorded dispatch, for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    /// Event target
    pub target: NodeId,
    /// Event type
    pub kind: EventKind,
}

/// In-memory host document.
pub struct MemoryDom {
    nodes: RefCell<HashMap<NodeId, Element>>,
    listeners: RefCell<Vec<ListenerEntry>>,
    dispatched: RefCell<Vec<Dispatched>>,
    next_node: Cell<u64>,
    next_listener: Cell<u64>,
    document: NodeId,
    body: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create a document with an empty `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let dom = Self {
            nodes: RefCell::new(HashMap::new()),
            listeners: RefCell::new(Vec::new()),
            dispatched: RefCell::new(Vec::new()),
            next_node: Cell::new(0),
            next_listener: Cell::new(0),
            document: NodeId::new(0),
            body: NodeId::new(1),
        };
        let document = dom.create_element("#document");
        let body = dom.create_element("body");
        dom.append_child(document, body);
        debug_assert_eq!(document, dom.document);
        debug_assert_eq!(body, dom.body);
        dom
    }

    /// Document root.
    #[must_use]
    pub const fn document(&self) -> NodeId {
        self.document
    }

    /// The `<body>` element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Whether `node` is reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.document, node)
    }

    /// Class markers of `node`, in insertion order.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes
            .borrow()
            .get(&node)
            .map(|el| el.classes.clone())
            .unwrap_or_default()
    }

    /// Number of live listeners (node-scoped and global).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of live listeners attached to `node`.
    #[must_use]
    pub fn listeners_on(&self, node: NodeId) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|entry| entry.scope == Scope::Node(node))
            .count()
    }

    /// Number of live global pointer-down observers.
    #[must_use]
    pub fn global_listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|entry| entry.scope == Scope::Global)
            .count()
    }

    /// Every dispatch since creation (or the last [`clear_dispatched`](Self::clear_dispatched)).
    #[must_use]
    pub fn dispatched(&self) -> Vec<Dispatched> {
        self.dispatched.borrow().clone()
    }

    /// How many `kind` events targeted `node`.
    #[must_use]
    pub fn dispatch_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.dispatched
            .borrow()
            .iter()
            .filter(|d| d.target == node && d.kind == kind)
            .count()
    }

    /// Forget recorded dispatches.
    pub fn clear_dispatched(&self) {
        self.dispatched.borrow_mut().clear();
    }

    fn alloc_node(&self) -> NodeId {
        let id = NodeId::new(self.next_node.get());
        self.next_node.set(self.next_node.get() + 1);
        id
    }

    fn alloc_listener(&self) -> ListenerId {
        let id = ListenerId::new(self.next_listener.get());
        self.next_listener.set(self.next_listener.get() + 1);
        id
    }

    fn with_element<R>(&self, node: NodeId, f: impl FnOnce(&Element) -> R) -> Option<R> {
        self.nodes.borrow().get(&node).map(f)
    }

    fn with_element_mut<R>(&self, node: NodeId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        self.nodes.borrow_mut().get_mut(&node).map(f)
    }

    fn detach(&self, node: NodeId) {
        let parent = self.with_element_mut(node, |el| el.parent.take()).flatten();
        if let Some(parent) = parent {
            self.with_element_mut(parent, |el| el.children.retain(|&c| c != node));
        }
    }

    fn is_option(&self, node: NodeId) -> bool {
        self.with_element(node, |el| el.tag == "OPTION")
            .unwrap_or(false)
    }

    /// Options sharing `node`'s parent.
    fn sibling_options(&self, node: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(node) else {
            return vec![node];
        };
        self.children(parent)
            .into_iter()
            .filter(|&c| self.is_option(c))
            .collect()
    }

    /// Native selectedness: the explicitly selected option, else the first
    /// enabled one.
    fn effective_selected(&self, options: &[NodeId]) -> Option<NodeId> {
        options
            .iter()
            .copied()
            .find(|&o| self.with_element(o, |el| el.selected).unwrap_or(false))
            .or_else(|| options.iter().copied().find(|&o| !self.is_disabled(o)))
    }

    /// Path from `node` up to the document root.
    fn ancestry(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path
    }

    fn snapshot(&self, scope: Scope, kind: EventKind) -> Vec<(ListenerId, Listener)> {
        self.listeners
            .borrow()
            .iter()
            .filter(|entry| entry.scope == scope && entry.kind == kind)
            .map(|entry| (entry.id, Rc::clone(&entry.listener)))
            .collect()
    }

    fn is_live(&self, id: ListenerId) -> bool {
        self.listeners.borrow().iter().any(|entry| entry.id == id)
    }

    fn run(&self, listeners: Vec<(ListenerId, Listener)>, event: &DomEvent) {
        // No borrow is held here: listeners may re-enter the document.
        for (id, listener) in listeners {
            if self.is_live(id) {
                listener(event);
            }
        }
    }
}

impl Dom for MemoryDom {
    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.with_element(node, |el| el.tag.clone())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_element(node, |el| el.children.clone())
            .unwrap_or_default()
    }

    fn find(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_uppercase();
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            if self.tag_name(current).as_deref() == Some(tag.as_str()) {
                found.push(current);
            }
            stack.extend(self.children(current).into_iter().rev());
        }
        found
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.with_element(node, |el| el.parent).flatten()
    }

    fn create_element(&self, tag: &str) -> NodeId {
        let id = self.alloc_node();
        self.nodes.borrow_mut().insert(
            id,
            Element {
                tag: tag.to_ascii_uppercase(),
                ..Element::default()
            },
        );
        id
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.with_element_mut(parent, |el| el.children.push(child));
        self.with_element_mut(child, |el| el.parent = Some(parent));
    }

    fn insert_before(&self, reference: NodeId, node: NodeId) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        self.detach(node);
        self.with_element_mut(parent, |el| {
            let at = el
                .children
                .iter()
                .position(|&c| c == reference)
                .unwrap_or(el.children.len());
            el.children.insert(at, node);
        });
        self.with_element_mut(node, |el| el.parent = Some(parent));
    }

    fn remove(&self, node: NodeId) {
        self.detach(node);
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestry(node).contains(&ancestor)
    }

    fn text(&self, node: NodeId) -> String {
        let (own, children) = self
            .with_element(node, |el| (el.text.clone(), el.children.clone()))
            .unwrap_or_default();
        children
            .into_iter()
            .fold(own, |mut acc, child| {
                acc.push_str(&self.text(child));
                acc
            })
    }

    fn set_text(&self, node: NodeId, text: &str) {
        for child in self.children(node) {
            self.detach(child);
        }
        self.with_element_mut(node, |el| el.text = text.to_string());
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_element(node, |el| el.attributes.get(name).cloned())
            .flatten()
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.with_element_mut(node, |el| {
            el.attributes.insert(name.to_string(), value.to_string());
        });
    }

    fn value(&self, node: NodeId) -> String {
        match self.tag_name(node).as_deref() {
            Some("OPTION") => self
                .attribute(node, "value")
                .unwrap_or_else(|| self.text(node)),
            Some("SELECT") => {
                let options = self.find(node, "option");
                self.effective_selected(&options)
                    .map(|o| self.value(o))
                    .unwrap_or_default()
            }
            _ => self.attribute(node, "value").unwrap_or_default(),
        }
    }

    fn set_value(&self, node: NodeId, value: &str) {
        self.set_attribute(node, "value", value);
    }

    fn is_disabled(&self, node: NodeId) -> bool {
        self.with_element(node, |el| el.disabled).unwrap_or(false)
    }

    fn set_disabled(&self, node: NodeId, disabled: bool) {
        self.with_element_mut(node, |el| el.disabled = disabled);
    }

    fn is_selected(&self, node: NodeId) -> bool {
        if !self.is_option(node) {
            return false;
        }
        let siblings = self.sibling_options(node);
        self.effective_selected(&siblings) == Some(node)
    }

    fn set_selected(&self, node: NodeId, selected: bool) {
        if selected {
            for sibling in self.sibling_options(node) {
                self.with_element_mut(sibling, |el| el.selected = false);
            }
        }
        self.with_element_mut(node, |el| el.selected = selected);
    }

    fn add_class(&self, node: NodeId, class: &str) {
        self.with_element_mut(node, |el| {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        self.with_element_mut(node, |el| el.classes.retain(|c| c != class));
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.with_element(node, |el| el.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn listen(&self, node: NodeId, kind: EventKind, listener: Listener) -> ListenerId {
        let id = self.alloc_listener();
        self.listeners.borrow_mut().push(ListenerEntry {
            id,
            scope: Scope::Node(node),
            kind,
            listener,
        });
        id
    }

    fn listen_global_pointer_down(&self, listener: Listener) -> ListenerId {
        let id = self.alloc_listener();
        self.listeners.borrow_mut().push(ListenerEntry {
            id,
            scope: Scope::Global,
            kind: EventKind::PointerDown,
            listener,
        });
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|entry| entry.id != id);
    }

    fn dispatch(&self, node: NodeId, kind: EventKind) -> DomEvent {
        self.dispatched.borrow_mut().push(Dispatched { target: node, kind });
        let event = DomEvent::new(kind, node);
        for current in self.ancestry(node) {
            let at_node = DomEvent::new(kind, node).with_current_target(current);
            self.run(self.snapshot(Scope::Node(current), kind), &at_node);
            if at_node.default_prevented() {
                event.prevent_default();
            }
        }
        if kind == EventKind::PointerDown {
            let at_document = DomEvent::new(kind, node).with_current_target(self.document);
            self.run(self.snapshot(Scope::Global, kind), &at_document);
            if at_document.default_prevented() {
                event.prevent_default();
            }
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select_with(dom: &MemoryDom, labels: &[&str]) -> (NodeId, Vec<NodeId>) {
        let select = dom.create_element("select");
        dom.append_child(dom.body(), select);
        let options = labels
            .iter()
            .map(|label| {
                let option = dom.create_element("option");
                dom.set_text(option, label);
                dom.append_child(select, option);
                option
            })
            .collect();
        (select, options)
    }

    // =========================================================================
    // Structure Tests
    // =========================================================================

    #[test]
    fn test_new_has_body() {
        let dom = MemoryDom::new();
        assert_eq!(dom.tag_name(dom.body()).as_deref(), Some("BODY"));
        assert_eq!(dom.parent(dom.body()), Some(dom.document()));
        assert!(dom.is_attached(dom.body()));
    }

    #[test]
    fn test_tag_name_uppercased() {
        let dom = MemoryDom::new();
        let el = dom.create_element("select");
        assert_eq!(dom.tag_name(el).as_deref(), Some("SELECT"));
        assert_eq!(dom.tag_name(NodeId::new(999)), None);
    }

    #[test]
    fn test_find_document_order() {
        let dom = MemoryDom::new();
        let ul = dom.create_element("ul");
        dom.append_child(dom.body(), ul);
        let a = dom.create_element("li");
        let b = dom.create_element("li");
        dom.append_child(ul, a);
        dom.append_child(ul, b);
        assert_eq!(dom.find(dom.body(), "li"), vec![a, b]);
        assert_eq!(dom.find(dom.body(), "UL"), vec![ul]);
    }

    #[test]
    fn test_insert_before() {
        let dom = MemoryDom::new();
        let first = dom.create_element("div");
        dom.append_child(dom.body(), first);
        let second = dom.create_element("div");
        dom.insert_before(first, second);
        assert_eq!(dom.children(dom.body()), vec![second, first]);
    }

    #[test]
    fn test_insert_before_detached_reference_is_noop() {
        let dom = MemoryDom::new();
        let loose = dom.create_element("div");
        let node = dom.create_element("div");
        dom.insert_before(loose, node);
        assert_eq!(dom.parent(node), None);
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let dom = MemoryDom::new();
        let div = dom.create_element("div");
        let span = dom.create_element("span");
        dom.append_child(dom.body(), div);
        dom.append_child(div, span);
        dom.remove(div);
        assert!(!dom.is_attached(div));
        assert!(!dom.is_attached(span));
        assert!(dom.contains(div, span));
    }

    #[test]
    fn test_contains_inclusive() {
        let dom = MemoryDom::new();
        assert!(dom.contains(dom.body(), dom.body()));
        assert!(dom.contains(dom.document(), dom.body()));
        assert!(!dom.contains(dom.body(), dom.document()));
    }

    // =========================================================================
    // Content Tests
    // =========================================================================

    #[test]
    fn test_text_concatenates_descendants() {
        let dom = MemoryDom::new();
        let div = dom.create_element("div");
        let span = dom.create_element("span");
        dom.append_child(div, span);
        dom.set_text(span, "inner");
        assert_eq!(dom.text(div), "inner");
    }

    #[test]
    fn test_set_text_replaces_children() {
        let dom = MemoryDom::new();
        let div = dom.create_element("div");
        let span = dom.create_element("span");
        dom.append_child(div, span);
        dom.set_text(div, "plain");
        assert!(dom.children(div).is_empty());
        assert_eq!(dom.text(div), "plain");
    }

    #[test]
    fn test_option_value_falls_back_to_text() {
        let dom = MemoryDom::new();
        let (_, options) = select_with(&dom, &["Apple"]);
        assert_eq!(dom.value(options[0]), "Apple");
        dom.set_value(options[0], "apple");
        assert_eq!(dom.value(options[0]), "apple");
    }

    // =========================================================================
    // Selection Tests
    // =========================================================================

    #[test]
    fn test_default_selection_is_first_enabled() {
        let dom = MemoryDom::new();
        let (select, options) = select_with(&dom, &["A", "B"]);
        dom.set_disabled(options[0], true);
        assert!(!dom.is_selected(options[0]));
        assert!(dom.is_selected(options[1]));
        assert_eq!(dom.value(select), "B");
    }

    #[test]
    fn test_set_selected_is_exclusive() {
        let dom = MemoryDom::new();
        let (select, options) = select_with(&dom, &["A", "B", "C"]);
        dom.set_selected(options[2], true);
        dom.set_selected(options[1], true);
        assert!(!dom.is_selected(options[0]));
        assert!(dom.is_selected(options[1]));
        assert!(!dom.is_selected(options[2]));
        assert_eq!(dom.value(select), "B");
    }

    #[test]
    fn test_non_option_never_selected() {
        let dom = MemoryDom::new();
        assert!(!dom.is_selected(dom.body()));
    }

    // =========================================================================
    // Class Tests
    // =========================================================================

    #[test]
    fn test_classes_deduplicated() {
        let dom = MemoryDom::new();
        let div = dom.create_element("div");
        dom.add_class(div, "a");
        dom.add_class(div, "a");
        dom.add_class(div, "b");
        assert_eq!(dom.classes(div), vec!["a".to_string(), "b".to_string()]);
        dom.remove_class(div, "a");
        assert!(!dom.has_class(div, "a"));
        assert!(dom.has_class(div, "b"));
    }

    // =========================================================================
    // Event Tests
    // =========================================================================

    #[test]
    fn test_dispatch_bubbles() {
        let dom = MemoryDom::new();
        let div = dom.create_element("div");
        dom.append_child(dom.body(), div);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        dom.listen(
            dom.body(),
            EventKind::Click,
            Rc::new(move |e: &DomEvent| log.borrow_mut().push((e.target, e.current_target))),
        );
        dom.dispatch(div, EventKind::Click);
        assert_eq!(*seen.borrow(), vec![(div, dom.body())]);
    }

    #[test]
    fn test_unlisten_stops_delivery() {
        let dom = MemoryDom::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = dom.listen(
            dom.body(),
            EventKind::Change,
            Rc::new(move |_: &DomEvent| counter.set(counter.get() + 1)),
        );
        dom.dispatch(dom.body(), EventKind::Change);
        dom.unlisten(id);
        dom.dispatch(dom.body(), EventKind::Change);
        assert_eq!(hits.get(), 1);
        assert_eq!(dom.listener_count(), 0);
    }

    #[test]
    fn test_global_pointer_down() {
        let dom = MemoryDom::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        dom.listen_global_pointer_down(Rc::new(move |_: &DomEvent| {
            counter.set(counter.get() + 1);
        }));
        dom.dispatch(dom.body(), EventKind::Click);
        dom.dispatch(dom.body(), EventKind::PointerDown);
        assert_eq!(hits.get(), 1);
        assert_eq!(dom.global_listener_count(), 1);
    }

    #[test]
    fn test_listener_may_reenter() {
        let dom = Rc::new(MemoryDom::new());
        let inner = Rc::clone(&dom);
        dom.listen(
            dom.body(),
            EventKind::Click,
            Rc::new(move |e: &DomEvent| {
                inner.add_class(e.target, "clicked");
                inner.listen(e.target, EventKind::Change, Rc::new(|_: &DomEvent| {}));
            }),
        );
        dom.dispatch(dom.body(), EventKind::Click);
        assert!(dom.has_class(dom.body(), "clicked"));
        assert_eq!(dom.listener_count(), 2);
    }

    #[test]
    fn test_listener_removed_mid_dispatch_not_called() {
        let dom = Rc::new(MemoryDom::new());
        let hits = Rc::new(Cell::new(0));
        let second_id = Rc::new(Cell::new(None));

        let inner = Rc::clone(&dom);
        let target = Rc::clone(&second_id);
        dom.listen(
            dom.body(),
            EventKind::Change,
            Rc::new(move |_: &DomEvent| {
                if let Some(id) = target.get() {
                    inner.unlisten(id);
                }
            }),
        );
        let counter = Rc::clone(&hits);
        let id = dom.listen(
            dom.body(),
            EventKind::Change,
            Rc::new(move |_: &DomEvent| counter.set(counter.get() + 1)),
        );
        second_id.set(Some(id));

        dom.dispatch(dom.body(), EventKind::Change);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_prevent_default_propagates_to_result() {
        let dom = MemoryDom::new();
        dom.listen(
            dom.body(),
            EventKind::Click,
            Rc::new(|e: &DomEvent| e.prevent_default()),
        );
        assert!(dom.dispatch(dom.body(), EventKind::Click).default_prevented());
    }

    #[test]
    fn test_dispatch_recorded() {
        let dom = MemoryDom::new();
        dom.dispatch(dom.body(), EventKind::Change);
        dom.dispatch(dom.body(), EventKind::Change);
        assert_eq!(dom.dispatch_count(dom.body(), EventKind::Change), 2);
        assert_eq!(dom.dispatched().len(), 2);
        dom.clear_dispatched();
        assert!(dom.dispatched().is_empty());
    }
}
