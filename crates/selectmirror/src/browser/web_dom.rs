//! `Dom` implementation over the browser document.

use js_sys::Reflect;
use selectmirror_core::{Dom, DomEvent, EventKind, Listener, ListenerId, NodeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    window, Document, Element, Event, EventInit, EventTarget, HtmlOptionElement,
    HtmlSelectElement,
};

/// Handle for elements the browser refused to create, and for event
/// targets that never received a handle.
const DETACHED: NodeId = NodeId(u64::MAX);

static NEXT_ARENA: AtomicU64 = AtomicU64::new(0);

/// Elements holding a handle. Each element carries its handle in an expando
/// property private to this arena, so mapping back is a property read.
struct Arena {
    key: JsValue,
    next: Cell<u64>,
    elements: RefCell<HashMap<NodeId, Element>>,
}

impl Arena {
    fn new() -> Self {
        let serial = NEXT_ARENA.fetch_add(1, Ordering::Relaxed);
        Self {
            key: JsValue::from_str(&format!("__selectmirror_node_{serial}")),
            next: Cell::new(0),
            elements: RefCell::new(HashMap::new()),
        }
    }

    fn lookup(&self, element: &Element) -> Option<NodeId> {
        let tag = Reflect::get(element, &self.key).ok()?.as_f64()?;
        let node = NodeId::new(tag as u64);
        self.elements
            .borrow()
            .get(&node)
            .is_some_and(|known| known == element)
            .then_some(node)
    }

    fn adopt(&self, element: &Element) -> NodeId {
        if let Some(node) = self.lookup(element) {
            return node;
        }
        let node = NodeId::new(self.next.get());
        self.next.set(self.next.get() + 1);
        if let Err(err) = Reflect::set(element, &self.key, &JsValue::from_f64(node.as_u64() as f64)) {
            warn!(?err, %node, "could not tag element");
        }
        self.elements.borrow_mut().insert(node, element.clone());
        node
    }

    fn get(&self, node: NodeId) -> Option<Element> {
        self.elements.borrow().get(&node).cloned()
    }

    fn release(&self, element: &Element) {
        if let Some(node) = self.lookup(element) {
            self.elements.borrow_mut().remove(&node);
            Reflect::delete_property(element, &self.key).ok();
        }
    }

    fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    /// Handle of an event target, without adopting it.
    fn target(&self, target: Option<EventTarget>) -> NodeId {
        target
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|element| self.lookup(&element))
            .unwrap_or(DETACHED)
    }
}

struct Registration {
    target: EventTarget,
    kind: EventKind,
    closure: Closure<dyn FnMut(Event)>,
}

/// The browser document as a [`Dom`].
///
/// Elements get a [`NodeId`] the first time they are seen and lose it when
/// removed from the document. Event targets never seen before map to a
/// detached handle instead of being adopted. Listener
/// closures live in a table keyed by [`ListenerId`] until unlistened; a
/// closure removed while listeners are running is kept until the outermost
/// listener returns.
pub struct WebDom {
    document: Document,
    arena: Rc<Arena>,
    listeners: RefCell<HashMap<ListenerId, Registration>>,
    next_listener: Cell<u64>,
    depth: Rc<Cell<u32>>,
    retired: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
}

impl WebDom {
    /// Wrap the current window's document.
    pub fn new() -> Result<Self, JsValue> {
        let document = window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;
        Ok(Self::from_document(document))
    }

    /// Wrap a specific document.
    #[must_use]
    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            arena: Rc::new(Arena::new()),
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(0),
            depth: Rc::new(Cell::new(0)),
            retired: RefCell::new(Vec::new()),
        }
    }

    /// Handle for an existing element.
    pub fn adopt(&self, element: &Element) -> NodeId {
        self.arena.adopt(element)
    }

    /// Handle for the element with the given `id` attribute.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.document
            .get_element_by_id(id)
            .map(|element| self.adopt(&element))
    }

    /// Handle for the document body.
    pub fn body(&self) -> Option<NodeId> {
        self.document.body().map(|body| self.adopt(&body))
    }

    /// The element behind a handle.
    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.arena.get(node)
    }

    /// Number of elements currently holding a handle.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    fn adopt_all(&self, collection: &web_sys::HtmlCollection) -> Vec<NodeId> {
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .map(|element| self.adopt(&element))
            .collect()
    }

    fn register(&self, target: EventTarget, kind: EventKind, listener: Listener) -> ListenerId {
        let arena = Rc::clone(&self.arena);
        let depth = Rc::clone(&self.depth);
        let closure = Closure::new(move |event: Event| {
            let payload = DomEvent::new(kind, arena.target(event.target()))
                .with_current_target(arena.target(event.current_target()));
            depth.set(depth.get() + 1);
            listener(&payload);
            depth.set(depth.get() - 1);
            if payload.default_prevented() {
                event.prevent_default();
            }
        });
        if let Err(err) = target
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        {
            warn!(?err, %kind, "addEventListener failed");
        }

        let id = ListenerId::new(self.next_listener.get());
        self.next_listener.set(self.next_listener.get() + 1);
        self.listeners.borrow_mut().insert(
            id,
            Registration {
                target,
                kind,
                closure,
            },
        );
        id
    }

    fn sweep(&self) {
        if self.depth.get() == 0 {
            self.retired.borrow_mut().clear();
        }
    }
}

impl Dom for WebDom {
    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.element(node).map(|e| e.tag_name().to_ascii_uppercase())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.element(node)
            .map(|e| self.adopt_all(&e.children()))
            .unwrap_or_default()
    }

    fn find(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.element(node)
            .map(|e| self.adopt_all(&e.get_elements_by_tag_name(tag)))
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.element(node)?.parent_element()?;
        Some(self.adopt(&parent))
    }

    fn create_element(&self, tag: &str) -> NodeId {
        match self.document.create_element(tag) {
            Ok(element) => self.adopt(&element),
            Err(err) => {
                warn!(?err, tag, "createElement failed");
                DETACHED
            }
        }
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        if let (Some(parent), Some(child)) = (self.element(parent), self.element(child)) {
            parent.append_child(&child).ok();
        }
    }

    fn insert_before(&self, reference: NodeId, node: NodeId) {
        let (Some(reference), Some(node)) = (self.element(reference), self.element(node)) else {
            return;
        };
        if let Some(parent) = reference.parent_node() {
            parent.insert_before(&node, Some(&reference)).ok();
        }
    }

    fn remove(&self, node: NodeId) {
        let Some(element) = self.element(node) else {
            return;
        };
        element.remove();
        let descendants = element.get_elements_by_tag_name("*");
        for descendant in (0..descendants.length()).filter_map(|i| descendants.item(i)) {
            self.arena.release(&descendant);
        }
        self.arena.release(&element);
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        match (self.element(ancestor), self.element(node)) {
            (Some(ancestor), Some(node)) => ancestor.contains(Some(&node)),
            _ => false,
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.element(node)
            .and_then(|e| e.text_content())
            .unwrap_or_default()
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            element.set_attribute(name, value).ok();
        }
    }

    fn value(&self, node: NodeId) -> String {
        let Some(element) = self.element(node) else {
            return String::new();
        };
        if let Some(option) = element.dyn_ref::<HtmlOptionElement>() {
            option.value()
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            element.get_attribute("value").unwrap_or_default()
        }
    }

    fn set_value(&self, node: NodeId, value: &str) {
        let Some(element) = self.element(node) else {
            return;
        };
        if let Some(option) = element.dyn_ref::<HtmlOptionElement>() {
            option.set_value(value);
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else {
            element.set_attribute("value", value).ok();
        }
    }

    fn is_disabled(&self, node: NodeId) -> bool {
        let Some(element) = self.element(node) else {
            return false;
        };
        if let Some(option) = element.dyn_ref::<HtmlOptionElement>() {
            option.disabled()
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.disabled()
        } else {
            element.has_attribute("disabled")
        }
    }

    fn set_disabled(&self, node: NodeId, disabled: bool) {
        let Some(element) = self.element(node) else {
            return;
        };
        if let Some(option) = element.dyn_ref::<HtmlOptionElement>() {
            option.set_disabled(disabled);
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.set_disabled(disabled);
        } else if disabled {
            element.set_attribute("disabled", "").ok();
        } else {
            element.remove_attribute("disabled").ok();
        }
    }

    fn is_selected(&self, node: NodeId) -> bool {
        self.element(node)
            .and_then(|e| e.dyn_into::<HtmlOptionElement>().ok())
            .is_some_and(|option| option.selected())
    }

    fn set_selected(&self, node: NodeId, selected: bool) {
        if let Some(option) = self
            .element(node)
            .and_then(|e| e.dyn_into::<HtmlOptionElement>().ok())
        {
            option.set_selected(selected);
        }
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            element.class_list().add_1(class).ok();
        }
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            element.class_list().remove_1(class).ok();
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn listen(&self, node: NodeId, kind: EventKind, listener: Listener) -> ListenerId {
        match self.element(node) {
            Some(element) => self.register(element.into(), kind, listener),
            None => {
                warn!(%node, %kind, "listen on unknown node");
                let id = ListenerId::new(self.next_listener.get());
                self.next_listener.set(self.next_listener.get() + 1);
                id
            }
        }
    }

    fn listen_global_pointer_down(&self, listener: Listener) -> ListenerId {
        self.register(self.document.clone().into(), EventKind::PointerDown, listener)
    }

    fn unlisten(&self, id: ListenerId) {
        let removed = self.listeners.borrow_mut().remove(&id);
        if let Some(registration) = removed {
            registration
                .target
                .remove_event_listener_with_callback(
                    registration.kind.as_str(),
                    registration.closure.as_ref().unchecked_ref(),
                )
                .ok();
            self.retired.borrow_mut().push(registration.closure);
        }
        self.sweep();
    }

    fn dispatch(&self, node: NodeId, kind: EventKind) -> DomEvent {
        let result = DomEvent::new(kind, node);
        let Some(element) = self.element(node) else {
            return result;
        };
        let init = EventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        match Event::new_with_event_init_dict(kind.as_str(), &init) {
            Ok(event) => {
                element.dispatch_event(&event).ok();
                if event.default_prevented() {
                    result.prevent_default();
                }
            }
            Err(err) => warn!(?err, %kind, "event construction failed"),
        }
        self.sweep();
        result
    }
}
