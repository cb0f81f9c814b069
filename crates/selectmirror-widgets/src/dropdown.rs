//! Dropdown synchronization engine.
//!
//! A [`Dropdown`] sits between a native single-select control (the real
//! control) and a custom-rendered substitute (the mock). It owns the option
//! set, the current selection and the open/disabled state, and keeps the
//! two trees consistent whichever side the change comes from:
//!
//! - programmatic [`select`](Dropdown::select): state, then real control,
//!   then header text, then a native change event
//! - a click on a mock item: same as `select`, then the menu closes
//! - a native change on the real control: state and header only, since the
//!   real control already shows the change
//!
//! Change observers subscribe to the real control's native change channel,
//! so they see user and programmatic changes through the same path.
//!
//! # Handles
//!
//! `Dropdown` is a cheap [`Clone`] handle. Observers that need to call back
//! into the dropdown should capture a [`WeakDropdown`] instead of a clone.
//! Re-entrant calls are allowed; nothing guards against an observer that
//! keeps selecting forever.

use crate::binder::Bindings;
use crate::config::DropdownConfig;
use crate::observers::{ChangeRegistry, ChangeSubscription};
use crate::option::{OptionHandle, SelectOption};
use crate::render::{DefaultRenderer, MockRenderer, MockStructure, RenderData};
use crate::resolver::{DropdownId, OptionId, OptionRef, ResolveScope};
use selectmirror_core::{classes, position_of, Dom, DomEvent, DropdownError, EventKind, NodeId, Result};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

/// Which sides a selection update touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UpdateMode {
    /// Mark the real `<option>` selected
    pub(crate) update_real: bool,
    /// Rewrite the header text
    pub(crate) update_mock: bool,
    /// Emit a native change event on the real control
    pub(crate) trigger_change: bool,
}

impl UpdateMode {
    /// Programmatic selection and mock clicks.
    const FULL: Self = Self {
        update_real: true,
        update_mock: true,
        trigger_change: true,
    };

    /// Reaction to a native change.
    const FROM_REAL: Self = Self {
        update_real: false,
        update_mock: true,
        trigger_change: false,
    };

    /// Initial selection at construction.
    const INITIAL: Self = Self {
        update_real: true,
        update_mock: true,
        trigger_change: false,
    };
}

/// Shared state behind every handle to one dropdown.
pub(crate) struct DropdownInner {
    pub(crate) id: DropdownId,
    pub(crate) dom: Rc<dyn Dom>,
    pub(crate) select: NodeId,
    pub(crate) mock: MockStructure,
    pub(crate) config: DropdownConfig,
    pub(crate) options: Vec<SelectOption>,
    real_options: Vec<NodeId>,
    option_ids: Vec<OptionId>,
    selected: Cell<Option<usize>>,
    open: Cell<bool>,
    disabled: Cell<bool>,
    pub(crate) destroyed: Cell<bool>,
    pub(crate) bindings: RefCell<Option<Bindings>>,
    observers: RefCell<ChangeRegistry>,
}

impl DropdownInner {
    /// Show `label` in the header unless a static header is configured.
    pub(crate) fn show_in_header(&self, label: &str) {
        if self.config.static_header.is_none() {
            self.dom.set_text(self.mock.toggle, label);
        }
    }

    fn scope(&self) -> ResolveScope<'_> {
        ResolveScope {
            owner: self.id,
            real_options: &self.real_options,
            option_ids: &self.option_ids,
        }
    }
}

/// A dropdown over a real `<select>` control.
#[derive(Clone)]
pub struct Dropdown {
    pub(crate) inner: Rc<DropdownInner>,
}

/// Non-owning handle to a [`Dropdown`].
#[derive(Clone, Default)]
pub struct WeakDropdown {
    inner: Weak<DropdownInner>,
}

impl WeakDropdown {
    /// The dropdown, unless it was dropped or destroyed.
    #[must_use]
    pub fn upgrade(&self) -> Option<Dropdown> {
        let inner = self.inner.upgrade()?;
        if inner.destroyed.get() {
            return None;
        }
        Some(Dropdown { inner })
    }
}

impl fmt::Debug for WeakDropdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakDropdown")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl fmt::Debug for Dropdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = &self.inner;
        f.debug_struct("Dropdown")
            .field("id", &inner.id)
            .field("select", &inner.select)
            .field("options", &inner.options.len())
            .field("selected", &inner.selected.get())
            .field("open", &inner.open.get())
            .field("disabled", &inner.disabled.get())
            .field("destroyed", &inner.destroyed.get())
            .finish()
    }
}

impl PartialEq for Dropdown {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Dropdown {}

impl Dropdown {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Build a dropdown over `select` with the default mock markup.
    ///
    /// # Errors
    ///
    /// [`DropdownError::InvalidArgument`] when `select` is not a
    /// single-select `<select>` element. An out-of-range
    /// `config.selected_option` selects nothing and reads back as option 0.
    pub fn new(dom: Rc<dyn Dom>, select: NodeId, config: DropdownConfig) -> Result<Self> {
        Self::with_renderer(dom, select, config, &DefaultRenderer)
    }

    /// Build a dropdown over `select`, rendering the mock with `renderer`.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new), and also when the rendered markup lacks a
    /// toggle button or a menu, or has a different number of items than the
    /// control has options.
    pub fn with_renderer(
        dom: Rc<dyn Dom>,
        select: NodeId,
        config: DropdownConfig,
        renderer: &dyn MockRenderer,
    ) -> Result<Self> {
        match dom.tag_name(select).as_deref() {
            Some("SELECT") => {}
            Some(other) => {
                return Err(DropdownError::invalid_argument(format!(
                    "expected a <select> element, got <{}>",
                    other.to_ascii_lowercase()
                )))
            }
            None => {
                return Err(DropdownError::invalid_argument(format!(
                    "{select} is not an element of this document"
                )))
            }
        }
        if dom.attribute(select, "multiple").is_some() {
            return Err(DropdownError::invalid_argument(
                "multi-select controls are not supported",
            ));
        }

        let real_options: Vec<NodeId> = dom
            .children(select)
            .into_iter()
            .filter(|&child| dom.tag_name(child).as_deref() == Some("OPTION"))
            .collect();
        let data = RenderData::from_select(&*dom, select, &real_options);

        let root = dom.create_element("div");
        dom.add_class(root, classes::ROOT);
        dom.insert_before(select, root);
        dom.add_class(select, classes::SELECT);
        if config.hide_original_select {
            dom.add_class(select, classes::SELECT_HIDDEN);
        }
        renderer.render(&*dom, root, &data, &config);

        let mock = match MockStructure::locate(&*dom, root) {
            Ok(mock) if mock.items.len() == real_options.len() => mock,
            Ok(mock) => {
                revert_markup(&*dom, select, root);
                return Err(DropdownError::invalid_argument(format!(
                    "rendered mock has {} items for {} options",
                    mock.items.len(),
                    real_options.len()
                )));
            }
            Err(err) => {
                revert_markup(&*dom, select, root);
                return Err(err);
            }
        };

        let id = DropdownId::next();
        let option_ids: Vec<OptionId> = (0..real_options.len())
            .map(|slot| OptionId::new(id, slot))
            .collect();
        let options = real_options
            .iter()
            .zip(&mock.items)
            .enumerate()
            .map(|(slot, (&real, &item))| SelectOption::new(option_ids[slot], slot, real, item))
            .collect();

        if let Some(text) = &config.static_header {
            dom.set_text(mock.toggle, text);
        }

        let initial = config
            .selected_option
            .or(data.selected_option)
            .unwrap_or(0);
        let forced_disabled = config.disabled;

        let dropdown = Self {
            inner: Rc::new(DropdownInner {
                id,
                dom,
                select,
                mock,
                config,
                options,
                real_options,
                option_ids,
                selected: Cell::new(None),
                open: Cell::new(false),
                disabled: Cell::new(false),
                destroyed: Cell::new(false),
                bindings: RefCell::new(None),
                observers: RefCell::new(ChangeRegistry::new()),
            }),
        };

        dropdown.update_selection(OptionRef::Index(initial), UpdateMode::INITIAL);

        match forced_disabled {
            Some(false) => {
                dropdown.enable();
            }
            Some(true) => {
                dropdown.disable();
            }
            None if dropdown.inner.dom.is_disabled(select) => {
                dropdown.disable();
            }
            None => {}
        }

        let bindings = Bindings::bind(&dropdown);
        *dropdown.inner.bindings.borrow_mut() = Some(bindings);

        debug!(
            dropdown = id.as_u64(),
            options = dropdown.option_count(),
            selected = initial,
            disabled = dropdown.is_disabled(),
            "dropdown created"
        );
        Ok(dropdown)
    }

    /// Non-owning handle, for observers that call back into the dropdown.
    #[must_use]
    pub fn downgrade(&self) -> WeakDropdown {
        WeakDropdown {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Process-unique identity.
    #[must_use]
    pub fn id(&self) -> DropdownId {
        self.inner.id
    }

    /// The host document.
    #[must_use]
    pub fn dom(&self) -> &dyn Dom {
        &*self.inner.dom
    }

    /// Configuration the dropdown was built with.
    #[must_use]
    pub fn config(&self) -> &DropdownConfig {
        &self.inner.config
    }

    /// The real `<select>` control.
    #[must_use]
    pub fn real_element(&self) -> NodeId {
        self.inner.select
    }

    /// Root of the mock structure.
    #[must_use]
    pub fn mock_element(&self) -> NodeId {
        self.inner.mock.root
    }

    /// Header button of the mock.
    #[must_use]
    pub fn toggle_element(&self) -> NodeId {
        self.inner.mock.toggle
    }

    /// Mock menu items, in option order.
    #[must_use]
    pub fn mock_items(&self) -> &[NodeId] {
        &self.inner.mock.items
    }

    /// Number of options.
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.inner.options.len()
    }

    /// Every option, in order. Empty after destroy.
    pub fn options(&self) -> impl Iterator<Item = OptionHandle<'_>> + '_ {
        let count = if self.is_destroyed() {
            0
        } else {
            self.option_count()
        };
        (0..count).map(move |position| OptionHandle::new(&self.inner, position))
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    fn resolve(&self, reference: OptionRef) -> Option<usize> {
        if self.is_destroyed() {
            trace!(?reference, "lookup on destroyed dropdown");
            return None;
        }
        let position = self.inner.scope().resolve(reference);
        if position.is_none() {
            trace!(dropdown = self.inner.id.as_u64(), ?reference, "option not found");
        }
        position
    }

    /// Option named by `reference`.
    pub fn get_option(&self, reference: impl Into<OptionRef>) -> Option<OptionHandle<'_>> {
        self.resolve(reference.into())
            .map(|position| OptionHandle::new(&self.inner, position))
    }

    /// Option at position `index`.
    #[must_use]
    pub fn get_option_by_index(&self, index: usize) -> Option<OptionHandle<'_>> {
        self.get_option(OptionRef::Index(index))
    }

    /// Selected option; option 0 when nothing was selected yet.
    #[must_use]
    pub fn get_selected_option(&self) -> Option<OptionHandle<'_>> {
        self.get_option_by_index(self.inner.selected.get().unwrap_or(0))
    }

    /// Index of the selected option, or 0.
    #[must_use]
    pub fn get_selected_index(&self) -> usize {
        self.get_selected_option()
            .map_or(0, |option| option.get_index(false))
    }

    /// Label of the selected option, or an empty string.
    #[must_use]
    pub fn get_selected_label(&self) -> String {
        self.get_selected_option()
            .map(|option| option.get_label(false))
            .unwrap_or_default()
    }

    /// Value of the selected option.
    #[must_use]
    pub fn get_selected_value(&self) -> Option<String> {
        self.get_selected_option()
            .map(|option| option.get_value(false))
    }

    /// Label of the option named by `reference`.
    pub fn get_label_for_option(&self, reference: impl Into<OptionRef>) -> Option<String> {
        self.get_option(reference).map(|option| option.get_label(false))
    }

    /// Value of the option named by `reference`.
    pub fn get_value_of_option(&self, reference: impl Into<OptionRef>) -> Option<String> {
        self.get_option(reference).map(|option| option.get_value(false))
    }

    // =========================================================================
    // Option Writes
    // =========================================================================

    /// Set the label of the option named by `reference`.
    pub fn set_label_for_option(
        &self,
        reference: impl Into<OptionRef>,
        label: &str,
    ) -> Option<String> {
        self.get_option(reference).map(|option| option.set_label(label))
    }

    /// Set the value of the option named by `reference`.
    pub fn set_value_for_option(
        &self,
        reference: impl Into<OptionRef>,
        value: &str,
    ) -> Option<String> {
        self.get_option(reference).map(|option| option.set_value(value))
    }

    /// Enable the option named by `reference`.
    pub fn enable_option(&self, reference: impl Into<OptionRef>) -> Option<OptionHandle<'_>> {
        let option = self.get_option(reference)?;
        option.enable();
        Some(option)
    }

    /// Disable the option named by `reference`.
    pub fn disable_option(&self, reference: impl Into<OptionRef>) -> Option<OptionHandle<'_>> {
        let option = self.get_option(reference)?;
        option.disable();
        Some(option)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Apply a selection. Returns the resolved position, including when the
    /// option is disabled and nothing changed.
    fn update_selection(&self, reference: OptionRef, mode: UpdateMode) -> Option<usize> {
        if self.is_destroyed() {
            warn!(?reference, "select on destroyed dropdown ignored");
            return None;
        }
        let position = self.resolve(reference)?;
        let option = OptionHandle::new(&self.inner, position);
        if option.is_disabled(false) {
            debug!(
                dropdown = self.inner.id.as_u64(),
                index = position,
                "disabled option not selected"
            );
            return Some(position);
        }

        self.inner.selected.set(Some(position));
        if mode.update_real {
            self.inner.dom.set_selected(option.real_element(), true);
        }
        if mode.update_mock {
            self.inner.show_in_header(&option.get_label(false));
        }
        debug!(
            dropdown = self.inner.id.as_u64(),
            index = position,
            trigger_change = mode.trigger_change,
            "option selected"
        );
        if mode.trigger_change {
            self.inner.dom.dispatch(self.inner.select, EventKind::Change);
        }
        Some(position)
    }

    /// Select the option named by `reference` and emit a native change.
    ///
    /// A disabled option is returned but not selected. `None` when the
    /// reference does not name an option of this dropdown.
    pub fn select(&self, reference: impl Into<OptionRef>) -> Option<OptionHandle<'_>> {
        self.update_selection(reference.into(), UpdateMode::FULL)
            .map(|position| OptionHandle::new(&self.inner, position))
    }

    /// Select option 0, placeholder or not.
    pub fn reset_selection(&self) -> Option<OptionHandle<'_>> {
        self.select(OptionRef::Index(0))
    }

    /// Select the first option whose value equals `value`; no-op when none
    /// does.
    pub fn select_option_by_value(&self, value: &str) -> Option<OptionHandle<'_>> {
        let position = self
            .options()
            .position(|option| option.get_value(false) == value)?;
        self.select(OptionRef::Index(position))
    }

    // =========================================================================
    // State Machine
    // =========================================================================

    fn live(&self, operation: &str) -> bool {
        if self.is_destroyed() {
            warn!(operation, "call on destroyed dropdown ignored");
            return false;
        }
        true
    }

    /// Enable the dropdown and the real control.
    pub fn enable(&self) -> &Self {
        if self.live("enable") {
            self.inner.dom.set_disabled(self.inner.select, false);
            self.inner
                .dom
                .remove_class(self.inner.mock.root, classes::DISABLED);
            self.inner.disabled.set(false);
            debug!(dropdown = self.inner.id.as_u64(), "dropdown enabled");
        }
        self
    }

    /// Close the menu, then disable the dropdown and the real control.
    pub fn disable(&self) -> &Self {
        if self.live("disable") {
            self.close_mock();
            self.inner.dom.set_disabled(self.inner.select, true);
            self.inner
                .dom
                .add_class(self.inner.mock.root, classes::DISABLED);
            self.inner.disabled.set(true);
            debug!(dropdown = self.inner.id.as_u64(), "dropdown disabled");
        }
        self
    }

    /// Whether the dropdown is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.inner.disabled.get()
    }

    /// Open the menu. No-op while disabled.
    pub fn open_mock(&self) -> &Self {
        if self.live("open_mock") && !self.is_disabled() {
            self.inner.dom.add_class(self.inner.mock.root, classes::OPEN);
            self.inner.open.set(true);
            debug!(dropdown = self.inner.id.as_u64(), "menu opened");
        }
        self
    }

    /// Close the menu. No-op while disabled.
    pub fn close_mock(&self) -> &Self {
        if self.live("close_mock") && !self.is_disabled() {
            self.inner
                .dom
                .remove_class(self.inner.mock.root, classes::OPEN);
            if self.inner.open.replace(false) {
                debug!(dropdown = self.inner.id.as_u64(), "menu closed");
            }
        }
        self
    }

    /// Open a closed menu or close an open one.
    pub fn toggle_mock(&self) -> &Self {
        if self.is_mock_open() {
            self.close_mock()
        } else {
            self.open_mock()
        }
    }

    /// Whether the menu is open.
    #[must_use]
    pub fn is_mock_open(&self) -> bool {
        self.inner.open.get()
    }

    // =========================================================================
    // Change Observers
    // =========================================================================

    /// Subscribe to the real control's native change events.
    ///
    /// The callback receives the native event for user-driven changes and
    /// for every [`select`](Self::select). After destroy the returned
    /// subscription is attached to nothing.
    pub fn on_change(&self, callback: impl Fn(&DomEvent) + 'static) -> ChangeSubscription {
        if !self.live("on_change") {
            return self.inner.observers.borrow_mut().inert();
        }
        let listener = self
            .inner
            .dom
            .listen(self.inner.select, EventKind::Change, Rc::new(callback));
        self.inner.observers.borrow_mut().insert(listener)
    }

    /// Unsubscribe. Returns the subscription if it was live.
    pub fn off_change(&self, subscription: ChangeSubscription) -> Option<ChangeSubscription> {
        let listener = self.inner.observers.borrow_mut().remove(subscription)?;
        self.inner.dom.unlisten(listener);
        Some(subscription)
    }

    /// Remove every change observer, returning them in registration order.
    pub fn remove_change_handlers(&self) -> Vec<ChangeSubscription> {
        let drained = self.inner.observers.borrow_mut().drain();
        drained
            .into_iter()
            .map(|(subscription, listener)| {
                self.inner.dom.unlisten(listener);
                subscription
            })
            .collect()
    }

    /// Number of live change observers.
    #[must_use]
    pub fn change_handler_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Remove the mock, revert the real control's markers and drop every
    /// listener, change observers included. Later calls are ignored.
    pub fn destroy(&self) {
        let inner = &self.inner;
        if inner.destroyed.replace(true) {
            debug!(dropdown = inner.id.as_u64(), "dropdown already destroyed");
            return;
        }
        inner.open.set(false);
        revert_markup(&*inner.dom, inner.select, inner.mock.root);
        let bindings = inner.bindings.borrow_mut().take();
        if let Some(bindings) = bindings {
            bindings.unbind(&*inner.dom);
        }
        let removed = self.remove_change_handlers();
        debug!(
            dropdown = inner.id.as_u64(),
            observers = removed.len(),
            "dropdown destroyed"
        );
    }

    /// Whether [`destroy`](Self::destroy) ran.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    // =========================================================================
    // Event Handlers
    // =========================================================================

    pub(crate) fn handle_toggle_click(&self, event: &DomEvent) {
        event.prevent_default();
        self.toggle_mock();
    }

    pub(crate) fn handle_item_click(&self, event: &DomEvent) {
        let Some(position) = position_of(self.mock_items(), event.current_target) else {
            return;
        };
        self.select(OptionRef::Index(position));
        self.close_mock();
    }

    pub(crate) fn handle_native_change(&self, _event: &DomEvent) {
        let dom = &self.inner.dom;
        let Some(&real) = self
            .inner
            .real_options
            .iter()
            .find(|&&option| dom.is_selected(option))
        else {
            return;
        };
        let Some(position) = self.update_selection(OptionRef::RealElement(real), UpdateMode::FROM_REAL)
        else {
            return;
        };
        if !OptionHandle::new(&self.inner, position).is_disabled(false) {
            self.close_mock();
        }
    }

    pub(crate) fn handle_pointer_down(&self, event: &DomEvent) {
        if !self.is_disabled()
            && self.is_mock_open()
            && !self.inner.dom.contains(self.inner.mock.root, event.target)
        {
            self.close_mock();
        }
    }
}

/// Undo the markup a dropdown adds around its real control.
fn revert_markup(dom: &dyn Dom, select: NodeId, root: NodeId) {
    dom.remove_class(select, classes::SELECT);
    dom.remove_class(select, classes::SELECT_HIDDEN);
    dom.remove(root);
}
