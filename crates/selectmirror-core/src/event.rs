//! Native events delivered by the host document.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Event types the dropdown listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Primary activation (mouse click, tap)
    Click,
    /// Native value change of a form control
    Change,
    /// Pointer pressed anywhere in the document
    PointerDown,
}

impl EventKind {
    /// DOM event type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Change => "change",
            Self::PointerDown => "pointerdown",
        }
    }

    /// Parse a DOM event type name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "click" => Some(Self::Click),
            "change" => Some(Self::Change),
            "pointerdown" => Some(Self::PointerDown),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native event payload handed to listeners.
///
/// `target` is the element the event originated from; `current_target` is
/// the element whose listener is running. Change observers receive this
/// payload unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    /// Event type
    pub kind: EventKind,
    /// Originating element
    pub target: NodeId,
    /// Element the listener was registered on
    pub current_target: NodeId,
    default_prevented: Cell<bool>,
}

impl DomEvent {
    /// Create an event whose target and current target coincide.
    #[must_use]
    pub const fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            default_prevented: Cell::new(false),
        }
    }

    /// Set the element the running listener is attached to.
    #[must_use]
    pub const fn with_current_target(mut self, current_target: NodeId) -> Self {
        self.current_target = current_target;
        self
    }

    /// Suppress the host's default activation behavior.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether a listener called [`prevent_default`](Self::prevent_default).
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Event listener callback.
///
/// Shared so the host can snapshot its listener table before invoking, which
/// lets listeners re-enter the host.
pub type Listener = Rc<dyn Fn(&DomEvent)>;
