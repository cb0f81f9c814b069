//! Opaque handles into the host document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to one element of the host document.
///
/// Handles are cheap to copy and carry no borrow of the host; a handle to a
/// removed element is still a valid value, the host simply reports nothing
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new node handle.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw handle value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Registration handle for an event listener, returned by
/// [`Dom::listen`](crate::Dom::listen) and consumed by
/// [`Dom::unlisten`](crate::Dom::unlisten).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

impl ListenerId {
    /// Create a new listener ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}
