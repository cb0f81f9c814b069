//! Write-through cache for values mirrored from the document.
//!
//! A [`Cached`] slot starts empty. Reads fill it from the document on first
//! access and serve the copy afterwards; a read with `refresh` set reloads
//! it. Writes replace the copy and the caller pushes the same value to the
//! document, so a written slot is never stale with respect to its own
//! writes. It only goes stale when something else changes the document.

use std::cell::RefCell;
use std::fmt;

/// Freshness of a [`Cached`] slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Never loaded, or invalidated
    Empty,
    /// Holds a copy loaded or written earlier
    Filled,
}

/// Lazily loaded, explicitly refreshable copy of a document value.
pub struct Cached<T> {
    slot: RefCell<Option<T>>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for Cached<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cached").field(&self.slot.borrow()).finish()
    }
}

impl<T> Cached<T> {
    /// Create an empty slot.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }

    /// Current freshness.
    #[must_use]
    pub fn state(&self) -> CacheState {
        if self.slot.borrow().is_some() {
            CacheState::Filled
        } else {
            CacheState::Empty
        }
    }

    /// Drop the copy; the next read reloads.
    pub fn invalidate(&self) {
        self.slot.borrow_mut().take();
    }
}

impl<T: Clone> Cached<T> {
    /// Read the copy, loading it when empty or when `refresh` is set.
    ///
    /// `load` runs without any borrow of the slot held.
    pub fn get(&self, refresh: bool, load: impl FnOnce() -> T) -> T {
        if !refresh {
            if let Some(value) = self.slot.borrow().as_ref() {
                return value.clone();
            }
        }
        let value = load();
        *self.slot.borrow_mut() = Some(value.clone());
        value
    }

    /// Replace the copy.
    pub fn set(&self, value: T) {
        *self.slot.borrow_mut() = Some(value);
    }

    /// The copy, without loading.
    #[must_use]
    pub fn peek(&self) -> Option<T> {
        self.slot.borrow().clone()
    }
}
