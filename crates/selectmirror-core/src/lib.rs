//! Core types and traits for the selectmirror dropdown.
//!
//! This crate provides the foundation the synchronization engine is built on:
//! - Host capability: [`Dom`], addressed through [`NodeId`] handles
//! - Native events: [`DomEvent`], [`EventKind`], [`Listener`]
//! - Errors: [`DropdownError`]
//! - Class markers added to the document: [`classes`]

pub mod classes;
mod dom;
mod error;
mod event;
mod node;

pub use dom::{position_of, Dom};
pub use error::{DropdownError, Result};
pub use event::{DomEvent, EventKind, Listener};
pub use node::{ListenerId, NodeId};
