//! Dropdown widget for selectmirror.
//!
//! [`Dropdown`] mirrors a native single-select control with a custom mock
//! and keeps both in sync. Options are addressed through [`OptionRef`] and
//! read or changed through [`OptionHandle`]. The mock markup comes from a
//! [`MockRenderer`]; [`DefaultRenderer`] is used unless another is given.

mod binder;
pub mod cached;
pub mod config;
pub mod description;
pub mod dropdown;
mod observers;
pub mod option;
pub mod render;
pub mod resolver;

pub use cached::{CacheState, Cached};
pub use config::DropdownConfig;
pub use description::{render_select, DescribedOption, SelectDescription};
pub use dropdown::{Dropdown, WeakDropdown};
pub use observers::ChangeSubscription;
pub use option::OptionHandle;
pub use render::{DefaultRenderer, MockRenderer, MockStructure, RenderData, RenderOption};
pub use resolver::{DropdownId, OptionId, OptionRef};
