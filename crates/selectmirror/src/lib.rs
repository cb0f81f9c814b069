//! selectmirror: a custom dropdown that mirrors a native `<select>`.
//!
//! The real control stays the source of truth for value and selection; a
//! custom-rendered mock is kept in sync with it in both directions.
//!
//! # Usage
//!
//! ```ignore
//! use selectmirror::{Dropdown, DropdownConfig};
//!
//! let dropdown = Dropdown::new(dom, select, DropdownConfig::default())?;
//! let sub = dropdown.on_change(|event| println!("changed: {:?}", event.target));
//! dropdown.select(2usize);
//! dropdown.off_change(sub);
//! ```
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { JsDropdown } from './selectmirror.js';
//!
//! async function main() {
//!     await init();
//!     const dd = new JsDropdown('country', '');
//!     dd.on_change(() => console.log(dd.selected_value()));
//! }
//! ```

pub use selectmirror_core::*;
pub use selectmirror_widgets as widgets;
pub use selectmirror_widgets::{
    render_select, ChangeSubscription, DefaultRenderer, DescribedOption, Dropdown, DropdownConfig,
    DropdownId, MockRenderer, MockStructure, OptionHandle, OptionId, OptionRef, RenderData,
    RenderOption, SelectDescription, WeakDropdown,
};

#[cfg(target_arch = "wasm32")]
pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{JsDropdown, WebDom};
