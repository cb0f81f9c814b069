//! Browser host for selectmirror dropdowns.
//!
//! [`WebDom`] implements the host capability over `web-sys`; [`JsDropdown`]
//! exposes a dropdown to JavaScript.

pub mod app;
pub mod web_dom;

pub use app::JsDropdown;
pub use web_dom::WebDom;
