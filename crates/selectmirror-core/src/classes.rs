//! Class markers the dropdown adds to the document.
//!
//! Styling itself is out of scope; these are the hooks a stylesheet targets.

/// Root of the mock structure.
pub const ROOT: &str = "sm-dropdown";
/// Header button that toggles the menu.
pub const TOGGLE: &str = "sm-dropdown-toggle";
/// Wrapper around the mock item list.
pub const MENU_WRAP: &str = "sm-dropdown-menuWrap";
/// Mock root while the menu is open.
pub const OPEN: &str = "sm-dropdown-open";
/// Disabled mock root or mock item.
pub const DISABLED: &str = "sm-dropdown-disabled";
/// Mock item 0 when it acts as a placeholder.
pub const PLACEHOLDER: &str = "sm-dropdown-placeholder";
/// Real control managed by a dropdown.
pub const SELECT: &str = "sm-dropdown-select";
/// Real control whose native rendering is hidden.
pub const SELECT_HIDDEN: &str = "sm-dropdown-select-hidden";

/// Attribute on the mock root naming the real control's id.
pub const DATA_FOR: &str = "data-for";
/// Attribute on each mock item carrying the option value.
pub const DATA_VALUE: &str = "data-value";
