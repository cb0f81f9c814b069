//! Dropdown construction options.

use selectmirror_core::Result;
use serde::{Deserialize, Serialize};

/// Options recognized when a dropdown is built over a real control.
///
/// Keys deserialize in camelCase, so `{"firstOptionIsPlaceholder": true}`
/// is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropdownConfig {
    /// `Some(true)` starts disabled, `Some(false)` starts enabled, `None`
    /// follows the real control's disabled property
    pub disabled: Option<bool>,
    /// Marks mock item 0 as a placeholder (it stays selectable)
    pub first_option_is_placeholder: bool,
    /// Hides the real control's native rendering
    pub hide_original_select: bool,
    /// Initially selected index; otherwise the real control's selection
    pub selected_option: Option<usize>,
    /// Fixed header text that selection never overwrites
    pub static_header: Option<String>,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            disabled: None,
            first_option_is_placeholder: false,
            hide_original_select: true,
            selected_option: None,
            static_header: None,
        }
    }
}

impl DropdownConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the initial disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Mark option 0 as a placeholder.
    #[must_use]
    pub const fn first_option_is_placeholder(mut self, placeholder: bool) -> Self {
        self.first_option_is_placeholder = placeholder;
        self
    }

    /// Hide or show the real control.
    #[must_use]
    pub const fn hide_original_select(mut self, hide: bool) -> Self {
        self.hide_original_select = hide;
        self
    }

    /// Set the initially selected index.
    #[must_use]
    pub const fn selected_option(mut self, index: usize) -> Self {
        self.selected_option = Some(index);
        self
    }

    /// Set a fixed header text.
    #[must_use]
    pub fn static_header(mut self, text: impl Into<String>) -> Self {
        self.static_header = Some(text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let c = DropdownConfig::default();
        assert_eq!(c.disabled, None);
        assert!(!c.first_option_is_placeholder);
        assert!(c.hide_original_select);
        assert_eq!(c.selected_option, None);
        assert_eq!(c.static_header, None);
    }

    #[test]
    fn test_config_builder() {
        let c = DropdownConfig::new()
            .disabled(true)
            .first_option_is_placeholder(true)
            .hide_original_select(false)
            .selected_option(2)
            .static_header("Pick one");
        assert_eq!(c.disabled, Some(true));
        assert!(c.first_option_is_placeholder);
        assert!(!c.hide_original_select);
        assert_eq!(c.selected_option, Some(2));
        assert_eq!(c.static_header.as_deref(), Some("Pick one"));
    }

    #[test]
    fn test_config_from_json_camel_case() {
        let c = DropdownConfig::from_json(
            r#"{"disabled": false, "firstOptionIsPlaceholder": true, "selectedOption": 1}"#,
        )
        .unwrap();
        assert_eq!(c.disabled, Some(false));
        assert!(c.first_option_is_placeholder);
        assert!(c.hide_original_select); // default kept
        assert_eq!(c.selected_option, Some(1));
    }

    #[test]
    fn test_config_from_json_empty_object() {
        let c = DropdownConfig::from_json("{}").unwrap();
        assert_eq!(c, DropdownConfig::default());
    }

    #[test]
    fn test_config_from_json_invalid() {
        assert!(DropdownConfig::from_json(r#"{"selectedOption": "x"}"#).is_err());
    }
}
