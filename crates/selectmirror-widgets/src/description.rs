//! Declarative construction.
//!
//! Builds a native `<select>` from a serializable description and puts a
//! dropdown over it:
//!
//! ```json
//! { "name": "size", "options": [{ "value": "s", "label": "Small" }, { "label": "Large", "disabled": true }] }
//! ```

use crate::config::DropdownConfig;
use crate::dropdown::Dropdown;
use selectmirror_core::{Dom, NodeId, Result};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

/// One option of a [`SelectDescription`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribedOption {
    /// Value attribute; omitted when empty
    pub value: Option<String>,
    /// Text; the value when absent
    pub label: Option<String>,
    /// Disabled property
    pub disabled: bool,
}

impl DescribedOption {
    /// Text shown for the option.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.value.as_deref())
            .unwrap_or_default()
    }
}

/// Description of a native control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectDescription {
    /// `name` attribute
    pub name: Option<String>,
    /// Options, in order
    pub options: Vec<DescribedOption>,
}

impl SelectDescription {
    /// Parse a description from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Append a native `<select>` matching `description` to `parent`.
pub fn render_select(dom: &dyn Dom, parent: NodeId, description: &SelectDescription) -> NodeId {
    let select = dom.create_element("select");
    if let Some(name) = description.name.as_deref().filter(|n| !n.is_empty()) {
        dom.set_attribute(select, "name", name);
    }
    for described in &description.options {
        let option = dom.create_element("option");
        dom.append_child(select, option);
        if let Some(value) = described.value.as_deref().filter(|v| !v.is_empty()) {
            dom.set_value(option, value);
        }
        if described.disabled {
            dom.set_disabled(option, true);
        }
        dom.set_text(option, described.display_label());
    }
    dom.append_child(parent, select);
    debug!(options = description.options.len(), "native select rendered");
    select
}

impl Dropdown {
    /// Render a native control from `description` into `parent` and build a
    /// dropdown over it.
    pub fn from_description(
        dom: Rc<dyn Dom>,
        parent: NodeId,
        description: &SelectDescription,
        config: DropdownConfig,
    ) -> Result<Self> {
        let select = render_select(&*dom, parent, description);
        Self::new(dom, select, config)
    }

    /// As [`from_description`](Self::from_description), parsing the
    /// description from JSON first.
    ///
    /// # Errors
    ///
    /// [`DropdownError::Description`](selectmirror_core::DropdownError::Description)
    /// for malformed JSON; nothing is rendered in that case.
    pub fn from_json(
        dom: Rc<dyn Dom>,
        parent: NodeId,
        json: &str,
        config: DropdownConfig,
    ) -> Result<Self> {
        let description = SelectDescription::from_json(json)?;
        Self::from_description(dom, parent, &description, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selectmirror_core::DropdownError;
    use selectmirror_test::Harness;

    const SIZES: &str = r#"{
        "name": "size",
        "options": [
            { "value": "s", "label": "Small" },
            { "value": "m" },
            { "label": "Large", "disabled": true }
        ]
    }"#;

    // =========================================================================
    // Description Tests
    // =========================================================================

    #[test]
    fn test_description_from_json() {
        let description = SelectDescription::from_json(SIZES).unwrap();
        assert_eq!(description.name.as_deref(), Some("size"));
        assert_eq!(description.options.len(), 3);
        assert_eq!(description.options[1].display_label(), "m");
        assert!(description.options[2].disabled);
    }

    #[test]
    fn test_description_missing_fields_default() {
        let description = SelectDescription::from_json(r#"{"options": [{}]}"#).unwrap();
        assert_eq!(description.name, None);
        assert_eq!(description.options[0], DescribedOption::default());
        assert_eq!(description.options[0].display_label(), "");
    }

    #[test]
    fn test_description_malformed() {
        let err = SelectDescription::from_json("{").unwrap_err();
        assert!(matches!(err, DropdownError::Description(_)));
    }

    // =========================================================================
    // render_select Tests
    // =========================================================================

    #[test]
    fn test_render_select_markup() {
        let h = Harness::new();
        let dom = h.host();
        let description = SelectDescription::from_json(SIZES).unwrap();
        let select = render_select(&*dom, h.outside(), &description);

        assert_eq!(dom.parent(select), Some(h.outside()));
        assert_eq!(dom.attribute(select, "name").as_deref(), Some("size"));
        let options = dom.find(select, "option");
        assert_eq!(options.len(), 3);
        assert_eq!(dom.text(options[0]), "Small");
        assert_eq!(dom.value(options[0]), "s");
        assert_eq!(dom.text(options[1]), "m");
        assert_eq!(dom.attribute(options[2], "value"), None);
        assert!(dom.is_disabled(options[2]));
    }

    #[test]
    fn test_render_select_skips_empty_value() {
        let h = Harness::new();
        let dom = h.host();
        let description = SelectDescription {
            name: Some(String::new()),
            options: vec![DescribedOption {
                value: Some(String::new()),
                label: Some("Blank".into()),
                disabled: false,
            }],
        };
        let select = render_select(&*dom, h.outside(), &description);
        let option = dom.find(select, "option")[0];
        assert_eq!(dom.attribute(select, "name"), None);
        assert_eq!(dom.attribute(option, "value"), None);
        assert_eq!(dom.value(option), "Blank");
    }

    // =========================================================================
    // Factory Tests
    // =========================================================================

    #[test]
    fn test_dropdown_from_json() {
        let h = Harness::new();
        let dd = Dropdown::from_json(h.host(), h.outside(), SIZES, DropdownConfig::default())
            .unwrap();
        assert_eq!(dd.option_count(), 3);
        assert_eq!(dd.get_selected_value().as_deref(), Some("s"));
        assert!(dd.select(2usize).unwrap().is_disabled(false));
        assert_eq!(dd.get_selected_index(), 0);
        dd.select_option_by_value("m");
        assert_eq!(dd.get_selected_label(), "m");
    }

    #[test]
    fn test_dropdown_from_json_malformed_renders_nothing() {
        let h = Harness::new();
        let err = Dropdown::from_json(h.host(), h.outside(), "[1, 2", DropdownConfig::default())
            .unwrap_err();
        assert!(matches!(err, DropdownError::Description(_)));
        assert!(h.dom().children(h.outside()).is_empty());
    }

    #[test]
    fn test_dropdown_from_description_with_config() {
        let h = Harness::new();
        let description = SelectDescription::from_json(SIZES).unwrap();
        let dd = Dropdown::from_description(
            h.host(),
            h.outside(),
            &description,
            DropdownConfig::new().selected_option(1).disabled(true),
        )
        .unwrap();
        assert_eq!(dd.get_selected_index(), 1);
        assert!(dd.is_disabled());
    }
}
