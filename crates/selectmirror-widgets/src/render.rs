//! Mock structure rendering.
//!
//! The dropdown reads what it needs from the real control into
//! [`RenderData`], hands it to a [`MockRenderer`] together with an empty
//! mock root, and then locates the parts it drives (toggle button, menu,
//! items) inside whatever markup the renderer produced.

use crate::config::DropdownConfig;
use selectmirror_core::{classes, Dom, DropdownError, NodeId, Result};

/// What the real control says about one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOption {
    /// Text content
    pub label: String,
    /// Value, or the label when the option has none
    pub value: String,
    /// Disabled property
    pub disabled: bool,
    /// Selected property
    pub selected: bool,
}

/// What the real control says about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderData {
    /// The control's `id` attribute
    pub select_id: Option<String>,
    /// One entry per real option, in order
    pub options: Vec<RenderOption>,
    /// Index of the selected option
    pub selected_option: Option<usize>,
}

impl RenderData {
    /// Extract render data from a real control and its options.
    pub fn from_select(dom: &dyn Dom, select: NodeId, real_options: &[NodeId]) -> Self {
        let select_id = dom
            .attribute(select, "id")
            .filter(|id| !id.is_empty());
        let options: Vec<RenderOption> = real_options
            .iter()
            .map(|&option| {
                let label = dom.text(option);
                let value = dom.value(option);
                RenderOption {
                    value: if value.is_empty() { label.clone() } else { value },
                    label,
                    disabled: dom.is_disabled(option),
                    selected: dom.is_selected(option),
                }
            })
            .collect();
        let selected_option = options.iter().position(|o| o.selected);
        Self {
            select_id,
            options,
            selected_option,
        }
    }
}

/// Produces the mock markup inside an empty mock root.
///
/// The markup must contain a `<button>` (the toggle) and a `<ul>` (the menu)
/// whose `<li>` children correspond one-to-one, in order, to
/// `data.options`.
pub trait MockRenderer {
    /// Render into `root`.
    fn render(&self, dom: &dyn Dom, root: NodeId, data: &RenderData, config: &DropdownConfig);
}

/// Renders `button.toggle + div.menuWrap > ul > li*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl MockRenderer for DefaultRenderer {
    fn render(&self, dom: &dyn Dom, root: NodeId, data: &RenderData, config: &DropdownConfig) {
        if let Some(id) = &data.select_id {
            dom.set_attribute(root, classes::DATA_FOR, id);
        }

        let toggle = dom.create_element("button");
        dom.set_attribute(toggle, "type", "button");
        dom.add_class(toggle, classes::TOGGLE);
        dom.append_child(root, toggle);

        let wrap = dom.create_element("div");
        dom.add_class(wrap, classes::MENU_WRAP);
        dom.append_child(root, wrap);

        let menu = dom.create_element("ul");
        dom.append_child(wrap, menu);

        for (i, option) in data.options.iter().enumerate() {
            let item = dom.create_element("li");
            dom.set_attribute(item, classes::DATA_VALUE, &option.value);
            dom.set_text(item, &option.label);
            if option.disabled {
                dom.add_class(item, classes::DISABLED);
            }
            if i == 0 && config.first_option_is_placeholder {
                dom.add_class(item, classes::PLACEHOLDER);
            }
            dom.append_child(menu, item);
        }
    }
}

/// Handles to the parts of a rendered mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockStructure {
    /// Mock root, inserted before the real control
    pub root: NodeId,
    /// Header button
    pub toggle: NodeId,
    /// Item list
    pub menu: NodeId,
    /// One item per option, in order
    pub items: Vec<NodeId>,
}

impl MockStructure {
    /// Find the toggle, menu and items below `root`.
    pub fn locate(dom: &dyn Dom, root: NodeId) -> Result<Self> {
        let toggle = dom.find(root, "button").first().copied().ok_or_else(|| {
            DropdownError::invalid_argument("rendered mock has no <button> toggle")
        })?;
        let menu = dom
            .find(root, "ul")
            .first()
            .copied()
            .ok_or_else(|| DropdownError::invalid_argument("rendered mock has no <ul> menu"))?;
        let items = dom
            .children(menu)
            .into_iter()
            .filter(|&child| dom.tag_name(child).as_deref() == Some("LI"))
            .collect();
        Ok(Self {
            root,
            toggle,
            menu,
            items,
        })
    }
}
