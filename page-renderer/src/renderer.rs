//! Recursive element renderer.
//!
//! Rendering is a pure function of the element forest, the registry and a
//! [`RenderOptions`] value. Children are rendered first, in document order,
//! and handed to their parent's component. Elements whose type is not
//! registered render as nothing; their siblings are unaffected.

use page_core::{
    ComponentDefinition, ComponentRegistry, Device, EditorMode, ElementId, PageElement,
    PageSchema, PageStore, RenderElement, RenderInput, RenderNode,
};
use serde_json::Map;

use crate::error::{RenderError, RenderResult};
use crate::resolve::resolve_css;

/// Class on every editor wrapper.
pub const ELEMENT_CLASS: &str = "pb-element";
/// Class added to the selected element's wrapper.
pub const SELECTED_CLASS: &str = "pb-selected";
/// Class added to the hovered element's wrapper.
pub const HOVERED_CLASS: &str = "pb-hovered";
/// Class added to locked elements' wrappers.
pub const LOCKED_CLASS: &str = "pb-locked";
/// Class added to hidden elements' wrappers.
pub const HIDDEN_CLASS: &str = "pb-hidden";

/// Opacity of hidden elements in the editor.
const HIDDEN_OPACITY: &str = "0.4";

/// What to render for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Target device.
    pub device: Device,
    /// Render editor decorations and keep hidden elements visible.
    pub editor: bool,
    /// Element to mark as selected (editor only).
    pub selected_id: Option<ElementId>,
    /// Element to mark as hovered (editor only).
    pub hovered_id: Option<ElementId>,
}

impl RenderOptions {
    /// Live-page rendering for a device.
    #[must_use]
    pub fn live(device: Device) -> Self {
        Self {
            device,
            ..Self::default()
        }
    }

    /// Editor rendering for a device, without selection or hover.
    #[must_use]
    pub fn editor(device: Device) -> Self {
        Self {
            device,
            editor: true,
            ..Self::default()
        }
    }

    /// Options matching a store's session state.
    #[must_use]
    pub fn from_store(store: &PageStore) -> Self {
        Self {
            device: store.device(),
            editor: store.editor_mode() == EditorMode::Edit,
            selected_id: store.selected_id().cloned(),
            hovered_id: store.hovered_id().cloned(),
        }
    }
}

/// Renders element forests with a registry.
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    registry: &'a ComponentRegistry,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    /// Create a renderer.
    #[must_use]
    pub fn new(registry: &'a ComponentRegistry, options: RenderOptions) -> Self {
        Self { registry, options }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a forest in order, skipping elements that render as nothing.
    #[must_use]
    pub fn render(&self, elements: &[PageElement]) -> Vec<RenderNode> {
        elements
            .iter()
            .filter_map(|element| self.render_element(element))
            .collect()
    }

    /// Render one element and its subtree.
    ///
    /// Returns `None` for unregistered types and, outside the editor, for
    /// hidden elements.
    #[must_use]
    pub fn render_element(&self, element: &PageElement) -> Option<RenderNode> {
        if element.meta.hidden && !self.options.editor {
            return None;
        }
        let Some(definition) = self.registry.get(&element.kind) else {
            tracing::warn!(
                "No component registered for type {:?} (element {})",
                element.kind,
                element.id
            );
            return None;
        };

        let children = self.render(&element.children);
        let rendered = self.render_component(definition, element, children);

        if self.options.editor {
            Some(self.decorate(element, rendered))
        } else {
            Some(rendered)
        }
    }

    fn render_component(
        &self,
        definition: &ComponentDefinition,
        element: &PageElement,
        children: Vec<RenderNode>,
    ) -> RenderNode {
        let props = merged_props(&definition.default_props, &element.props);
        let styles = definition.default_styles.overlay(&element.styles);
        let style = resolve_css(&styles, &element.meta, self.options.device);

        definition.renderable.render(RenderInput {
            element_id: &element.id,
            kind: &element.kind,
            props: &props,
            style: &style,
            children,
        })
    }

    /// Wrap rendered output with editor chrome. Nothing here touches the
    /// element itself.
    fn decorate(&self, element: &PageElement, rendered: RenderNode) -> RenderNode {
        let selected = self.options.selected_id.as_ref() == Some(&element.id);
        let hovered = self.options.hovered_id.as_ref() == Some(&element.id);

        let mut classes = vec![ELEMENT_CLASS];
        if selected {
            classes.push(SELECTED_CLASS);
        }
        if hovered {
            classes.push(HOVERED_CLASS);
        }
        if element.meta.locked {
            classes.push(LOCKED_CLASS);
        }
        if element.meta.hidden {
            classes.push(HIDDEN_CLASS);
        }

        let mut wrapper = RenderElement::new("div")
            .attr("class", classes.join(" "))
            .attr("data-element-id", element.id.as_str())
            .attr("data-element-type", element.kind.as_str())
            .style("position", "relative");
        if element.meta.hidden {
            wrapper = wrapper.style("opacity", HIDDEN_OPACITY);
        }

        if selected || hovered {
            wrapper = wrapper.child(
                RenderElement::new("span")
                    .attr("class", "pb-label")
                    .child(RenderNode::text(element.display_name())),
            );
        }
        if element.meta.locked {
            wrapper = wrapper.child(badge("lock", "Locked"));
        }
        if element.meta.hidden {
            wrapper = wrapper.child(badge("hidden", "Hidden"));
        }

        wrapper.child(rendered).into()
    }
}

fn badge(kind: &str, text: &str) -> RenderElement {
    RenderElement::new("span")
        .attr("class", format!("pb-badge pb-badge-{kind}"))
        .child(RenderNode::text(text))
}

fn merged_props(
    defaults: &Map<String, serde_json::Value>,
    own: &Map<String, serde_json::Value>,
) -> Map<String, serde_json::Value> {
    let mut props = defaults.clone();
    props.extend(own.iter().map(|(key, value)| (key.clone(), value.clone())));
    props
}

/// Render a page's elements.
#[must_use]
pub fn render_schema(
    schema: &PageSchema,
    registry: &ComponentRegistry,
    options: RenderOptions,
) -> Vec<RenderNode> {
    Renderer::new(registry, options).render(&schema.elements)
}

/// Render a store's document with its current session state.
///
/// # Errors
///
/// Returns [`RenderError::NoDocument`] if the store has nothing loaded.
pub fn render_store(store: &PageStore, registry: &ComponentRegistry) -> RenderResult<Vec<RenderNode>> {
    let schema = store.schema().ok_or(RenderError::NoDocument)?;
    Ok(render_schema(
        &schema,
        registry,
        RenderOptions::from_store(store),
    ))
}
