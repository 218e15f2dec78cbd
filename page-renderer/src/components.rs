//! Built-in components.
//!
//! Each component is a stateless function from [`RenderInput`] to a
//! [`RenderNode`]. Component base styles are applied first so the element's
//! resolved styles always win.

use page_core::{
    from_fn, ComponentDefinition, ComponentRegistry, CssLength, ElementStyles, PropField,
    PropKind, RenderElement, RenderInput, RenderNode, ResponsiveValue, SpacingValue,
};

/// Palette category for structural components.
pub const LAYOUT: &str = "layout";
/// Palette category for text components.
pub const TYPOGRAPHY: &str = "typography";
/// Palette category for media components.
pub const MEDIA: &str = "media";
/// Palette category for interactive components.
pub const INTERACTIVE: &str = "interactive";

const HEADING_LEVELS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Register every built-in component.
pub fn register_builtins(registry: &mut ComponentRegistry) {
    registry.register("Section", section());
    registry.register("Container", container());
    registry.register("Flex", flex());
    registry.register("Grid", grid());
    registry.register("Heading", heading());
    registry.register("Paragraph", paragraph());
    registry.register("Button", button());
    registry.register("Image", image());
    registry.register("Spacer", spacer());
    registry.register("Divider", divider());
    tracing::debug!("Registered {} built-in components", registry.len());
}

/// A registry holding the built-in components.
#[must_use]
pub fn builtin_registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    register_builtins(&mut registry);
    registry
}

// ============================================================================
// Layout
// ============================================================================

fn section() -> ComponentDefinition {
    ComponentDefinition::new(
        "Section",
        LAYOUT,
        from_fn(|input: RenderInput<'_>| {
            let mut section = RenderElement::new("section").style("width", "100%");
            if let Some(anchor) = input.prop_str("anchor").filter(|a| !a.is_empty()) {
                section = section.attr("id", anchor);
            }
            section
                .styles(input.style)
                .children(input.children)
                .into()
        }),
    )
    .with_icon("square")
    .container()
    .with_field(PropField::new("anchor", "Anchor ID", PropKind::Text))
    .with_default_styles(ElementStyles {
        padding: Some(
            ResponsiveValue::new(SpacingValue::symmetric(64.0, 24.0))
                .with_mobile(SpacingValue::symmetric(32.0, 16.0)),
        ),
        ..ElementStyles::default()
    })
}

fn container() -> ComponentDefinition {
    ComponentDefinition::new(
        "Container",
        LAYOUT,
        from_fn(|input: RenderInput<'_>| {
            let max_width = input.prop_f64("maxWidth").unwrap_or(1200.0);
            RenderElement::new("div")
                .style("max-width", format!("{max_width}px"))
                .style("margin", "0 auto")
                .styles(input.style)
                .children(input.children)
                .into()
        }),
    )
    .with_icon("box")
    .container()
    .with_field(PropField::new("maxWidth", "Max width", PropKind::Number).with_default(1200))
}

fn flex() -> ComponentDefinition {
    ComponentDefinition::new(
        "Flex",
        LAYOUT,
        from_fn(|input: RenderInput<'_>| {
            let mut flex = RenderElement::new("div").style("display", "flex");
            if input.prop_bool("wrap") {
                flex = flex.style("flex-wrap", "wrap");
            }
            flex.styles(input.style).children(input.children).into()
        }),
    )
    .with_icon("columns")
    .container()
    .with_field(PropField::new("wrap", "Wrap items", PropKind::Toggle).with_default(false))
    .with_default_styles(ElementStyles {
        flex_direction: Some(
            ResponsiveValue::new("row".to_string()).with_mobile("column".to_string()),
        ),
        gap: Some(ResponsiveValue::new(16.0)),
        ..ElementStyles::default()
    })
}

fn grid() -> ComponentDefinition {
    ComponentDefinition::new(
        "Grid",
        LAYOUT,
        from_fn(|input: RenderInput<'_>| {
            let columns = input
                .prop_f64("columns")
                .filter(|c| *c >= 1.0)
                .unwrap_or(3.0)
                .round();
            RenderElement::new("div")
                .style("display", "grid")
                .style(
                    "grid-template-columns",
                    format!("repeat({columns}, minmax(0, 1fr))"),
                )
                .styles(input.style)
                .children(input.children)
                .into()
        }),
    )
    .with_icon("grid")
    .container()
    .with_field(PropField::new("columns", "Columns", PropKind::Number).with_default(3))
    .with_default_styles(ElementStyles {
        gap: Some(ResponsiveValue::new(16.0)),
        ..ElementStyles::default()
    })
}

// ============================================================================
// Typography
// ============================================================================

fn heading() -> ComponentDefinition {
    ComponentDefinition::new(
        "Heading",
        TYPOGRAPHY,
        from_fn(|input: RenderInput<'_>| {
            let level = input
                .prop_str("level")
                .filter(|level| HEADING_LEVELS.contains(level))
                .unwrap_or("h2");
            RenderElement::new(level)
                .styles(input.style)
                .child(RenderNode::text(input.prop_str("text").unwrap_or_default()))
                .into()
        }),
    )
    .with_icon("heading")
    .with_field(PropField::new("text", "Text", PropKind::Text).with_default("Heading"))
    .with_field(
        PropField::new("level", "Level", PropKind::Select)
            .with_options(HEADING_LEVELS)
            .with_default("h2"),
    )
}

fn paragraph() -> ComponentDefinition {
    ComponentDefinition::new(
        "Paragraph",
        TYPOGRAPHY,
        from_fn(|input: RenderInput<'_>| {
            RenderElement::new("p")
                .styles(input.style)
                .child(RenderNode::text(input.prop_str("text").unwrap_or_default()))
                .into()
        }),
    )
    .with_icon("text")
    .with_field(
        PropField::new("text", "Text", PropKind::Textarea)
            .with_default("Write something here."),
    )
}

// ============================================================================
// Interactive
// ============================================================================

fn button() -> ComponentDefinition {
    ComponentDefinition::new(
        "Button",
        INTERACTIVE,
        from_fn(|input: RenderInput<'_>| {
            let variant = input.prop_str("variant").unwrap_or("primary");
            let mut link = RenderElement::new("a")
                .attr("href", input.prop_str("href").unwrap_or("#"))
                .attr("class", format!("pb-button pb-button-{variant}"))
                .style("display", "inline-block");
            if input.prop_bool("openInNewTab") {
                link = link
                    .attr("target", "_blank")
                    .attr("rel", "noopener noreferrer");
            }
            link.styles(input.style)
                .child(RenderNode::text(input.prop_str("text").unwrap_or_default()))
                .into()
        }),
    )
    .with_icon("pointer")
    .with_field(PropField::new("text", "Label", PropKind::Text).with_default("Click me"))
    .with_field(PropField::new("href", "Link", PropKind::Url).with_default("#"))
    .with_field(
        PropField::new("variant", "Variant", PropKind::Select)
            .with_options(["primary", "secondary", "outline"])
            .with_default("primary"),
    )
    .with_field(
        PropField::new("openInNewTab", "Open in new tab", PropKind::Toggle).with_default(false),
    )
    .with_default_styles(ElementStyles {
        padding: Some(ResponsiveValue::new(SpacingValue::symmetric(12.0, 24.0))),
        border_radius: Some(CssLength::Px(6.0)),
        ..ElementStyles::default()
    })
}

// ============================================================================
// Media
// ============================================================================

fn image() -> ComponentDefinition {
    ComponentDefinition::new(
        "Image",
        MEDIA,
        from_fn(|input: RenderInput<'_>| {
            match input.prop_str("src").filter(|src| !src.is_empty()) {
                Some(src) => RenderElement::new("img")
                    .attr("src", src)
                    .attr("alt", input.prop_str("alt").unwrap_or_default())
                    .style("max-width", "100%")
                    .styles(input.style)
                    .into(),
                None => RenderElement::new("div")
                    .attr("class", "pb-image-placeholder")
                    .style("background-color", "#f3f4f6")
                    .style("min-height", "120px")
                    .styles(input.style)
                    .child(RenderNode::text("No image selected"))
                    .into(),
            }
        }),
    )
    .with_icon("image")
    .with_field(PropField::new("src", "Image", PropKind::Image))
    .with_field(PropField::new("alt", "Alt text", PropKind::Text).with_default(""))
}

fn spacer() -> ComponentDefinition {
    ComponentDefinition::new(
        "Spacer",
        LAYOUT,
        from_fn(|input: RenderInput<'_>| {
            let height = input.prop_f64("height").unwrap_or(40.0);
            RenderElement::new("div")
                .attr("aria-hidden", "true")
                .style("height", format!("{height}px"))
                .styles(input.style)
                .into()
        }),
    )
    .with_icon("move-vertical")
    .with_field(PropField::new("height", "Height", PropKind::Number).with_default(40))
}

fn divider() -> ComponentDefinition {
    ComponentDefinition::new(
        "Divider",
        LAYOUT,
        from_fn(|input: RenderInput<'_>| {
            let color = input.prop_str("color").unwrap_or("#e5e7eb");
            let thickness = input.prop_f64("thickness").unwrap_or(1.0);
            RenderElement::new("hr")
                .style("border", "none")
                .style("border-top", format!("{thickness}px solid {color}"))
                .styles(input.style)
                .into()
        }),
    )
    .with_icon("minus")
    .with_field(PropField::new("color", "Color", PropKind::Color).with_default("#e5e7eb"))
    .with_field(PropField::new("thickness", "Thickness", PropKind::Number).with_default(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::to_html;
    use crate::renderer::{RenderOptions, Renderer};
    use page_core::{Device, PageElement};
    use serde_json::json;

    fn render_one(element: &PageElement, device: Device) -> RenderNode {
        let registry = builtin_registry();
        Renderer::new(&registry, RenderOptions::live(device))
            .render_element(element)
            .expect("rendered")
    }

    #[test]
    fn test_builtins_registered() {
        let registry = builtin_registry();
        assert_eq!(registry.len(), 10);
        assert_eq!(
            registry.categories(),
            vec![INTERACTIVE, LAYOUT, MEDIA, TYPOGRAPHY]
        );
        assert!(registry.get("Section").expect("section").accepts_children);
        assert!(!registry.get("Heading").expect("heading").accepts_children);
    }

    #[test]
    fn test_create_draft_seeds_defaults() {
        let registry = builtin_registry();
        let draft = registry.create_draft("Button").expect("draft");
        assert_eq!(draft.props["text"], "Click me");
        assert_eq!(draft.props["variant"], "primary");
        assert_eq!(draft.meta.label.as_deref(), Some("Button"));
    }

    #[test]
    fn test_heading_level() {
        let mut heading = PageElement::new("Heading");
        heading.props.insert("level".to_string(), json!("h1"));
        heading.props.insert("text".to_string(), json!("Welcome"));
        assert_eq!(to_html(&render_one(&heading, Device::Desktop)), "<h1>Welcome</h1>");

        heading.props.insert("level".to_string(), json!("script"));
        assert_eq!(to_html(&render_one(&heading, Device::Desktop)), "<h2>Welcome</h2>");
    }

    #[test]
    fn test_section_padding_per_device() {
        let section = PageElement::new("Section");
        let desktop = render_one(&section, Device::Desktop);
        let mobile = render_one(&section, Device::Mobile);
        assert_eq!(
            desktop.as_element().expect("element").style["padding"],
            "64px 24px 64px 24px"
        );
        assert_eq!(
            mobile.as_element().expect("element").style["padding"],
            "32px 16px 32px 16px"
        );
    }

    #[test]
    fn test_element_styles_beat_component_base() {
        let mut spacer = PageElement::new("Spacer");
        spacer.styles.height = Some(ResponsiveValue::new(CssLength::Px(10.0)));
        let node = render_one(&spacer, Device::Desktop);
        assert_eq!(node.as_element().expect("element").style["height"], "10px");
    }

    #[test]
    fn test_button_new_tab() {
        let mut button = PageElement::new("Button");
        button.props.insert("openInNewTab".to_string(), json!(true));
        button.props.insert("href".to_string(), json!("/shop"));
        let node = render_one(&button, Device::Desktop);
        let element = node.as_element().expect("element");
        assert_eq!(element.attributes["target"], "_blank");
        assert_eq!(element.attributes["href"], "/shop");
        assert!(element.has_class("pb-button-primary"));
        assert_eq!(node.text_content(), "Click me");
    }

    #[test]
    fn test_image_placeholder_without_src() {
        let image = PageElement::new("Image");
        let node = render_one(&image, Device::Desktop);
        assert!(node
            .as_element()
            .expect("element")
            .has_class("pb-image-placeholder"));
    }
}
