//! The renderable capability and the render output it produces.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::ElementId;

/// Resolved inline styles as CSS property → value.
pub type StyleMap = BTreeMap<String, String>;

/// Output of rendering: a small virtual DOM.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum RenderNode {
    /// A tagged element.
    Element(RenderElement),
    /// Text content.
    Text {
        /// The text.
        content: String,
    },
    /// A group of nodes with no wrapper.
    Fragment {
        /// Grouped nodes.
        children: Vec<RenderNode>,
    },
}

impl RenderNode {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        RenderNode::Text {
            content: content.into(),
        }
    }

    /// Create a fragment.
    #[must_use]
    pub fn fragment(children: Vec<RenderNode>) -> Self {
        RenderNode::Fragment { children }
    }

    /// The element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&RenderElement> {
        match self {
            RenderNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            RenderNode::Text { content } => content.clone(),
            RenderNode::Element(RenderElement { children, .. })
            | RenderNode::Fragment { children } => {
                children.iter().map(RenderNode::text_content).collect()
            }
        }
    }

    /// Find the first element (pre-order) whose attribute `name` equals `value`.
    #[must_use]
    pub fn find_by_attribute(&self, name: &str, value: &str) -> Option<&RenderElement> {
        match self {
            RenderNode::Text { .. } => None,
            RenderNode::Element(element) => {
                if element.attributes.get(name).map(String::as_str) == Some(value) {
                    return Some(element);
                }
                element
                    .children
                    .iter()
                    .find_map(|child| child.find_by_attribute(name, value))
            }
            RenderNode::Fragment { children } => children
                .iter()
                .find_map(|child| child.find_by_attribute(name, value)),
        }
    }
}

impl From<RenderElement> for RenderNode {
    fn from(element: RenderElement) -> Self {
        RenderNode::Element(element)
    }
}

/// A tagged element with attributes, inline styles and children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderElement {
    /// HTML tag name.
    pub tag: String,
    /// Attributes other than `style`.
    pub attributes: BTreeMap<String, String>,
    /// Inline styles.
    pub style: StyleMap,
    /// Child nodes.
    pub children: Vec<RenderNode>,
}

impl RenderElement {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            style: StyleMap::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set one inline style property.
    #[must_use]
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    /// Merge inline styles; existing properties are overwritten.
    #[must_use]
    pub fn styles(mut self, styles: &StyleMap) -> Self {
        self.style
            .extend(styles.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, child: impl Into<RenderNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = RenderNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Space-separated class list contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attributes
            .get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

/// Everything a component receives to render one element.
#[derive(Debug)]
pub struct RenderInput<'a> {
    /// Id of the element being rendered.
    pub element_id: &'a ElementId,
    /// Component type.
    pub kind: &'a str,
    /// Default props overlaid with the element's props.
    pub props: &'a Map<String, Value>,
    /// Resolved inline styles for the target device.
    pub style: &'a StyleMap,
    /// Already-rendered children in order.
    pub children: Vec<RenderNode>,
}

impl RenderInput<'_> {
    /// String prop, if present and a string.
    #[must_use]
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Numeric prop, if present and a number.
    #[must_use]
    pub fn prop_f64(&self, key: &str) -> Option<f64> {
        self.props.get(key).and_then(Value::as_f64)
    }

    /// Boolean prop, `false` when absent.
    #[must_use]
    pub fn prop_bool(&self, key: &str) -> bool {
        self.props.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// A component implementation: props and styles in, render node out.
///
/// Implementations are stateless; the same input must produce the same node.
pub trait Renderable: Send + Sync {
    /// Render one element.
    fn render(&self, input: RenderInput<'_>) -> RenderNode;
}

/// A [`Renderable`] backed by a function.
pub struct FnRenderable<F>(F);

impl<F> Renderable for FnRenderable<F>
where
    F: Fn(RenderInput<'_>) -> RenderNode + Send + Sync,
{
    fn render(&self, input: RenderInput<'_>) -> RenderNode {
        (self.0)(input)
    }
}

/// Wrap a function as a [`Renderable`].
pub fn from_fn<F>(render: F) -> FnRenderable<F>
where
    F: Fn(RenderInput<'_>) -> RenderNode + Send + Sync,
{
    FnRenderable(render)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_queries() {
        let node: RenderNode = RenderElement::new("section")
            .attr("data-id", "a")
            .attr("class", "hero dark")
            .style("padding", "8px")
            .child(RenderElement::new("h1").child(RenderNode::text("Hello")))
            .child(RenderNode::text(" world"))
            .into();

        let element = node.as_element().expect("element");
        assert!(element.has_class("dark"));
        assert!(!element.has_class("light"));
        assert_eq!(node.text_content(), "Hello world");
        assert!(node.find_by_attribute("data-id", "a").is_some());
        assert!(node.find_by_attribute("data-id", "b").is_none());
    }

    #[test]
    fn test_fn_renderable() {
        let renderable = from_fn(|input: RenderInput<'_>| {
            RenderNode::text(input.prop_str("text").unwrap_or_default())
        });
        let id = ElementId::from("x");
        let mut props = Map::new();
        props.insert("text".to_string(), Value::from("hi"));
        let style = StyleMap::new();
        let node = renderable.render(RenderInput {
            element_id: &id,
            kind: "Text",
            props: &props,
            style: &style,
            children: Vec::new(),
        });
        assert_eq!(node, RenderNode::text("hi"));
    }
}
