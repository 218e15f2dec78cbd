//! HTML serialization of render output.

use page_core::{ComponentRegistry, PageSchema, RenderElement, RenderNode, StyleMap};

use crate::error::RenderResult;
use crate::renderer::{render_schema, RenderOptions};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Serialize a render node to HTML.
#[must_use]
pub fn to_html(node: &RenderNode) -> String {
    let mut html = String::with_capacity(256);
    write_node(&mut html, node);
    html
}

/// Serialize a sequence of nodes to HTML, one after another.
#[must_use]
pub fn nodes_to_html(nodes: &[RenderNode]) -> String {
    let mut html = String::with_capacity(256 * nodes.len().max(1));
    for node in nodes {
        write_node(&mut html, node);
    }
    html
}

/// Serialize render output to pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn nodes_to_json(nodes: &[RenderNode]) -> RenderResult<String> {
    Ok(serde_json::to_string_pretty(nodes)?)
}

/// Render a whole page as a standalone HTML document with its SEO metadata.
#[must_use]
pub fn render_document(
    schema: &PageSchema,
    registry: &ComponentRegistry,
    options: RenderOptions,
) -> String {
    let body = nodes_to_html(&render_schema(schema, registry, options));
    let info = &schema.info;
    let seo = &info.seo;
    let title = seo.meta_title.as_deref().unwrap_or(&info.title);
    let description = seo
        .meta_description
        .as_deref()
        .or(info.description.as_deref());

    let mut html = String::with_capacity(body.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    if let Some(description) = description {
        meta_tag(&mut html, "name", "description", description);
    }
    if !seo.keywords.is_empty() {
        meta_tag(&mut html, "name", "keywords", &seo.keywords.join(", "));
    }
    meta_tag(&mut html, "property", "og:title", title);
    if let Some(description) = description {
        meta_tag(&mut html, "property", "og:description", description);
    }
    if let Some(image) = &seo.og_image {
        meta_tag(&mut html, "property", "og:image", image);
    }
    if let Some(canonical) = &seo.canonical_url {
        html.push_str(&format!(
            "<link rel=\"canonical\" href=\"{}\">\n",
            escape_html(canonical)
        ));
    }
    if seo.no_index {
        meta_tag(&mut html, "name", "robots", "noindex, nofollow");
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(&body);
    html.push_str("\n</body>\n</html>\n");
    html
}

fn meta_tag(html: &mut String, attr: &str, key: &str, content: &str) {
    html.push_str(&format!(
        "<meta {attr}=\"{key}\" content=\"{}\">\n",
        escape_html(content)
    ));
}

fn write_node(html: &mut String, node: &RenderNode) {
    match node {
        RenderNode::Text { content } => html.push_str(&escape_html(content)),
        RenderNode::Fragment { children } => {
            for child in children {
                write_node(html, child);
            }
        }
        RenderNode::Element(element) => write_element(html, element),
    }
}

fn write_element(html: &mut String, element: &RenderElement) {
    html.push('<');
    html.push_str(&element.tag);
    for (name, value) in &element.attributes {
        html.push_str(&format!(" {name}=\"{}\"", escape_html(value)));
    }
    if !element.style.is_empty() {
        html.push_str(&format!(
            " style=\"{}\"",
            escape_html(&inline_style(&element.style))
        ));
    }
    html.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }
    for child in &element.children {
        write_node(html, child);
    }
    html.push_str("</");
    html.push_str(&element.tag);
    html.push('>');
}

/// `padding: 8px; color: red`.
#[must_use]
pub fn inline_style(style: &StyleMap) -> String {
    style
        .iter()
        .map(|(property, value)| format!("{property}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Escape text for HTML content and double-quoted attribute values.
#[must_use]
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_serialization() {
        let node: RenderNode = RenderElement::new("a")
            .attr("href", "/shop?a=1&b=2")
            .style("color", "red")
            .style("padding", "8px")
            .child(RenderNode::text("Buy <now>"))
            .into();
        assert_eq!(
            to_html(&node),
            "<a href=\"/shop?a=1&amp;b=2\" style=\"color: red; padding: 8px\">Buy &lt;now&gt;</a>"
        );
    }

    #[test]
    fn test_void_elements() {
        let node: RenderNode = RenderElement::new("img").attr("src", "/a.png").into();
        assert_eq!(to_html(&node), "<img src=\"/a.png\">");
        let node: RenderNode = RenderElement::new("hr").into();
        assert_eq!(to_html(&node), "<hr>");
    }

    #[test]
    fn test_fragment_has_no_wrapper() {
        let node = RenderNode::fragment(vec![RenderNode::text("a"), RenderNode::text("b")]);
        assert_eq!(to_html(&node), "ab");
    }

    #[test]
    fn test_attribute_quotes_escaped() {
        let node: RenderNode = RenderElement::new("div")
            .attr("title", "say \"hi\" & 'bye'")
            .into();
        assert_eq!(
            to_html(&node),
            "<div title=\"say &quot;hi&quot; &amp; &#39;bye&#39;\"></div>"
        );
    }

    #[test]
    fn test_document_head() {
        let mut schema = PageSchema::blank("p", "home", "Home & Garden");
        schema.info.description = Some("Plants".to_string());
        schema.info.seo.keywords = vec!["plants".to_string(), "pots".to_string()];
        schema.info.seo.no_index = true;
        schema.info.seo.canonical_url = Some("https://example.com/".to_string());

        let html = render_document(&schema, &ComponentRegistry::new(), RenderOptions::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Home &amp; Garden</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"Plants\">"));
        assert!(html.contains("<meta name=\"keywords\" content=\"plants, pots\">"));
        assert!(html.contains("<meta name=\"robots\" content=\"noindex, nofollow\">"));
        assert!(html.contains("<link rel=\"canonical\" href=\"https://example.com/\">"));
    }

    #[test]
    fn test_meta_title_overrides_title() {
        let mut schema = PageSchema::blank("p", "home", "Home");
        schema.info.seo.meta_title = Some("Best Home".to_string());
        let html = render_document(&schema, &ComponentRegistry::new(), RenderOptions::default());
        assert!(html.contains("<title>Best Home</title>"));
        assert!(!html.contains("robots"));
    }
}
