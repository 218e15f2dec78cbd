//! Responsive style resolution.
//!
//! Turns an element's [`ElementStyles`] into the concrete values for one
//! device, then into inline CSS. Breakpoints cascade mobile → tablet →
//! desktop; fields that are unset or failed to decode are simply absent.

use page_core::{CssLength, Device, ElementMeta, ElementStyles, SpacingValue, StyleMap};
use serde_json::Value;

/// Styles resolved for a single device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStyles {
    /// Inner spacing.
    pub padding: Option<SpacingValue>,
    /// Outer spacing.
    pub margin: Option<SpacingValue>,
    /// Background color.
    pub background_color: Option<String>,
    /// Background image URL or CSS image value.
    pub background_image: Option<String>,
    /// Corner radius.
    pub border_radius: Option<CssLength>,
    /// Border shorthand.
    pub border: Option<String>,
    /// Box shadow.
    pub box_shadow: Option<String>,
    /// Width.
    pub width: Option<CssLength>,
    /// Height.
    pub height: Option<CssLength>,
    /// Display mode.
    pub display: Option<String>,
    /// Flex direction.
    pub flex_direction: Option<String>,
    /// Main-axis alignment.
    pub justify_content: Option<String>,
    /// Cross-axis alignment.
    pub align_items: Option<String>,
    /// Gap in pixels.
    pub gap: Option<f64>,
    /// Stacking order, from element metadata.
    pub z_index: Option<i32>,
    /// Pass-through properties as CSS name → value.
    pub extra: StyleMap,
}

impl ResolvedStyles {
    /// Resolve `styles` (and the stacking order in `meta`) for `device`.
    #[must_use]
    pub fn resolve(styles: &ElementStyles, meta: &ElementMeta, device: Device) -> Self {
        let extra = styles
            .extra
            .iter()
            .filter_map(|(key, value)| {
                let css = scalar_css(value)?;
                Some((kebab_case(key), css))
            })
            .collect();

        Self {
            padding: styles.padding.as_ref().map(|v| *v.resolve(device)),
            margin: styles.margin.as_ref().map(|v| *v.resolve(device)),
            background_color: styles.background_color.clone(),
            background_image: styles.background_image.clone(),
            border_radius: styles.border_radius.clone(),
            border: styles.border.clone(),
            box_shadow: styles.box_shadow.clone(),
            width: styles.width.as_ref().map(|v| v.resolve(device).clone()),
            height: styles.height.as_ref().map(|v| v.resolve(device).clone()),
            display: styles.display.clone(),
            flex_direction: styles
                .flex_direction
                .as_ref()
                .map(|v| v.resolve(device).clone()),
            justify_content: styles.justify_content.clone(),
            align_items: styles.align_items.clone(),
            gap: styles.gap.as_ref().map(|v| *v.resolve(device)),
            z_index: meta.z_index,
            extra,
        }
    }

    /// Inline CSS properties.
    ///
    /// Known fields take precedence over pass-through keys of the same name.
    #[must_use]
    pub fn to_css(&self) -> StyleMap {
        let mut css = self.extra.clone();
        let mut set = |property: &str, value: Option<String>| {
            if let Some(value) = value {
                css.insert(property.to_string(), value);
            }
        };

        set("padding", self.padding.as_ref().map(spacing_css));
        set("margin", self.margin.as_ref().map(spacing_css));
        set("background-color", self.background_color.clone());
        set(
            "background-image",
            self.background_image.as_deref().map(image_css),
        );
        set(
            "border-radius",
            self.border_radius.as_ref().map(ToString::to_string),
        );
        set("border", self.border.clone());
        set("box-shadow", self.box_shadow.clone());
        set("width", self.width.as_ref().map(ToString::to_string));
        set("height", self.height.as_ref().map(ToString::to_string));
        set("display", self.display.clone());
        set("flex-direction", self.flex_direction.clone());
        set("justify-content", self.justify_content.clone());
        set("align-items", self.align_items.clone());
        set("gap", self.gap.map(|gap| format!("{gap}px")));
        set("z-index", self.z_index.map(|z| z.to_string()));
        css
    }
}

/// Resolve straight to inline CSS.
#[must_use]
pub fn resolve_css(styles: &ElementStyles, meta: &ElementMeta, device: Device) -> StyleMap {
    ResolvedStyles::resolve(styles, meta, device).to_css()
}

fn spacing_css(spacing: &SpacingValue) -> String {
    format!(
        "{}px {}px {}px {}px",
        spacing.top, spacing.right, spacing.bottom, spacing.left
    )
}

fn image_css(image: &str) -> String {
    let trimmed = image.trim();
    if trimmed.contains('(') {
        // Already a CSS image function (url, linear-gradient, ...).
        trimmed.to_string()
    } else {
        format!("url(\"{}\")", trimmed.replace('"', "%22"))
    }
}

fn scalar_css(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `fontSize` → `font-size`; already-kebab keys are unchanged.
fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
