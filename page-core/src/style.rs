//! Style descriptors and responsive values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lenient;

/// Target device breakpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Widest breakpoint; always has a value.
    #[default]
    Desktop,
    /// Medium breakpoint.
    Tablet,
    /// Narrowest breakpoint.
    Mobile,
}

impl Device {
    /// All devices from widest to narrowest.
    pub const ALL: [Device; 3] = [Device::Desktop, Device::Tablet, Device::Mobile];

    /// Lowercase name used in documents and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Tablet => "tablet",
            Device::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(Device::Desktop),
            "tablet" => Ok(Device::Tablet),
            "mobile" => Ok(Device::Mobile),
            other => Err(format!("unknown device: {other}")),
        }
    }
}

/// A value that may differ per breakpoint.
///
/// Resolution cascades mobile → tablet → desktop: the most specific value
/// defined at or above the requested breakpoint wins.
///
/// A bare value in a document (e.g. `"width": "100%"`) is read as the
/// desktop value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsiveValue<T> {
    /// Desktop value, always present.
    pub desktop: T,
    /// Tablet override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tablet: Option<T>,
    /// Mobile override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<T>,
}

impl<T> ResponsiveValue<T> {
    /// Create a value that is the same on every device.
    pub fn new(desktop: T) -> Self {
        Self {
            desktop,
            tablet: None,
            mobile: None,
        }
    }

    /// Set the tablet override.
    #[must_use]
    pub fn with_tablet(mut self, value: T) -> Self {
        self.tablet = Some(value);
        self
    }

    /// Set the mobile override.
    #[must_use]
    pub fn with_mobile(mut self, value: T) -> Self {
        self.mobile = Some(value);
        self
    }

    /// Resolve the value for a device.
    pub fn resolve(&self, device: Device) -> &T {
        match device {
            Device::Desktop => &self.desktop,
            Device::Tablet => self.tablet.as_ref().unwrap_or(&self.desktop),
            Device::Mobile => self
                .mobile
                .as_ref()
                .or(self.tablet.as_ref())
                .unwrap_or(&self.desktop),
        }
    }
}

impl<T> From<T> for ResponsiveValue<T> {
    fn from(desktop: T) -> Self {
        Self::new(desktop)
    }
}

#[derive(Deserialize)]
struct Breakpoints<T> {
    desktop: T,
    tablet: Option<T>,
    mobile: Option<T>,
}

impl<'de, T> Deserialize<'de> for ResponsiveValue<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        // Any breakpoint key means the per-device form, which needs `desktop`.
        let has_breakpoints = value.as_object().is_some_and(|map| {
            Device::ALL
                .iter()
                .any(|device| map.contains_key(device.as_str()))
        });
        if has_breakpoints {
            let Breakpoints {
                desktop,
                tablet,
                mobile,
            } = serde_json::from_value(value).map_err(de::Error::custom)?;
            Ok(Self {
                desktop,
                tablet,
                mobile,
            })
        } else {
            serde_json::from_value(value)
                .map(Self::new)
                .map_err(de::Error::custom)
        }
    }
}

/// Box offsets in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingValue {
    /// Top offset.
    pub top: f64,
    /// Right offset.
    pub right: f64,
    /// Bottom offset.
    pub bottom: f64,
    /// Left offset.
    pub left: f64,
}

impl SpacingValue {
    /// Same offset on all four sides.
    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Vertical and horizontal offsets.
    #[must_use]
    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

/// A CSS length: plain numbers are pixels, strings pass through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssLength {
    /// Pixel length.
    Px(f64),
    /// Any CSS length expression (`"100%"`, `"auto"`, `"2rem"`).
    Raw(String),
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssLength::Px(px) => write!(f, "{px}px"),
            CssLength::Raw(raw) => f.write_str(raw),
        }
    }
}

impl From<f64> for CssLength {
    fn from(px: f64) -> Self {
        CssLength::Px(px)
    }
}

impl From<&str> for CssLength {
    fn from(raw: &str) -> Self {
        CssLength::Raw(raw.to_string())
    }
}

/// Visual styles attached to an element.
///
/// Each field decodes independently; a malformed field is treated as unset.
/// Keys this version does not know are kept in [`ElementStyles::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyles {
    /// Inner spacing.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub padding: Option<ResponsiveValue<SpacingValue>>,
    /// Outer spacing.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub margin: Option<ResponsiveValue<SpacingValue>>,
    /// Background color.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_color: Option<String>,
    /// Background image URL.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_image: Option<String>,
    /// Corner radius.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub border_radius: Option<CssLength>,
    /// CSS border shorthand.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub border: Option<String>,
    /// CSS box-shadow.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub box_shadow: Option<String>,
    /// Width.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<ResponsiveValue<CssLength>>,
    /// Height.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<ResponsiveValue<CssLength>>,
    /// CSS display.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub display: Option<String>,
    /// Flex direction.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub flex_direction: Option<ResponsiveValue<String>>,
    /// Main-axis alignment.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub justify_content: Option<String>,
    /// Cross-axis alignment.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub align_items: Option<String>,
    /// Gap between children in pixels.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub gap: Option<ResponsiveValue<f64>>,
    /// Unrecognised style keys, passed through to output as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ElementStyles {
    /// Layer `overrides` on top of `self`.
    ///
    /// A field set in `overrides` replaces the whole field here, including
    /// every breakpoint of a responsive field.
    #[must_use]
    pub fn overlay(&self, overrides: &ElementStyles) -> ElementStyles {
        fn pick<T: Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
            over.clone().or_else(|| base.clone())
        }

        let mut extra = self.extra.clone();
        extra.extend(
            overrides
                .extra
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        ElementStyles {
            padding: pick(&self.padding, &overrides.padding),
            margin: pick(&self.margin, &overrides.margin),
            background_color: pick(&self.background_color, &overrides.background_color),
            background_image: pick(&self.background_image, &overrides.background_image),
            border_radius: pick(&self.border_radius, &overrides.border_radius),
            border: pick(&self.border, &overrides.border),
            box_shadow: pick(&self.box_shadow, &overrides.box_shadow),
            width: pick(&self.width, &overrides.width),
            height: pick(&self.height, &overrides.height),
            display: pick(&self.display, &overrides.display),
            flex_direction: pick(&self.flex_direction, &overrides.flex_direction),
            justify_content: pick(&self.justify_content, &overrides.justify_content),
            align_items: pick(&self.align_items, &overrides.align_items),
            gap: pick(&self.gap, &overrides.gap),
            extra,
        }
    }

    /// Whether no style is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == ElementStyles::default()
    }

    /// Give the unset responsive field `field` (document key, e.g.
    /// `flexDirection`) a base value so a breakpoint override can be written
    /// into it.
    ///
    /// The whole field is copied from `defaults` when they set it, otherwise
    /// desktop gets the CSS initial value. Returns whether anything changed.
    pub fn seed_responsive(&mut self, field: &str, defaults: Option<&ElementStyles>) -> bool {
        fn seed<T: Clone>(
            slot: &mut Option<ResponsiveValue<T>>,
            default: Option<&ResponsiveValue<T>>,
            initial: T,
        ) -> bool {
            if slot.is_some() {
                return false;
            }
            *slot = Some(
                default
                    .cloned()
                    .unwrap_or_else(|| ResponsiveValue::new(initial)),
            );
            true
        }

        match field {
            "padding" => seed(
                &mut self.padding,
                defaults.and_then(|d| d.padding.as_ref()),
                SpacingValue::default(),
            ),
            "margin" => seed(
                &mut self.margin,
                defaults.and_then(|d| d.margin.as_ref()),
                SpacingValue::default(),
            ),
            "width" => seed(
                &mut self.width,
                defaults.and_then(|d| d.width.as_ref()),
                CssLength::from("auto"),
            ),
            "height" => seed(
                &mut self.height,
                defaults.and_then(|d| d.height.as_ref()),
                CssLength::from("auto"),
            ),
            "flexDirection" => seed(
                &mut self.flex_direction,
                defaults.and_then(|d| d.flex_direction.as_ref()),
                "row".to_string(),
            ),
            "gap" => seed(&mut self.gap, defaults.and_then(|d| d.gap.as_ref()), 0.0),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_falls_back_to_tablet() {
        let value = ResponsiveValue::new(10).with_tablet(20);
        assert_eq!(*value.resolve(Device::Mobile), 20);
        assert_eq!(*value.resolve(Device::Tablet), 20);
        assert_eq!(*value.resolve(Device::Desktop), 10);
    }

    #[test]
    fn test_cascade_falls_back_to_desktop() {
        let value = ResponsiveValue::new(10);
        assert_eq!(*value.resolve(Device::Mobile), 10);
        assert_eq!(*value.resolve(Device::Tablet), 10);
    }

    #[test]
    fn test_cascade_prefers_most_specific() {
        let value = ResponsiveValue::new(10).with_tablet(20).with_mobile(30);
        assert_eq!(*value.resolve(Device::Mobile), 30);
    }

    #[test]
    fn test_mobile_override_does_not_leak_to_tablet() {
        let value = ResponsiveValue::new(10).with_mobile(30);
        assert_eq!(*value.resolve(Device::Tablet), 10);
    }

    #[test]
    fn test_bare_value_reads_as_desktop() {
        let value: ResponsiveValue<CssLength> =
            serde_json::from_str(r#""100%""#).expect("should parse");
        assert_eq!(value.desktop, CssLength::Raw("100%".to_string()));
        assert!(value.mobile.is_none());

        let spacing: ResponsiveValue<SpacingValue> =
            serde_json::from_str(r#"{"top": 4}"#).expect("should parse");
        assert!((spacing.desktop.top - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_breakpoints_without_desktop_are_malformed() {
        let result: Result<ResponsiveValue<SpacingValue>, _> =
            serde_json::from_str(r#"{"mobile": {"top": 8}}"#);
        assert!(result.is_err());

        let styles: ElementStyles = serde_json::from_str(
            r#"{"padding": {"mobile": {"top": 8, "right": 0, "bottom": 8, "left": 0}}, "gap": {"tablet": 4}}"#,
        )
        .expect("should parse");
        assert!(styles.padding.is_none());
        assert!(styles.gap.is_none());
    }

    #[test]
    fn test_breakpoints_keep_overrides() {
        let value: ResponsiveValue<f64> =
            serde_json::from_str(r#"{"desktop": 16, "mobile": 8}"#).expect("should parse");
        assert_eq!(value, ResponsiveValue::new(16.0).with_mobile(8.0));
    }

    #[test]
    fn test_seed_responsive_uses_defaults_then_initial() {
        let defaults = ElementStyles {
            padding: Some(
                ResponsiveValue::new(SpacingValue::symmetric(64.0, 24.0))
                    .with_mobile(SpacingValue::symmetric(32.0, 16.0)),
            ),
            ..ElementStyles::default()
        };

        let mut styles = ElementStyles::default();
        assert!(styles.seed_responsive("padding", Some(&defaults)));
        assert_eq!(styles.padding, defaults.padding);

        assert!(styles.seed_responsive("gap", Some(&defaults)));
        assert_eq!(styles.gap, Some(ResponsiveValue::new(0.0)));

        assert!(styles.seed_responsive("width", None));
        assert_eq!(styles.width, Some(ResponsiveValue::new(CssLength::from("auto"))));

        assert!(!styles.seed_responsive("padding", None));
        assert!(!styles.seed_responsive("backgroundColor", None));
    }

    #[test]
    fn test_malformed_style_field_is_skipped() {
        let styles: ElementStyles = serde_json::from_str(
            r##"{"padding": {"desktop": "oops"}, "backgroundColor": "#fff", "color": "red"}"##,
        )
        .expect("should parse");
        assert!(styles.padding.is_none());
        assert_eq!(styles.background_color.as_deref(), Some("#fff"));
        assert_eq!(styles.extra.get("color"), Some(&Value::from("red")));
    }

    #[test]
    fn test_overlay_prefers_overrides() {
        let base = ElementStyles {
            background_color: Some("#000".to_string()),
            display: Some("block".to_string()),
            ..ElementStyles::default()
        };
        let overrides = ElementStyles {
            background_color: Some("#fff".to_string()),
            ..ElementStyles::default()
        };
        let merged = base.overlay(&overrides);
        assert_eq!(merged.background_color.as_deref(), Some("#fff"));
        assert_eq!(merged.display.as_deref(), Some("block"));
    }

    #[test]
    fn test_device_parse() {
        assert_eq!("Mobile".parse::<Device>(), Ok(Device::Mobile));
        assert!("watch".parse::<Device>().is_err());
    }
}
