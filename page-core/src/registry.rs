//! Component registry - maps element type strings to implementations.
//!
//! The registry is an ordinary value owned by the application root. It is
//! populated once at startup and then shared by reference with the renderer
//! (and anything building element drafts). Lookups never fail loudly: an
//! unknown type is simply absent.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ElementDraft, ElementStyles, Renderable};

/// Kind of editor control used for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// Numeric input.
    Number,
    /// Color picker.
    Color,
    /// Choice from [`PropField::options`].
    Select,
    /// On/off switch.
    Toggle,
    /// Image picker.
    Image,
    /// Link target.
    Url,
}

/// Editable property description shown in the properties panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropField {
    /// Property key inside the element's props.
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Editor control.
    pub kind: PropKind,
    /// Choices for [`PropKind::Select`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Initial value for new elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropField {
    /// Create a field description.
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: PropKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            options: Vec::new(),
            default: None,
        }
    }

    /// Set the choices of a select field.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the initial value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Everything the editor and renderer know about one component type.
#[derive(Clone)]
pub struct ComponentDefinition {
    /// Display name in the component palette.
    pub name: String,
    /// Palette category.
    pub category: String,
    /// Optional icon identifier.
    pub icon: Option<String>,
    /// Whether elements of this type may hold children.
    pub accepts_children: bool,
    /// The implementation.
    pub renderable: Arc<dyn Renderable>,
    /// Props applied beneath the element's own props.
    pub default_props: Map<String, Value>,
    /// Styles applied beneath the element's own styles.
    pub default_styles: ElementStyles,
    /// Properties the editor lets users change.
    pub editable_props: Vec<PropField>,
}

impl ComponentDefinition {
    /// Create a definition with no defaults.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        renderable: impl Renderable + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            icon: None,
            accepts_children: false,
            renderable: Arc::new(renderable),
            default_props: Map::new(),
            default_styles: ElementStyles::default(),
            editable_props: Vec::new(),
        }
    }

    /// Set the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Allow children.
    #[must_use]
    pub fn container(mut self) -> Self {
        self.accepts_children = true;
        self
    }

    /// Set the default styles.
    #[must_use]
    pub fn with_default_styles(mut self, styles: ElementStyles) -> Self {
        self.default_styles = styles;
        self
    }

    /// Add an editable prop. Its default, if any, becomes a default prop.
    #[must_use]
    pub fn with_field(mut self, field: PropField) -> Self {
        if let Some(default) = &field.default {
            self.default_props.insert(field.key.clone(), default.clone());
        }
        self.editable_props.push(field);
        self
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("icon", &self.icon)
            .field("accepts_children", &self.accepts_children)
            .field("default_props", &self.default_props)
            .field("default_styles", &self.default_styles)
            .field("editable_props", &self.editable_props)
            .finish_non_exhaustive()
    }
}

/// Lookup table from element type to component definition.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, ComponentDefinition>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component type. Re-registering a type replaces the old
    /// definition, which is returned.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        definition: ComponentDefinition,
    ) -> Option<ComponentDefinition> {
        let kind = kind.into();
        let previous = self.components.insert(kind.clone(), definition);
        if previous.is_some() {
            tracing::warn!("Component type {kind:?} registered twice; keeping the latest");
        }
        previous
    }

    /// Look up a component type.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&ComponentDefinition> {
        self.components.get(kind)
    }

    /// Whether a component type is registered.
    #[must_use]
    pub fn has(&self, kind: &str) -> bool {
        self.components.contains_key(kind)
    }

    /// Copy of every registration, ordered by type.
    #[must_use]
    pub fn get_all(&self) -> BTreeMap<String, ComponentDefinition> {
        self.components
            .iter()
            .map(|(kind, def)| (kind.clone(), def.clone()))
            .collect()
    }

    /// Copy of the registrations in one category, ordered by type.
    #[must_use]
    pub fn get_by_category(&self, category: &str) -> BTreeMap<String, ComponentDefinition> {
        self.components
            .iter()
            .filter(|(_, def)| def.category == category)
            .map(|(kind, def)| (kind.clone(), def.clone()))
            .collect()
    }

    /// Sorted categories of the currently registered components.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.components
            .values()
            .map(|def| def.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Start a draft for `kind` seeded with the component's default props and
    /// its display name as label.
    #[must_use]
    pub fn create_draft(&self, kind: &str) -> Option<ElementDraft> {
        let def = self.get(kind)?;
        let mut draft = ElementDraft::new(kind).with_label(def.name.clone());
        draft.props = def.default_props.clone();
        Some(draft)
    }
}
