//! Page elements - the nodes of a page document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::lenient;
use crate::ElementStyles;

/// Unique identifier for an element.
///
/// Fresh ids are random UUIDs; ids read from a document are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Editor metadata for an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMeta {
    /// Human-readable name shown in the editor.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    /// Locked elements are flagged in the editor.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub locked: bool,
    /// Hidden elements are not rendered outside the editor.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub hidden: bool,
    /// Stacking order.
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub z_index: Option<i32>,
}

/// One node of the page tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageElement {
    /// Unique identifier.
    pub id: ElementId,
    /// Registry key of the component rendering this element.
    #[serde(rename = "type")]
    pub kind: String,
    /// Component properties.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub props: Map<String, Value>,
    /// Child elements in render order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageElement>,
    /// Visual styles.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub styles: ElementStyles,
    /// Editor metadata.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub meta: ElementMeta,
}

impl PageElement {
    /// Create an element with a fresh id and no props, styles or children.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            kind: kind.into(),
            props: Map::new(),
            children: Vec::new(),
            styles: ElementStyles::default(),
            meta: ElementMeta::default(),
        }
    }

    /// Label if set, otherwise the component type.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.meta.label.as_deref().unwrap_or(&self.kind)
    }

    /// Visit this element and its descendants in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a PageElement)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// An element that has not been given an id yet.
///
/// Drafts are turned into [`PageElement`]s by the store, which mints an id
/// for the draft and every nested child draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementDraft {
    /// Registry key.
    #[serde(rename = "type")]
    pub kind: String,
    /// Component properties.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub props: Map<String, Value>,
    /// Visual styles.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub styles: ElementStyles,
    /// Editor metadata.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub meta: ElementMeta,
    /// Child drafts.
    #[serde(default)]
    pub children: Vec<ElementDraft>,
}

impl ElementDraft {
    /// Create a draft for the given component type.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Set a property.
    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Set the styles.
    #[must_use]
    pub fn with_styles(mut self, styles: ElementStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Set the editor label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.meta.label = Some(label.into());
        self
    }

    /// Append a child draft.
    #[must_use]
    pub fn with_child(mut self, child: ElementDraft) -> Self {
        self.children.push(child);
        self
    }

    /// Mint fresh ids for this draft and all its children.
    #[must_use]
    pub fn into_element(self) -> PageElement {
        PageElement {
            id: ElementId::new(),
            kind: self.kind,
            props: self.props,
            children: self
                .children
                .into_iter()
                .map(ElementDraft::into_element)
                .collect(),
            styles: self.styles,
            meta: self.meta,
        }
    }
}
