//! Editor session state types.

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// Whether the editor is editing or previewing the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Elements can be selected and edited.
    #[default]
    Edit,
    /// Page is shown as visitors would see it.
    Preview,
}

/// Active panel of the editor sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarTab {
    /// Component palette.
    #[default]
    Elements,
    /// Layer tree.
    Layers,
    /// Properties of the selected element.
    Properties,
    /// Page settings.
    Settings,
}

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerEntry {
    /// Element id.
    pub id: ElementId,
    /// Component type.
    pub kind: String,
    /// Label, falling back to the component type.
    pub label: String,
    /// Nesting depth (top level is 0).
    pub depth: usize,
    /// Whether the element is hidden.
    pub hidden: bool,
    /// Whether the element is locked.
    pub locked: bool,
}
