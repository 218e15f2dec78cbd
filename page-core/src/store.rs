//! Page document store - the single owner of the live page and editor session.
//!
//! Every operation runs to completion on `&mut self` and either applies fully
//! or leaves the store untouched. Stale ids are silent no-ops: lookups report
//! `false`/`None` and log at debug level, so a UI holding an id that an undo
//! just removed keeps working.
//!
//! Mutations do not checkpoint on their own. Callers group edits and call
//! [`PageStore::save_to_history`] once per undoable step.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::history::{History, DEFAULT_MAX_HISTORY};
use crate::path::{get_path, set_map_path, set_path};
use crate::state::{EditorMode, LayerEntry, SidebarTab};
use crate::{
    BuilderError, BuilderResult, ComponentRegistry, Device, DocumentTree, ElementDraft, ElementId,
    ElementMeta, ElementStyles, PageElement, PageInfo, PageSchema,
};

/// Store configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of history checkpoints.
    pub max_history: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Partial element update; set fields replace the element's fields wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New component type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// New props.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Map<String, Value>>,
    /// New styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<ElementStyles>,
    /// New metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ElementMeta>,
}

#[derive(Debug, Clone)]
struct Document {
    info: PageInfo,
    tree: DocumentTree,
}

/// Live page plus editor session state and undo history.
///
/// # Example
///
/// ```
/// use page_core::{ElementDraft, PageSchema, PageStore};
///
/// let mut store = PageStore::new();
/// store
///     .set_schema(PageSchema::blank("p1", "home", "Home"))
///     .unwrap();
///
/// let section = store.add_element(ElementDraft::new("Section"), None, None).unwrap();
/// store.add_element(ElementDraft::new("Heading"), Some(&section), None);
/// store.save_to_history();
///
/// assert!(store.is_dirty());
/// assert!(store.undo());
/// assert_eq!(store.schema().unwrap().elements.len(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct PageStore {
    document: Option<Document>,
    selected_id: Option<ElementId>,
    hovered_id: Option<ElementId>,
    device: Device,
    editor_mode: EditorMode,
    is_dirty: bool,
    history: History<DocumentTree>,
    active_tab: SidebarTab,
    style_defaults: HashMap<String, ElementStyles>,
}

impl PageStore {
    /// Create an empty store with the default history cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            document: None,
            selected_id: None,
            hovered_id: None,
            device: Device::default(),
            editor_mode: EditorMode::default(),
            is_dirty: false,
            history: History::new(config.max_history),
            active_tab: SidebarTab::default(),
            style_defaults: HashMap::new(),
        }
    }

    /// Take each component's default styles from `registry`.
    ///
    /// [`PageStore::update_element_style`] starts a breakpoint override of an
    /// unset responsive field from these, so desktop keeps the component's
    /// default look. Without them it starts from CSS initial values.
    pub fn use_style_defaults(&mut self, registry: &ComponentRegistry) {
        self.style_defaults = registry
            .get_all()
            .into_iter()
            .filter(|(_, def)| !def.default_styles.is_empty())
            .map(|(kind, def)| (kind, def.default_styles))
            .collect();
    }

    // -----------------------------------------------------------------------
    // Document lifecycle
    // -----------------------------------------------------------------------

    /// Replace the document, clearing selection, dirty flag and history.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::DuplicateId`] if two elements share an id; the
    /// store is left unchanged.
    pub fn set_schema(&mut self, schema: PageSchema) -> BuilderResult<()> {
        let tree = DocumentTree::from_elements(schema.elements)?;
        tracing::debug!(
            "Loaded page {} with {} elements",
            schema.info.page_id,
            tree.len()
        );
        self.history.reset(tree.clone());
        self.document = Some(Document {
            info: schema.info,
            tree,
        });
        self.selected_id = None;
        self.hovered_id = None;
        self.is_dirty = false;
        Ok(())
    }

    /// Parse and load a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a valid page or has colliding ids.
    pub fn load_json(&mut self, json: &str) -> BuilderResult<()> {
        self.set_schema(PageSchema::from_json(json)?)
    }

    /// Discard the document and all session state except device and mode.
    pub fn close(&mut self) {
        self.document = None;
        self.selected_id = None;
        self.hovered_id = None;
        self.is_dirty = false;
        self.history.clear();
    }

    /// Assemble the current document.
    #[must_use]
    pub fn schema(&self) -> Option<PageSchema> {
        self.document.as_ref().map(|doc| PageSchema {
            info: doc.info.clone(),
            elements: doc.tree.to_elements(),
        })
    }

    /// Serialize the current document.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoDocument`] if nothing is loaded.
    pub fn to_json(&self) -> BuilderResult<String> {
        self.schema().ok_or(BuilderError::NoDocument)?.to_json()
    }

    /// Page metadata of the loaded document.
    #[must_use]
    pub fn page_info(&self) -> Option<&PageInfo> {
        self.document.as_ref().map(|doc| &doc.info)
    }

    /// The live element tree.
    #[must_use]
    pub fn tree(&self) -> Option<&DocumentTree> {
        self.document.as_ref().map(|doc| &doc.tree)
    }

    /// Edit page metadata (title, slug, SEO, status).
    ///
    /// Returns `false` if no document is loaded.
    pub fn update_page(&mut self, edit: impl FnOnce(&mut PageInfo)) -> bool {
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        edit(&mut doc.info);
        self.is_dirty = true;
        true
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Copy of the subtree rooted at `id`.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<PageElement> {
        self.tree()?.subtree(id)
    }

    /// Parent of `id`, `None` for top-level or absent elements.
    #[must_use]
    pub fn parent_of(&self, id: &ElementId) -> Option<&ElementId> {
        self.tree()?.parent_of(id)
    }

    /// Copy of the selected element.
    #[must_use]
    pub fn selected_element(&self) -> Option<PageElement> {
        self.element(self.selected_id.as_ref()?)
    }

    /// Flattened pre-order view of the tree for a layer panel.
    #[must_use]
    pub fn layers(&self) -> Vec<LayerEntry> {
        let mut layers = Vec::new();
        if let Some(tree) = self.tree() {
            tree.visit(|node, depth| {
                layers.push(LayerEntry {
                    id: node.id.clone(),
                    kind: node.kind.clone(),
                    label: node.meta.label.clone().unwrap_or_else(|| node.kind.clone()),
                    depth,
                    hidden: node.meta.hidden,
                    locked: node.meta.locked,
                });
            });
        }
        layers
    }

    /// Currently selected element id.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected_id.as_ref()
    }

    /// Currently hovered element id.
    #[must_use]
    pub fn hovered_id(&self) -> Option<&ElementId> {
        self.hovered_id.as_ref()
    }

    /// Device being previewed.
    #[must_use]
    pub fn device(&self) -> Device {
        self.device
    }

    /// Edit or preview mode.
    #[must_use]
    pub fn editor_mode(&self) -> EditorMode {
        self.editor_mode
    }

    /// Active sidebar panel.
    #[must_use]
    pub fn active_tab(&self) -> SidebarTab {
        self.active_tab
    }

    /// Whether the document changed since load or the last [`Self::mark_clean`].
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Number of stored checkpoints.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Position of the history pointer.
    #[must_use]
    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    /// Whether [`Self::undo`] would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`Self::redo`] would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -----------------------------------------------------------------------
    // Session state
    // -----------------------------------------------------------------------

    /// Select an element, or clear the selection with `None`.
    ///
    /// Selecting switches the sidebar to the properties panel. Ids not in the
    /// document are ignored.
    pub fn select_element(&mut self, id: Option<ElementId>) {
        match id {
            None => self.selected_id = None,
            Some(id) => {
                if !self.tree().is_some_and(|tree| tree.contains(&id)) {
                    tracing::debug!("Ignoring selection of unknown element {id}");
                    return;
                }
                self.selected_id = Some(id);
                self.active_tab = SidebarTab::Properties;
            }
        }
    }

    /// Mark an element as hovered, or clear hover with `None`.
    ///
    /// Ids not in the document are ignored.
    pub fn hover_element(&mut self, id: Option<ElementId>) {
        match id {
            None => self.hovered_id = None,
            Some(id) => {
                if !self.tree().is_some_and(|tree| tree.contains(&id)) {
                    tracing::debug!("Ignoring hover of unknown element {id}");
                    return;
                }
                self.hovered_id = Some(id);
            }
        }
    }

    /// Switch the previewed device.
    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    /// Switch between edit and preview; preview clears selection and hover.
    pub fn set_editor_mode(&mut self, mode: EditorMode) {
        self.editor_mode = mode;
        if mode == EditorMode::Preview {
            self.selected_id = None;
            self.hovered_id = None;
        }
    }

    /// Switch the sidebar panel.
    pub fn set_active_tab(&mut self, tab: SidebarTab) {
        self.active_tab = tab;
    }

    // -----------------------------------------------------------------------
    // Structural mutations
    // -----------------------------------------------------------------------

    /// Insert a new element (ids are minted for it and every child draft)
    /// under `parent_id` or at top level, at `index` or appended.
    ///
    /// Selects and returns the new id; `None` if no document is loaded or
    /// the parent does not exist.
    pub fn add_element(
        &mut self,
        draft: ElementDraft,
        parent_id: Option<&ElementId>,
        index: Option<usize>,
    ) -> Option<ElementId> {
        let tree = self.tree_mut()?;
        match tree.insert(draft.into_element(), parent_id, index) {
            Ok(id) => {
                self.is_dirty = true;
                self.select_element(Some(id.clone()));
                Some(id)
            }
            Err(e) => {
                tracing::debug!("add_element ignored: {e}");
                None
            }
        }
    }

    /// Replace the fields set in `patch`. Returns whether the element exists.
    pub fn update_element(&mut self, id: &ElementId, patch: ElementPatch) -> bool {
        let Some(node) = self.tree_mut().and_then(|tree| tree.get_mut(id)) else {
            tracing::debug!("update_element ignored: unknown element {id}");
            return false;
        };
        if let Some(kind) = patch.kind {
            node.kind = kind;
        }
        if let Some(props) = patch.props {
            node.props = props;
        }
        if let Some(styles) = patch.styles {
            node.styles = styles;
        }
        if let Some(meta) = patch.meta {
            node.meta = meta;
        }
        self.is_dirty = true;
        true
    }

    /// Set a nested prop at a dot path, creating intermediate objects.
    pub fn update_element_prop(&mut self, id: &ElementId, path: &str, value: Value) -> bool {
        let Some(mut props) = self.tree().and_then(|tree| tree.get(id)).map(|n| n.props.clone())
        else {
            tracing::debug!("update_element_prop ignored: unknown element {id}");
            return false;
        };
        if let Err(e) = set_map_path(&mut props, path, value) {
            tracing::debug!("update_element_prop ignored: {e}");
            return false;
        }
        self.replace_node_field(id, |node| node.props = props)
    }

    /// Set a nested style value at a dot path (e.g. `padding.mobile.top`).
    ///
    /// A tablet or mobile write into an unset responsive field first gives
    /// the field a base (see [`PageStore::use_style_defaults`]). Values that
    /// do not fit the style field's type are rejected.
    pub fn update_element_style(&mut self, id: &ElementId, path: &str, value: Value) -> bool {
        let Some(current) = self.tree().and_then(|tree| tree.get(id)) else {
            tracing::debug!("update_element_style ignored: unknown element {id}");
            return false;
        };
        let mut styles = current.styles.clone();
        if let Some(field) = breakpoint_field(path) {
            let defaults = self.style_defaults.get(&current.kind);
            if styles.seed_responsive(field, defaults) {
                tracing::debug!("Seeded {field} on {id} before breakpoint write");
            }
        }
        match patched(&styles, path, value) {
            Ok(styles) => self.replace_node_field(id, |node| node.styles = styles),
            Err(e) => {
                tracing::debug!("update_element_style ignored: {e}");
                false
            }
        }
    }

    /// Set a metadata value at a dot path (e.g. `label`).
    ///
    /// Values that do not fit the metadata field's type are rejected.
    pub fn update_element_meta(&mut self, id: &ElementId, path: &str, value: Value) -> bool {
        let Some(current) = self.tree().and_then(|tree| tree.get(id)) else {
            tracing::debug!("update_element_meta ignored: unknown element {id}");
            return false;
        };
        match patched(&current.meta, path, value) {
            Ok(meta) => self.replace_node_field(id, |node| node.meta = meta),
            Err(e) => {
                tracing::debug!("update_element_meta ignored: {e}");
                false
            }
        }
    }

    /// Detach the subtree rooted at `id`, clearing selection/hover inside it.
    pub fn remove_element(&mut self, id: &ElementId) -> bool {
        let Some(tree) = self.tree_mut() else {
            return false;
        };
        let removed_ids = tree.subtree_ids(id);
        if tree.remove(id).is_none() {
            tracing::debug!("remove_element ignored: unknown element {id}");
            return false;
        }
        if self
            .selected_id
            .as_ref()
            .is_some_and(|selected| removed_ids.contains(selected))
        {
            self.selected_id = None;
        }
        if self
            .hovered_id
            .as_ref()
            .is_some_and(|hovered| removed_ids.contains(hovered))
        {
            self.hovered_id = None;
        }
        self.is_dirty = true;
        true
    }

    /// Move the subtree at `id` under `new_parent_id` (or top level) at
    /// `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::CyclicMove`] when `new_parent_id` is `id` or a
    /// descendant of it, [`BuilderError::ElementNotFound`] /
    /// [`BuilderError::ParentNotFound`] for stale ids and
    /// [`BuilderError::NoDocument`] if nothing is loaded. Nothing changes on
    /// error.
    pub fn move_element(
        &mut self,
        id: &ElementId,
        new_parent_id: Option<&ElementId>,
        index: usize,
    ) -> BuilderResult<()> {
        let tree = self.tree_mut().ok_or(BuilderError::NoDocument)?;
        if let Err(e) = tree.move_to(id, new_parent_id, index) {
            tracing::debug!("move_element rejected: {e}");
            return Err(e);
        }
        self.is_dirty = true;
        Ok(())
    }

    /// Copy the subtree at `id` with fresh ids right after the original.
    ///
    /// Selects and returns the copy's id; `None` if `id` is unknown.
    pub fn duplicate_element(&mut self, id: &ElementId) -> Option<ElementId> {
        let Some(copy) = self.tree_mut().and_then(|tree| tree.duplicate(id)) else {
            tracing::debug!("duplicate_element ignored: unknown element {id}");
            return None;
        };
        self.is_dirty = true;
        self.select_element(Some(copy.clone()));
        Some(copy)
    }

    /// Flip `meta.locked`.
    pub fn toggle_lock(&mut self, id: &ElementId) -> bool {
        self.replace_node_field(id, |node| node.meta.locked = !node.meta.locked)
    }

    /// Flip `meta.hidden`.
    pub fn toggle_visibility(&mut self, id: &ElementId) -> bool {
        self.replace_node_field(id, |node| node.meta.hidden = !node.meta.hidden)
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Checkpoint the current tree, discarding any redo entries.
    pub fn save_to_history(&mut self) {
        let Some(doc) = self.document.as_ref() else {
            return;
        };
        self.history.checkpoint(doc.tree.clone());
        tracing::debug!(
            "History checkpoint {}/{}",
            self.history.index() + 1,
            self.history.len()
        );
    }

    /// Restore the previous checkpoint. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        match self.history.undo().cloned() {
            Some(tree) => self.restore(tree),
            None => false,
        }
    }

    /// Restore the next checkpoint. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        match self.history.redo().cloned() {
            Some(tree) => self.restore(tree),
            None => false,
        }
    }

    /// Clear the dirty flag after the document was persisted.
    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn tree_mut(&mut self) -> Option<&mut DocumentTree> {
        self.document.as_mut().map(|doc| &mut doc.tree)
    }

    fn replace_node_field(
        &mut self,
        id: &ElementId,
        edit: impl FnOnce(&mut crate::TreeNode),
    ) -> bool {
        let Some(node) = self.tree_mut().and_then(|tree| tree.get_mut(id)) else {
            tracing::debug!("Edit ignored: unknown element {id}");
            return false;
        };
        edit(node);
        self.is_dirty = true;
        true
    }

    fn restore(&mut self, tree: DocumentTree) -> bool {
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        doc.tree = tree;
        let tree = &doc.tree;
        if self.selected_id.as_ref().is_some_and(|id| !tree.contains(id)) {
            self.selected_id = None;
        }
        if self.hovered_id.as_ref().is_some_and(|id| !tree.contains(id)) {
            self.hovered_id = None;
        }
        self.is_dirty = true;
        true
    }
}

impl Default for PageStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The responsive field a `field.tablet...` or `field.mobile...` path writes to.
fn breakpoint_field(path: &str) -> Option<&str> {
    let mut segments = path.split('.');
    let field = segments.next()?;
    matches!(segments.next(), Some("tablet" | "mobile")).then_some(field)
}

/// Apply a dot-path write to a typed value through its JSON form.
///
/// Fields decode leniently, so a value of the wrong type would silently
/// vanish; the write is rejected instead when the decoded result does not
/// carry the written value.
fn patched<T>(current: &T, path: &str, value: Value) -> BuilderResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut raw = serde_json::to_value(current)?;
    set_path(&mut raw, path, value.clone())?;
    let updated: T = serde_json::from_value(raw)?;

    let written = serde_json::to_value(&updated)?;
    let landed = get_path(&written, path).unwrap_or(&Value::Null);
    if json_matches(&value, landed) {
        Ok(updated)
    } else {
        Err(BuilderError::InvalidPath(path.to_string()))
    }
}

/// Whether `actual` carries `expected`, allowing for numeric widening,
/// defaulted sibling fields and the responsive bare-value shorthand.
fn json_matches(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Null, _) => actual.is_null(),
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Object(want), Value::Object(have)) => want
            .iter()
            .all(|(key, value)| json_matches(value, have.get(key).unwrap_or(&Value::Null))),
        (_, Value::Object(have)) if have.contains_key("desktop") => {
            json_matches(expected, &have["desktop"])
        }
        _ => expected == actual,
    }
}
