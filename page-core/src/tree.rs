//! Arena-backed element tree.
//!
//! Elements live in a flat id → node index; each node records its parent and
//! ordered child ids. Lookups are O(1), structural edits only rewrite id
//! lists, and cycle checks walk parent links.
//!
//! Nodes are reference counted and copied on write, so cloning a tree (as
//! the history does for every checkpoint) shares all node payloads until one
//! side modifies them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{BuilderError, BuilderResult, ElementId, ElementMeta, ElementStyles, PageElement};

/// A single element stored in a [`DocumentTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Element identifier.
    pub id: ElementId,
    /// Registry key.
    pub kind: String,
    /// Component properties.
    pub props: Map<String, Value>,
    /// Visual styles.
    pub styles: ElementStyles,
    /// Editor metadata.
    pub meta: ElementMeta,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl TreeNode {
    /// Parent id, `None` for top-level elements.
    #[must_use]
    pub fn parent(&self) -> Option<&ElementId> {
        self.parent.as_ref()
    }

    /// Child ids in render order.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// The live element forest of a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentTree {
    nodes: HashMap<ElementId, Arc<TreeNode>>,
    roots: Vec<ElementId>,
}

impl DocumentTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a nested element forest.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::DuplicateId`] if two elements share an id.
    pub fn from_elements(elements: Vec<PageElement>) -> BuilderResult<Self> {
        let mut tree = Self::new();
        for element in elements {
            tree.attach(element, None, None)?;
        }
        Ok(tree)
    }

    /// Rebuild the nested element forest.
    #[must_use]
    pub fn to_elements(&self) -> Vec<PageElement> {
        self.roots.iter().filter_map(|id| self.subtree(id)).collect()
    }

    /// Copy out the subtree rooted at `id`.
    #[must_use]
    pub fn subtree(&self, id: &ElementId) -> Option<PageElement> {
        let node = self.nodes.get(id)?;
        Some(PageElement {
            id: node.id.clone(),
            kind: node.kind.clone(),
            props: node.props.clone(),
            children: node
                .children
                .iter()
                .filter_map(|child| self.subtree(child))
                .collect(),
            styles: node.styles.clone(),
            meta: node.meta.clone(),
        })
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&TreeNode> {
        self.nodes.get(id).map(Arc::as_ref)
    }

    /// Get a mutable node by id, detaching it from any shared snapshot.
    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id).map(Arc::make_mut)
    }

    /// Whether the tree contains `id`.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Top-level element ids in render order.
    #[must_use]
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Parent of `id`; `None` if `id` is top-level or absent.
    #[must_use]
    pub fn parent_of(&self, id: &ElementId) -> Option<&ElementId> {
        self.get(id).and_then(TreeNode::parent)
    }

    /// Sibling list an element lives in: the roots for `None`, otherwise the
    /// children of `parent`.
    #[must_use]
    pub fn siblings(&self, parent: Option<&ElementId>) -> Option<&[ElementId]> {
        match parent {
            None => Some(&self.roots),
            Some(parent) => self.get(parent).map(TreeNode::children),
        }
    }

    /// Position of `id` among its siblings.
    #[must_use]
    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        let parent = self.get(id)?.parent();
        self.siblings(parent)?.iter().position(|sibling| sibling == id)
    }

    /// Number of elements at every depth.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` is `ancestor` or lies beneath it.
    #[must_use]
    pub fn is_within(&self, id: &ElementId, ancestor: &ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent_of(current);
        }
        false
    }

    /// Ids of `id` and all its descendants in pre-order.
    #[must_use]
    pub fn subtree_ids(&self, id: &ElementId) -> Vec<ElementId> {
        let mut ids = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get(&current) {
                stack.extend(node.children.iter().rev().cloned());
                ids.push(current);
            }
        }
        ids
    }

    /// Visit every node in pre-order with its depth (top level is 0).
    pub fn visit(&self, mut visit: impl FnMut(&TreeNode, usize)) {
        let mut stack: Vec<(&ElementId, usize)> =
            self.roots.iter().rev().map(|id| (id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            if let Some(node) = self.get(id) {
                visit(node, depth);
                stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
            }
        }
    }

    /// Insert a subtree under `parent` (or at top level) at `index`
    /// (appending when `None` or past the end).
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ParentNotFound`] if `parent` is absent and
    /// [`BuilderError::DuplicateId`] if any id in the subtree is already in
    /// use. The tree is unchanged on error.
    pub fn insert(
        &mut self,
        element: PageElement,
        parent: Option<&ElementId>,
        index: Option<usize>,
    ) -> BuilderResult<ElementId> {
        self.attach(element, parent, index)
    }

    /// Detach and return the subtree rooted at `id`.
    pub fn remove(&mut self, id: &ElementId) -> Option<PageElement> {
        let removed = self.subtree(id)?;
        let parent = self.parent_of(id).cloned();
        if let Some(siblings) = self.siblings_mut(parent.as_ref()) {
            siblings.retain(|sibling| sibling != id);
        }
        for descendant in self.subtree_ids(id) {
            self.nodes.remove(&descendant);
        }
        Some(removed)
    }

    /// Move the subtree at `id` under `new_parent` (or to top level) at
    /// `index`. The index refers to the destination list after `id` has been
    /// taken out of its current position.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ElementNotFound`] or
    /// [`BuilderError::ParentNotFound`] for stale ids, and
    /// [`BuilderError::CyclicMove`] if `new_parent` is `id` or one of its
    /// descendants. The tree is unchanged on error.
    pub fn move_to(
        &mut self,
        id: &ElementId,
        new_parent: Option<&ElementId>,
        index: usize,
    ) -> BuilderResult<()> {
        if !self.contains(id) {
            return Err(BuilderError::ElementNotFound(id.clone()));
        }
        if let Some(parent) = new_parent {
            if !self.contains(parent) {
                return Err(BuilderError::ParentNotFound(parent.clone()));
            }
            if self.is_within(parent, id) {
                return Err(BuilderError::CyclicMove {
                    id: id.clone(),
                    parent: parent.clone(),
                });
            }
        }

        let old_parent = self.parent_of(id).cloned();
        if let Some(siblings) = self.siblings_mut(old_parent.as_ref()) {
            siblings.retain(|sibling| sibling != id);
        }
        self.place(id, new_parent, Some(index))?;
        if let Some(node) = self.get_mut(id) {
            node.parent = new_parent.cloned();
        }
        Ok(())
    }

    /// Deep-copy the subtree at `id` with fresh ids and insert the copy right
    /// after the original. Returns the copy's id.
    pub fn duplicate(&mut self, id: &ElementId) -> Option<ElementId> {
        let original = self.subtree(id)?;
        let parent = self.parent_of(id).cloned();
        let position = self.index_of(id)?;

        let label = format!("{} (Copy)", original.display_name());
        let mut copy = with_fresh_ids(original);
        copy.meta.label = Some(label);

        self.attach(copy, parent.as_ref(), Some(position + 1)).ok()
    }

    fn siblings_mut(&mut self, parent: Option<&ElementId>) -> Option<&mut Vec<ElementId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(parent) => self.get_mut(parent).map(|node| &mut node.children),
        }
    }

    fn place(
        &mut self,
        id: &ElementId,
        parent: Option<&ElementId>,
        index: Option<usize>,
    ) -> BuilderResult<()> {
        let siblings = match parent {
            None => &mut self.roots,
            Some(parent) => {
                &mut self
                    .get_mut(parent)
                    .ok_or_else(|| BuilderError::ParentNotFound(parent.clone()))?
                    .children
            }
        };
        let index = index.map_or(siblings.len(), |i| i.min(siblings.len()));
        siblings.insert(index, id.clone());
        Ok(())
    }

    fn attach(
        &mut self,
        element: PageElement,
        parent: Option<&ElementId>,
        index: Option<usize>,
    ) -> BuilderResult<ElementId> {
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(BuilderError::ParentNotFound(parent.clone()));
            }
        }

        let collision = {
            let mut incoming = HashSet::new();
            let mut collision = None;
            element.walk(&mut |el| {
                if collision.is_none()
                    && (self.nodes.contains_key(&el.id) || !incoming.insert(&el.id))
                {
                    collision = Some(el.id.clone());
                }
            });
            collision
        };
        if let Some(id) = collision {
            return Err(BuilderError::DuplicateId(id));
        }

        let id = self.store_nodes(element, parent.cloned());
        self.place(&id, parent, index)?;
        Ok(id)
    }

    fn store_nodes(&mut self, element: PageElement, parent: Option<ElementId>) -> ElementId {
        let PageElement {
            id,
            kind,
            props,
            children,
            styles,
            meta,
        } = element;
        let children = children
            .into_iter()
            .map(|child| self.store_nodes(child, Some(id.clone())))
            .collect();
        self.nodes.insert(
            id.clone(),
            Arc::new(TreeNode {
                id: id.clone(),
                kind,
                props,
                styles,
                meta,
                parent,
                children,
            }),
        );
        id
    }
}

/// Replace every id in a subtree with a fresh one.
fn with_fresh_ids(element: PageElement) -> PageElement {
    PageElement {
        id: ElementId::new(),
        children: element.children.into_iter().map(with_fresh_ids).collect(),
        ..element
    }
}
