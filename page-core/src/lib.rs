//! # Page Builder Core
//!
//! Document model and editing kernel for the visual page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 page-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Document Model   │  Component Registry     │
//! │  - PageSchema     │  - type → renderable    │
//! │  - PageElement    │  - defaults, prop meta  │
//! │  - Responsive     │  - categories           │
//! ├─────────────────────────────────────────────┤
//! │  Document Store                             │
//! │  - Arena tree (id → node, parent links)     │
//! │  - add/update/remove/move/duplicate         │
//! │  - Bounded undo/redo checkpoints            │
//! │  - Selection, hover, device, dirty flag     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rendering lives in the `page-renderer` crate, which reads a
//! [`PageSchema`] together with a [`ComponentRegistry`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod component;
pub mod element;
pub mod error;
pub mod history;
mod lenient;
pub mod path;
pub mod registry;
pub mod schema;
pub mod state;
pub mod store;
pub mod style;
pub mod tree;

pub use component::{
    from_fn, FnRenderable, RenderElement, RenderInput, RenderNode, Renderable, StyleMap,
};
pub use element::{ElementDraft, ElementId, ElementMeta, PageElement};
pub use error::{BuilderError, BuilderResult};
pub use history::{History, DEFAULT_MAX_HISTORY};
pub use registry::{ComponentDefinition, ComponentRegistry, PropField, PropKind};
pub use schema::{PageInfo, PageSchema, PageStatus, SeoMeta, SCHEMA_VERSION};
pub use state::{EditorMode, LayerEntry, SidebarTab};
pub use store::{ElementPatch, PageStore, StoreConfig};
pub use style::{CssLength, Device, ElementStyles, ResponsiveValue, SpacingValue};
pub use tree::{DocumentTree, TreeNode};

/// Page core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
