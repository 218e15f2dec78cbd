//! # Page Renderer
//!
//! Turns page documents into render output for a target device.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────┐   ┌──────────────┐   ┌──────────┐
//! │ PageElement  │──▶│ Registry lookup + │──▶│ Component    │──▶│ HTML /   │
//! │ forest       │   │ style resolution  │   │ (Renderable) │   │ JSON     │
//! └──────────────┘   └───────────────────┘   └──────────────┘   └──────────┘
//!                                                   │
//!                                          editor decorations
//! ```
//!
//! Rendering never mutates the document. Unknown element types and, outside
//! the editor, hidden elements produce no output.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod components;
pub mod error;
pub mod html;
pub mod renderer;
pub mod resolve;

pub use components::{builtin_registry, register_builtins};
pub use error::{RenderError, RenderResult};
pub use html::{escape_html, nodes_to_html, nodes_to_json, render_document, to_html};
pub use renderer::{render_schema, render_store, RenderOptions, Renderer};
pub use resolve::{resolve_css, ResolvedStyles};

/// Page renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
