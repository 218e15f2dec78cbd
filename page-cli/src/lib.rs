//! # Page Builder CLI
//!
//! Command-line access to page documents stored as JSON.
//!
//! ## Usage
//!
//! ```bash
//! pagebuilder render page.json --device mobile > page.html
//! pagebuilder render page.json --editor --selected hero --format json
//! pagebuilder layers page.json
//! pagebuilder components --category layout
//! pagebuilder validate page.json
//! ```
//!
//! ## Architecture
//!
//! - `Cli` / `Command` - arguments parsed with clap
//! - `RenderArgs` → [`page_renderer::RenderOptions`] via `From`
//! - [`run`] executes a command against any writer, so commands can be
//!   driven from tests without a terminal

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use page_core::{
    BuilderError, ComponentRegistry, Device, ElementId, PageElement, PageSchema, PageStore,
};
use page_renderer::{
    builtin_registry, nodes_to_html, nodes_to_json, render_document, render_schema,
    RenderOptions,
};

/// Command-line arguments for pagebuilder.
#[derive(Debug, Clone, Parser)]
#[command(name = "pagebuilder")]
#[command(about = "Inspect, validate and render page-builder documents")]
#[command(version)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render a page document
    Render(RenderArgs),
    /// Print the layer tree of a page document
    Layers {
        /// Page document (JSON)
        input: PathBuf,
        /// Print layers as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the registered components
    Components {
        /// Only list this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Check that a page document loads and every type is registered
    Validate {
        /// Page document (JSON)
        input: PathBuf,
        /// Treat unregistered component types as errors
        #[arg(long)]
        strict: bool,
    },
}

/// Arguments of the render command.
#[derive(Debug, Clone, clap::Args)]
pub struct RenderArgs {
    /// Page document (JSON)
    pub input: PathBuf,

    /// Target device
    #[arg(long, env = "PAGEBUILDER_DEVICE", default_value = "desktop")]
    pub device: Device,

    /// Render editor decorations and hidden elements
    #[arg(long, env = "PAGEBUILDER_EDITOR")]
    pub editor: bool,

    /// Element to mark as selected (editor only)
    #[arg(long)]
    pub selected: Option<String>,

    /// Element to mark as hovered (editor only)
    #[arg(long)]
    pub hovered: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Document)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Render output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Standalone HTML page with head metadata
    Document,
    /// HTML fragment of the page body
    Html,
    /// Render tree as JSON
    Json,
}

impl From<&RenderArgs> for RenderOptions {
    fn from(args: &RenderArgs) -> Self {
        Self {
            device: args.device,
            editor: args.editor,
            selected_id: args.selected.as_deref().map(ElementId::from),
            hovered_id: args.hovered.as_deref().map(ElementId::from),
        }
    }
}

/// Load a page document from disk, rejecting colliding element ids.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a page document, or
/// contains duplicate element ids.
pub fn load_page(path: &Path) -> anyhow::Result<PageSchema> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut store = PageStore::new();
    store
        .load_json(&json)
        .with_context(|| format!("Failed to load page from {}", path.display()))?;
    store.schema().ok_or_else(|| BuilderError::NoDocument.into())
}

/// Execute a command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if a document cannot be loaded, validation fails, or
/// output cannot be written.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let registry = builtin_registry();
    match &cli.command {
        Command::Render(args) => render(args, &registry, out),
        Command::Layers { input, json } => layers(input, *json, out),
        Command::Components { category } => components(&registry, category.as_deref(), out),
        Command::Validate { input, strict } => validate(input, *strict, &registry, out),
    }
}

fn render(args: &RenderArgs, registry: &ComponentRegistry, out: &mut impl Write) -> anyhow::Result<()> {
    let schema = load_page(&args.input)?;
    let options = RenderOptions::from(args);
    tracing::info!(
        "Rendering {} for {} ({})",
        schema.info.slug,
        options.device,
        if options.editor { "editor" } else { "live" }
    );

    let rendered = match args.format {
        OutputFormat::Document => render_document(&schema, registry, options),
        OutputFormat::Html => nodes_to_html(&render_schema(&schema, registry, options)),
        OutputFormat::Json => nodes_to_json(&render_schema(&schema, registry, options))?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} bytes to {}", rendered.len(), path.display());
        }
        None => writeln!(out, "{rendered}")?,
    }
    Ok(())
}

fn layers(input: &Path, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let mut store = PageStore::new();
    store.set_schema(load_page(input)?)?;
    let layers = store.layers();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&layers)?)?;
        return Ok(());
    }
    for layer in &layers {
        let mut flags = Vec::new();
        if layer.hidden {
            flags.push("hidden");
        }
        if layer.locked {
            flags.push("locked");
        }
        let indent = "  ".repeat(layer.depth);
        write!(out, "{indent}{} [{}] {}", layer.label, layer.kind, layer.id)?;
        if flags.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, " ({})", flags.join(", "))?;
        }
    }
    Ok(())
}

fn components(
    registry: &ComponentRegistry,
    category: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let categories = match category {
        Some(category) => vec![category.to_string()],
        None => registry.categories(),
    };
    for category in categories {
        let members = registry.get_by_category(&category);
        if members.is_empty() {
            bail!("Unknown component category: {category}");
        }
        writeln!(out, "{category}:")?;
        for (kind, definition) in members {
            let marker = if definition.accepts_children {
                " (container)"
            } else {
                ""
            };
            writeln!(out, "  {kind}{marker}")?;
        }
    }
    Ok(())
}

fn validate(
    input: &Path,
    strict: bool,
    registry: &ComponentRegistry,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let schema = load_page(input)?;
    let mut unknown = Vec::new();
    for element in &schema.elements {
        element.walk(&mut |el: &PageElement| {
            if !registry.has(&el.kind) {
                unknown.push(format!("{} ({})", el.kind, el.id));
            }
        });
    }

    for entry in &unknown {
        tracing::warn!("Unregistered component type: {entry}");
        writeln!(out, "warning: unregistered component type {entry}")?;
    }
    if strict && !unknown.is_empty() {
        bail!("{} element(s) use unregistered component types", unknown.len());
    }
    writeln!(
        out,
        "ok: {} ({} elements, status {:?})",
        schema.info.slug,
        schema.element_count(),
        schema.info.status
    )?;
    Ok(())
}
