//! CLI command tests against page documents on disk.

use std::fs;
use std::path::Path;

use clap::Parser;
use page_cli::{load_page, run, Cli};
use tempfile::TempDir;

const PAGE: &str = r##"{
    "version": "1.0",
    "pageId": "p-1",
    "slug": "spring",
    "title": "Spring Sale",
    "seo": {"metaDescription": "Fresh deals"},
    "status": "draft",
    "elements": [
        {
            "id": "hero",
            "type": "Section",
            "styles": {
                "padding": {
                    "desktop": {"top": 40, "right": 0, "bottom": 40, "left": 0},
                    "mobile": {"top": 8, "right": 0, "bottom": 8, "left": 0}
                }
            },
            "meta": {"label": "Hero"},
            "children": [
                {"id": "title", "type": "Heading", "props": {"text": "Spring <Sale>", "level": "h1"}},
                {"id": "note", "type": "Paragraph", "props": {"text": "Members only"}, "meta": {"hidden": true}},
                {"id": "widget", "type": "Countdown"}
            ]
        }
    ]
}"##;

fn write_page(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write page");
    path
}

fn run_cli(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    run(&cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}

#[test]
fn test_load_page() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.json", PAGE);
    let schema = load_page(&path).expect("load");
    assert_eq!(schema.info.title, "Spring Sale");
    assert_eq!(schema.element_count(), 4);
}

#[test]
fn test_render_mobile_html() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.json", PAGE);
    let html = run_cli(&[
        "pagebuilder",
        "render",
        path_str(&path),
        "--device",
        "mobile",
        "--format",
        "html",
    ])
    .expect("render");

    assert!(html.contains("padding: 8px 0px 8px 0px"));
    assert!(html.contains("<h1>Spring &lt;Sale&gt;</h1>"));
    assert!(!html.contains("Members only"));
    assert!(!html.contains("<html"));
}

#[test]
fn test_render_editor_document_to_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.json", PAGE);
    let output = dir.path().join("out.html");
    let stdout = run_cli(&[
        "pagebuilder",
        "render",
        path_str(&path),
        "--editor",
        "--selected",
        "title",
        "--output",
        path_str(&output),
    ])
    .expect("render");
    assert!(stdout.is_empty());

    let html = fs::read_to_string(&output).expect("read output");
    assert!(html.contains("<title>Spring Sale</title>"));
    assert!(html.contains("content=\"Fresh deals\""));
    assert!(html.contains("Members only"));
    assert!(html.contains("pb-hidden"));
    assert!(html.contains("pb-selected"));
}

#[test]
fn test_layers_output() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.json", PAGE);
    let text = run_cli(&["pagebuilder", "layers", path_str(&path)]).expect("layers");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Hero [Section] hero");
    assert_eq!(lines[1], "  Heading [Heading] title");
    assert_eq!(lines[2], "  Paragraph [Paragraph] note (hidden)");
}

#[test]
fn test_layers_json() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.json", PAGE);
    let text = run_cli(&["pagebuilder", "layers", path_str(&path), "--json"]).expect("layers");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value[3]["id"], "widget");
    assert_eq!(value[3]["depth"], 1);
}

#[test]
fn test_validate_reports_unknown_types() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.json", PAGE);

    let text = run_cli(&["pagebuilder", "validate", path_str(&path)]).expect("validate");
    assert!(text.contains("warning: unregistered component type Countdown (widget)"));
    assert!(text.contains("ok: spring (4 elements"));

    assert!(run_cli(&["pagebuilder", "validate", path_str(&path), "--strict"]).is_err());
}

#[test]
fn test_validate_rejects_duplicate_ids() {
    let dir = TempDir::new().expect("tempdir");
    let page = PAGE.replace("\"id\": \"note\"", "\"id\": \"title\"");
    let path = write_page(&dir, "dup.json", &page);
    let err = run_cli(&["pagebuilder", "validate", path_str(&path)]).expect_err("duplicate");
    assert!(format!("{err:#}").contains("title"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("missing.json");
    let err = run_cli(&["pagebuilder", "layers", path_str(&missing)]).expect_err("missing");
    assert!(err.to_string().contains("Failed to read"));
}
