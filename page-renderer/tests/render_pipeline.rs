//! Store → renderer → HTML integration tests.

use page_core::{
    Device, EditorMode, ElementDraft, PageSchema, PageStore, ResponsiveValue, SpacingValue,
};
use page_renderer::{
    builtin_registry, nodes_to_html, nodes_to_json, render_document, render_schema,
    render_store, RenderOptions,
};
use serde_json::json;

fn landing_page() -> PageStore {
    let registry = builtin_registry();
    let mut store = PageStore::new();
    store
        .set_schema(PageSchema::blank("landing", "landing", "Landing"))
        .expect("load");

    let section = store
        .add_element(
            registry.create_draft("Section").expect("section"),
            None,
            None,
        )
        .expect("add section");
    store.add_element(
        registry
            .create_draft("Heading")
            .expect("heading")
            .with_prop("text", "Spring sale")
            .with_prop("level", "h1"),
        Some(&section),
        None,
    );
    store.add_element(
        ElementDraft::new("Paragraph").with_prop("text", "Everything must go"),
        Some(&section),
        None,
    );
    store.save_to_history();
    store.mark_clean();
    store
}

#[test]
fn test_mobile_padding_scenario() {
    let mut store = landing_page();
    let section = store.schema().expect("loaded").elements[0].id.clone();
    assert!(store.update_element_style(
        &section,
        "padding",
        json!({
            "desktop": {"top": 40, "right": 0, "bottom": 40, "left": 0},
            "mobile": {"top": 8, "right": 0, "bottom": 8, "left": 0}
        }),
    ));
    let element = store.element(&section).expect("section");
    assert_eq!(
        element.styles.padding,
        Some(
            ResponsiveValue::new(SpacingValue::symmetric(40.0, 0.0))
                .with_mobile(SpacingValue::symmetric(8.0, 0.0))
        )
    );

    let registry = builtin_registry();
    let schema = store.schema().expect("loaded");
    let mobile = render_schema(&schema, &registry, RenderOptions::live(Device::Mobile));
    let style = &mobile[0].as_element().expect("section").style;
    assert_eq!(style["padding"], "8px 0px 8px 0px");

    let tablet = render_schema(&schema, &registry, RenderOptions::live(Device::Tablet));
    let style = &tablet[0].as_element().expect("section").style;
    assert_eq!(style["padding"], "40px 0px 40px 0px");
}

#[test]
fn test_mobile_only_padding_keeps_component_default() {
    let mut store = PageStore::new();
    store
        .load_json(
            r#"{
                "pageId": "p", "slug": "s", "title": "t",
                "elements": [{"id": "hero", "type": "Section",
                              "styles": {"padding": {"mobile": {"top": 8, "right": 0, "bottom": 8, "left": 0}}}}]
            }"#,
        )
        .expect("load");

    let registry = builtin_registry();
    let schema = store.schema().expect("loaded");
    let desktop = render_schema(&schema, &registry, RenderOptions::live(Device::Desktop));
    let mobile = render_schema(&schema, &registry, RenderOptions::live(Device::Mobile));
    assert_eq!(
        desktop[0].as_element().expect("section").style["padding"],
        "64px 24px 64px 24px"
    );
    assert_eq!(
        mobile[0].as_element().expect("section").style["padding"],
        "32px 16px 32px 16px"
    );
}

#[test]
fn test_breakpoint_edit_on_fresh_section() {
    let registry = builtin_registry();
    let mut store = landing_page();
    store.use_style_defaults(&registry);
    let section = store.schema().expect("loaded").elements[0].id.clone();

    assert!(store.update_element_style(&section, "padding.mobile.top", json!(8)));

    let schema = store.schema().expect("loaded");
    let desktop = render_schema(&schema, &registry, RenderOptions::live(Device::Desktop));
    let mobile = render_schema(&schema, &registry, RenderOptions::live(Device::Mobile));
    assert_eq!(
        desktop[0].as_element().expect("section").style["padding"],
        "64px 24px 64px 24px"
    );
    assert_eq!(
        mobile[0].as_element().expect("section").style["padding"],
        "8px 16px 32px 16px"
    );
}

#[test]
fn test_live_html_output() {
    let store = landing_page();
    let registry = builtin_registry();
    let schema = store.schema().expect("loaded");
    let html = nodes_to_html(&render_schema(
        &schema,
        &registry,
        RenderOptions::live(Device::Desktop),
    ));
    assert!(html.starts_with("<section"));
    assert!(html.contains("<h1>Spring sale</h1>"));
    assert!(html.contains("<p>Everything must go</p>"));
    assert!(!html.contains("data-element-id"));
}

#[test]
fn test_editor_render_follows_session_state() {
    let mut store = landing_page();
    let heading = store.layers()[1].id.clone();
    store.select_element(Some(heading.clone()));
    store.toggle_lock(&heading);

    let registry = builtin_registry();
    let before = store.schema();
    let nodes = render_store(&store, &registry).expect("document loaded");

    let wrapper = nodes[0]
        .find_by_attribute("data-element-id", heading.as_str())
        .expect("heading wrapper");
    assert!(wrapper.has_class("pb-selected"));
    assert!(wrapper.has_class("pb-locked"));
    assert_eq!(store.schema(), before);

    store.set_editor_mode(EditorMode::Preview);
    let nodes = render_store(&store, &registry).expect("document loaded");
    assert!(nodes[0]
        .find_by_attribute("data-element-id", heading.as_str())
        .is_none());
}

#[test]
fn test_hidden_element_live_and_editor() {
    let mut store = landing_page();
    let paragraph = store.layers()[2].id.clone();
    assert!(store.toggle_visibility(&paragraph));

    let registry = builtin_registry();
    let schema = store.schema().expect("loaded");

    let live = nodes_to_html(&render_schema(
        &schema,
        &registry,
        RenderOptions::live(Device::Desktop),
    ));
    assert!(!live.contains("Everything must go"));

    let editor = nodes_to_html(&render_schema(
        &schema,
        &registry,
        RenderOptions::editor(Device::Desktop),
    ));
    assert!(editor.contains("Everything must go"));
    assert!(editor.contains("pb-hidden"));
}

#[test]
fn test_unknown_type_does_not_abort_render() {
    let mut store = landing_page();
    let section = store.schema().expect("loaded").elements[0].id.clone();
    store.add_element(ElementDraft::new("ThirdPartyWidget"), Some(&section), Some(0));

    let registry = builtin_registry();
    let schema = store.schema().expect("loaded");
    let html = nodes_to_html(&render_schema(
        &schema,
        &registry,
        RenderOptions::live(Device::Desktop),
    ));
    assert!(html.contains("<h1>Spring sale</h1>"));
    assert!(html.contains("<p>Everything must go</p>"));
}

#[test]
fn test_full_document_and_json() {
    let mut store = landing_page();
    store.update_page(|info| {
        info.seo.meta_description = Some("Big savings".to_string());
    });
    let registry = builtin_registry();
    let schema = store.schema().expect("loaded");

    let html = render_document(&schema, &registry, RenderOptions::live(Device::Desktop));
    assert!(html.contains("<title>Landing</title>"));
    assert!(html.contains("content=\"Big savings\""));
    assert!(html.contains("<h1>Spring sale</h1>"));

    let json = nodes_to_json(&render_schema(
        &schema,
        &registry,
        RenderOptions::live(Device::Desktop),
    ))
    .expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value[0]["node"], "element");
    assert_eq!(value[0]["tag"], "section");
}
