//! Session lifecycle through the host bridge

use crate::common::ARTICLE;
use mathtex::{
    EditorDocument, MathPlugin, MathtexError, PluginSettings, RefreshOutcome, RenderScope,
    SessionOutcome,
};

/// An editor loaded with `stored` the way a host loads content.
fn editor(stored: &str) -> (MathPlugin, EditorDocument) {
    let plugin = MathPlugin::new("editor", &PluginSettings::default()).unwrap();
    let doc = EditorDocument::parse(&plugin.on_before_set_content(stored)).unwrap();
    (plugin, doc)
}

#[test]
fn test_open_on_region_shows_undelimited_source() {
    let (mut plugin, doc) = editor(r#"<span class="math-tex">x^2</span>"#);
    let region = plugin.protocol().regions_in(doc.root()).remove(0);

    let spec = plugin.on_click(region.node()).unwrap().unwrap();
    assert_eq!(spec.initial_input(), "x^2");
    assert!(plugin.session().unwrap().target().unwrap().ptr_eq(&region));
}

#[test]
fn test_commit_without_target_inserts_at_selection() {
    let (mut plugin, mut doc) = editor(r#"<p>a <span class="math-tex">\(b\)</span> c</p>"#);
    let paragraph = doc.root().first_child().unwrap();
    let before = plugin.protocol().regions_in(doc.root()).remove(0);
    let before_html = before.node().outer_html().unwrap();
    doc.select(&paragraph, paragraph.child_count());

    let spec = plugin.on_toolbar_action(Some(&paragraph)).unwrap();
    assert_eq!(spec.initial_input(), "");
    plugin.on_dialog_change("y^3").unwrap();

    let outcome = plugin
        .on_dialog_submit("y^3", &mut RenderScope::new("doc"), &mut doc)
        .unwrap();
    assert_eq!(
        outcome,
        SessionOutcome::Committed {
            stored_value: "\\(y^3\\)".to_string(),
            created: true,
            render: RefreshOutcome::EngineUnavailable,
        }
    );
    assert!(plugin.session().is_none());

    let regions = plugin.protocol().regions_in(doc.root());
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].node().outer_html().unwrap(), before_html);
    assert_eq!(regions[1].stored_value().as_deref(), Some("\\(y^3\\)"));
    assert_eq!(regions[1].node().child_count(), 2);

    let stored = plugin.on_get_content(&doc.to_html().unwrap());
    assert_eq!(
        stored,
        r#"<p>a <span class="math-tex">\(b\)</span> c<span class="math-tex">\(y^3\)</span></p>"#
    );
}

#[test]
fn test_commit_on_target_updates_in_place() {
    let (mut plugin, mut doc) = editor(ARTICLE);
    let target = plugin.protocol().regions_in(doc.root()).remove(1);

    let spec = plugin.on_click(target.node()).unwrap().unwrap();
    assert_eq!(spec.initial_input(), "2 \\pi r");

    let outcome = plugin
        .on_dialog_submit("  \\tau r \n", &mut RenderScope::new("doc"), &mut doc)
        .unwrap();
    assert!(matches!(outcome, SessionOutcome::Committed { created: false, .. }));

    let regions = plugin.protocol().regions_in(doc.root());
    assert_eq!(regions.len(), 2);
    assert!(regions[1].ptr_eq(&target));
    assert_eq!(target.stored_value().as_deref(), Some("\\(\\tau r\\)"));
    assert_eq!(regions[0].stored_value().as_deref(), Some("\\(\\pi r^2\\)"));
}

#[test]
fn test_mathml_prefixes_are_cleaned_on_commit() {
    let (mut plugin, mut doc) = editor("<p>x</p>");
    plugin.on_toolbar_action(None).unwrap();
    plugin
        .on_dialog_submit(
            "<mml:math><mml:mi>x</mml:mi></mml:math>",
            &mut RenderScope::new("doc"),
            &mut doc,
        )
        .unwrap();

    let region = plugin.protocol().regions_in(doc.root()).remove(0);
    assert_eq!(
        region.stored_value().as_deref(),
        Some("\\(<math><mi>x</mi></math>\\)")
    );
}

#[test]
fn test_cancel_leaves_document_untouched() {
    let (mut plugin, doc) = editor(ARTICLE);
    let html = doc.to_html().unwrap();
    let target = plugin.protocol().regions_in(doc.root()).remove(0);

    plugin.on_click(target.node()).unwrap();
    plugin.on_dialog_change("changed").unwrap();
    assert_eq!(plugin.on_dialog_cancel().unwrap(), SessionOutcome::Cancelled);

    assert_eq!(doc.to_html().unwrap(), html);
    assert!(plugin.session().is_none());
}

#[test]
fn test_second_open_is_rejected_until_closed() {
    let (mut plugin, doc) = editor(ARTICLE);
    let region = plugin.protocol().regions_in(doc.root()).remove(0);

    plugin.on_toolbar_action(None).unwrap();
    assert!(matches!(
        plugin.on_click(region.node()),
        Err(MathtexError::SessionAlreadyOpen)
    ));
    assert!(matches!(
        plugin.on_toolbar_action(Some(region.node())),
        Err(MathtexError::SessionAlreadyOpen)
    ));

    plugin.on_dialog_cancel().unwrap();
    let spec = plugin.on_toolbar_action(Some(region.node())).unwrap();
    assert_eq!(spec.initial_input(), "\\pi r^2");
}

#[test]
fn test_dialog_events_without_session_fail() {
    let (mut plugin, mut doc) = editor(ARTICLE);
    assert!(matches!(
        plugin.on_dialog_change("x"),
        Err(MathtexError::NoOpenSession)
    ));
    assert!(matches!(
        plugin.on_dialog_submit("x", &mut RenderScope::new("doc"), &mut doc),
        Err(MathtexError::NoOpenSession)
    ));
    assert!(matches!(
        plugin.on_dialog_cancel(),
        Err(MathtexError::NoOpenSession)
    ));
}

#[test]
fn test_clicks_outside_regions_are_ignored() {
    let (mut plugin, doc) = editor(ARTICLE);
    let heading = doc.root().first_child().unwrap();
    assert!(plugin.on_click(&heading).unwrap().is_none());
    assert!(plugin.session().is_none());
}
