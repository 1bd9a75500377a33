//! Render triggering through the host bridge

use crate::common::{RecordingEngine, ARTICLE};
use mathtex::{
    refresh, EditorDocument, MathPlugin, PluginSettings, RefreshOutcome, RenderScope,
    SessionOutcome,
};
use regex::Regex;

fn plugin() -> MathPlugin {
    MathPlugin::new("editor", &PluginSettings::default()).unwrap()
}

/// A document scope as the host sets it up: scripts injected, engine loaded.
fn loaded_scope(plugin: &MathPlugin, engine: &RecordingEngine) -> RenderScope {
    let mut scope = RenderScope::new("doc");
    plugin.on_init(&mut scope);
    scope.attach_engine(Box::new(engine.clone()));
    scope
}

#[test]
fn test_refresh_before_engine_loads_is_a_no_op() {
    let plugin = plugin();
    let mut scope = RenderScope::new("doc");
    plugin.on_init(&mut scope);
    let scripts = scope.scripts().to_vec();

    assert_eq!(refresh(&mut scope), RefreshOutcome::EngineUnavailable);
    assert_eq!(plugin.on_set_content(&mut scope), RefreshOutcome::EngineUnavailable);
    assert_eq!(scope.scripts(), scripts.as_slice());
    assert!(!scope.has_engine());
}

#[test]
fn test_refresh_clears_before_typesetting() {
    let plugin = plugin();
    let engine = RecordingEngine::default();
    let mut scope = loaded_scope(&plugin, &engine);

    assert_eq!(plugin.on_set_content(&mut scope), RefreshOutcome::Retypeset);
    assert_eq!(engine.calls(), ["clear", "typeset"]);
}

#[test]
fn test_engine_failure_is_swallowed() {
    let plugin = plugin();
    let engine = RecordingEngine::failing();
    let mut scope = loaded_scope(&plugin, &engine);

    assert_eq!(plugin.on_set_content(&mut scope), RefreshOutcome::Failed);
    // The next refresh still reaches the engine
    assert_eq!(plugin.on_set_content(&mut scope), RefreshOutcome::Failed);
    assert_eq!(engine.calls().len(), 4);
}

#[test]
fn test_change_normalizes_pasted_regions_and_refreshes() {
    let plugin = plugin();
    let engine = RecordingEngine::default();
    let mut scope = loaded_scope(&plugin, &engine);
    // Pasted content skips the set-content path, so regions arrive raw
    let doc = EditorDocument::parse(ARTICLE).unwrap();

    assert_eq!(
        plugin.on_change(doc.root(), &mut scope),
        Some(RefreshOutcome::Retypeset)
    );
    let html = doc.to_html().unwrap();
    assert_eq!(html, plugin.on_before_set_content(ARTICLE));

    let plain = EditorDocument::parse("<p>no math</p>").unwrap();
    assert_eq!(plugin.on_change(plain.root(), &mut scope), None);
    assert_eq!(engine.calls(), ["clear", "typeset"]);
}

#[test]
fn test_preview_renders_only_changed_input() {
    let mut plugin = plugin();
    let spec = plugin.on_toolbar_action(None).unwrap();
    let frame = Regex::new(r#"<iframe id="editor_\d+""#).unwrap();
    let json = serde_json::to_value(&spec).unwrap();
    assert!(frame.is_match(json["body"]["items"][1]["html"].as_str().unwrap()));

    // Before the sandbox engine loads, input is recorded but not typeset
    assert_eq!(
        plugin.on_dialog_change("z").unwrap(),
        Some(RefreshOutcome::EngineUnavailable)
    );

    let engine = RecordingEngine::default();
    let preview = plugin.preview_scope_mut().unwrap();
    assert_eq!(preview.scripts().len(), 1);
    assert!(preview.scripts().iter().all(|script| !script.async_load));
    preview.attach_engine(Box::new(engine.clone()));

    assert_eq!(plugin.on_dialog_change("z").unwrap(), None);
    assert_eq!(
        plugin.on_dialog_change("z^2").unwrap(),
        Some(RefreshOutcome::Retypeset)
    );
    assert_eq!(plugin.on_dialog_change(" z^2 ").unwrap(), None);
    assert_eq!(engine.calls(), ["clear", "typeset"]);

    let preview = plugin.session().unwrap().preview();
    assert_eq!(preview.scratch(), Some("\\(z^2\\)"));
    assert_eq!(
        preview.scratch_html().unwrap().as_deref(),
        Some(r#"<div class="math-tex-original">\(z^2\)</div>"#)
    );
}

#[test]
fn test_commit_refreshes_document_scope() {
    let mut plugin = plugin();
    let engine = RecordingEngine::default();
    let mut scope = loaded_scope(&plugin, &engine);
    let mut doc = EditorDocument::parse(&plugin.on_before_set_content(ARTICLE)).unwrap();

    plugin.on_toolbar_action(None).unwrap();
    let outcome = plugin.on_dialog_submit("e^{i\\pi}", &mut scope, &mut doc).unwrap();

    assert!(matches!(
        outcome,
        SessionOutcome::Committed {
            created: true,
            render: RefreshOutcome::Retypeset,
            ..
        }
    ));
    assert_eq!(engine.calls(), ["clear", "typeset"]);
}
