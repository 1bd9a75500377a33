//! Export tests (editor shape → stored)

use crate::common::{ARTICLE, PROTOCOL};
use insta::assert_snapshot;
use mathtex::{externalize, internalize};
use once_cell::sync::Lazy;
use regex::Regex;

/// Attributes only the editing surface carries
static EDITOR_ATTRIBUTES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(contenteditable|data-mathinput|style)="#)
        .expect("valid regex for editor-only attributes")
});

#[test]
fn test_rendered_region_exports_source_only() {
    let editor = internalize(r#"<span class="math-tex">x^2</span>"#, &PROTOCOL).unwrap();
    let html = externalize(&editor, &PROTOCOL).unwrap();
    assert_snapshot!(html, @r#"<span class="math-tex">\(x^2\)</span>"#);
}

#[test]
fn test_renderer_output_is_dropped() {
    let editor = concat!(
        r#"<p><span class="math-tex" contenteditable="false" style="cursor: pointer;" data-mathinput="\(x\)">"#,
        r#"<span class="math-tex-original"><mjx-container class="MathJax"><mjx-math>x</mjx-math></mjx-container></span>"#,
        r#"<span class="dummy" hidden="hidden">dummy</span></span></p>"#,
    );
    let html = externalize(editor, &PROTOCOL).unwrap();
    assert_snapshot!(html, @r#"<p><span class="math-tex">\(x\)</span></p>"#);
}

#[test]
fn test_article_round_trips() {
    let editor = internalize(ARTICLE, &PROTOCOL).unwrap();
    let stored = externalize(&editor, &PROTOCOL).unwrap();
    assert_eq!(stored, ARTICLE);
    assert!(!EDITOR_ATTRIBUTES.is_match(&stored));
}

#[test]
fn test_raw_regions_pass_through() {
    let html = externalize(ARTICLE, &PROTOCOL).unwrap();
    assert_eq!(html, ARTICLE);
}

#[test]
fn test_author_style_does_not_survive_export() {
    let editor = internalize(
        r#"<span class="math-tex" style="color: red">x</span>"#,
        &PROTOCOL,
    )
    .unwrap();
    assert!(editor.contains(r#"style="color: red; cursor: pointer;""#));

    let html = externalize(&editor, &PROTOCOL).unwrap();
    assert_eq!(html, r#"<span class="math-tex">\(x\)</span>"#);
}

#[test]
fn test_unrelated_markup_is_untouched() {
    let source = r#"<div class="note"><span class="other">\(z\)</span><!-- keep --></div>"#;
    assert_eq!(externalize(source, &PROTOCOL).unwrap(), source);
}

#[test]
fn test_mathml_region_round_trips() {
    for stored in [
        r#"<span class="math-tex">\(<math><mi>x</mi></math>\)</span>"#,
        r#"<span class="math-tex"> \(x\) </span>"#,
        r#"<span class="math-tex">\(a &lt; b\)</span>"#,
    ] {
        let editor = internalize(stored, &PROTOCOL).unwrap();
        assert_eq!(externalize(&editor, &PROTOCOL).unwrap(), stored);
    }
}

#[test]
fn test_table_row_fragment_is_kept() {
    let source = r#"<tr><td>a</td><td><span class="math-tex">\(b\)</span></td></tr>"#;
    let editor = internalize(source, &PROTOCOL).unwrap();
    assert!(editor.starts_with("<tr><td>a</td><td><span"));
    assert_eq!(externalize(&editor, &PROTOCOL).unwrap(), source);
}

#[test]
fn test_leading_whitespace_is_kept() {
    assert_eq!(externalize("  <p>x</p>", &PROTOCOL).unwrap(), "  <p>x</p>");
}
