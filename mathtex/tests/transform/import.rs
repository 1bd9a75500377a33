//! Import tests (stored → editor shape)

use crate::common::{ARTICLE, PROTOCOL};
use insta::assert_snapshot;
use mathtex::markup::Document;
use mathtex::{internalize, Delimiters, MarkerProtocol, RegionState};

#[test]
fn test_bare_source_is_wrapped_and_scaffolded() {
    let html = internalize(r#"<span class="math-tex">x^2</span>"#, &PROTOCOL).unwrap();
    assert_snapshot!(html, @r#"<span class="math-tex" contenteditable="false" style="cursor: pointer;" data-mathinput="\(x^2\)"><span class="math-tex-original">\(x^2\)</span><span class="dummy" hidden="hidden">dummy</span></span>"#);
}

#[test]
fn test_region_inside_prose() {
    let html = internalize(
        r#"<p>Let <span class="math-tex">\(a+b\)</span> be.</p>"#,
        &PROTOCOL,
    )
    .unwrap();
    assert_snapshot!(html, @r#"<p>Let <span class="math-tex" contenteditable="false" style="cursor: pointer;" data-mathinput="\(a+b\)"><span class="math-tex-original">\(a+b\)</span><span class="dummy" hidden="hidden">dummy</span></span> be.</p>"#);
}

#[test]
fn test_every_region_is_rendered() {
    let html = internalize(ARTICLE, &PROTOCOL).unwrap();
    let doc = Document::parse(&html).unwrap();
    let regions = PROTOCOL.regions_in(doc.root());

    assert_eq!(regions.len(), 2);
    for region in &regions {
        assert_eq!(region.state(&PROTOCOL), RegionState::Rendered);
        assert_eq!(region.node().attribute("contenteditable").as_deref(), Some("false"));
    }
    assert_eq!(regions[0].stored_value().as_deref(), Some("\\(\\pi r^2\\)"));
    assert_eq!(regions[1].stored_value().as_deref(), Some("\\(2 \\pi r\\)"));
    assert!(html.starts_with("<h1>Circles</h1>"));
}

#[test]
fn test_stored_attribute_wins_over_stale_text() {
    let html = internalize(
        r#"<span class="math-tex" data-mathinput="\(q\)">stale</span>"#,
        &PROTOCOL,
    )
    .unwrap();
    assert!(html.contains(r#"<span class="math-tex-original">\(q\)</span>"#));
    assert!(!html.contains("stale"));
}

#[test]
fn test_custom_class_and_delimiters() {
    let protocol = MarkerProtocol::new("formula", Delimiters::new("$$", "$$"));
    let html = internalize(
        r#"<div class="formula">E=mc^2</div><span class="math-tex">x</span>"#,
        &protocol,
    )
    .unwrap();

    assert!(html.contains(r#"data-mathinput="$$E=mc^2$$""#));
    assert!(html.contains(r#"<span class="formula-original">$$E=mc^2$$</span>"#));
    // Default-class spans are not regions under this protocol
    assert!(html.ends_with(r#"<span class="math-tex">x</span>"#));
}

#[test]
fn test_additional_classes_are_kept() {
    let html = internalize(r#"<span class="inline math-tex">y</span>"#, &PROTOCOL).unwrap();
    assert!(html.starts_with(r#"<span class="inline math-tex" contenteditable="false""#));
}

#[test]
fn test_importing_twice_changes_nothing() {
    let once = internalize(ARTICLE, &PROTOCOL).unwrap();
    let twice = internalize(&once, &PROTOCOL).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_mathml_source_is_scaffolded_as_markup() {
    let html = internalize(
        r#"<span class="math-tex"><math><mi>x</mi><mo>+</mo><mn>1</mn></math></span>"#,
        &PROTOCOL,
    )
    .unwrap();
    assert_snapshot!(html, @r#"<span class="math-tex" contenteditable="false" style="cursor: pointer;" data-mathinput="\(<math><mi>x</mi><mo>+</mo><mn>1</mn></math>\)"><span class="math-tex-original">\(<math><mi>x</mi><mo>+</mo><mn>1</mn></math>\)</span><span class="dummy" hidden="hidden">dummy</span></span>"#);
}
