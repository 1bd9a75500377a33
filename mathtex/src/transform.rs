//! Content transformer
//!
//! The two directions between what the host stores and what the editing surface shows:
//!
//! - [`internalize`]: raw regions → rendered regions (scaffold + dummy marker + data attribute).
//!   Runs when content is assigned to the editor.
//! - [`externalize`]: rendered regions → raw regions (the stored source as the only content).
//!   Runs when content is read out of the editor.
//!
//! Both parse into a [`Document`] they own, rewrite the matched regions and serialize the result.
//! Markup outside regions is never touched. A region that fits neither recognized shape is left
//! as found rather than reset; partially hand-edited markup is not ours to guess at.
//!
//! The per-region halves, [`normalize_region`] and [`strip_region`], are public so the editing
//! session and the host bridge can apply them to live trees.

use crate::error::MathtexError;
use crate::marker::{
    MarkerProtocol, Region, DATA_ATTRIBUTE, DUMMY_CLASS, DUMMY_TEXT, EDITABLE_ATTRIBUTE,
    POINTER_STYLE, STYLE_ATTRIBUTE,
};
use crate::markup::{Document, NodeRef};

/// Bring every region of `html` into rendered state.
pub fn internalize(html: &str, protocol: &MarkerProtocol) -> Result<String, MathtexError> {
    let doc = Document::parse(html)?;
    let mut normalized = 0;
    for region in protocol.regions_in(doc.root()) {
        if normalize_region(&region, protocol) {
            normalized += 1;
        }
    }
    tracing::debug!(target: "mathtex", normalized, "internalized content");
    doc.to_html()
}

/// Bring every region of `html` back to raw state for export.
pub fn externalize(html: &str, protocol: &MarkerProtocol) -> Result<String, MathtexError> {
    let doc = Document::parse(html)?;
    let mut stripped = 0;
    for region in protocol.regions_in(doc.root()) {
        if strip_region(&region, protocol) {
            stripped += 1;
        }
    }
    tracing::debug!(target: "mathtex", stripped, "externalized content");
    doc.to_html()
}

/// Render-normalize one region in place. Returns whether anything changed.
///
/// Rendered regions (two children) are skipped, which makes repeated calls harmless. A region
/// with neither a stored value nor any content is not treated as math yet and is left alone.
/// The source is markup, so the scaffold gets its parsed nodes rather than escaped text.
pub fn normalize_region(region: &Region, protocol: &MarkerProtocol) -> bool {
    let node = region.node();
    if protocol.is_rendered(node) {
        return false;
    }

    let Some(raw) = region.raw_source() else {
        tracing::trace!(target: "mathtex", "skipping empty region");
        return false;
    };
    let stored = protocol.delimiters().ensure_wrapped(&raw);

    node.set_attribute(EDITABLE_ATTRIBUTE, "false");
    add_pointer_style(node);
    node.set_attribute(DATA_ATTRIBUTE, &stored);
    node.clear_children();

    let scaffold = NodeRef::element("span", &[("class", protocol.scaffold_class())]);
    fill(&scaffold, &stored);
    node.append(&scaffold);
    node.append(&dummy_marker());

    tracing::trace!(target: "mathtex", stored = %stored, "normalized region");
    true
}

/// Strip rendering bookkeeping from one region in place. Returns whether anything changed.
pub fn strip_region(region: &Region, protocol: &MarkerProtocol) -> bool {
    let node = region.node();
    let stored = match region.stored_value() {
        Some(stored) => stored,
        None => match scaffold_source(node, protocol) {
            Some(source) => source,
            None => return false,
        },
    };

    node.remove_attribute(EDITABLE_ATTRIBUTE);
    node.remove_attribute(STYLE_ATTRIBUTE);
    node.remove_attribute(DATA_ATTRIBUTE);
    // Renderer output lives inside the scaffold, so it goes with the children
    fill(node, &stored);
    true
}

/// A fresh, detached, rendered region holding `stored`.
pub fn build_region(stored: &str, protocol: &MarkerProtocol) -> Region {
    let node = NodeRef::element("span", &[("class", protocol.class_name())]);
    node.set_attribute(DATA_ATTRIBUTE, stored);
    let region = Region::from_element(node);
    normalize_region(&region, protocol);
    region
}

/// Replace an existing region's source and re-render it.
pub fn replace_source(region: &Region, stored: &str, protocol: &MarkerProtocol) {
    let node = region.node();
    node.clear_children();
    node.set_attribute(DATA_ATTRIBUTE, stored);
    normalize_region(region, protocol);
}

fn dummy_marker() -> NodeRef {
    let dummy = NodeRef::element("span", &[("class", DUMMY_CLASS), ("hidden", "hidden")]);
    dummy.append(&NodeRef::text(DUMMY_TEXT));
    dummy
}

fn add_pointer_style(node: &NodeRef) {
    match node.attribute(STYLE_ATTRIBUTE) {
        Some(style) if style.contains("cursor") => {}
        Some(style) if !style.trim().is_empty() => {
            let style = style.trim_end().trim_end_matches(';');
            node.set_attribute(STYLE_ATTRIBUTE, &format!("{style}; {POINTER_STYLE}"));
        }
        _ => node.set_attribute(STYLE_ATTRIBUTE, POINTER_STYLE),
    }
}

/// Set `node`'s content to the markup in `source`, as plain text if it cannot be parsed.
fn fill(node: &NodeRef, source: &str) {
    if let Err(err) = node.set_inner_html(source) {
        tracing::warn!(target: "mathtex", error = %err, "keeping region source as text");
        node.clear_children();
        node.append(&NodeRef::text(source));
    }
}

/// Source recovered from a rendered-shaped region that lost its data attribute.
fn scaffold_source(node: &NodeRef, protocol: &MarkerProtocol) -> Option<String> {
    if !protocol.is_rendered(node) {
        return None;
    }
    let first = node.first_child()?;
    if !protocol.is_scaffold(&first) {
        return None;
    }
    first.inner_html().ok().filter(|source| !source.is_empty())
}
