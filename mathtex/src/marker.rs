//! How math regions are marked up
//!
//! A region is any element whose class list contains the configured class name. While rendered
//! it carries its source in [`DATA_ATTRIBUTE`] and has exactly two children:
//!
//! ```text
//! <span class="math-tex" contenteditable="false" style="cursor: pointer;" data-mathinput="\(x^2\)">
//!     <span class="math-tex-original">\(x^2\)</span>      <- scaffold, consumed by the engine
//!     <span class="dummy" hidden="hidden">dummy</span>    <- makes the child count diagnostic
//! </span>
//! ```
//!
//! Raw regions hold the source as their content: `<span class="math-tex">\(x^2\)</span>`.

use crate::markup::NodeRef;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CLASS_NAME: &str = "math-tex";
/// Appended to the class name to form the scaffold class.
pub const SCAFFOLD_SUFFIX: &str = "-original";
pub const DATA_ATTRIBUTE: &str = "data-mathinput";
pub const EDITABLE_ATTRIBUTE: &str = "contenteditable";
pub const STYLE_ATTRIBUTE: &str = "style";
pub const POINTER_STYLE: &str = "cursor: pointer;";
pub const DUMMY_CLASS: &str = "dummy";
pub const DUMMY_TEXT: &str = "dummy";
/// Child count of a rendered region: scaffold + dummy marker.
pub const RENDERED_CHILD_COUNT: usize = 2;

/// Start/end symbols wrapping raw source when handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub start: String,
    pub end: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new("\\(", "\\)")
    }
}

impl Delimiters {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    fn combined_len(&self) -> usize {
        self.start.len() + self.end.len()
    }

    pub fn wrap(&self, value: &str) -> String {
        format!("{}{value}{}", self.start, self.end)
    }

    /// Whether `value`, ignoring surrounding whitespace, is framed by both delimiters.
    pub fn is_wrapped(&self, value: &str) -> bool {
        let value = value.trim();
        value.len() >= self.combined_len()
            && value.starts_with(&self.start)
            && value.ends_with(&self.end)
    }

    /// Wrap `value` unless it already carries both delimiters. Framed values are kept verbatim,
    /// surrounding whitespace included.
    pub fn ensure_wrapped(&self, value: &str) -> String {
        if self.is_wrapped(value) {
            value.to_string()
        } else {
            self.wrap(value)
        }
    }

    /// Recover editable input from a stored value.
    ///
    /// Values shorter than both delimiters together yield an empty input. Values long enough but
    /// not framed by these delimiters are returned verbatim.
    pub fn strip(&self, stored: &str) -> String {
        if stored.len() < self.combined_len() {
            return String::new();
        }
        stored
            .trim()
            .strip_prefix(self.start.as_str())
            .and_then(|rest| rest.strip_suffix(self.end.as_str()))
            .unwrap_or(stored)
            .to_string()
    }
}

/// Class names, attribute names and delimiters shared by every component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerProtocol {
    class_name: String,
    scaffold_class: String,
    delimiters: Delimiters,
}

impl Default for MarkerProtocol {
    fn default() -> Self {
        Self::new(DEFAULT_CLASS_NAME, Delimiters::default())
    }
}

impl MarkerProtocol {
    pub fn new(class_name: impl Into<String>, delimiters: Delimiters) -> Self {
        let class_name = class_name.into();
        let scaffold_class = format!("{class_name}{SCAFFOLD_SUFFIX}");
        Self {
            class_name,
            scaffold_class,
            delimiters,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn scaffold_class(&self) -> &str {
        &self.scaffold_class
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn is_math_region(&self, node: &NodeRef) -> bool {
        node.is_element() && node.has_class(&self.class_name)
    }

    /// Rendered iff exactly two child nodes, whatever they are.
    pub fn is_rendered(&self, node: &NodeRef) -> bool {
        node.child_count() == RENDERED_CHILD_COUNT
    }

    /// View `node` as a region if it carries the class name.
    pub fn region(&self, node: &NodeRef) -> Option<Region> {
        self.is_math_region(node).then(|| Region { node: node.clone() })
    }

    /// The region `node` sits in, `node` included.
    pub fn closest_region(&self, node: &NodeRef) -> Option<Region> {
        node.closest(|candidate| self.is_math_region(candidate))
            .map(|node| Region { node })
    }

    /// Every region below `root`, in document order.
    pub fn regions_in(&self, root: &NodeRef) -> Vec<Region> {
        root.descendants()
            .into_iter()
            .filter(|node| self.is_math_region(node))
            .map(|node| Region { node })
            .collect()
    }

    pub fn is_scaffold(&self, node: &NodeRef) -> bool {
        node.is_element() && node.has_class(&self.scaffold_class)
    }
}

/// Whether a region currently holds its source as text or as scaffolding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionState {
    Raw,
    Rendered,
}

/// An element carrying the region class
#[derive(Debug, Clone)]
pub struct Region {
    node: NodeRef,
}

impl Region {
    /// Wrap an element this crate just built with the region class.
    pub(crate) fn from_element(node: NodeRef) -> Self {
        Self { node }
    }

    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    pub fn state(&self, protocol: &MarkerProtocol) -> RegionState {
        if protocol.is_rendered(&self.node) {
            RegionState::Rendered
        } else {
            RegionState::Raw
        }
    }

    /// The value kept on the data attribute, present while rendered.
    pub fn stored_value(&self) -> Option<String> {
        self.node.attribute(DATA_ATTRIBUTE)
    }

    /// The authoritative source: the data attribute, falling back to the region's inner markup.
    ///
    /// Markup is taken as serialized, so MathML children and edge whitespace are part of the
    /// source. Whitespace-only content counts as empty.
    pub fn raw_source(&self) -> Option<String> {
        if let Some(stored) = self.stored_value() {
            return Some(stored);
        }
        match self.node.inner_html() {
            Ok(html) => (!html.trim().is_empty()).then_some(html),
            Err(err) => {
                tracing::warn!(target: "mathtex", error = %err, "region content is unserializable");
                None
            }
        }
    }

    pub fn ptr_eq(&self, other: &Region) -> bool {
        self.node.ptr_eq(&other.node)
    }
}
