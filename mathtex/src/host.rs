//! Host editor seams
//!
//! [`ContentInserter`] is the one host capability the editing session needs beyond a render
//! scope: placing new markup at the author's cursor. [`EditorDocument`] is an in-memory host
//! document implementing it, used by the CLI and the test-suite and usable by hosts that keep
//! their own tree.

use crate::error::MathtexError;
use crate::markup::{Document, NodeRef};

/// Insert markup at the current selection point
pub trait ContentInserter {
    fn insert_content(&mut self, html: &str) -> Result<(), MathtexError>;
}

/// Where inserted content goes: before the child at `offset` of `parent`
#[derive(Debug, Clone)]
pub struct Selection {
    pub parent: NodeRef,
    pub offset: usize,
}

/// A live document with a cursor
#[derive(Debug)]
pub struct EditorDocument {
    document: Document,
    selection: Selection,
}

impl EditorDocument {
    /// Parse `html` and put the cursor at the end.
    pub fn parse(html: &str) -> Result<Self, MathtexError> {
        let document = Document::parse(html)?;
        let selection = Selection {
            parent: document.root().clone(),
            offset: document.root().child_count(),
        };
        Ok(Self {
            document,
            selection,
        })
    }

    pub fn root(&self) -> &NodeRef {
        self.document.root()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Move the cursor before the child at `offset` of `parent`.
    pub fn select(&mut self, parent: &NodeRef, offset: usize) {
        self.selection = Selection {
            parent: parent.clone(),
            offset: offset.min(parent.child_count()),
        };
    }

    /// Move the cursor right after `node`. Detached nodes leave the cursor where it is.
    pub fn select_after(&mut self, node: &NodeRef) {
        if let (Some(parent), Some(index)) = (node.parent(), node.index_in_parent()) {
            self.select(&parent, index + 1);
        }
    }

    pub fn select_end(&mut self) {
        let root = self.document.root().clone();
        let end = root.child_count();
        self.select(&root, end);
    }

    pub fn to_html(&self) -> Result<String, MathtexError> {
        self.document.to_html()
    }
}

impl ContentInserter for EditorDocument {
    fn insert_content(&mut self, html: &str) -> Result<(), MathtexError> {
        let fragment = Document::parse(html)?;
        let Selection { parent, offset } = self.selection.clone();
        let mut offset = offset.min(parent.child_count());
        for node in fragment.root().take_children() {
            parent.insert(offset, &node);
            offset += 1;
        }
        // Cursor ends up after the inserted content
        self.selection.offset = offset;
        Ok(())
    }
}
