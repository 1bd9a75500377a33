//! Shared fixtures for the integration tests.

use mathtex::{MarkerProtocol, MathtexError, RenderEngine};
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::rc::Rc;

pub static PROTOCOL: Lazy<MarkerProtocol> = Lazy::new(MarkerProtocol::default);

/// Stored-state markup of a document with two regions and some prose around them.
pub const ARTICLE: &str = concat!(
    r#"<h1>Circles</h1>"#,
    r#"<p>The area is <span class="math-tex">\(\pi r^2\)</span> and the "#,
    r#"circumference <span class="math-tex">\(2 \pi r\)</span>.</p>"#,
);

/// Engine double recording the calls it receives, shared with the test through an `Rc`.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    pub calls: Rc<RefCell<Vec<&'static str>>>,
    pub fail: bool,
}

impl RecordingEngine {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl RenderEngine for RecordingEngine {
    fn clear_previous_output(&mut self) -> Result<(), MathtexError> {
        self.calls.borrow_mut().push("clear");
        Ok(())
    }

    fn retypeset(&mut self) -> Result<(), MathtexError> {
        self.calls.borrow_mut().push("typeset");
        if self.fail {
            return Err(MathtexError::Engine("typeset failed".to_string()));
        }
        Ok(())
    }
}
