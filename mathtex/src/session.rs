//! Editing session controller
//!
//! One modal at a time, modelled as an explicit state machine:
//!
//! ```text
//!            open                 commit
//!   Closed ───────▶ Open ──────────────────▶ Committed ──▶ Closed
//!                     │         cancel
//!                     └────────────────────▶ Cancelled ──▶ Closed
//! ```
//!
//! `Committed` and `Cancelled` are reported as a [`SessionOutcome`]; the controller itself is
//! back to `Closed` as soon as either call returns. A second `open` while a session is open is
//! rejected with [`MathtexError::SessionAlreadyOpen`].
//!
//! The preview lives in its own [`RenderScope`], independent of the document's, and gets its own
//! copy of the engine scripts. Input is pushed to it explicitly on change events, and only when
//! the value actually differs from what was last rendered.
//!
//! Nothing touches the document before `commit`, and `commit` does all of its work in one
//! synchronous block, so cancelling is always safe.

use crate::dialog::clean_input;
use crate::error::MathtexError;
use crate::host::ContentInserter;
use crate::marker::{MarkerProtocol, Region};
use crate::markup::NodeRef;
use crate::render::{refresh, RefreshOutcome, RenderScope};
use crate::scripts::EngineScripts;
use crate::transform::{build_region, replace_source};

/// Isolated rendering surface backing the modal's live preview
#[derive(Debug)]
pub struct PreviewSurface {
    scope: RenderScope,
    scratch_class: String,
    scratch: Option<String>,
    rendered_input: String,
}

impl PreviewSurface {
    fn new(scope: RenderScope, scratch_class: &str) -> Self {
        Self {
            scope,
            scratch_class: scratch_class.to_string(),
            scratch: None,
            rendered_input: String::new(),
        }
    }

    pub fn scope(&self) -> &RenderScope {
        &self.scope
    }

    /// The sandbox's scope, for the host to attach the engine once it loaded there.
    pub fn scope_mut(&mut self) -> &mut RenderScope {
        &mut self.scope
    }

    /// Delimited value currently in the scratch region, `None` before the first render.
    pub fn scratch(&self) -> Option<&str> {
        self.scratch.as_deref()
    }

    /// Markup of the scratch region as the sandbox should hold it.
    pub fn scratch_html(&self) -> Result<Option<String>, MathtexError> {
        let Some(content) = &self.scratch else {
            return Ok(None);
        };
        let div = NodeRef::element("div", &[("class", self.scratch_class.as_str())]);
        div.append(&NodeRef::text(content));
        div.outer_html().map(Some)
    }

    /// The input value the scratch region was last rendered from.
    pub fn rendered_input(&self) -> &str {
        &self.rendered_input
    }

    fn render(&mut self, input: &str, protocol: &MarkerProtocol) -> RefreshOutcome {
        self.scratch = Some(protocol.delimiters().wrap(input));
        self.rendered_input = input.to_string();
        refresh(&mut self.scope)
    }
}

/// State of the one open modal
#[derive(Debug)]
pub struct EditingSession {
    target: Option<Region>,
    current_input: String,
    preview: PreviewSurface,
}

impl EditingSession {
    /// The region being edited; `None` when the session creates a new one.
    pub fn target(&self) -> Option<&Region> {
        self.target.as_ref()
    }

    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    pub fn preview(&self) -> &PreviewSurface {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut PreviewSurface {
        &mut self.preview
    }
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Closed,
    Open(EditingSession),
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Committed {
        /// Delimited value written to the region
        stored_value: String,
        /// Whether a new region was inserted rather than an existing one updated
        created: bool,
        render: RefreshOutcome,
    },
    Cancelled,
}

/// Drives editing sessions for one editor
#[derive(Debug)]
pub struct SessionController {
    protocol: MarkerProtocol,
    scripts: EngineScripts,
    state: SessionState,
}

impl SessionController {
    pub fn new(protocol: MarkerProtocol, scripts: EngineScripts) -> Self {
        Self {
            protocol,
            scripts,
            state: SessionState::Closed,
        }
    }

    pub fn protocol(&self) -> &MarkerProtocol {
        &self.protocol
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open(_))
    }

    pub fn session(&self) -> Option<&EditingSession> {
        match &self.state {
            SessionState::Open(session) => Some(session),
            SessionState::Closed => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut EditingSession> {
        match &mut self.state {
            SessionState::Open(session) => Some(session),
            SessionState::Closed => None,
        }
    }

    /// Open the modal on `target`, or for a new region when `target` is `None`.
    pub fn open(
        &mut self,
        target: Option<Region>,
        preview_scope: RenderScope,
    ) -> Result<&EditingSession, MathtexError> {
        if self.is_open() {
            tracing::debug!(target: "mathtex", "rejecting second editing session");
            return Err(MathtexError::SessionAlreadyOpen);
        }

        let delimiters = self.protocol.delimiters();
        let initial_input = target
            .as_ref()
            .and_then(|region| {
                // Content of a region nobody normalized yet gets the shape internalize gives it
                region.stored_value().or_else(|| {
                    region
                        .raw_source()
                        .map(|raw| delimiters.ensure_wrapped(&raw))
                })
            })
            .map(|stored| delimiters.strip(&stored))
            .unwrap_or_default();

        let mut preview = PreviewSurface::new(preview_scope, self.protocol.scaffold_class());
        // The sandbox engine is usually still loading here; the first render is then a no-op
        preview.render(&initial_input, &self.protocol);
        self.scripts.inject_sandbox(preview.scope_mut());

        tracing::debug!(
            target: "mathtex",
            editing_existing = target.is_some(),
            input = %initial_input,
            "editing session opened"
        );

        self.state = SessionState::Open(EditingSession {
            target,
            current_input: initial_input,
            preview,
        });
        self.session().ok_or(MathtexError::NoOpenSession)
    }

    /// Mirror a change of the input field into the preview.
    ///
    /// Returns `None` when the value matches what the preview already shows.
    pub fn on_input_change(&mut self, value: &str) -> Result<Option<RefreshOutcome>, MathtexError> {
        let SessionState::Open(session) = &mut self.state else {
            return Err(MathtexError::NoOpenSession);
        };
        let value = clean_input(value);
        session.current_input = value.clone();

        if value == session.preview.rendered_input {
            return Ok(None);
        }
        Ok(Some(session.preview.render(&value, &self.protocol)))
    }

    /// Write `value` into the target (or a new region at the selection) and close the session.
    pub fn commit(
        &mut self,
        value: &str,
        document: &mut RenderScope,
        inserter: &mut dyn ContentInserter,
    ) -> Result<SessionOutcome, MathtexError> {
        let SessionState::Open(session) = std::mem::take(&mut self.state) else {
            return Err(MathtexError::NoOpenSession);
        };

        let value = clean_input(value);
        let stored_value = self.protocol.delimiters().wrap(&value);

        let created = match session.target.clone() {
            Some(region) => {
                replace_source(&region, &stored_value, &self.protocol);
                false
            }
            None => {
                let region = build_region(&stored_value, &self.protocol);
                let inserted = region
                    .node()
                    .outer_html()
                    .and_then(|html| inserter.insert_content(&html));
                if let Err(err) = inserted {
                    // Nothing was written; keep the modal open so the author can retry
                    self.state = SessionState::Open(session);
                    return Err(err);
                }
                true
            }
        };

        let render = refresh(document);
        tracing::debug!(target: "mathtex", stored = %stored_value, created, "editing session committed");

        // The preview sandbox goes with the session
        drop(session);
        Ok(SessionOutcome::Committed {
            stored_value,
            created,
            render,
        })
    }

    /// Close the modal without touching the document.
    pub fn cancel(&mut self) -> Result<SessionOutcome, MathtexError> {
        match std::mem::take(&mut self.state) {
            SessionState::Open(_) => {
                tracing::debug!(target: "mathtex", "editing session cancelled");
                Ok(SessionOutcome::Cancelled)
            }
            SessionState::Closed => Err(MathtexError::NoOpenSession),
        }
    }
}
