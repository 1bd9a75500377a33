//! Host bridge
//!
//! Translates the host editor's lifecycle events into calls on the transformer, the render
//! trigger and the session controller. One [`MathPlugin`] per editor instance.
//!
//! | Host event            | Handler                      | Effect                                        |
//! |-----------------------|------------------------------|-----------------------------------------------|
//! | init                  | [`MathPlugin::on_init`]      | inject engine scripts into the document scope |
//! | get content (export)  | [`MathPlugin::on_get_content`] | externalize                                 |
//! | before set content    | [`MathPlugin::on_before_set_content`] | internalize                          |
//! | set content           | [`MathPlugin::on_set_content`] | refresh the document scope                  |
//! | change                | [`MathPlugin::on_change`]    | normalize live regions, refresh               |
//! | toolbar button        | [`MathPlugin::on_toolbar_action`] | open a session                           |
//! | click                 | [`MathPlugin::on_click`]     | open a session on the clicked region          |
//! | dialog change/submit/cancel | `on_dialog_*`          | drive the open session                        |
//!
//! Content handlers never fail towards the host: if the markup cannot be processed it is passed
//! through unchanged and a warning is logged.

use crate::dialog::{DialogOptions, DialogSpec, ToolbarButton};
use crate::error::MathtexError;
use crate::host::ContentInserter;
use crate::marker::{MarkerProtocol, Region};
use crate::markup::NodeRef;
use crate::render::{refresh, RefreshOutcome, RenderScope};
use crate::scripts::EngineScripts;
use crate::session::{EditingSession, SessionController, SessionOutcome};
use crate::settings::PluginSettings;
use crate::transform::{externalize, internalize, normalize_region};

/// The math extension attached to one editor
#[derive(Debug)]
pub struct MathPlugin {
    editor_id: String,
    protocol: MarkerProtocol,
    scripts: EngineScripts,
    dialog: DialogOptions,
    sessions: SessionController,
    next_frame: u64,
}

impl MathPlugin {
    /// Attach to the editor `editor_id`. Fails only on unusable engine URLs.
    pub fn new(editor_id: impl Into<String>, settings: &PluginSettings) -> Result<Self, MathtexError> {
        let protocol = settings.protocol();
        let scripts = EngineScripts::from_settings(settings)?;
        Ok(Self {
            editor_id: editor_id.into(),
            sessions: SessionController::new(protocol.clone(), scripts.clone()),
            protocol,
            scripts,
            dialog: DialogOptions::default(),
            next_frame: 0,
        })
    }

    pub fn with_dialog(mut self, dialog: DialogOptions) -> Self {
        self.dialog = dialog;
        self
    }

    pub fn protocol(&self) -> &MarkerProtocol {
        &self.protocol
    }

    pub fn scripts(&self) -> &EngineScripts {
        &self.scripts
    }

    pub fn toolbar_button(&self) -> ToolbarButton {
        ToolbarButton::default()
    }

    pub fn on_init(&self, document: &mut RenderScope) -> usize {
        self.scripts.inject_missing(document)
    }

    pub fn on_get_content(&self, content: &str) -> String {
        externalize(content, &self.protocol).unwrap_or_else(|err| {
            tracing::warn!(target: "mathtex", error = %err, "export left content unchanged");
            content.to_string()
        })
    }

    pub fn on_before_set_content(&self, content: &str) -> String {
        internalize(content, &self.protocol).unwrap_or_else(|err| {
            tracing::warn!(target: "mathtex", error = %err, "import left content unchanged");
            content.to_string()
        })
    }

    pub fn on_set_content(&self, document: &mut RenderScope) -> RefreshOutcome {
        refresh(document)
    }

    /// Normalize every region under the live `root`. Refreshes only when regions exist.
    pub fn on_change(&self, root: &NodeRef, document: &mut RenderScope) -> Option<RefreshOutcome> {
        let regions = self.protocol.regions_in(root);
        if regions.is_empty() {
            return None;
        }
        for region in &regions {
            normalize_region(region, &self.protocol);
        }
        Some(refresh(document))
    }

    /// Whether the toolbar button shows as active for the current selection.
    pub fn is_toolbar_active(&self, selected: Option<&NodeRef>) -> bool {
        selected
            .and_then(|node| self.protocol.closest_region(node))
            .is_some()
    }

    /// Edit the selected node if it is a region itself, otherwise start a new one.
    pub fn on_toolbar_action(&mut self, selected: Option<&NodeRef>) -> Result<DialogSpec, MathtexError> {
        let target = selected.and_then(|node| self.protocol.region(node));
        self.open_session(target)
    }

    /// Open a session on the region around `clicked`. Clicks elsewhere are ignored.
    pub fn on_click(&mut self, clicked: &NodeRef) -> Result<Option<DialogSpec>, MathtexError> {
        match self.protocol.closest_region(clicked) {
            Some(region) => self.open_session(Some(region)).map(Some),
            None => Ok(None),
        }
    }

    pub fn on_dialog_change(&mut self, value: &str) -> Result<Option<RefreshOutcome>, MathtexError> {
        self.sessions.on_input_change(value)
    }

    pub fn on_dialog_submit(
        &mut self,
        value: &str,
        document: &mut RenderScope,
        inserter: &mut dyn ContentInserter,
    ) -> Result<SessionOutcome, MathtexError> {
        self.sessions.commit(value, document, inserter)
    }

    pub fn on_dialog_cancel(&mut self) -> Result<SessionOutcome, MathtexError> {
        self.sessions.cancel()
    }

    pub fn session(&self) -> Option<&EditingSession> {
        self.sessions.session()
    }

    /// The open session's preview scope, where the host attaches the sandbox engine.
    pub fn preview_scope_mut(&mut self) -> Option<&mut RenderScope> {
        self.sessions
            .session_mut()
            .map(|session| session.preview_mut().scope_mut())
    }

    fn open_session(&mut self, target: Option<Region>) -> Result<DialogSpec, MathtexError> {
        if self.sessions.is_open() {
            return Err(MathtexError::SessionAlreadyOpen);
        }
        self.next_frame += 1;
        let frame_id = format!("{}_{}", self.editor_id, self.next_frame);
        let session = self.sessions.open(target, RenderScope::new(frame_id.clone()))?;
        Ok(DialogSpec::new(&self.dialog, &frame_id, session.current_input()))
    }
}
