//! Render trigger
//!
//! The typesetting engine is an external collaborator that shows up late: its scripts are
//! injected fire-and-forget and the host attaches a [`RenderEngine`] to the matching
//! [`RenderScope`] once they finished loading. Until then every [`refresh`] is a silent no-op.
//! Nothing is queued; the next edit or load simply finds the engine ready.

use serde::Serialize;
use std::fmt;

use crate::error::MathtexError;

/// Capability handed to us by the host for one rendering scope
pub trait RenderEngine {
    /// Forget whatever layout was computed for this scope.
    fn clear_previous_output(&mut self) -> Result<(), MathtexError>;

    /// Typeset the scope again from the current scaffold contents.
    fn retypeset(&mut self) -> Result<(), MathtexError>;
}

/// A `<script>` element injected into a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptTag {
    pub src: String,
    #[serde(rename = "type")]
    pub mime: String,
    #[serde(rename = "async")]
    pub async_load: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
}

impl ScriptTag {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            mime: "text/javascript".to_string(),
            async_load: true,
            charset: None,
        }
    }

    /// Loaded in order, before anything queued after it.
    pub fn ordered(mut self) -> Self {
        self.async_load = false;
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }
}

/// One rendering scope: the main document or an isolated preview sandbox
pub struct RenderScope {
    label: String,
    scripts: Vec<ScriptTag>,
    engine: Option<Box<dyn RenderEngine>>,
}

impl RenderScope {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            scripts: Vec::new(),
            engine: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Called by the host once the engine in this scope finished initializing.
    pub fn attach_engine(&mut self, engine: Box<dyn RenderEngine>) {
        tracing::debug!(target: "mathtex", scope = %self.label, "render engine attached");
        self.engine = Some(engine);
    }

    pub fn detach_engine(&mut self) -> Option<Box<dyn RenderEngine>> {
        self.engine.take()
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    pub fn scripts(&self) -> &[ScriptTag] {
        &self.scripts
    }

    pub fn has_script(&self, src: &str) -> bool {
        self.scripts.iter().any(|script| script.src == src)
    }

    pub fn push_script(&mut self, script: ScriptTag) {
        tracing::trace!(target: "mathtex", scope = %self.label, src = %script.src, "script injected");
        self.scripts.push(script);
    }
}

impl fmt::Debug for RenderScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScope")
            .field("label", &self.label)
            .field("scripts", &self.scripts)
            .field("engine", &self.engine.is_some())
            .finish()
    }
}

/// What a [`refresh`] call ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No engine attached yet; nothing happened
    EngineUnavailable,
    /// Previous output cleared and the scope typeset again
    Retypeset,
    /// The engine reported an error; it was logged and swallowed
    Failed,
}

/// Clear and re-typeset `scope`, or do nothing if its engine is not there yet.
pub fn refresh(scope: &mut RenderScope) -> RefreshOutcome {
    let label = scope.label.clone();
    let Some(engine) = scope.engine.as_mut() else {
        tracing::debug!(target: "mathtex", scope = %label, "render skipped, engine not ready");
        return RefreshOutcome::EngineUnavailable;
    };

    let result = engine
        .clear_previous_output()
        .and_then(|()| engine.retypeset());

    match result {
        Ok(()) => RefreshOutcome::Retypeset,
        Err(err) => {
            tracing::warn!(target: "mathtex", scope = %label, error = %err, "render failed");
            RefreshOutcome::Failed
        }
    }
}
