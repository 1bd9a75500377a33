//! Declarative descriptions of the editing modal and the toolbar button
//!
//! Hosts build their widgets from these; the structures serialize to the field layout the
//! common editor dialog APIs accept (`type` tags, `initialData`).

use serde::Serialize;
use std::collections::BTreeMap;

/// Name of the modal's text field. Its value is the author's input.
pub const INPUT_FIELD: &str = "title";
pub const INPUT_LABEL: &str = "Math Input";
pub const BUTTON_NAME: &str = "mathjax";

/// Title and size of the modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            title: "Mathjax".to_string(),
            width: 600,
            height: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub body: DialogBody,
    pub buttons: Vec<DialogButton>,
    pub initial_data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DialogBody {
    Panel { items: Vec<DialogItem> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DialogItem {
    Textarea { name: String, label: String },
    Htmlpanel { html: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogButton {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl DialogSpec {
    /// The modal for one session: input field pre-filled, preview frame below it.
    pub fn new(options: &DialogOptions, preview_frame_id: &str, initial_input: &str) -> Self {
        let frame = format!(
            r#"<iframe id="{preview_frame_id}" style="width: 100%; min-height: 50px;"></iframe>"#
        );
        let mut initial_data = BTreeMap::new();
        initial_data.insert(INPUT_FIELD.to_string(), initial_input.to_string());

        Self {
            title: options.title.clone(),
            width: options.width,
            height: options.height,
            body: DialogBody::Panel {
                items: vec![
                    DialogItem::Textarea {
                        name: INPUT_FIELD.to_string(),
                        label: INPUT_LABEL.to_string(),
                    },
                    DialogItem::Htmlpanel { html: frame },
                ],
            },
            buttons: vec![DialogButton {
                kind: "submit".to_string(),
                text: "OK".to_string(),
            }],
            initial_data,
        }
    }

    pub fn initial_input(&self) -> &str {
        self.initial_data
            .get(INPUT_FIELD)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Toggle button registered on the host toolbar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarButton {
    pub name: String,
    pub text: String,
    pub tooltip: String,
}

impl Default for ToolbarButton {
    fn default() -> Self {
        Self {
            name: BUTTON_NAME.to_string(),
            text: "Σ".to_string(),
            tooltip: "Mathjax".to_string(),
        }
    }
}

/// Normalize a value read from the input field.
///
/// Trims it and drops `mml:` namespace prefixes (any case) from opening and closing tags, which
/// MathML pasted from other tools tends to carry.
pub fn clean_input(value: &str) -> String {
    let value = value.trim();
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..=pos]);
        let mut tail = &rest[pos + 1..];
        if let Some(after_slash) = tail.strip_prefix('/') {
            out.push('/');
            tail = after_slash;
        }
        let prefixed = tail.len() >= 4 && tail.as_bytes()[..4].eq_ignore_ascii_case(b"mml:");
        rest = if prefixed { &tail[4..] } else { tail };
    }
    out.push_str(rest);
    out
}
