use std::sync::Arc;

use serde::Serialize;

use crate::{
    dom::{Document, NodeId},
    domain::FieldSpec,
};

/// Interactive node(s) of a field, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldControls {
    Text(NodeId),
    /// One input per option, in declaration order.
    Radio(Vec<NodeId>),
    Checkbox(NodeId),
    Select(NodeId),
}

/// Runtime binding between a [`FieldSpec`] and the nodes of one mounted copy.
#[derive(Debug, Clone)]
pub struct FieldState {
    pub spec: Arc<FieldSpec>,
    pub controls: FieldControls,
    pub error: NodeId,
}

impl FieldState {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Node that receives focus when the field is the first invalid one.
    pub fn focus_target(&self) -> Option<NodeId> {
        match &self.controls {
            FieldControls::Text(node)
            | FieldControls::Checkbox(node)
            | FieldControls::Select(node) => Some(*node),
            FieldControls::Radio(options) => options.first().copied(),
        }
    }

    pub fn owns(&self, node: NodeId) -> bool {
        match &self.controls {
            FieldControls::Text(own)
            | FieldControls::Checkbox(own)
            | FieldControls::Select(own) => *own == node,
            FieldControls::Radio(options) => options.contains(&node),
        }
    }

    pub fn error_text(&self, doc: &Document) -> String {
        doc.text_content(self.error)
    }

    /// Put a user-supplied value into the field: text is typed, selects pick
    /// the matching option, radios check the option with that value and
    /// checkboxes accept `true`/`false`/`on`/`off`. Returns `false` when the
    /// value cannot be applied.
    pub fn fill(&self, doc: &mut Document, value: &str) -> bool {
        match &self.controls {
            FieldControls::Text(node) | FieldControls::Select(node) => doc.set_value(*node, value),
            FieldControls::Radio(options) => {
                let Some(option) = options
                    .iter()
                    .copied()
                    .find(|option| doc.attribute(*option, "value") == Some(value))
                else {
                    return false;
                };
                doc.set_checked(option, true);
                true
            }
            FieldControls::Checkbox(node) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => {
                    doc.set_checked(*node, true);
                    true
                }
                "false" | "off" | "no" | "0" => {
                    doc.set_checked(*node, false);
                    true
                }
                _ => false,
            },
        }
    }
}

/// A collected field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(flag) => Some(*flag),
            FieldValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}
