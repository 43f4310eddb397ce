use std::fmt::Write;

use v_htmlescape::escape;

use super::node::{Document, NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "autofocus", "checked", "disabled", "hidden", "multiple", "readonly", "required", "selected",
];

impl Document {
    /// Serialize `node` and its subtree as HTML. Live control state is held
    /// in attributes, so the markup reflects the current values.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_html(*child, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let tag = match self.kind(node) {
            NodeKind::Text(text) => {
                let _ = write!(out, "{}", escape(text));
                return;
            }
            NodeKind::Element { tag } => tag,
        };
        out.push('<');
        out.push_str(tag);
        for (name, value) in self.attributes(node) {
            out.push(' ');
            out.push_str(name);
            if !(value.is_empty() && BOOLEAN_ATTRIBUTES.contains(&name)) {
                out.push_str("=\"");
                let _ = write!(out, "{}", escape(value));
                out.push('"');
            }
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        for child in self.children(node) {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}
