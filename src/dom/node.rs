use indexmap::IndexMap;

use super::selector::{Selector, SelectorError};

/// Handle into a [`Document`] arena. Handles stay valid for the lifetime of
/// the document; nodes are never freed, only detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element { tag: String },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    attributes: IndexMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Headless document: an element tree with live form-control state kept in
/// attributes (`value`, `checked`, `selected`, `disabled`) plus a focus cursor.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut document = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            focused: None,
        };
        document.root = document.create_element("body");
        document
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
        })
    }

    pub fn create_element_with<K, V>(
        &mut self,
        tag: &str,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> NodeId
    where
        K: Into<String>,
        V: Into<String>,
    {
        let node = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(node, name, value);
        }
        node
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Create an element and append it to `parent` in one step.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.create_element(tag);
        self.append_child(parent, node);
        node
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self, node: NodeId) -> impl Iterator<Item = (&str, &str)> {
        self.nodes[node.0]
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.nodes[node.0].attributes.contains_key(name)
    }

    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        let name = name.into().to_ascii_lowercase();
        self.nodes[node.0].attributes.insert(name, value.into());
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].attributes.shift_remove(name);
    }

    pub fn toggle_attribute(&mut self, node: NodeId, name: &str, on: bool) {
        if on {
            self.set_attribute(node, name, "");
        } else {
            self.remove_attribute(node, name);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|item| item == class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if class.is_empty() || self.has_class(node, class) {
            return;
        }
        let joined = match self.attribute(node, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attribute(node, "class", joined);
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut buffer = String::new();
        self.collect_text(node, &mut buffer);
        buffer
    }

    /// Replace the children of `node` with `text`. A leading text child is
    /// rewritten in place, so repeated updates do not grow the arena.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        let mut children = std::mem::take(&mut self.nodes[node.0].children);
        let reused = match children.first() {
            Some(first) if matches!(self.nodes[first.0].kind, NodeKind::Text(_)) => {
                Some(children.remove(0))
            }
            _ => None,
        };
        for child in children {
            self.nodes[child.0].parent = None;
        }
        match reused {
            Some(child) => {
                self.nodes[child.0].kind = NodeKind::Text(text.to_string());
                self.nodes[node.0].children.push(child);
            }
            None if !text.is_empty() => {
                self.append_text(node, text);
            }
            None => {}
        }
    }

    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), |current| self.parent(*current))
    }

    /// Whether `node` is `ancestor` or lives somewhere below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|item| item == ancestor)
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        let mut candidates = vec![self.root];
        candidates.extend(self.descendants(self.root));
        Ok(candidates
            .into_iter()
            .filter(|node| selector.matches(self, *node))
            .collect())
    }

    pub fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.has_attribute(node, "disabled")
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        self.toggle_attribute(node, "disabled", disabled);
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        self.has_attribute(node, "checked")
    }

    /// Set the checked state of a checkbox or radio. Checking a radio unchecks
    /// every other radio sharing its `name` inside the same form owner.
    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if checked && self.input_type(node) == "radio" {
            if let Some(name) = self.attribute(node, "name").map(str::to_string) {
                let owner = self.form_owner(node).unwrap_or(self.root);
                for other in self.descendants(owner) {
                    if other != node
                        && self.input_type(other) == "radio"
                        && self.attribute(other, "name") == Some(name.as_str())
                    {
                        self.remove_attribute(other, "checked");
                    }
                }
            }
        }
        self.toggle_attribute(node, "checked", checked);
    }

    /// Live value of a form control. For `<select>` this is the value of the
    /// selected option (or the first option when none is marked).
    pub fn value(&self, node: NodeId) -> String {
        if self.tag(node) == Some("select") {
            let options = self.select_options(node);
            return options
                .iter()
                .find(|option| self.has_attribute(**option, "selected"))
                .or_else(|| options.first())
                .map(|option| self.option_value(*option))
                .unwrap_or_default();
        }
        self.attribute(node, "value").unwrap_or_default().to_string()
    }

    /// Set the live value of a control. For `<select>` the matching enabled
    /// option becomes selected; returns `false` when no such option exists.
    pub fn set_value(&mut self, node: NodeId, value: &str) -> bool {
        if self.tag(node) != Some("select") {
            self.set_attribute(node, "value", value);
            return true;
        }
        let options = self.select_options(node);
        let Some(target) = options
            .iter()
            .copied()
            .find(|option| self.option_value(*option) == value && !self.is_disabled(*option))
        else {
            return false;
        };
        for option in options {
            self.toggle_attribute(option, "selected", option == target);
        }
        true
    }

    pub fn input_type(&self, node: NodeId) -> String {
        match self.tag(node) {
            Some("input") => self
                .attribute(node, "type")
                .unwrap_or("text")
                .to_ascii_lowercase(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    /// Nearest `<form>` ancestor.
    pub fn form_owner(&self, node: NodeId) -> Option<NodeId> {
        self.ancestors(node)
            .find(|ancestor| self.tag(*ancestor) == Some("form"))
    }

    fn select_options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|node| self.tag(*node) == Some("option"))
            .collect()
    }

    fn option_value(&self, option: NodeId) -> String {
        self.attribute(option, "value")
            .map(str::to_string)
            .unwrap_or_else(|| self.text_content(option))
    }

    fn collect_text(&self, node: NodeId, buffer: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => buffer.push_str(text),
            NodeKind::Element { .. } => {
                for child in &self.nodes[node.0].children {
                    self.collect_text(*child, buffer);
                }
            }
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            attributes: IndexMap::new(),
            children: Vec::new(),
            parent: None,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_replaces_children() {
        let mut doc = Document::new();
        let span = doc.append_element(doc.root(), "span");
        doc.append_text(span, "first");
        doc.append_text(span, " second");
        assert_eq!(doc.text_content(span), "first second");
        doc.set_text_content(span, "error");
        assert_eq!(doc.text_content(span), "error");
        doc.set_text_content(span, "");
        assert_eq!(doc.text_content(span), "");
        assert_eq!(doc.outer_html(span), "<span></span>");
    }

    #[test]
    fn repeated_text_updates_reuse_the_text_node() {
        let mut doc = Document::new();
        let span = doc.append_element(doc.root(), "span");
        doc.set_text_content(span, "warming up");
        let nodes = doc.node_count();
        for round in 0..100 {
            let text = if round % 2 == 0 { "" } else { "Please, enter this field." };
            doc.set_text_content(span, text);
            assert_eq!(doc.text_content(span), text);
        }
        assert_eq!(doc.node_count(), nodes);
        assert_eq!(doc.children(span).len(), 1);
    }

    #[test]
    fn radios_are_exclusive_within_their_form_only() {
        let mut doc = Document::new();
        let root = doc.root();
        let mut radios = Vec::new();
        for _ in 0..2 {
            let form = doc.append_element(root, "form");
            for value in ["a", "b"] {
                let radio = doc.create_element_with(
                    "input",
                    [("type", "radio"), ("name", "color"), ("value", value)],
                );
                doc.append_child(form, radio);
                radios.push(radio);
            }
        }
        doc.set_checked(radios[0], true);
        doc.set_checked(radios[2], true);
        doc.set_checked(radios[1], true);
        assert!(!doc.is_checked(radios[0]));
        assert!(doc.is_checked(radios[1]));
        assert!(doc.is_checked(radios[2]), "other form untouched");
    }

    #[test]
    fn select_value_follows_enabled_options() {
        let mut doc = Document::new();
        let select = doc.append_element(doc.root(), "select");
        let placeholder =
            doc.create_element_with("option", [("value", ""), ("disabled", ""), ("selected", "")]);
        doc.append_child(select, placeholder);
        let group = doc.create_element_with("optgroup", [("label", "Fruit")]);
        doc.append_child(select, group);
        let apple = doc.create_element_with("option", [("value", "apple")]);
        doc.append_child(group, apple);

        assert_eq!(doc.value(select), "");
        assert!(doc.set_value(select, "apple"));
        assert_eq!(doc.value(select), "apple");
        assert!(!doc.set_value(select, ""), "disabled placeholder is not selectable");
        assert!(!doc.set_value(select, "pear"));
        assert_eq!(doc.value(select), "apple");
    }

    #[test]
    fn class_helpers_do_not_duplicate() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div");
        doc.add_class(div, "field");
        doc.add_class(div, "field");
        doc.add_class(div, "wide");
        assert_eq!(doc.attribute(div, "class"), Some("field wide"));
        assert!(doc.has_class(div, "wide"));
    }
}
