use std::sync::Arc;

use crate::{
    app::FormOptions,
    dom::{Document, NodeId},
    domain::{FieldKind, FieldSpec, OptionValues},
};

use super::field::{FieldControls, FieldState};

/// Builds the detached node structure of one field plus its [`FieldState`].
/// Nothing is attached to the document tree here.
pub struct FieldFactory<'a> {
    options: &'a FormOptions,
}

impl<'a> FieldFactory<'a> {
    pub fn new(options: &'a FormOptions) -> Self {
        Self { options }
    }

    pub fn create(&self, doc: &mut Document, spec: Arc<FieldSpec>) -> (NodeId, FieldState) {
        let wrapper = doc.create_element("div");
        doc.add_class(wrapper, &self.options.style.field);

        let controls = match &spec.kind {
            FieldKind::Text => FieldControls::Text(self.text(doc, wrapper, &spec)),
            FieldKind::Radio(values) => {
                FieldControls::Radio(self.radio(doc, wrapper, &spec, values))
            }
            FieldKind::Checkbox => FieldControls::Checkbox(self.checkbox(doc, wrapper, &spec)),
            FieldKind::Select(values) => {
                FieldControls::Select(self.select(doc, wrapper, &spec, values))
            }
        };

        let error = doc.append_element(wrapper, "span");
        doc.add_class(error, &self.options.style.error);

        (
            wrapper,
            FieldState {
                spec,
                controls,
                error,
            },
        )
    }

    fn text(&self, doc: &mut Document, wrapper: NodeId, spec: &FieldSpec) -> NodeId {
        let label = doc.append_element(wrapper, "label");
        doc.append_text(label, self.options.label(&spec.title));
        self.required_marker(doc, label, spec);
        let input = self.control(doc, "input", spec);
        doc.append_child(label, input);
        input
    }

    fn radio(
        &self,
        doc: &mut Document,
        wrapper: NodeId,
        spec: &FieldSpec,
        values: &OptionValues,
    ) -> Vec<NodeId> {
        let title = doc.append_element(wrapper, "span");
        doc.append_text(title, self.options.label(&spec.title));
        self.required_marker(doc, title, spec);

        let group = doc.append_element(wrapper, "div");
        doc.set_attribute(group, "role", "radiogroup");
        // A preset `checked` selects the first option only.
        let preset = spec.attributes.contains_key("checked");
        let shared = spec
            .attributes
            .iter()
            .filter(|(name, _)| name.as_str() != "checked")
            .map(pair)
            .collect::<Vec<_>>();
        let mut inputs = Vec::new();
        for value in values.flatten() {
            let label = doc.append_element(group, "label");
            let input = doc.create_element_with("input", shared.iter().copied());
            doc.set_attribute(input, "type", "radio");
            doc.set_attribute(input, "name", spec.name.as_str());
            doc.set_attribute(input, "value", value);
            if preset && inputs.is_empty() {
                doc.set_attribute(input, "checked", "");
            }
            doc.append_child(label, input);
            doc.append_text(label, value);
            inputs.push(input);
        }
        inputs
    }

    fn checkbox(&self, doc: &mut Document, wrapper: NodeId, spec: &FieldSpec) -> NodeId {
        let label = doc.append_element(wrapper, "label");
        let input = self.control(doc, "input", spec);
        doc.set_attribute(input, "type", "checkbox");
        doc.append_child(label, input);
        doc.append_text(label, self.options.label(&spec.title));
        self.required_marker(doc, label, spec);
        input
    }

    fn select(
        &self,
        doc: &mut Document,
        wrapper: NodeId,
        spec: &FieldSpec,
        values: &OptionValues,
    ) -> NodeId {
        let label = doc.append_element(wrapper, "label");
        doc.append_text(label, self.options.label(&spec.title));
        self.required_marker(doc, label, spec);
        let select = self.control(doc, "select", spec);
        doc.append_child(label, select);

        let placeholder = doc.create_element_with("option", [("value", ""), ("selected", "")]);
        if spec.is_required {
            doc.set_disabled(placeholder, true);
            doc.set_attribute(placeholder, "hidden", "");
        }
        doc.append_text(placeholder, self.options.select_placeholder.as_ref());
        doc.append_child(select, placeholder);

        match values {
            OptionValues::Flat(flat) => {
                for value in flat {
                    append_option(doc, select, value);
                }
            }
            OptionValues::Grouped(groups) => {
                for (group_label, group_values) in groups {
                    let group =
                        doc.create_element_with("optgroup", [("label", group_label.as_str())]);
                    for value in group_values {
                        append_option(doc, group, value);
                    }
                    doc.append_child(select, group);
                }
            }
        }
        select
    }

    /// Interactive element carrying the caller's attributes verbatim, plus a
    /// `name` when the caller did not give one.
    fn control(&self, doc: &mut Document, tag: &str, spec: &FieldSpec) -> NodeId {
        let node = doc.create_element_with(tag, spec.attributes.iter().map(pair));
        if !doc.has_attribute(node, "name") {
            doc.set_attribute(node, "name", spec.name.as_str());
        }
        node
    }

    fn required_marker(&self, doc: &mut Document, parent: NodeId, spec: &FieldSpec) {
        if !spec.is_required {
            return;
        }
        let marker = doc.append_element(parent, "span");
        doc.add_class(marker, &self.options.style.required);
        doc.append_text(marker, self.options.required_marker.as_ref());
    }
}

fn pair<'s>((name, value): (&'s String, &'s String)) -> (&'s str, &'s str) {
    (name.as_str(), value.as_str())
}

fn append_option(doc: &mut Document, parent: NodeId, value: &str) {
    let option = doc.create_element_with("option", [("value", value)]);
    doc.append_text(option, value);
    doc.append_child(parent, option);
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn build(spec: FieldSpec) -> (Document, NodeId, FieldState) {
        let options = FormOptions::default();
        let mut doc = Document::new();
        let (node, state) = FieldFactory::new(&options).create(&mut doc, Arc::new(spec));
        (doc, node, state)
    }

    #[test]
    fn text_field_carries_attributes_and_marker() {
        let (doc, node, state) = build(
            FieldSpec::text("email", "Email")
                .required(true)
                .with_attribute("type", "email")
                .with_attribute("placeholder", "you@example.org"),
        );
        assert_eq!(doc.parent(node), None, "factory output is detached");
        assert_eq!(
            doc.outer_html(node),
            "<div class=\"fb-field\"><label>Email<span class=\"fb-required\">*</span>\
             <input type=\"email\" placeholder=\"you@example.org\" name=\"email\"></label>\
             <span class=\"fb-error\"></span></div>"
        );
        assert!(matches!(state.controls, FieldControls::Text(_)));
    }

    #[test]
    fn radio_group_shares_name_and_flattens_groups() {
        let mut groups = IndexMap::new();
        groups.insert("Warm".to_string(), vec!["Red".to_string()]);
        groups.insert("Cold".to_string(), vec!["Blue".to_string()]);
        let (doc, _, state) = build(FieldSpec::radio("color", "Color", groups));
        let FieldControls::Radio(options) = &state.controls else {
            panic!("radio controls expected");
        };
        assert_eq!(options.len(), 2);
        for (option, value) in options.iter().zip(["Red", "Blue"]) {
            assert_eq!(doc.attribute(*option, "name"), Some("color"));
            assert_eq!(doc.attribute(*option, "type"), Some("radio"));
            assert_eq!(doc.attribute(*option, "value"), Some(value));
        }
        assert_eq!(state.focus_target(), options.first().copied());
    }

    #[test]
    fn preset_checked_selects_only_the_first_radio() {
        let (doc, _, state) = build(
            FieldSpec::radio("pet", "Pet", ["cat", "dog", "fish"]).with_attribute("checked", ""),
        );
        let FieldControls::Radio(options) = &state.controls else {
            panic!("radio controls expected");
        };
        let checked: Vec<bool> = options.iter().map(|option| doc.is_checked(*option)).collect();
        assert_eq!(checked, [true, false, false]);
    }

    #[test]
    fn checkbox_forces_type() {
        let (doc, _, state) = build(
            FieldSpec::checkbox("hasDog", "Do you have a dog?").with_attribute("type", "text"),
        );
        let FieldControls::Checkbox(input) = state.controls else {
            panic!("checkbox expected");
        };
        assert_eq!(doc.attribute(input, "type"), Some("checkbox"));
        assert!(!doc.is_checked(input));
    }

    #[test]
    fn required_select_hides_placeholder() {
        let mut groups = IndexMap::new();
        groups.insert("Fruit".to_string(), vec!["Apple".to_string()]);
        let (doc, _, state) = build(FieldSpec::select("food", "Food", groups).required(true));
        let FieldControls::Select(select) = state.controls else {
            panic!("select expected");
        };
        assert_eq!(
            doc.inner_html(select),
            "<option value=\"\" selected disabled hidden>Not selected</option>\
             <optgroup label=\"Fruit\"><option value=\"Apple\">Apple</option></optgroup>"
        );
        assert_eq!(doc.value(select), "");
    }

    #[test]
    fn optional_select_keeps_placeholder_selectable() {
        let (doc, _, state) = build(FieldSpec::select("size", "Size", ["S", "M"]));
        let FieldControls::Select(select) = state.controls else {
            panic!("select expected");
        };
        let placeholder = doc.children(select)[0];
        assert!(!doc.is_disabled(placeholder));
        assert!(!doc.has_attribute(placeholder, "hidden"));
        assert_eq!(doc.children(select).len(), 3);
    }
}
