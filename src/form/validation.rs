use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::{
    app::FormOptions,
    dom::{Document, NodeId},
    domain::{FieldKind, FieldPredicate, FieldSpec},
};

use super::field::{FieldControls, FieldState, FieldValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// `None` only for an optional radio group with nothing selected.
    Valid(Option<FieldValue>),
    Invalid { focus: Option<NodeId> },
}

impl FieldOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldOutcome::Valid(_))
    }
}

/// Validate one field against its current document state. The error node is
/// set to the field's message when invalid and cleared when valid; nothing
/// else in the document is touched.
pub fn validate_field(
    doc: &mut Document,
    state: &FieldState,
    options: &FormOptions,
) -> FieldOutcome {
    let spec = state.spec.as_ref();
    let outcome = match &state.controls {
        FieldControls::Text(node) | FieldControls::Select(node) => {
            let value = doc.value(*node);
            if content_is_valid(doc, *node, spec, &value) {
                FieldOutcome::Valid(Some(FieldValue::Text(value)))
            } else {
                FieldOutcome::Invalid { focus: Some(*node) }
            }
        }
        FieldControls::Radio(inputs) => {
            let selected = inputs
                .iter()
                .find(|input| doc.is_checked(**input))
                .map(|input| doc.attribute(*input, "value").unwrap_or("on").to_string());
            if spec.is_required && selected.is_none() {
                FieldOutcome::Invalid {
                    focus: state.focus_target(),
                }
            } else {
                FieldOutcome::Valid(selected.map(FieldValue::Text))
            }
        }
        FieldControls::Checkbox(node) => {
            FieldOutcome::Valid(Some(FieldValue::Bool(doc.is_checked(*node))))
        }
    };

    match outcome {
        FieldOutcome::Valid(_) => doc.set_text_content(state.error, ""),
        FieldOutcome::Invalid { .. } => {
            doc.set_text_content(state.error, error_message(spec, options))
        }
    }
    outcome
}

/// Message shown for an invalid field: its own, or the default for its kind.
pub fn error_message<'a>(spec: &'a FieldSpec, options: &'a FormOptions) -> &'a str {
    if let Some(message) = &spec.error_message {
        return message.as_str();
    }
    match spec.kind {
        FieldKind::Text => options.invalid_error.as_ref(),
        FieldKind::Radio(_) | FieldKind::Select(_) | FieldKind::Checkbox => {
            options.required_error.as_ref()
        }
    }
}

fn content_is_valid(doc: &Document, node: NodeId, spec: &FieldSpec, value: &str) -> bool {
    if value.is_empty() {
        return !spec.is_required;
    }
    if spec.validators.is_empty() {
        return doc.check_validity(node);
    }
    spec.validators
        .iter()
        .all(|predicate| run_predicate(spec, predicate, value))
}

/// A panicking predicate counts as a failed check.
fn run_predicate(spec: &FieldSpec, predicate: &FieldPredicate, value: &str) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| predicate.check(value))) {
        Ok(passed) => passed,
        Err(_) => {
            warn!(
                field = %spec.name,
                predicate = predicate.name(),
                "validator panicked; treating value as invalid"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::{domain::is_age_valid, form::FieldFactory};

    fn mount(spec: FieldSpec) -> (Document, FieldState, FormOptions) {
        let options = FormOptions::default();
        let mut doc = Document::new();
        let (node, state) = FieldFactory::new(&options).create(&mut doc, Arc::new(spec));
        doc.append_child(doc.root(), node);
        (doc, state, options)
    }

    fn control(state: &FieldState) -> NodeId {
        state.focus_target().expect("field has a control")
    }

    #[test]
    fn required_text_rejects_empty_content() {
        let (mut doc, state, options) = mount(FieldSpec::text("name", "Name").required(true));
        let outcome = validate_field(&mut doc, &state, &options);
        assert_eq!(
            outcome,
            FieldOutcome::Invalid {
                focus: Some(control(&state))
            }
        );
        assert_eq!(state.error_text(&doc), "Please, input correct data.");
    }

    #[test]
    fn optional_empty_text_skips_predicates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let (mut doc, state, options) = mount(FieldSpec::text("age", "Age").with_validator(
            "never",
            move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                false
            },
        ));
        let outcome = validate_field(&mut doc, &state, &options);
        assert_eq!(outcome, FieldOutcome::Valid(Some(FieldValue::Text(String::new()))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn predicates_short_circuit_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let (mut doc, state, options) = mount(
            FieldSpec::text("age", "Age")
                .with_validator("age", is_age_valid)
                .with_validator("counted", move |_| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    true
                })
                .with_error_message("Age must be 1-119"),
        );
        doc.set_value(control(&state), "abc");
        assert!(!validate_field(&mut doc, &state, &options).is_valid());
        assert_eq!(state.error_text(&doc), "Age must be 1-119");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        doc.set_value(control(&state), "33");
        assert!(validate_field(&mut doc, &state, &options).is_valid());
        assert_eq!(state.error_text(&doc), "", "error cleared once valid");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_predicate_marks_field_invalid() {
        let (mut doc, state, options) = mount(
            FieldSpec::text("code", "Code").with_validator("explodes", |_| panic!("bad predicate")),
        );
        doc.set_value(control(&state), "x");
        assert!(!validate_field(&mut doc, &state, &options).is_valid());
    }

    #[test]
    fn native_constraints_apply_without_predicates() {
        let (mut doc, state, options) =
            mount(FieldSpec::text("mail", "Mail").with_attribute("type", "email"));
        doc.set_value(control(&state), "nope");
        assert!(!validate_field(&mut doc, &state, &options).is_valid());
        doc.set_value(control(&state), "a@b.io");
        assert!(validate_field(&mut doc, &state, &options).is_valid());
    }

    #[test]
    fn radio_requires_a_selection_only_when_required() {
        let (mut doc, state, options) =
            mount(FieldSpec::radio("color", "Color", ["Red", "Green", "Blue"]).required(true));
        let outcome = validate_field(&mut doc, &state, &options);
        assert_eq!(
            outcome,
            FieldOutcome::Invalid {
                focus: state.focus_target()
            }
        );
        assert_eq!(state.error_text(&doc), "Please, enter this field.");

        assert!(state.fill(&mut doc, "Green"));
        assert_eq!(
            validate_field(&mut doc, &state, &options),
            FieldOutcome::Valid(Some(FieldValue::from("Green")))
        );

        let (mut doc, state, options) = mount(FieldSpec::radio("size", "Size", ["S", "M"]));
        assert_eq!(validate_field(&mut doc, &state, &options), FieldOutcome::Valid(None));
    }

    #[test]
    fn checkbox_is_always_valid() {
        let (mut doc, state, options) =
            mount(FieldSpec::checkbox("hasDog", "Do you have a dog?").required(true));
        assert_eq!(
            validate_field(&mut doc, &state, &options),
            FieldOutcome::Valid(Some(FieldValue::Bool(false)))
        );
        assert!(state.fill(&mut doc, "on"));
        assert_eq!(
            validate_field(&mut doc, &state, &options),
            FieldOutcome::Valid(Some(FieldValue::Bool(true)))
        );
    }

    #[test]
    fn required_select_needs_a_real_option() {
        let (mut doc, state, options) =
            mount(FieldSpec::select("size", "Size", ["S", "M"]).required(true));
        assert!(!validate_field(&mut doc, &state, &options).is_valid());
        assert_eq!(state.error_text(&doc), "Please, enter this field.");
        assert!(state.fill(&mut doc, "M"));
        assert_eq!(
            validate_field(&mut doc, &state, &options),
            FieldOutcome::Valid(Some(FieldValue::from("M")))
        );
    }
}
