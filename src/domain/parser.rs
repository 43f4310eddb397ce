use std::sync::LazyLock;

use jsonschema::Validator;
use schemars::schema_for;
use serde_json::Value;

use crate::form::ConfigurationError;

use super::{document::FormSpecDocument, schema::FormSpec, validators::ValidatorRegistry};

static DOCUMENT_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    serde_json::to_value(schema_for!(FormSpecDocument)).unwrap_or(Value::Bool(true))
});

/// JSON Schema describing spec documents, derived from [`FormSpecDocument`].
pub fn form_spec_schema() -> &'static Value {
    &DOCUMENT_SCHEMA
}

/// Parse a spec document into a [`FormSpec`]. The document is first checked
/// structurally against [`form_spec_schema`], then the construction
/// invariants are applied.
pub fn parse_form_spec(
    value: &Value,
    registry: &ValidatorRegistry,
) -> Result<FormSpec, ConfigurationError> {
    let validator = document_validator()?;
    let issues = validator
        .iter_errors(value)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let prefix = if pointer.is_empty() {
                "<root>".to_string()
            } else {
                pointer
            };
            format!("{prefix}: {error}")
        })
        .collect::<Vec<_>>();
    if !issues.is_empty() {
        return Err(ConfigurationError::Document {
            message: issues.join("; "),
        });
    }

    let document: FormSpecDocument =
        serde_json::from_value(value.clone()).map_err(|err| ConfigurationError::Document {
            message: err.to_string(),
        })?;
    document.into_spec(registry)
}

fn document_validator() -> Result<Validator, ConfigurationError> {
    jsonschema::validator_for(form_spec_schema()).map_err(|err| ConfigurationError::Document {
        message: format!("spec document schema failed to compile: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldKind, OptionValues};
    use serde_json::json;

    #[test]
    fn parses_every_kind() {
        let doc = json!({
            "title": "Your info",
            "description": "Please enter your info",
            "fields": [
                {"title": "Age", "name": "age", "type": "text", "validators": ["age"],
                 "attributes": {"type": "number", "maxlength": 3, "autofocus": true, "hidden": false}},
                {"title": "Color", "name": "color", "type": "radio", "isRequired": true,
                 "values": ["Red", "Green", "Blue"]},
                {"title": "Do you have a dog?", "name": "hasDog", "type": "checkbox"},
                {"title": "Food", "name": "food", "type": "select",
                 "values": {"Fruit": ["Apple"], "Veg": ["Kale", "Leek"]},
                 "errorMessage": "Pick something"}
            ]
        });
        let spec = parse_form_spec(&doc, &ValidatorRegistry::builtin()).unwrap();
        assert_eq!(spec.title, "Your info");
        assert_eq!(spec.fields.len(), 4);

        let age = &spec.fields[0];
        assert_eq!(age.kind, FieldKind::Text);
        assert_eq!(age.validators[0].name(), "age");
        assert_eq!(
            age.attributes.iter().collect::<Vec<_>>(),
            vec![
                (&"type".to_string(), &"number".to_string()),
                (&"maxlength".to_string(), &"3".to_string()),
                (&"autofocus".to_string(), &String::new()),
            ]
        );

        assert!(spec.fields[1].is_required);
        assert!(matches!(spec.fields[2].kind, FieldKind::Checkbox));
        match &spec.fields[3].kind {
            FieldKind::Select(OptionValues::Grouped(groups)) => {
                assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["Fruit", "Veg"]);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(spec.fields[3].error_message.as_deref(), Some("Pick something"));
    }

    #[test]
    fn missing_pieces_map_to_configuration_errors() {
        let registry = ValidatorRegistry::builtin();
        let no_title = json!({"fields": []});
        assert_eq!(
            parse_form_spec(&no_title, &registry).unwrap_err(),
            ConfigurationError::MissingTitle
        );

        let no_kind = json!({"title": "T", "fields": [{"title": "A", "name": "a"}]});
        assert_eq!(
            parse_form_spec(&no_kind, &registry).unwrap_err(),
            ConfigurationError::MissingKind { index: 0 }
        );

        let no_values = json!({"title": "T", "fields": [{"title": "A", "name": "a", "type": "select"}]});
        assert_eq!(
            parse_form_spec(&no_values, &registry).unwrap_err(),
            ConfigurationError::MissingValues { name: "a".into() }
        );
    }

    #[test]
    fn unknown_validator_is_rejected() {
        let doc = json!({"title": "T", "fields": [
            {"title": "Zip", "name": "zip", "type": "text", "validators": ["zipcode"]}
        ]});
        assert_eq!(
            parse_form_spec(&doc, &ValidatorRegistry::builtin()).unwrap_err(),
            ConfigurationError::UnknownValidator {
                name: "zip".into(),
                validator: "zipcode".into()
            }
        );
    }

    #[test]
    fn structural_mismatch_reports_pointer() {
        let doc = json!({"title": "T", "fields": [
            {"title": "A", "name": "a", "type": "dropdown"}
        ]});
        match parse_form_spec(&doc, &ValidatorRegistry::builtin()).unwrap_err() {
            ConfigurationError::Document { message } => {
                assert!(message.contains("/fields/0"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
