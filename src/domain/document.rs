use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::form::ConfigurationError;

use super::{
    schema::{FieldKind, FieldSpec, FormSpec, OptionValues},
    validators::ValidatorRegistry,
};

/// Serialized form of a [`FormSpec`]. Validators are referenced by name and
/// resolved against a [`ValidatorRegistry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSpecDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpecDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpecDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKeyword>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<ValuesDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldKeyword {
    Text,
    Radio,
    Checkbox,
    Select,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ValuesDocument {
    Flat(Vec<String>),
    Grouped(IndexMap<String, Vec<String>>),
}

/// Attribute value as written in a document. Booleans toggle presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Flag(bool),
    Number(f64),
}

impl AttributeValue {
    fn into_attribute(self) -> Option<String> {
        match self {
            AttributeValue::Text(text) => Some(text),
            AttributeValue::Flag(true) => Some(String::new()),
            AttributeValue::Flag(false) => None,
            AttributeValue::Number(number) => Some(number.to_string()),
        }
    }
}

impl From<ValuesDocument> for OptionValues {
    fn from(values: ValuesDocument) -> Self {
        match values {
            ValuesDocument::Flat(flat) => OptionValues::Flat(flat),
            ValuesDocument::Grouped(groups) => OptionValues::Grouped(groups),
        }
    }
}

impl FormSpecDocument {
    pub fn into_spec(self, registry: &ValidatorRegistry) -> Result<FormSpec, ConfigurationError> {
        if self.title.trim().is_empty() {
            return Err(ConfigurationError::MissingTitle);
        }
        let mut fields = Vec::with_capacity(self.fields.len());
        for (index, field) in self.fields.into_iter().enumerate() {
            fields.push(field.into_spec(index, registry)?);
        }
        let spec = FormSpec {
            title: self.title,
            description: self.description,
            fields,
        };
        spec.validate()?;
        Ok(spec)
    }
}

impl FieldSpecDocument {
    fn into_spec(
        self,
        index: usize,
        registry: &ValidatorRegistry,
    ) -> Result<FieldSpec, ConfigurationError> {
        let Some(keyword) = self.kind else {
            return Err(ConfigurationError::MissingKind { index });
        };
        let mut values = self.values.map(OptionValues::from);
        let kind = match keyword {
            FieldKeyword::Text => FieldKind::Text,
            FieldKeyword::Checkbox => FieldKind::Checkbox,
            FieldKeyword::Radio | FieldKeyword::Select => {
                let Some(values) = values.take() else {
                    return Err(ConfigurationError::MissingValues { name: self.name });
                };
                if keyword == FieldKeyword::Radio {
                    FieldKind::Radio(values)
                } else {
                    FieldKind::Select(values)
                }
            }
        };

        let mut validators = Vec::with_capacity(self.validators.len());
        for validator in self.validators {
            match registry.get(&validator) {
                Some(predicate) => validators.push(predicate),
                None => {
                    return Err(ConfigurationError::UnknownValidator {
                        name: self.name,
                        validator,
                    });
                }
            }
        }

        let attributes = self
            .attributes
            .into_iter()
            .filter_map(|(name, value)| value.into_attribute().map(|value| (name, value)))
            .collect();

        Ok(FieldSpec {
            title: self.title,
            name: self.name,
            kind,
            is_required: self.is_required,
            validators,
            error_message: self.error_message,
            attributes,
        })
    }
}
