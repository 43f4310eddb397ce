use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use super::field::FieldValue;

/// Characters a browser leaves untouched when urlencoding form data.
const FORM_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Field name to collected value, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmitResult {
    values: IndexMap<String, FieldValue>,
}

impl SubmitResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// `application/x-www-form-urlencoded` body, the encoding a browser uses
    /// for a native form post. Unchecked checkboxes are omitted, checked ones
    /// contribute `on`.
    pub fn to_urlencoded(&self) -> String {
        self.values
            .iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    FieldValue::Text(text) => text.as_str(),
                    FieldValue::Bool(true) => "on",
                    FieldValue::Bool(false) => return None,
                };
                Some(format!("{}={}", encode(name), encode(value)))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<'a> IntoIterator for &'a SubmitResult {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = indexmap::map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, FORM_ENCODE)
        .to_string()
        .replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SubmitResult {
        let mut result = SubmitResult::new();
        result.insert("name", FieldValue::from("Ada Lovelace"));
        result.insert("hasDog", FieldValue::Bool(false));
        result.insert("color", FieldValue::from("Green & Blue"));
        result.insert("newsletter", FieldValue::Bool(true));
        result
    }

    #[test]
    fn json_keeps_declaration_order_and_types() {
        let json = sample().to_json();
        assert_eq!(
            json,
            json!({"name": "Ada Lovelace", "hasDog": false, "color": "Green & Blue", "newsletter": true})
        );
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "hasDog", "color", "newsletter"]);
    }

    #[test]
    fn urlencoded_matches_native_form_post() {
        assert_eq!(
            sample().to_urlencoded(),
            "name=Ada+Lovelace&color=Green+%26+Blue&newsletter=on"
        );
    }
}
