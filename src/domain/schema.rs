use std::{collections::HashSet, fmt, sync::Arc};

use indexmap::IndexMap;

use crate::form::ConfigurationError;

/// Caller-supplied check over a field's current content.
pub type PredicateFn = dyn Fn(&str) -> bool + Send + Sync;

/// A named validator predicate. The name only shows up in logs and `Debug`.
#[derive(Clone)]
pub struct FieldPredicate {
    name: String,
    check: Arc<PredicateFn>,
}

impl FieldPredicate {
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub(crate) fn from_shared(name: impl Into<String>, check: Arc<PredicateFn>) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &str) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for FieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldPredicate").field(&self.name).finish()
    }
}

/// Choices for radio groups and selects.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValues {
    Flat(Vec<String>),
    /// Group label to options; only selects render the grouping.
    Grouped(IndexMap<String, Vec<String>>),
}

impl OptionValues {
    pub fn is_empty(&self) -> bool {
        match self {
            OptionValues::Flat(values) => values.is_empty(),
            OptionValues::Grouped(groups) => groups.values().all(Vec::is_empty),
        }
    }

    pub fn flatten(&self) -> Vec<&str> {
        match self {
            OptionValues::Flat(values) => values.iter().map(String::as_str).collect(),
            OptionValues::Grouped(groups) => groups
                .values()
                .flat_map(|values| values.iter().map(String::as_str))
                .collect(),
        }
    }
}

impl<S: Into<String>> From<Vec<S>> for OptionValues {
    fn from(values: Vec<S>) -> Self {
        OptionValues::Flat(values.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for OptionValues {
    fn from(values: [S; N]) -> Self {
        OptionValues::Flat(values.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Vec<String>>> for OptionValues {
    fn from(groups: IndexMap<String, Vec<String>>) -> Self {
        OptionValues::Grouped(groups)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Radio(OptionValues),
    Checkbox,
    Select(OptionValues),
}

impl FieldKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Radio(_) => "radio",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Select(_) => "select",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub title: String,
    pub name: String,
    pub kind: FieldKind,
    pub is_required: bool,
    pub validators: Vec<FieldPredicate>,
    pub error_message: Option<String>,
    pub attributes: IndexMap<String, String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            title: title.into(),
            name: name.into(),
            kind,
            is_required: false,
            validators: Vec::new(),
            error_message: None,
            attributes: IndexMap::new(),
        }
    }

    pub fn text(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(name, title, FieldKind::Text)
    }

    pub fn checkbox(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(name, title, FieldKind::Checkbox)
    }

    pub fn radio(
        name: impl Into<String>,
        title: impl Into<String>,
        values: impl Into<OptionValues>,
    ) -> Self {
        Self::new(name, title, FieldKind::Radio(values.into()))
    }

    pub fn select(
        name: impl Into<String>,
        title: impl Into<String>,
        values: impl Into<OptionValues>,
    ) -> Self {
        Self::new(name, title, FieldKind::Select(values.into()))
    }

    pub fn required(mut self, required: bool) -> Self {
        self.is_required = required;
        self
    }

    pub fn with_validator(
        mut self,
        name: impl Into<String>,
        check: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(FieldPredicate::new(name, check));
        self
    }

    pub fn with_predicate(mut self, predicate: FieldPredicate) -> Self {
        self.validators.push(predicate);
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct FormSpec {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl FormSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Check the construction invariants, reporting the first violation in
    /// declaration order.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.title.trim().is_empty() {
            return Err(ConfigurationError::MissingTitle);
        }
        let mut seen = HashSet::new();
        for (index, field) in self.fields.iter().enumerate() {
            if field.title.trim().is_empty() {
                return Err(ConfigurationError::MissingFieldTitle { index });
            }
            if field.name.trim().is_empty() {
                return Err(ConfigurationError::MissingFieldName { index });
            }
            if let FieldKind::Radio(values) | FieldKind::Select(values) = &field.kind
                && values.is_empty()
            {
                return Err(ConfigurationError::MissingValues {
                    name: field.name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigurationError::DuplicateName {
                    name: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}
