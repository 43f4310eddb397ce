use thiserror::Error;

use crate::dom::SelectorError;

/// Construction-time failure. No form instance exists when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("form title is required")]
    MissingTitle,
    #[error("field #{index} has no title")]
    MissingFieldTitle { index: usize },
    #[error("field #{index} has no name")]
    MissingFieldName { index: usize },
    #[error("field #{index} has no type")]
    MissingKind { index: usize },
    #[error("field '{name}' needs a non-empty list of values")]
    MissingValues { name: String },
    #[error("field name '{name}' is used more than once")]
    DuplicateName { name: String },
    #[error("field '{name}' refers to unknown validator '{validator}'")]
    UnknownValidator { name: String, validator: String },
    #[error("invalid form spec document: {message}")]
    Document { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no element matches '{selector}'")]
    ContainerNotFound { selector: String },
    #[error(transparent)]
    InvalidSelector(#[from] SelectorError),
}
