#![deny(rust_2018_idioms)]
//! Declarative form builder.
//!
//! A [`FormSpec`] describes a form; [`FormBuilder`] checks it and renders any
//! number of independent copies into a headless [`Page`]. Each
//! [`MountedForm`] validates its fields on submit, shows inline error text,
//! moves focus to the first invalid field, and hands a [`SubmitResult`] to
//! the registered completion callback.

mod app;
pub mod dom;
mod domain;
mod form;
mod io;

pub use app::{
    DEFAULT_INVALID_ERROR, DEFAULT_REQUIRED_ERROR, DEFAULT_SELECT_OPTION, FormBuilder,
    FormOptions, FormStyle, Key, MountedForm, SubmitFuture, SubmitOutcome, SubmitPhase,
};
pub use dom::{Document, NodeId, Page};
pub use domain::{
    AttributeValue, FieldKeyword, FieldKind, FieldPredicate, FieldSpec, FieldSpecDocument,
    FormSpec, FormSpecDocument, OptionValues, PredicateFn, ValidatorRegistry, ValuesDocument,
    form_spec_schema, is_age_valid, is_email_valid, is_name_valid, parse_form_spec,
};
pub use form::{
    ConfigurationError, FieldControls, FieldFactory, FieldOutcome, FieldState, FieldValue,
    RenderError, SubmitResult, error_message, to_title_case, validate_field,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, load_form_spec, parse_document_any,
    parse_document_str, serialize_value,
};

pub mod prelude {
    pub use super::{FieldSpec, FormBuilder, FormOptions, FormSpec, Page, SubmitOutcome};
}
