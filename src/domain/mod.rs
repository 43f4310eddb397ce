mod document;
mod parser;
mod schema;
mod validators;

pub use document::{
    AttributeValue, FieldKeyword, FieldSpecDocument, FormSpecDocument, ValuesDocument,
};
pub use parser::{form_spec_schema, parse_form_spec};
pub use schema::{FieldKind, FieldPredicate, FieldSpec, FormSpec, OptionValues, PredicateFn};
pub use validators::{ValidatorRegistry, is_age_valid, is_email_valid, is_name_valid};
