mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{load_form_spec, parse_document_any, parse_document_str};
pub use output::{OutputDestination, OutputOptions, emit, serialize_value};
