mod error;
mod factory;
mod field;
mod label;
mod result;
mod validation;

pub use error::{ConfigurationError, RenderError};
pub use factory::FieldFactory;
pub use field::{FieldControls, FieldState, FieldValue};
pub use label::to_title_case;
pub use result::SubmitResult;
pub use validation::{FieldOutcome, error_message, validate_field};
