mod form_builder;
mod mount;
mod options;
mod submit;

pub use form_builder::FormBuilder;
pub use mount::{Key, MountedForm};
pub use options::{
    DEFAULT_INVALID_ERROR, DEFAULT_REQUIRED_ERROR, DEFAULT_SELECT_OPTION, FormOptions, FormStyle,
};
pub use submit::{SubmitFuture, SubmitOutcome, SubmitPhase};
