use std::borrow::Cow;

pub const DEFAULT_REQUIRED_ERROR: &str = "Please, enter this field.";
pub const DEFAULT_INVALID_ERROR: &str = "Please, input correct data.";
pub const DEFAULT_SELECT_OPTION: &str = "Not selected";

/// Class names stamped onto each rendered instance. Styling stays scoped to
/// these classes; nothing is written into a document-wide stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStyle {
    pub form: Cow<'static, str>,
    pub field: Cow<'static, str>,
    pub error: Cow<'static, str>,
    pub required: Cow<'static, str>,
}

impl Default for FormStyle {
    fn default() -> Self {
        Self {
            form: Cow::Borrowed("fb-form"),
            field: Cow::Borrowed("fb-field"),
            error: Cow::Borrowed("fb-error"),
            required: Cow::Borrowed("fb-required"),
        }
    }
}

impl FormStyle {
    pub fn with_form_class(mut self, class: impl Into<Cow<'static, str>>) -> Self {
        self.form = class.into();
        self
    }

    pub fn with_field_class(mut self, class: impl Into<Cow<'static, str>>) -> Self {
        self.field = class.into();
        self
    }

    pub fn with_error_class(mut self, class: impl Into<Cow<'static, str>>) -> Self {
        self.error = class.into();
        self
    }

    pub fn with_required_class(mut self, class: impl Into<Cow<'static, str>>) -> Self {
        self.required = class.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct FormOptions {
    pub submit_label: Cow<'static, str>,
    pub loading_label: Cow<'static, str>,
    pub select_placeholder: Cow<'static, str>,
    pub required_error: Cow<'static, str>,
    pub invalid_error: Cow<'static, str>,
    pub required_marker: Cow<'static, str>,
    pub title_case_labels: bool,
    pub style: FormStyle,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            submit_label: Cow::Borrowed("Submit"),
            loading_label: Cow::Borrowed("Loading…"),
            select_placeholder: Cow::Borrowed(DEFAULT_SELECT_OPTION),
            required_error: Cow::Borrowed(DEFAULT_REQUIRED_ERROR),
            invalid_error: Cow::Borrowed(DEFAULT_INVALID_ERROR),
            required_marker: Cow::Borrowed("*"),
            title_case_labels: false,
            style: FormStyle::default(),
        }
    }
}

impl FormOptions {
    pub fn with_submit_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.submit_label = label.into();
        self
    }

    pub fn with_loading_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.loading_label = label.into();
        self
    }

    pub fn with_select_placeholder(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.select_placeholder = label.into();
        self
    }

    pub fn with_required_error(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.required_error = message.into();
        self
    }

    pub fn with_invalid_error(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.invalid_error = message.into();
        self
    }

    pub fn with_required_marker(mut self, marker: impl Into<Cow<'static, str>>) -> Self {
        self.required_marker = marker.into();
        self
    }

    pub fn with_title_case_labels(mut self, enabled: bool) -> Self {
        self.title_case_labels = enabled;
        self
    }

    pub fn with_style(mut self, style: FormStyle) -> Self {
        self.style = style;
        self
    }

    pub fn map_style(mut self, map: impl FnOnce(FormStyle) -> FormStyle) -> Self {
        self.style = map(self.style);
        self
    }

    pub(crate) fn label(&self, raw: &str) -> String {
        if self.title_case_labels {
            crate::form::to_title_case(raw)
        } else {
            raw.to_string()
        }
    }
}
