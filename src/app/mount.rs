use std::{rc::Rc, sync::Arc};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{
    dom::{NodeId, Page},
    form::{FieldControls, FieldOutcome, FieldState, SubmitResult, validate_field},
};

use super::{
    options::FormOptions,
    submit::{CallbackSlot, SubmitCoordinator, SubmitOutcome, SubmitPhase},
};

/// Keys the form reacts to. Everything else is left to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Tab,
    Escape,
}

/// One rendered copy of a form. Clones share the same copy; separate
/// `render` calls never share nodes or field state.
#[derive(Debug, Clone)]
pub struct MountedForm {
    inner: Rc<MountInner>,
}

#[derive(Debug)]
struct MountInner {
    page: Page,
    form: NodeId,
    submit_button: NodeId,
    fields: IndexMap<String, FieldState>,
    options: Arc<FormOptions>,
    callback: CallbackSlot,
    coordinator: SubmitCoordinator,
}

impl MountedForm {
    pub(crate) fn new(
        page: Page,
        form: NodeId,
        submit_button: NodeId,
        fields: IndexMap<String, FieldState>,
        options: Arc<FormOptions>,
        callback: CallbackSlot,
    ) -> Self {
        Self {
            inner: Rc::new(MountInner {
                page,
                form,
                submit_button,
                fields,
                options,
                callback,
                coordinator: SubmitCoordinator::default(),
            }),
        }
    }

    pub fn page(&self) -> &Page {
        &self.inner.page
    }

    pub fn form_node(&self) -> NodeId {
        self.inner.form
    }

    pub fn submit_button(&self) -> NodeId {
        self.inner.submit_button
    }

    pub fn html(&self) -> String {
        self.inner.page.document().outer_html(self.inner.form)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldState> {
        self.inner.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.inner.fields.get(name)
    }

    /// First interactive node of a field (the first option for radios).
    pub fn control(&self, name: &str) -> Option<NodeId> {
        self.field(name).and_then(FieldState::focus_target)
    }

    pub fn error_text(&self, name: &str) -> Option<String> {
        let field = self.field(name)?;
        Some(field.error_text(&self.inner.page.document()))
    }

    /// Enter a value the way a user would. See [`FieldState::fill`].
    pub fn fill(&self, name: &str, value: &str) -> bool {
        let Some(field) = self.field(name) else {
            return false;
        };
        field.fill(&mut self.inner.page.document_mut(), value)
    }

    pub fn set_checked(&self, name: &str, checked: bool) -> bool {
        match self.field(name).map(|field| &field.controls) {
            Some(FieldControls::Checkbox(node)) => {
                self.inner.page.document_mut().set_checked(*node, checked);
                true
            }
            _ => false,
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        self.inner.coordinator.phase()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase() == SubmitPhase::Submitting
    }

    /// Keystroke handler installed on every field control. Enter toggles a
    /// radio or checkbox and moves focus from a text input or select to the
    /// submit button. Returns whether the key was consumed.
    pub fn key_press(&self, node: NodeId, key: Key) -> bool {
        if key != Key::Enter {
            return false;
        }
        let Some(field) = self.fields().find(|field| field.owns(node)) else {
            return false;
        };
        let mut doc = self.inner.page.document_mut();
        match field.controls {
            FieldControls::Radio(_) | FieldControls::Checkbox(_) => {
                let checked = doc.is_checked(node);
                doc.set_checked(node, !checked);
            }
            FieldControls::Text(_) | FieldControls::Select(_) => {
                doc.focus(self.inner.submit_button)
            }
        }
        true
    }

    /// Run one submit attempt.
    ///
    /// Attempts made while another one is awaiting the completion callback
    /// return [`SubmitOutcome::Ignored`]. Otherwise every field is validated
    /// in declaration order; on failure focus moves to the first invalid
    /// field. When all pass, the submit button shows the loading label and
    /// stays disabled until the callback settles.
    pub async fn submit(&self) -> SubmitOutcome {
        let inner = &self.inner;
        if inner.coordinator.phase() == SubmitPhase::Submitting {
            debug!("submit ignored, previous attempt still in flight");
            return SubmitOutcome::Ignored;
        }

        let result = match inner.collect() {
            Ok(result) => result,
            Err(fields) => {
                debug!(invalid = ?fields, "submit rejected");
                return SubmitOutcome::Invalid { fields };
            }
        };

        let Some(callback) = inner.callback.get() else {
            debug!(fields = result.len(), "submit completed without a callback");
            return SubmitOutcome::Completed(result);
        };

        if !inner.coordinator.try_begin() {
            return SubmitOutcome::Ignored;
        }
        let busy = BusyGuard::engage(inner);
        debug!(fields = result.len(), "submitting");
        let settled = callback(result.clone()).await;
        drop(busy);

        match settled {
            Ok(()) => {
                debug!("submit completed");
                SubmitOutcome::Completed(result)
            }
            Err(error) => {
                warn!(error = %error, "submit callback failed");
                SubmitOutcome::Failed { result, error }
            }
        }
    }
}

impl MountInner {
    /// Validate every field and assemble the result, or focus the first
    /// invalid field and return the invalid names.
    fn collect(&self) -> Result<SubmitResult, Vec<String>> {
        let mut doc = self.page.document_mut();
        let mut result = SubmitResult::new();
        let mut invalid = Vec::new();
        let mut first_focus = None;
        for (name, field) in &self.fields {
            match validate_field(&mut doc, field, &self.options) {
                FieldOutcome::Valid(Some(value)) => result.insert(name.clone(), value),
                FieldOutcome::Valid(None) => {}
                FieldOutcome::Invalid { focus } => {
                    if invalid.is_empty() {
                        first_focus = focus;
                    }
                    invalid.push(name.clone());
                }
            }
        }
        if invalid.is_empty() {
            return Ok(result);
        }
        if let Some(node) = first_focus {
            doc.focus(node);
        }
        Err(invalid)
    }

    fn set_busy(&self, busy: bool) {
        let mut doc = self.page.document_mut();
        let label = if busy {
            self.options.loading_label.as_ref()
        } else {
            self.options.submit_label.as_ref()
        };
        doc.set_disabled(self.submit_button, busy);
        doc.set_text_content(self.submit_button, label);
    }
}

/// Holds the Submitting phase and the disabled button; both are restored on
/// drop, including when the submit future is dropped mid-flight.
struct BusyGuard<'a> {
    inner: &'a MountInner,
}

impl<'a> BusyGuard<'a> {
    fn engage(inner: &'a MountInner) -> Self {
        inner.set_busy(true);
        Self { inner }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.inner.set_busy(false);
        self.inner.coordinator.finish();
    }
}
