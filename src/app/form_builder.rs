use std::{future::Future, sync::Arc};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::{
    dom::{Document, NodeId, Page},
    domain::{FieldSpec, FormSpec, ValidatorRegistry, parse_form_spec},
    form::{ConfigurationError, FieldFactory, FieldState, RenderError, SubmitResult},
};

use super::{mount::MountedForm, options::FormOptions, submit::CallbackSlot};

/// Validated form description, ready to be rendered any number of times.
#[derive(Debug)]
pub struct FormBuilder {
    title: String,
    description: Option<String>,
    fields: Vec<Arc<FieldSpec>>,
    options: Arc<FormOptions>,
    callback: CallbackSlot,
}

impl FormBuilder {
    /// Check `spec` and keep it for rendering. Nothing is built when the
    /// spec is rejected.
    pub fn new(spec: FormSpec) -> Result<Self, ConfigurationError> {
        spec.validate()?;
        let FormSpec {
            title,
            description,
            fields,
        } = spec;
        Ok(Self {
            title,
            description,
            fields: fields.into_iter().map(Arc::new).collect(),
            options: Arc::new(FormOptions::default()),
            callback: CallbackSlot::default(),
        })
    }

    /// Build from a spec document (see [`crate::form_spec_schema`]).
    pub fn from_document(
        document: &Value,
        registry: &ValidatorRegistry,
    ) -> Result<Self, ConfigurationError> {
        Self::new(parse_form_spec(document, registry)?)
    }

    pub fn with_options(mut self, options: FormOptions) -> Self {
        self.options = Arc::new(options);
        self
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn field_specs(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().map(Arc::as_ref)
    }

    /// Register the completion callback. The most recent registration is the
    /// one every mounted copy calls, including copies rendered earlier.
    pub fn on_submit<F, Fut>(&self, callback: F)
    where
        F: Fn(SubmitResult) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        self.callback.set(callback);
    }

    /// Synchronous flavour of [`FormBuilder::on_submit`].
    pub fn on_submit_sync<F>(&self, callback: F)
    where
        F: Fn(SubmitResult) + 'static,
    {
        self.callback.set(move |result| {
            callback(result);
            std::future::ready(Ok::<(), anyhow::Error>(()))
        });
    }

    /// Append a fresh copy of the form to the first element matching
    /// `selector`. Fails without touching the page when nothing matches.
    pub fn render(&self, page: &Page, selector: &str) -> Result<MountedForm, RenderError> {
        let mut doc = page.document_mut();
        let container = doc
            .query_selector(selector)?
            .ok_or_else(|| RenderError::ContainerNotFound {
                selector: selector.to_string(),
            })?;

        let (form, submit_button, fields) = self.build(&mut doc);
        doc.append_child(container, form);
        drop(doc);

        debug!(selector, title = %self.title, fields = fields.len(), "form mounted");
        Ok(MountedForm::new(
            page.clone(),
            form,
            submit_button,
            fields,
            Arc::clone(&self.options),
            self.callback.clone(),
        ))
    }

    /// Markup of a freshly built copy, without mounting it anywhere.
    pub fn to_html(&self) -> String {
        let mut doc = Document::new();
        let (form, _, _) = self.build(&mut doc);
        doc.outer_html(form)
    }

    fn build(&self, doc: &mut Document) -> (NodeId, NodeId, IndexMap<String, FieldState>) {
        let options = self.options.as_ref();
        let form = doc.create_element("form");
        doc.add_class(form, &options.style.form);

        let fieldset = doc.append_element(form, "fieldset");
        let legend = doc.append_element(fieldset, "legend");
        doc.append_text(legend, options.label(&self.title));
        if let Some(description) = &self.description {
            let paragraph = doc.append_element(fieldset, "p");
            doc.append_text(paragraph, description.as_str());
        }

        let factory = FieldFactory::new(options);
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for spec in &self.fields {
            let (node, state) = factory.create(doc, Arc::clone(spec));
            doc.append_child(fieldset, node);
            fields.insert(spec.name.clone(), state);
        }

        let submit_button = doc.create_element_with("button", [("type", "submit")]);
        doc.append_text(submit_button, options.submit_label.as_ref());
        doc.append_child(fieldset, submit_button);

        (form, submit_button, fields)
    }
}
