//! Headless host document.
//!
//! Forms render into a [`Page`], a shared handle over a [`Document`] tree.
//! Embedders (or tests) drive it the way a browser user would: type into
//! inputs, tick boxes, pick options, and read back markup and error text.

mod html;
mod node;
mod selector;
mod validity;

use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

pub use node::{Document, NodeId, NodeKind};
pub use selector::{Selector, SelectorError};

/// Shared, single-threaded handle to a host document.
#[derive(Debug, Clone, Default)]
pub struct Page {
    document: Rc<RefCell<Document>>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: Document) -> Self {
        Self {
            document: Rc::new(RefCell::new(document)),
        }
    }

    /// Convenience for hosts: a page whose body holds one `<div>` per
    /// selector-like name (`#id` or `.class`).
    pub fn with_containers(names: &[&str]) -> Self {
        let mut document = Document::new();
        for name in names {
            let node = document.append_element(document.root(), "div");
            if let Some(id) = name.strip_prefix('#') {
                document.set_attribute(node, "id", id);
            } else {
                document.add_class(node, name.trim_start_matches('.'));
            }
        }
        Self::from_document(document)
    }

    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }

    pub fn html(&self) -> String {
        let document = self.document();
        document.outer_html(document.root())
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.document().focused()
    }
}
