use thiserror::Error;

use super::node::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("unexpected character '{found}' in selector '{selector}'")]
    Unexpected { selector: String, found: char },
}

/// One compound selector such as `div#app.wide`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|wanted| wanted != tag) {
            return false;
        }
        if let Some(id) = &self.id
            && doc.attribute(node, "id") != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|class| doc.has_class(node, class))
    }
}

/// Subset of CSS selectors: type, `#id`, `.class`, `*`, compounds of those,
/// and the descendant combinator (whitespace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        let mut parts = Vec::new();
        for chunk in raw.split_whitespace() {
            parts.push(parse_compound(raw, chunk)?);
        }
        if parts.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { parts })
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some((last, rest)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(doc, node) {
            return false;
        }
        // Match the remaining compounds right-to-left against the ancestor chain.
        let mut pending = rest.iter().rev().peekable();
        for ancestor in doc.ancestors(node) {
            match pending.peek() {
                Some(compound) if compound.matches(doc, ancestor) => {
                    pending.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        pending.peek().is_none()
    }
}

fn parse_compound(selector: &str, chunk: &str) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let mut chars = chunk.chars().peekable();
    let unexpected = |found: char| SelectorError::Unexpected {
        selector: selector.to_string(),
        found,
    };

    if chars.peek() == Some(&'*') {
        chars.next();
    } else {
        let tag = take_ident(&mut chars);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    while let Some(marker) = chars.next() {
        let ident = take_ident(&mut chars);
        if ident.is_empty() {
            return Err(unexpected(marker));
        }
        match marker {
            '#' => compound.id = Some(ident),
            '.' => compound.classes.push(ident),
            other => return Err(unexpected(other)),
        }
    }
    Ok(compound)
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&ch) = chars.peek() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            ident.push(ch);
            chars.next();
        } else {
            break;
        }
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let main = doc.create_element_with("main", [("id", "app")]);
        doc.append_child(doc.root(), main);
        let slot = doc.create_element_with("div", [("class", "google-form wide")]);
        doc.append_child(main, slot);
        (doc, main, slot)
    }

    #[test]
    fn matches_class_id_and_descendants() {
        let (doc, main, slot) = page();
        assert_eq!(doc.query_selector(".google-form").unwrap(), Some(slot));
        assert_eq!(doc.query_selector("#app").unwrap(), Some(main));
        assert_eq!(doc.query_selector("main#app div.wide").unwrap(), Some(slot));
        assert_eq!(doc.query_selector("body .google-form").unwrap(), Some(slot));
        assert_eq!(doc.query_selector("section .google-form").unwrap(), None);
    }

    #[test]
    fn rejects_unsupported_syntax() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("div > p"),
            Err(SelectorError::Unexpected { found: '>', .. })
        ));
        assert!(Selector::parse("input[type=radio]").is_err());
    }
}
