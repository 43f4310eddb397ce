use std::sync::LazyLock;

use regex::Regex;

use super::node::{Document, NodeId};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$")
        .expect("email pattern compiles")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:\S+$").expect("url pattern compiles")
});

impl Document {
    /// Constraint validity of a control's current value, as a browser would
    /// report through `checkValidity()` for the supported constraints:
    /// `type` (email, number, url), `pattern`, `minlength`, `maxlength`.
    /// Empty values satisfy everything except `required`.
    pub fn check_validity(&self, node: NodeId) -> bool {
        let value = self.value(node);
        if value.is_empty() {
            return !self.has_attribute(node, "required");
        }

        let type_ok = match self.input_type(node).as_str() {
            "email" => EMAIL.is_match(&value),
            "url" => URL.is_match(&value),
            "number" | "range" => value.trim().parse::<f64>().is_ok_and(f64::is_finite),
            _ => true,
        };
        if !type_ok {
            return false;
        }

        let length = value.chars().count();
        if let Some(min) = self.numeric_attribute(node, "minlength") {
            if length < min {
                return false;
            }
        }
        if let Some(max) = self.numeric_attribute(node, "maxlength") {
            if length > max {
                return false;
            }
        }

        match self.attribute(node, "pattern") {
            // An uncompilable pattern is ignored, matching browser behaviour.
            Some(pattern) => Regex::new(&format!("^(?:{pattern})$"))
                .map(|regex| regex.is_match(&value))
                .unwrap_or(true),
            None => true,
        }
    }

    fn numeric_attribute(&self, node: NodeId, name: &str) -> Option<usize> {
        self.attribute(node, name)
            .and_then(|raw| raw.trim().parse::<usize>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(doc: &mut Document, attrs: &[(&str, &str)], value: &str) -> NodeId {
        let node = doc.create_element_with("input", attrs.iter().copied());
        doc.set_value(node, value);
        node
    }

    #[test]
    fn type_constraints() {
        let mut doc = Document::new();
        let email = input(&mut doc, &[("type", "email")], "someone@example.org");
        assert!(doc.check_validity(email));
        doc.set_value(email, "not an email");
        assert!(!doc.check_validity(email));

        let number = input(&mut doc, &[("type", "number")], "12.5");
        assert!(doc.check_validity(number));
        doc.set_value(number, "twelve");
        assert!(!doc.check_validity(number));

        let plain = input(&mut doc, &[], "anything");
        assert!(doc.check_validity(plain));
    }

    #[test]
    fn pattern_and_length_constraints() {
        let mut doc = Document::new();
        let zip = input(&mut doc, &[("pattern", "[0-9]{5}"), ("maxlength", "5")], "12345");
        assert!(doc.check_validity(zip));
        doc.set_value(zip, "123456");
        assert!(!doc.check_validity(zip), "pattern is anchored");
        let short = input(&mut doc, &[("minlength", "3")], "ab");
        assert!(!doc.check_validity(short));
        doc.set_value(short, "");
        assert!(doc.check_validity(short), "empty values skip constraints");
    }
}
