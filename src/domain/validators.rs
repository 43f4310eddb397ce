use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use regex::Regex;

use super::schema::{FieldPredicate, PredicateFn};

static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Z][a-z]{1,29}\s?)+$").expect("name pattern compiles")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$").expect("email pattern compiles")
});

/// A whole number of years strictly between 0 and 120. Surrounding
/// whitespace is tolerated. Exponent notation ("4e1" is 40) and unsigned
/// `0x`/`0b`/`0o` integer literals ("0x1A" is 26) are accepted.
pub fn is_age_valid(age: &str) -> bool {
    let age = age.trim();
    let years = match radix_literal(age) {
        Some(parsed) => parsed.map(|years| years as f64),
        None => age.parse::<f64>().ok(),
    };
    years.is_some_and(|years| {
        years.is_finite() && years.fract() == 0.0 && years > 0.0 && years < 120.0
    })
}

/// `None` when `text` has no radix prefix, otherwise the parsed digits.
fn radix_literal(text: &str) -> Option<Option<u64>> {
    let prefix = text.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0b" => 2,
        "0o" => 8,
        _ => return None,
    };
    let digits = &text[2..];
    // `from_str_radix` would accept a leading sign.
    if digits.starts_with(['+', '-']) {
        return Some(None);
    }
    Some(u64::from_str_radix(digits, radix).ok())
}

/// One or more capitalised words of 2-30 ASCII letters ("Ada Lovelace").
pub fn is_name_valid(name: &str) -> bool {
    NAME.is_match(name)
}

pub fn is_email_valid(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Named predicates that spec documents can refer to by string.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    entries: IndexMap<String, Arc<PredicateFn>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `age`, `name` and `email`.
    pub fn builtin() -> Self {
        Self::new()
            .with("age", is_age_valid)
            .with("name", is_name_valid)
            .with("email", is_email_valid)
    }

    pub fn with(
        mut self,
        name: impl Into<String>,
        check: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.register(name, check);
        self
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        check: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) {
        self.entries.insert(name.into(), Arc::new(check));
    }

    pub fn get(&self, name: &str) -> Option<FieldPredicate> {
        self.entries
            .get(name)
            .map(|check| FieldPredicate::from_shared(name, Arc::clone(check)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}
