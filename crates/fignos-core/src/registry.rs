/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Registry of numbered figures.
 */

//! Registry of numbered figures.
//!
//! The registry is filled while figures are numbered and read while
//! references are resolved. Entries keep document order; registering an
//! identifier again replaces its value in place.

use std::fmt;

use hashlink::LinkedHashMap;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::format::OutputFormat;

/// The identifier every figure label must match.
pub static FIGURE_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^fig:[\w/-]*$").unwrap());

/// Namespace prefix of figure identifiers.
pub const FIGURE_PREFIX: &str = "fig:";

/// Whether `id` is a figure identifier with an empty slug.
pub fn is_anonymous(id: &str) -> bool {
    id == FIGURE_PREFIX
}

/// What a reference to a figure displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TargetValue {
    /// Assigned by the figure counter, 1-based
    Ordinal(usize),
    /// Given by the author or computed as `<section>.<n>`
    Tag(String),
}

impl fmt::Display for TargetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetValue::Ordinal(n) => write!(f, "{}", n),
            TargetValue::Tag(tag) => write!(f, "{}", tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetEntry {
    pub identifier: String,
    pub value: TargetValue,
    /// Section number in effect when the figure was registered
    pub section: Option<String>,
    /// False when an earlier figure already used this identifier
    pub first_seen: bool,
    /// False for anonymous figures, whose identifier was synthesized
    pub referenceable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: IndexMap<String, TargetEntry>,
    current_section: Option<String>,
    counter: usize,
    number_by_section: bool,
}

impl Registry {
    pub fn new(number_by_section: bool) -> Self {
        Self {
            number_by_section,
            ..Self::default()
        }
    }

    pub fn number_by_section(&self) -> bool {
        self.number_by_section
    }

    pub fn current_section(&self) -> Option<&str> {
        self.current_section.as_deref()
    }

    /// Enter the section `name`. The counter restarts only when numbering
    /// by section.
    pub fn begin_section(&mut self, name: &str) {
        if self.current_section.as_deref() == Some(name) {
            return;
        }
        self.current_section = Some(name.to_string());
        if self.number_by_section {
            self.counter = 0;
        }
    }

    /// Assign a number or tag to a figure and record it.
    ///
    /// An explicit `tag` key-value never advances the counter. When numbering
    /// by section for a format that cannot do so itself, the number is
    /// rendered as a `<section>.<n>` tag. Anonymous identifiers (`fig:`)
    /// receive a unique slug and are marked unreferenceable.
    pub fn register(
        &mut self,
        identifier: &str,
        key_values: &LinkedHashMap<String, String>,
        format: &OutputFormat,
    ) -> TargetEntry {
        let (identifier, referenceable) = if is_anonymous(identifier) {
            (
                format!("{}{}", FIGURE_PREFIX, uuid::Uuid::new_v4()),
                false,
            )
        } else {
            (identifier.to_string(), true)
        };

        let value = if let Some(tag) = key_values.get("tag") {
            TargetValue::Tag(strip_matching_quotes(tag).to_string())
        } else if self.number_by_section && !format.has_native_section_numbering() {
            self.counter += 1;
            let section = self.current_section.as_deref().unwrap_or("0");
            TargetValue::Tag(format!("{}.{}", section, self.counter))
        } else {
            self.counter += 1;
            TargetValue::Ordinal(self.counter)
        };

        let entry = TargetEntry {
            first_seen: !self.entries.contains_key(&identifier),
            identifier: identifier.clone(),
            value,
            section: self.current_section.clone(),
            referenceable,
        };

        tracing::debug!(
            identifier = %entry.identifier,
            value = %entry.value,
            first_seen = entry.first_seen,
            "Registered figure"
        );

        // IndexMap::insert keeps the original position of an existing key.
        self.entries.insert(identifier, entry.clone());
        entry
    }

    pub fn lookup(&self, identifier: &str) -> Option<&TargetEntry> {
        self.entries.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetEntry> {
        self.entries.values()
    }

    /// Owned copy of all entries in document order.
    pub fn snapshot(&self) -> Vec<TargetEntry> {
        self.entries.values().cloned().collect()
    }
}

/// Remove one layer of matching `"` or `'` quotes.
fn strip_matching_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
