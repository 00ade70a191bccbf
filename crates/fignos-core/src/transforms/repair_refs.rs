/*
 * repair_refs.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Turn figure references the reader left as text back into citations.
 */

//! Turn figure references the reader left as text back into citations.
//!
//! Pandoc does not recognize a citation glued to surrounding punctuation,
//! as in `{+@fig:a}`, and reads `a+@fig:b` as an e-mail address. Both are
//! re-split here into text and proper `Cite` nodes so the resolution pass
//! sees every reference.

use fignos_pandoc_types::{
    Citation, CitationMode, Cite, Inline, Inlines, Link, Pandoc, Str, stringify,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::Result;
use crate::context::ProcessingContext;
use crate::transform::AstTransform;
use crate::walk::walk_inlines;

static TEXT_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(fig:[\w/-]+)").unwrap());

pub struct RepairReferencesTransform;

impl RepairReferencesTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RepairReferencesTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl AstTransform for RepairReferencesTransform {
    fn name(&self) -> &str {
        "repair-references"
    }

    fn transform(&self, ast: &mut Pandoc, _ctx: &mut ProcessingContext) -> Result<()> {
        walk_inlines(&mut ast.blocks, &mut repair_inlines);
        Ok(())
    }
}

fn repair_inlines(inlines: &mut Inlines) {
    if !inlines.iter().any(needs_repair) {
        return;
    }
    let mut out = Vec::with_capacity(inlines.len() + 2);
    for inline in std::mem::take(inlines) {
        match inline {
            Inline::Str(s) if has_text_reference(&s.text) => {
                out.extend(split_references(&s.text))
            }
            Inline::Link(link) if is_mailto_reference(&link) => {
                out.extend(split_references(&stringify(&link.content)))
            }
            other => out.push(other),
        }
    }
    *inlines = out;
}

fn needs_repair(inline: &Inline) -> bool {
    match inline {
        Inline::Str(s) => has_text_reference(&s.text),
        Inline::Link(link) => is_mailto_reference(link),
        _ => false,
    }
}

fn is_mailto_reference(link: &Link) -> bool {
    link.target.0.starts_with("mailto:") && has_text_reference(&stringify(&link.content))
}

fn has_text_reference(text: &str) -> bool {
    reference_spans(text).next().is_some()
}

/// Byte ranges and identifiers of the references in `text`. An `@` glued
/// to a preceding word character is an e-mail address, not a reference.
fn reference_spans(text: &str) -> impl Iterator<Item = (usize, usize, &str)> {
    TEXT_REFERENCE.captures_iter(text).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let glued = text[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if glued {
            return None;
        }
        Some((whole.start(), whole.end(), caps.get(1)?.as_str()))
    })
}

fn split_references(text: &str) -> Inlines {
    let mut out = Vec::new();
    let mut last = 0;
    for (start, end, id) in reference_spans(text) {
        if start > last {
            out.push(Inline::Str(Str::new(&text[last..start])));
        }
        out.push(make_cite(id));
        last = end;
    }
    if last < text.len() {
        out.push(Inline::Str(Str::new(&text[last..])));
    }
    out
}

fn make_cite(id: &str) -> Inline {
    Inline::Cite(Cite {
        citations: vec![Citation {
            id: id.to_string(),
            prefix: vec![],
            suffix: vec![],
            mode: CitationMode::AuthorInText,
            note_num: 0,
            hash: 0,
        }],
        content: vec![Inline::Str(Str::new(format!("@{}", id)))],
    })
}
