/*
 * references.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Second pass: replace figure references with rendered numbers.
 */

//! Second pass: replace figure references with rendered numbers.
//!
//! Runs after every figure has been registered, so a reference may appear
//! before the figure it names. A `Cite` is a figure reference when all of
//! its citation ids are `fig:` identifiers. A reference to an unknown
//! figure is left as it is and reported once per identifier.

use std::collections::HashSet;

use fignos_pandoc_types::{Cite, Inline, Inlines, Pandoc, Space};

use crate::Result;
use crate::context::ProcessingContext;
use crate::diagnostics;
use crate::registry::{FIGURE_ID_PATTERN, TargetEntry};
use crate::render::{RefModifier, ReferenceNames, render_group};
use crate::transform::AstTransform;
use crate::walk::walk_inlines;

pub struct ReferenceResolutionTransform;

impl ReferenceResolutionTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReferenceResolutionTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl AstTransform for ReferenceResolutionTransform {
    fn name(&self) -> &str {
        "resolve-references"
    }

    fn transform(&self, ast: &mut Pandoc, ctx: &mut ProcessingContext) -> Result<()> {
        let mut resolver = Resolver {
            names: ReferenceNames::from_config(&ctx.config),
            reported: HashSet::new(),
            ctx,
        };
        walk_inlines(&mut ast.blocks, &mut |inlines| resolver.resolve_inlines(inlines));
        Ok(())
    }
}

struct Resolver<'a> {
    ctx: &'a mut ProcessingContext,
    names: ReferenceNames,
    /// Unknown identifiers already reported this run
    reported: HashSet<String>,
}

impl Resolver<'_> {
    fn resolve_inlines(&mut self, inlines: &mut Inlines) {
        if !inlines.iter().any(is_figure_reference) {
            return;
        }

        let mut out: Inlines = Vec::with_capacity(inlines.len());
        let mut rest = std::mem::take(inlines).into_iter().peekable();
        while let Some(inline) = rest.next() {
            let mut cite = match inline {
                Inline::Cite(cite) if cite_is_figure_reference(&cite) => cite,
                other => {
                    out.push(other);
                    continue;
                }
            };

            if !self.all_known(&cite) {
                out.push(Inline::Cite(cite));
                continue;
            }

            let explicit = take_modifier(&mut cite, &mut out);
            let modifier = RefModifier::resolve(explicit, self.ctx.config.clever_reference_default);

            if let (Some(Inline::Str(before)), Some(Inline::Str(after))) =
                (out.last_mut(), rest.peek_mut())
                && before.text.ends_with('{')
                && after.text.starts_with('}')
            {
                before.text.pop();
                after.text.remove(0);
                if before.text.is_empty() {
                    out.pop();
                }
                if matches!(rest.peek(), Some(Inline::Str(s)) if s.text.is_empty()) {
                    rest.next();
                }
            }

            out.extend(self.render(cite, modifier));
        }
        *inlines = out;
    }

    /// Whether every id of `cite` is registered. Unknown ids are reported.
    fn all_known(&mut self, cite: &Cite) -> bool {
        let mut known = true;
        for citation in &cite.citations {
            if self.ctx.registry.contains(&citation.id) {
                continue;
            }
            known = false;
            if self.reported.insert(citation.id.clone()) {
                self.ctx
                    .diagnostics
                    .add(diagnostics::unresolved_reference(&citation.id));
            }
        }
        known
    }

    /// `prefix ++ rendered ++ suffix`
    fn render(&mut self, cite: Cite, modifier: RefModifier) -> Inlines {
        let entries: Vec<&TargetEntry> = cite
            .citations
            .iter()
            .filter_map(|c| self.ctx.registry.lookup(&c.id))
            .collect();
        let rendered = render_group(&entries, &self.ctx.format, modifier, &self.names);

        if self.ctx.format.is_tex() && modifier.is_clever() {
            self.ctx.flags.cleveref_required = true;
        }

        let mut citations = cite.citations.into_iter();
        let first = citations.next();
        let last = citations.next_back();

        let mut out = Vec::new();
        let (prefix, mut suffix) = match (first, last) {
            (Some(first), Some(last)) => (first.prefix, last.suffix),
            (Some(only), None) => (only.prefix, only.suffix),
            _ => (vec![], vec![]),
        };
        if !prefix.is_empty() {
            out.extend(prefix);
            out.push(Inline::Space(Space));
        }
        out.extend(rendered);
        out.append(&mut suffix);
        out
    }
}

fn is_figure_reference(inline: &Inline) -> bool {
    matches!(inline, Inline::Cite(cite) if cite_is_figure_reference(cite))
}

fn cite_is_figure_reference(cite: &Cite) -> bool {
    !cite.citations.is_empty()
        && cite
            .citations
            .iter()
            .all(|c| FIGURE_ID_PATTERN.is_match(&c.id))
}

/// Remove a modifier character written just before the reference, either
/// in the citation prefix (`[+@fig:a]`) or at the end of the preceding text
/// (`+@fig:a`). The prefix is checked first.
fn take_modifier(cite: &mut Cite, out: &mut Inlines) -> Option<RefModifier> {
    if let Some(first) = cite.citations.first_mut()
        && let Some(modifier) = pop_modifier(&mut first.prefix)
    {
        return Some(modifier);
    }
    pop_modifier(out)
}

fn pop_modifier(inlines: &mut Inlines) -> Option<RefModifier> {
    let Some(Inline::Str(s)) = inlines.last_mut() else {
        return None;
    };
    let modifier = s.text.chars().next_back().and_then(RefModifier::from_char)?;
    s.text.pop();
    if s.text.is_empty() {
        inlines.pop();
    }
    Some(modifier)
}
