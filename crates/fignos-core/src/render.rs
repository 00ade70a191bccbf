/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rendering of figure numbers for captions and references.
 */

//! Rendering of figure numbers for captions and references.
//!
//! Everything here is a pure function of a registry entry, the output
//! format and the configured names.

use fignos_pandoc_types::{
    Inline, Inlines, LineBreak, Link, Math, MathType, RawInline, Space, Str, empty_attr,
};

use crate::config::{FignosConfig, Separator};
use crate::format::{FormatFamily, OutputFormat};
use crate::registry::{TargetEntry, TargetValue};

/// Non-breaking space between a reference name and its number.
pub const NAME_SEPARATOR: char = '\u{a0}';

/// How a reference is worded, chosen by a character written before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefModifier {
    /// `!@fig:a`: the number alone
    Bare,
    /// `+@fig:a`: name for use mid-sentence, e.g. "fig. 1"
    Plain,
    /// `*@fig:a`: name for the start of a sentence, e.g. "Figure 1"
    Capitalized,
}

impl RefModifier {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '!' => Some(RefModifier::Bare),
            '+' => Some(RefModifier::Plain),
            '*' => Some(RefModifier::Capitalized),
            _ => None,
        }
    }

    /// An explicit modifier wins over the document-wide default.
    pub fn resolve(explicit: Option<Self>, clever_default: bool) -> Self {
        match explicit {
            Some(modifier) => modifier,
            None if clever_default => RefModifier::Plain,
            None => RefModifier::Bare,
        }
    }

    pub fn is_clever(self) -> bool {
        self != RefModifier::Bare
    }
}

/// `[singular, plural]` names for both clever reference forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceNames {
    pub plus: [String; 2],
    pub star: [String; 2],
}

impl ReferenceNames {
    pub fn from_config(config: &FignosConfig) -> Self {
        Self {
            plus: config.effective_plus_name(),
            star: config.star_name.clone(),
        }
    }

    fn name(&self, modifier: RefModifier, plural: bool) -> Option<&str> {
        let names = match modifier {
            RefModifier::Bare => return None,
            RefModifier::Plain => &self.plus,
            RefModifier::Capitalized => &self.star,
        };
        Some(&names[usize::from(plural)])
    }
}

impl Default for ReferenceNames {
    fn default() -> Self {
        Self::from_config(&FignosConfig::default())
    }
}

/// The displayed form of a number or tag.
///
/// A tag wrapped in `$...$` becomes inline math with its spaces escaped.
pub fn value_inlines(value: &TargetValue) -> Inlines {
    match value {
        TargetValue::Ordinal(n) => vec![Inline::Str(Str::new(n.to_string()))],
        TargetValue::Tag(tag) if is_math_tag(tag) => vec![Inline::Math(Math {
            math_type: MathType::InlineMath,
            text: tag[1..tag.len() - 1].replace(' ', r"\ "),
        })],
        TargetValue::Tag(tag) => vec![Inline::Str(Str::new(tag.clone()))],
    }
}

fn is_math_tag(tag: &str) -> bool {
    tag.len() >= 2 && tag.starts_with('$') && tag.ends_with('$')
}

/// The lead-in placed before a caption in formats that do not number
/// figures themselves, e.g. `Figure 1: `.
pub fn caption_prefix(
    value: &TargetValue,
    format: &OutputFormat,
    config: &FignosConfig,
) -> Inlines {
    let mut label = vec![
        Inline::Str(Str::new(config.caption_name.clone())),
        Inline::Space(Space),
    ];
    label.extend(value_inlines(value));
    append_text(&mut label, config.separator.punctuation());

    let mut out = if format.is_web() {
        let mut wrapped = vec![Inline::RawInline(RawInline::new("html", "<span>"))];
        wrapped.extend(label);
        wrapped.push(Inline::RawInline(RawInline::new("html", "</span>")));
        wrapped
    } else {
        label
    };

    match config.separator {
        Separator::None => {}
        Separator::Colon | Separator::Period | Separator::Space => {
            out.push(Inline::Space(Space));
        }
        Separator::Quad => out.push(Inline::Str(Str::new("\u{2000}"))),
        Separator::Newline => out.push(Inline::LineBreak(LineBreak)),
    }
    out
}

/// Render a reference to one figure.
pub fn render(
    entry: &TargetEntry,
    format: &OutputFormat,
    modifier: RefModifier,
    names: &ReferenceNames,
) -> Inlines {
    render_group(&[entry], format, modifier, names)
}

/// Render a reference to one or more figures, e.g. "figs. 1, 2 and 3".
///
/// TeX output defers to `\ref`, or to cleveref's `\cref`/`\Cref` for the
/// named forms. Web output links every number to its figure.
pub fn render_group(
    entries: &[&TargetEntry],
    format: &OutputFormat,
    modifier: RefModifier,
    names: &ReferenceNames,
) -> Inlines {
    if entries.is_empty() {
        return vec![];
    }

    if format.is_tex() {
        let ids: Vec<&str> = entries.iter().map(|e| e.identifier.as_str()).collect();
        return match modifier {
            RefModifier::Bare => join_series(
                ids.iter()
                    .map(|id| vec![raw_tex(format!("\\ref{{{}}}", id))])
                    .collect(),
            ),
            RefModifier::Plain => vec![raw_tex(format!("\\cref{{{}}}", ids.join(",")))],
            RefModifier::Capitalized => vec![raw_tex(format!("\\Cref{{{}}}", ids.join(",")))],
        };
    }

    let mut parts: Vec<Inlines> = entries.iter().map(|e| value_inlines(&e.value)).collect();
    if let Some(name) = names.name(modifier, entries.len() > 1) {
        prepend_name(&mut parts[0], name);
    }

    if format.family() == FormatFamily::Web {
        parts = parts
            .into_iter()
            .zip(entries)
            .map(|(content, entry)| {
                vec![Inline::Link(Link {
                    attr: empty_attr(),
                    content,
                    target: (format!("#{}", entry.identifier), String::new()),
                })]
            })
            .collect();
    }

    join_series(parts)
}

fn raw_tex(text: String) -> Inline {
    Inline::RawInline(RawInline::new("tex", text))
}

/// Put `name` and a non-breaking space in front of a rendered value,
/// merging into its first text run when there is one.
fn prepend_name(value: &mut Inlines, name: &str) {
    match value.first_mut() {
        Some(Inline::Str(s)) => s.text = format!("{}{}{}", name, NAME_SEPARATOR, s.text),
        _ => value.insert(0, Inline::Str(Str::new(format!("{}{}", name, NAME_SEPARATOR)))),
    }
}

/// Append punctuation to the last text run, or as a new run.
fn append_text(inlines: &mut Inlines, text: &str) {
    if text.is_empty() {
        return;
    }
    match inlines.last_mut() {
        Some(Inline::Str(s)) => s.text.push_str(text),
        _ => inlines.push(Inline::Str(Str::new(text))),
    }
}

/// Join rendered items as "a", "a and b" or "a, b and c".
fn join_series(parts: Vec<Inlines>) -> Inlines {
    let count = parts.len();
    let mut out = Vec::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 && i + 1 < count {
            append_text(&mut out, ",");
            out.push(Inline::Space(Space));
        } else if i > 0 {
            out.push(Inline::Space(Space));
            out.push(Inline::Str(Str::new("and")));
            out.push(Inline::Space(Space));
        }
        out.extend(part);
    }
    out
}
