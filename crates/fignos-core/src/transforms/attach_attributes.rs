/*
 * attach_attributes.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Attach attribute text written after an image to the image itself.
 */

//! Attach attribute text written after an image to the image itself.
//!
//! When the reader leaves `![Caption](plot.png){#fig:plot}` as an image
//! followed by the text `{#fig:plot}`, this transform parses the text, moves
//! the attributes onto the image and turns the paragraph into an implicit
//! figure.

use fignos_pandoc_types::{Attr, Block, Blocks, Inline, Pandoc, Paragraph, QuoteType};

use crate::Result;
use crate::attributes::parse_attributes;
use crate::context::ProcessingContext;
use crate::diagnostics;
use crate::figure::IMPLICIT_FIGURE_TITLE;
use crate::transform::AstTransform;
use crate::walk::for_each_child_blocks;

pub struct AttachAttributesTransform;

impl AttachAttributesTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AttachAttributesTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl AstTransform for AttachAttributesTransform {
    fn name(&self) -> &str {
        "attach-attributes"
    }

    fn transform(&self, ast: &mut Pandoc, ctx: &mut ProcessingContext) -> Result<()> {
        process_blocks(&mut ast.blocks, ctx);
        Ok(())
    }
}

fn process_blocks(blocks: &mut Blocks, ctx: &mut ProcessingContext) {
    for block in blocks.iter_mut() {
        if let Block::Paragraph(para) = block {
            attach(para, ctx);
        }
        for_each_child_blocks(block, &mut |children| process_blocks(children, ctx));
    }
}

fn attach(para: &mut Paragraph, ctx: &mut ProcessingContext) {
    let Some((Inline::Image(_), rest)) = para.content.split_first() else {
        return;
    };
    let Some(text) = attribute_text(rest) else {
        return;
    };
    let text = text.trim();
    if !(text.starts_with('{') && text.ends_with('}')) {
        return;
    }

    let attr = match parse_attributes(text) {
        Ok(attr) => attr,
        Err(err) => {
            ctx.diagnostics
                .add(diagnostics::malformed_attributes(text, &err));
            return;
        }
    };

    para.content.truncate(1);
    let Some(Inline::Image(image)) = para.content.first_mut() else {
        return;
    };
    if !image.target.1.starts_with(IMPLICIT_FIGURE_TITLE) {
        image.target.1.insert_str(0, IMPLICIT_FIGURE_TITLE);
    }
    merge_attr(&mut image.attr, attr);
}

/// The source text of a run of inlines, or `None` when it holds anything
/// other than plain text.
fn attribute_text(inlines: &[Inline]) -> Option<String> {
    let mut text = String::new();
    for inline in inlines {
        match inline {
            Inline::Str(s) => text.push_str(&s.text),
            Inline::Space(_) | Inline::SoftBreak(_) => text.push(' '),
            Inline::Quoted(quoted) => {
                let quote = match quoted.quote_type {
                    QuoteType::SingleQuote => '\'',
                    QuoteType::DoubleQuote => '"',
                };
                text.push(quote);
                text.push_str(&attribute_text(&quoted.content)?);
                text.push(quote);
            }
            _ => return None,
        }
    }
    Some(text)
}

fn merge_attr(target: &mut Attr, parsed: Attr) {
    let (id, classes, key_values) = parsed;
    if !id.is_empty() {
        target.0 = id;
    }
    for class in classes {
        if !target.1.contains(&class) {
            target.1.push(class);
        }
    }
    for (key, value) in key_values {
        target.2.remove(&key);
        target.2.insert(key, value);
    }
}
