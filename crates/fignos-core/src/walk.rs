/*
 * walk.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Generic traversal helpers shared by the transforms.
 */

//! Generic traversal helpers shared by the transforms.
//!
//! The `for_each_*` functions visit the lists directly nested in one node;
//! transforms recurse through them with their own per-node logic.
//! [`walk_inlines`] visits every inline list of a block sequence, innermost
//! lists first, so a callback that rewrites a list never sees its own output.

use fignos_pandoc_types::{
    Block, Blocks, Cite, Emph, Image, Inline, Inlines, Link, Quoted, SmallCaps, Span, Strikeout,
    Strong, Subscript, Superscript, Underline,
};

/// Visit every block list nested in `block`, including the content of
/// footnotes found in its inline text.
pub fn for_each_child_blocks(block: &mut Block, f: &mut dyn FnMut(&mut Blocks)) {
    match block {
        Block::BlockQuote(quote) => f(&mut quote.content),
        Block::OrderedList(list) => list.content.iter_mut().for_each(|item| f(item)),
        Block::BulletList(list) => list.content.iter_mut().for_each(|item| f(item)),
        Block::DefinitionList(list) => {
            for (_, definitions) in &mut list.content {
                definitions.iter_mut().for_each(|d| f(d));
            }
        }
        Block::Div(div) => f(&mut div.content),
        Block::Figure(figure) => {
            f(&mut figure.caption.long);
            f(&mut figure.content);
        }
        Block::Table(table) => {
            f(&mut table.caption.long);
            for row in table.rows_mut() {
                for cell in &mut row.cells {
                    f(&mut cell.content);
                }
            }
        }
        _ => {}
    }
    for_each_block_inlines(block, &mut |inlines| for_each_note_blocks(inlines, f));
}

/// Visit every inline list held directly by `block`.
pub fn for_each_block_inlines(block: &mut Block, f: &mut dyn FnMut(&mut Inlines)) {
    match block {
        Block::Plain(plain) => f(&mut plain.content),
        Block::Paragraph(para) => f(&mut para.content),
        Block::Header(header) => f(&mut header.content),
        Block::LineBlock(lines) => lines.content.iter_mut().for_each(|line| f(line)),
        Block::DefinitionList(list) => {
            for (term, _) in &mut list.content {
                f(term);
            }
        }
        Block::Figure(figure) => {
            if let Some(short) = &mut figure.caption.short {
                f(short);
            }
        }
        Block::Table(table) => {
            if let Some(short) = &mut table.caption.short {
                f(short);
            }
        }
        _ => {}
    }
}

/// Visit every inline list nested directly in `inline`.
pub fn for_each_child_inlines(inline: &mut Inline, f: &mut dyn FnMut(&mut Inlines)) {
    match inline {
        Inline::Emph(Emph { content })
        | Inline::Underline(Underline { content })
        | Inline::Strong(Strong { content })
        | Inline::Strikeout(Strikeout { content })
        | Inline::Superscript(Superscript { content })
        | Inline::Subscript(Subscript { content })
        | Inline::SmallCaps(SmallCaps { content })
        | Inline::Quoted(Quoted { content, .. })
        | Inline::Span(Span { content, .. })
        | Inline::Link(Link { content, .. })
        | Inline::Image(Image { content, .. }) => f(content),
        Inline::Cite(Cite { citations, content }) => {
            for citation in citations {
                f(&mut citation.prefix);
                f(&mut citation.suffix);
            }
            f(content);
        }
        _ => {}
    }
}

/// Visit the block content of every footnote in `inlines`, at any depth.
fn for_each_note_blocks(inlines: &mut Inlines, f: &mut dyn FnMut(&mut Blocks)) {
    for inline in inlines.iter_mut() {
        match inline {
            Inline::Note(note) => f(&mut note.content),
            other => for_each_child_inlines(other, &mut |children| {
                for_each_note_blocks(children, f)
            }),
        }
    }
}

/// Visit every inline list in `blocks`, children before their parents.
pub fn walk_inlines(blocks: &mut Blocks, f: &mut dyn FnMut(&mut Inlines)) {
    for block in blocks.iter_mut() {
        for_each_child_blocks(block, &mut |children| walk_inlines(children, f));
        for_each_block_inlines(block, &mut |inlines| walk_inline_list(inlines, f));
    }
}

fn walk_inline_list(inlines: &mut Inlines, f: &mut dyn FnMut(&mut Inlines)) {
    for inline in inlines.iter_mut() {
        for_each_child_inlines(inline, &mut |children| walk_inline_list(children, f));
    }
    f(inlines);
}
