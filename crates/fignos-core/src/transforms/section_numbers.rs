/*
 * section_numbers.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Record the enclosing section number on each figure.
 */

//! Record the enclosing section number on each figure.
//!
//! [`SectionNumbersTransform`] writes a temporary `secno` key-value onto
//! every attributed figure so the numbering pass knows which top-level
//! section it sits in. [`RemoveSectionNumbersTransform`] deletes the key
//! again before output.

use fignos_pandoc_types::{Block, Blocks, Pandoc, is_empty_attr};

use crate::Result;
use crate::context::ProcessingContext;
use crate::figure::{FigureBlock, PROCESSED_CLASS};
use crate::transform::AstTransform;
use crate::walk::for_each_child_blocks;

/// Key-value carrying a figure's section number between passes.
pub const SECTION_NUMBER_KEY: &str = "secno";

pub struct SectionNumbersTransform;

impl SectionNumbersTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SectionNumbersTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl AstTransform for SectionNumbersTransform {
    fn name(&self) -> &str {
        "section-numbers"
    }

    fn transform(&self, ast: &mut Pandoc, ctx: &mut ProcessingContext) -> Result<()> {
        let mut sections = 0;
        insert_section_numbers(
            &mut ast.blocks,
            &mut sections,
            ctx.config.section_number_offset,
        );
        Ok(())
    }
}

/// Counts level-1 headers that pandoc would number.
fn insert_section_numbers(blocks: &mut Blocks, sections: &mut i64, offset: i64) {
    for block in blocks.iter_mut() {
        if let Block::Header(header) = block {
            if header.level == 1 && !header.attr.1.iter().any(|c| c == "unnumbered") {
                *sections += 1;
            }
            continue;
        }

        if let Some(mut figure) = FigureBlock::from_block(block) {
            if !is_empty_attr(&figure.attr()) && !figure.has_class(PROCESSED_CLASS) {
                figure.insert_key_value(SECTION_NUMBER_KEY, (*sections + offset).to_string());
            }
            if let Block::Figure(native) = block {
                insert_section_numbers(&mut native.content, sections, offset);
            }
            continue;
        }

        for_each_child_blocks(block, &mut |children| {
            insert_section_numbers(children, sections, offset)
        });
    }
}

pub struct RemoveSectionNumbersTransform;

impl RemoveSectionNumbersTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RemoveSectionNumbersTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl AstTransform for RemoveSectionNumbersTransform {
    fn name(&self) -> &str {
        "remove-section-numbers"
    }

    fn transform(&self, ast: &mut Pandoc, _ctx: &mut ProcessingContext) -> Result<()> {
        remove_section_numbers(&mut ast.blocks);
        Ok(())
    }
}

fn remove_section_numbers(blocks: &mut Blocks) {
    for block in blocks.iter_mut() {
        if let Some(mut figure) = FigureBlock::from_block(block) {
            figure.remove_key_value(SECTION_NUMBER_KEY);
            if let Block::Figure(native) = block {
                remove_section_numbers(&mut native.content);
            }
            continue;
        }
        for_each_child_blocks(block, &mut |children| remove_section_numbers(children));
    }
}
