/*
 * caption.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::block::{Block, Blocks, Plain};
use crate::inline::Inlines;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Caption {
    pub short: Option<Inlines>,
    pub long: Blocks,
}

impl Caption {
    /// Mutable access to the inline content of the first Plain or Para of
    /// the long caption, creating an empty Plain when there is none.
    pub fn first_inlines_mut(&mut self) -> &mut Inlines {
        let position = self
            .long
            .iter()
            .position(|b| matches!(b, Block::Plain(_) | Block::Paragraph(_)));
        let index = match position {
            Some(index) => index,
            None => {
                self.long.insert(0, Block::Plain(Plain { content: vec![] }));
                0
            }
        };
        match &mut self.long[index] {
            Block::Plain(p) => &mut p.content,
            Block::Paragraph(p) => &mut p.content,
            _ => unreachable!("caption block at {index} was just checked to hold inlines"),
        }
    }
}
