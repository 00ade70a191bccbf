/*
 * pandoc.rs
 * Copyright (c) 2025 Posit, PBC
 */

pub use crate::block::Blocks;
pub use crate::meta::Meta;

/// The pandoc-types API version this tree mirrors.
pub const PANDOC_API_VERSION: [u32; 3] = [1, 23, 1];

/*
 * A data structure that mimics Pandoc's `data Pandoc` type.
 * The api version read from the input is kept so it can be echoed
 * back unchanged when the document is written.
 */

#[derive(Debug, Clone, PartialEq)]
pub struct Pandoc {
    pub api_version: Vec<u32>,
    pub meta: Meta,
    pub blocks: Blocks,
}

impl Default for Pandoc {
    fn default() -> Self {
        Pandoc {
            api_version: PANDOC_API_VERSION.to_vec(),
            meta: Meta::new(),
            blocks: Vec::new(),
        }
    }
}
