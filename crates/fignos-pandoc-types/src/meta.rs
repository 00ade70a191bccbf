/*
 * meta.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::block::{Block, Blocks};
use crate::inline::{Inlines, stringify};
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};

// Pandoc's MetaValue notably does not support numbers or nulls, so we don't either
// https://pandoc.org/lua-filters.html#type-metavalue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    MetaString(String),
    MetaBool(bool),
    MetaInlines(Inlines),
    MetaBlocks(Blocks),
    MetaList(Vec<MetaValue>),
    MetaMap(LinkedHashMap<String, MetaValue>),
}

impl Default for MetaValue {
    fn default() -> Self {
        MetaValue::MetaMap(LinkedHashMap::new())
    }
}

pub type Meta = LinkedHashMap<String, MetaValue>;

impl MetaValue {
    /// Text content of a scalar value.
    ///
    /// YAML strings reach a filter as MetaInlines (pandoc parses them as
    /// markdown), so inline and single-paragraph block content is flattened
    /// to plain text. Lists, maps and booleans have no text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            MetaValue::MetaString(s) => Some(s.clone()),
            MetaValue::MetaInlines(inlines) => Some(stringify(inlines)),
            MetaValue::MetaBlocks(blocks) => match blocks.as_slice() {
                [Block::Plain(p)] => Some(stringify(&p.content)),
                [Block::Paragraph(p)] => Some(stringify(&p.content)),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::MetaBool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MetaValue]> {
        match self {
            MetaValue::MetaList(items) => Some(items),
            _ => None,
        }
    }

    /// Get a value by key if this is a MetaMap
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        match self {
            MetaValue::MetaMap(entries) => entries.get(key),
            _ => None,
        }
    }
}
