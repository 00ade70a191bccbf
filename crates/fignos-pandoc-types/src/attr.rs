/*
 * attr.rs
 * Copyright (c) 2025 Posit, PBC
 */

use hashlink::LinkedHashMap;

pub fn empty_attr() -> Attr {
    (String::new(), vec![], LinkedHashMap::new())
}

/// `(identifier, classes, key-value pairs)`, as in pandoc-types.
pub type Attr = (String, Vec<String>, LinkedHashMap<String, String>);

pub fn is_empty_attr(attr: &Attr) -> bool {
    attr.0.is_empty() && attr.1.is_empty() && attr.2.is_empty()
}
