/*
 * figure.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * A uniform view over the block shapes pandoc uses for figures.
 */

//! A uniform view over the block shapes pandoc uses for figures.
//!
//! Pandoc 3 emits a `Figure` block. Older readers, and documents whose
//! attributes were attached after the fact, use an *implicit figure*: a
//! paragraph holding a single image whose title starts with `fig:`.
//! [`FigureBlock`] lets the transforms read and edit both the same way.

use fignos_pandoc_types::{
    Attr, Block, Blocks, Figure, Image, Inline, Inlines, Paragraph, Plain, empty_attr,
};

/// Image title prefix pandoc uses to mark an implicit figure.
pub const IMPLICIT_FIGURE_TITLE: &str = "fig:";

/// Class added to every figure the filter has numbered.
pub const PROCESSED_CLASS: &str = "fignos-processed";

#[derive(Debug)]
pub enum FigureBlock<'a> {
    Native(&'a mut Figure),
    Implicit(&'a mut Image),
}

impl<'a> FigureBlock<'a> {
    /// View `block` as a figure, if it is one.
    pub fn from_block(block: &'a mut Block) -> Option<Self> {
        match block {
            Block::Figure(figure) => Some(FigureBlock::Native(figure)),
            Block::Paragraph(Paragraph { content }) | Block::Plain(Plain { content }) => {
                match content.as_mut_slice() {
                    [Inline::Image(image)] if image.target.1.starts_with(IMPLICIT_FIGURE_TITLE) => {
                        Some(FigureBlock::Implicit(image))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// The figure's attributes, merged with those of the image inside a
    /// native figure. The figure's identifier and key-values win.
    pub fn attr(&self) -> Attr {
        match self {
            FigureBlock::Implicit(image) => image.attr.clone(),
            FigureBlock::Native(figure) => {
                let Some(image) = sole_image(&figure.content) else {
                    return figure.attr.clone();
                };
                let mut merged = empty_attr();
                merged.0 = if figure.attr.0.is_empty() {
                    image.attr.0.clone()
                } else {
                    figure.attr.0.clone()
                };
                for class in figure.attr.1.iter().chain(&image.attr.1) {
                    if !merged.1.contains(class) {
                        merged.1.push(class.clone());
                    }
                }
                for (key, value) in image.attr.2.iter().chain(&figure.attr.2) {
                    merged.2.remove(key);
                    merged.2.insert(key.clone(), value.clone());
                }
                merged
            }
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr().1.iter().any(|c| c == class)
    }

    fn own_attr_mut(&mut self) -> &mut Attr {
        match self {
            FigureBlock::Native(figure) => &mut figure.attr,
            FigureBlock::Implicit(image) => &mut image.attr,
        }
    }

    pub fn add_class(&mut self, class: &str) {
        let attr = self.own_attr_mut();
        if !attr.1.iter().any(|c| c == class) {
            attr.1.push(class.to_string());
        }
    }

    /// Replace the identifier everywhere it is stored.
    pub fn set_identifier(&mut self, identifier: &str) {
        if let FigureBlock::Native(figure) = self
            && let Some(image) = sole_image_mut(&mut figure.content)
        {
            image.attr.0.clear();
        }
        self.own_attr_mut().0 = identifier.to_string();
    }

    pub fn insert_key_value(&mut self, key: &str, value: String) {
        let kvs = &mut self.own_attr_mut().2;
        kvs.remove(key);
        kvs.insert(key.to_string(), value);
    }

    /// Remove a key-value from the figure and the image inside it.
    pub fn remove_key_value(&mut self, key: &str) -> bool {
        let mut removed = self.own_attr_mut().2.remove(key).is_some();
        if let FigureBlock::Native(figure) = self
            && let Some(image) = sole_image_mut(&mut figure.content)
        {
            removed |= image.attr.2.remove(key).is_some();
        }
        removed
    }

    /// The inline text of the caption, created when missing.
    pub fn caption_inlines(&mut self) -> &mut Inlines {
        match self {
            FigureBlock::Native(figure) => figure.caption.first_inlines_mut(),
            FigureBlock::Implicit(image) => &mut image.content,
        }
    }
}

fn sole_image(blocks: &Blocks) -> Option<&Image> {
    match blocks.as_slice() {
        [Block::Plain(Plain { content }) | Block::Paragraph(Paragraph { content })] => {
            match content.as_slice() {
                [Inline::Image(image)] => Some(image),
                _ => None,
            }
        }
        _ => None,
    }
}

fn sole_image_mut(blocks: &mut Blocks) -> Option<&mut Image> {
    match blocks.as_mut_slice() {
        [Block::Plain(Plain { content }) | Block::Paragraph(Paragraph { content })] => {
            match content.as_mut_slice() {
                [Inline::Image(image)] => Some(image),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fignos_pandoc_types::{Caption, Str};
    use hashlink::LinkedHashMap;

    fn make_image(id: &str, title: &str) -> Image {
        Image {
            attr: (id.to_string(), vec![], LinkedHashMap::new()),
            content: vec![Inline::Str(Str::new("alt"))],
            target: ("plot.png".to_string(), title.to_string()),
        }
    }

    fn make_native(figure_id: &str, image: Image) -> Block {
        Block::Figure(Figure {
            attr: (figure_id.to_string(), vec![], LinkedHashMap::new()),
            caption: Caption::default(),
            content: vec![Block::Plain(Plain {
                content: vec![Inline::Image(image)],
            })],
        })
    }

    #[test]
    fn test_implicit_figure_requires_fig_title() {
        let mut figure = Block::Paragraph(Paragraph {
            content: vec![Inline::Image(make_image("fig:a", "fig:"))],
        });
        assert!(FigureBlock::from_block(&mut figure).is_some());

        let mut inline_image = Block::Paragraph(Paragraph {
            content: vec![Inline::Image(make_image("fig:a", ""))],
        });
        assert!(FigureBlock::from_block(&mut inline_image).is_none());
    }

    #[test]
    fn test_native_identifier_falls_back_to_image() {
        let mut block = make_native("", make_image("fig:inner", ""));
        let view = FigureBlock::from_block(&mut block).unwrap();
        assert_eq!(view.attr().0, "fig:inner");

        let mut block = make_native("fig:outer", make_image("fig:inner", ""));
        let view = FigureBlock::from_block(&mut block).unwrap();
        assert_eq!(view.attr().0, "fig:outer");
    }

    #[test]
    fn test_merged_key_values_prefer_figure() {
        let mut image = make_image("", "");
        image.attr.2.insert("tag".to_string(), "B".to_string());
        image.attr.2.insert("width".to_string(), "50%".to_string());
        let mut block = make_native("fig:a", image);
        if let Block::Figure(figure) = &mut block {
            figure.attr.2.insert("tag".to_string(), "A".to_string());
        }

        let view = FigureBlock::from_block(&mut block).unwrap();
        let attr = view.attr();
        assert_eq!(attr.2.get("tag").map(String::as_str), Some("A"));
        assert_eq!(attr.2.get("width").map(String::as_str), Some("50%"));
    }

    #[test]
    fn test_set_identifier_clears_inner_image() {
        let mut block = make_native("", make_image("fig:inner", ""));
        let mut view = FigureBlock::from_block(&mut block).unwrap();
        view.set_identifier("");
        assert_eq!(view.attr().0, "");
    }

    #[test]
    fn test_remove_key_value_from_both() {
        let mut image = make_image("", "");
        image.attr.2.insert("secno".to_string(), "1".to_string());
        let mut block = make_native("fig:a", image);
        let mut view = FigureBlock::from_block(&mut block).unwrap();
        view.insert_key_value("secno", "1".to_string());

        assert!(view.remove_key_value("secno"));
        assert!(!view.attr().2.contains_key("secno"));
        assert!(!view.remove_key_value("secno"));
    }

    #[test]
    fn test_caption_inlines_of_implicit_figure_is_alt_text() {
        let mut block = Block::Plain(Plain {
            content: vec![Inline::Image(make_image("fig:a", "fig:"))],
        });
        let mut view = FigureBlock::from_block(&mut block).unwrap();
        view.caption_inlines().push(Inline::Str(Str::new("!")));
        assert_eq!(view.caption_inlines().len(), 2);
    }
}
