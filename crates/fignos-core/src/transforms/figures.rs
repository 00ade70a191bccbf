/*
 * figures.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * First pass: number figures and rewrite their captions.
 */

//! First pass: number figures and rewrite their captions.
//!
//! Every figure with a `fig:` identifier is registered in document order.
//! Formats that number figures themselves (TeX) get a `\label` and, where
//! needed, a wrapping environment; every other format gets the number
//! written into the caption as text.
//!
//! Figures are marked with [`PROCESSED_CLASS`] once handled and skipped on
//! later runs, so running the filter twice changes nothing.

use fignos_pandoc_types::{Block, Blocks, Inline, Pandoc, RawBlock, RawInline};

use crate::Result;
use crate::context::ProcessingContext;
use crate::diagnostics;
use crate::figure::{FigureBlock, PROCESSED_CLASS};
use crate::registry::{FIGURE_ID_PATTERN, TargetValue};
use crate::render::caption_prefix;
use crate::transform::AstTransform;
use crate::walk::for_each_child_blocks;

/// Raw blocks placed around a figure.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Wrapper {
    /// `\begin{name}[argument]` ... `\end{name}`
    TexEnvironment {
        name: &'static str,
        argument: Option<String>,
    },
    /// A Word bookmark so references can link to the figure.
    DocxBookmark { name: String },
}

impl Wrapper {
    fn environment(name: &'static str, argument: Option<String>) -> Self {
        Wrapper::TexEnvironment { name, argument }
    }

    fn open(&self) -> Block {
        match self {
            Wrapper::TexEnvironment { name, argument } => {
                let argument = argument
                    .as_ref()
                    .map(|a| format!("[{}]", a))
                    .unwrap_or_default();
                Block::RawBlock(RawBlock::new(
                    "tex",
                    format!("\\begin{{{}}}{}", name, argument),
                ))
            }
            Wrapper::DocxBookmark { name } => Block::RawBlock(RawBlock::new(
                "openxml",
                format!("<w:bookmarkStart w:id=\"0\" w:name=\"{}\"/>", name),
            )),
        }
    }

    fn close(&self) -> Block {
        match self {
            Wrapper::TexEnvironment { name, .. } => {
                Block::RawBlock(RawBlock::new("tex", format!("\\end{{{}}}", name)))
            }
            Wrapper::DocxBookmark { .. } => {
                Block::RawBlock(RawBlock::new("openxml", "<w:bookmarkEnd w:id=\"0\"/>"))
            }
        }
    }
}

/// Number figures, rewrite captions and fill the registry.
pub struct FigureNumberingTransform;

impl FigureNumberingTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FigureNumberingTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl AstTransform for FigureNumberingTransform {
    fn name(&self) -> &str {
        "figure-numbering"
    }

    fn transform(&self, ast: &mut Pandoc, ctx: &mut ProcessingContext) -> Result<()> {
        process_blocks(&mut ast.blocks, ctx);
        tracing::debug!(figures = ctx.registry.len(), "Numbered figures");
        Ok(())
    }
}

fn process_blocks(blocks: &mut Blocks, ctx: &mut ProcessingContext) {
    let mut out = Vec::with_capacity(blocks.len());
    for mut block in std::mem::take(blocks) {
        let Some(wrapper) =
            FigureBlock::from_block(&mut block).map(|mut figure| number_figure(&mut figure, ctx))
        else {
            for_each_child_blocks(&mut block, &mut |children| process_blocks(children, ctx));
            out.push(block);
            continue;
        };

        // Subfigures
        if let Block::Figure(figure) = &mut block {
            process_blocks(&mut figure.content, ctx);
        }

        match wrapper {
            Some(wrapper) => {
                out.push(wrapper.open());
                out.push(block);
                out.push(wrapper.close());
            }
            None => out.push(block),
        }
    }
    *blocks = out;
}

/// Number one figure. Returns the raw blocks to place around it, if any.
fn number_figure(figure: &mut FigureBlock<'_>, ctx: &mut ProcessingContext) -> Option<Wrapper> {
    if figure.has_class(PROCESSED_CLASS) {
        return None;
    }

    let attr = figure.attr();
    if !FIGURE_ID_PATTERN.is_match(&attr.0) {
        return unnumbered_figure(figure, ctx);
    }

    if let Some(section) = attr.2.get("secno") {
        ctx.registry.begin_section(section);
    }
    let entry = ctx.registry.register(&attr.0, &attr.2, &ctx.format);
    if !entry.first_seen {
        ctx.diagnostics
            .add(diagnostics::duplicate_identifier(&entry.identifier));
    }

    if ctx.format.is_tex() {
        if entry.referenceable {
            figure.caption_inlines().push(Inline::RawInline(RawInline::new(
                "tex",
                format!("\\protect\\label{{{}}}", entry.identifier),
            )));
        }
    } else {
        let prefix = caption_prefix(&entry.value, &ctx.format, &ctx.config);
        figure.caption_inlines().splice(0..0, prefix);
    }
    figure.add_class(PROCESSED_CLASS);

    if ctx.format.is_tex() {
        figure.set_identifier("");
        if let Some(env) = attr.2.get("env") {
            ctx.flags.replaced_figure_env = true;
            return Some(Wrapper::environment(
                "fignos:figure-env",
                Some(env.clone()),
            ));
        }
        if let TargetValue::Tag(tag) = &entry.value {
            ctx.flags.has_tagged_figures = true;
            return Some(Wrapper::environment(
                "fignos:tagged-figure",
                Some(tag.clone()),
            ));
        }
        return None;
    }

    if !entry.referenceable {
        figure.set_identifier("");
    } else if ctx.format.is_docx() {
        return Some(Wrapper::DocxBookmark {
            name: entry.identifier,
        });
    }
    None
}

/// A figure without a usable identifier is neither numbered nor
/// referenceable. TeX must be told not to number it.
fn unnumbered_figure(
    figure: &mut FigureBlock<'_>,
    ctx: &mut ProcessingContext,
) -> Option<Wrapper> {
    ctx.flags.has_unnumbered_figures = true;
    if !ctx.format.is_tex() {
        return None;
    }
    figure.add_class(PROCESSED_CLASS);
    Some(Wrapper::environment("fignos:no-prefix-figure-caption", None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FignosConfig;
    use crate::format::OutputFormat;
    use fignos_pandoc_types::{
        Caption, Div, Figure, Header, Image, Paragraph, Plain, Str, empty_attr, stringify,
    };
    use hashlink::LinkedHashMap;

    fn make_figure(id: &str, kvs: &[(&str, &str)], caption: &str) -> Block {
        let mut attrs = LinkedHashMap::new();
        for (k, v) in kvs {
            attrs.insert(k.to_string(), v.to_string());
        }
        Block::Figure(Figure {
            attr: (id.to_string(), vec![], attrs),
            caption: Caption {
                short: None,
                long: vec![Block::Plain(Plain {
                    content: vec![Inline::Str(Str::new(caption))],
                })],
            },
            content: vec![Block::Plain(Plain {
                content: vec![Inline::Image(Image {
                    attr: empty_attr(),
                    content: vec![],
                    target: ("img.png".to_string(), String::new()),
                })],
            })],
        })
    }

    fn run(blocks: Blocks, format: &str) -> (Pandoc, ProcessingContext) {
        let mut doc = Pandoc {
            blocks,
            ..Pandoc::default()
        };
        let mut ctx = ProcessingContext::new(OutputFormat::new(format), FignosConfig::default());
        FigureNumberingTransform::new()
            .transform(&mut doc, &mut ctx)
            .unwrap();
        (doc, ctx)
    }

    fn caption_text(block: &Block) -> String {
        match block {
            Block::Figure(figure) => match figure.caption.long.first() {
                Some(Block::Plain(p)) => stringify(&p.content),
                _ => String::new(),
            },
            _ => panic!("expected a figure, got {:?}", block),
        }
    }

    fn raw_text(block: &Block) -> &str {
        match block {
            Block::RawBlock(raw) => &raw.text,
            _ => panic!("expected a raw block, got {:?}", block),
        }
    }

    #[test]
    fn test_numbers_in_document_order() {
        let (doc, ctx) = run(
            vec![
                make_figure("fig:a", &[], "A."),
                make_figure("fig:b", &[], "B."),
            ],
            "plain",
        );
        assert_eq!(ctx.registry.lookup("fig:a").unwrap().value, TargetValue::Ordinal(1));
        assert_eq!(ctx.registry.lookup("fig:b").unwrap().value, TargetValue::Ordinal(2));
        assert_eq!(caption_text(&doc.blocks[1]), "Figure 2: B.");
    }

    #[test]
    fn test_figures_inside_containers_are_found() {
        let (_, ctx) = run(
            vec![Block::Div(Div {
                attr: empty_attr(),
                content: vec![make_figure("fig:nested", &[], "N.")],
            })],
            "html",
        );
        assert!(ctx.registry.contains("fig:nested"));
    }

    #[test]
    fn test_subfigures_are_numbered_after_their_parent() {
        let mut outer = make_figure("fig:outer", &[], "Both.");
        if let Block::Figure(figure) = &mut outer {
            figure.content = vec![
                make_figure("fig:sub1", &[], "One."),
                make_figure("fig:sub2", &[], "Two."),
            ];
        }
        let (doc, ctx) = run(vec![outer], "plain");

        assert_eq!(ctx.registry.lookup("fig:outer").unwrap().value, TargetValue::Ordinal(1));
        assert_eq!(ctx.registry.lookup("fig:sub2").unwrap().value, TargetValue::Ordinal(3));
        let Block::Figure(figure) = &doc.blocks[0] else {
            panic!("expected a figure");
        };
        assert_eq!(caption_text(&figure.content[0]), "Figure 2: One.");
    }

    #[test]
    fn test_tex_labels_and_clears_identifier() {
        let (doc, _) = run(vec![make_figure("fig:a", &[], "A.")], "latex");
        let Block::Figure(figure) = &doc.blocks[0] else {
            panic!("expected a figure");
        };
        assert_eq!(figure.attr.0, "");
        let Some(Block::Plain(caption)) = figure.caption.long.first() else {
            panic!("expected a plain caption");
        };
        assert_eq!(
            caption.content.last(),
            Some(&Inline::RawInline(RawInline::new("tex", "\\protect\\label{fig:a}")))
        );
    }

    #[test]
    fn test_tex_tagged_figure_is_wrapped() {
        let (doc, ctx) = run(vec![make_figure("fig:a", &[("tag", "B.1")], "A.")], "latex");
        assert_eq!(doc.blocks.len(), 3);
        assert_eq!(raw_text(&doc.blocks[0]), "\\begin{fignos:tagged-figure}[B.1]");
        assert_eq!(raw_text(&doc.blocks[2]), "\\end{fignos:tagged-figure}");
        assert!(ctx.flags.has_tagged_figures);
    }

    #[test]
    fn test_tex_env_wins_over_tag() {
        let (doc, ctx) = run(
            vec![make_figure("fig:a", &[("tag", "B.1"), ("env", "figure*")], "A.")],
            "latex",
        );
        assert_eq!(raw_text(&doc.blocks[0]), "\\begin{fignos:figure-env}[figure*]");
        assert!(ctx.flags.replaced_figure_env);
        assert!(!ctx.flags.has_tagged_figures);
    }

    #[test]
    fn test_unnumbered_figure_in_tex() {
        let (doc, ctx) = run(vec![make_figure("", &[], "Plain.")], "latex");
        assert_eq!(
            raw_text(&doc.blocks[0]),
            "\\begin{fignos:no-prefix-figure-caption}"
        );
        assert!(ctx.flags.has_unnumbered_figures);
        assert!(ctx.registry.is_empty());
    }

    #[test]
    fn test_non_figure_identifier_passes_through() {
        let (doc, ctx) = run(vec![make_figure("logo", &[], "Logo.")], "html");
        assert_eq!(caption_text(&doc.blocks[0]), "Logo.");
        assert!(ctx.flags.has_unnumbered_figures);
        assert!(ctx.registry.is_empty());
    }

    #[test]
    fn test_anonymous_figure_is_numbered_but_not_referenceable() {
        let (doc, ctx) = run(vec![make_figure("fig:", &[], "Anon.")], "html");
        let Block::Figure(figure) = &doc.blocks[0] else {
            panic!("expected a figure");
        };
        assert_eq!(figure.attr.0, "");
        let entry = ctx.registry.iter().next().unwrap();
        assert!(!entry.referenceable);
        assert_eq!(entry.value, TargetValue::Ordinal(1));
    }

    #[test]
    fn test_duplicate_identifier_is_reported_and_last_wins() {
        let (_, ctx) = run(
            vec![
                make_figure("fig:a", &[], "First."),
                make_figure("fig:a", &[("tag", "X")], "Second."),
            ],
            "plain",
        );
        assert_eq!(ctx.diagnostics.count_code("F-1-3"), 1);
        assert_eq!(ctx.registry.len(), 1);
        assert_eq!(
            ctx.registry.lookup("fig:a").unwrap().value,
            TargetValue::Tag("X".to_string())
        );
    }

    #[test]
    fn test_docx_referenceable_figure_gets_bookmark() {
        let (doc, _) = run(vec![make_figure("fig:a", &[], "A.")], "docx");
        assert_eq!(
            raw_text(&doc.blocks[0]),
            "<w:bookmarkStart w:id=\"0\" w:name=\"fig:a\"/>"
        );
        assert_eq!(raw_text(&doc.blocks[2]), "<w:bookmarkEnd w:id=\"0\"/>");
    }

    #[test]
    fn test_processed_figures_are_skipped() {
        let (mut doc, _) = run(vec![make_figure("fig:a", &[], "A.")], "plain");
        let mut ctx = ProcessingContext::new(OutputFormat::new("plain"), FignosConfig::default());
        FigureNumberingTransform::new()
            .transform(&mut doc, &mut ctx)
            .unwrap();
        assert!(ctx.registry.is_empty());
        assert_eq!(caption_text(&doc.blocks[0]), "Figure 1: A.");
    }

    #[test]
    fn test_implicit_figure_caption_is_alt_text() {
        let block = Block::Paragraph(Paragraph {
            content: vec![Inline::Image(Image {
                attr: ("fig:a".to_string(), vec![], LinkedHashMap::new()),
                content: vec![Inline::Str(Str::new("Alt."))],
                target: ("img.png".to_string(), "fig:".to_string()),
            })],
        });
        let (doc, _) = run(
            vec![
                Block::Header(Header {
                    level: 1,
                    attr: empty_attr(),
                    content: vec![],
                }),
                block,
            ],
            "plain",
        );
        let Block::Paragraph(para) = &doc.blocks[1] else {
            panic!("expected a paragraph");
        };
        assert_eq!(stringify(&para.content), "Figure 1: Alt.");
    }
}
