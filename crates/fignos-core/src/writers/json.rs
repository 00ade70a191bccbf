/*
 * json.rs
 * Copyright (c) 2025 Posit, PBC
 */

use fignos_pandoc_types::{
    Alignment, Attr, Block, Caption, Cell, Citation, CitationMode, ColSpec, ColWidth, Inline,
    Inlines, ListAttributes, ListNumberDelim, ListNumberStyle, MathType, Meta, MetaValue, Pandoc,
    QuoteType, Row, TableBody, TableFoot, TableHead,
};
use serde_json::{Map, Value, json};

use crate::Result;

/// A `{"t": tag, "c": content}` node.
fn node(t: &str, c: Value) -> Value {
    json!({"t": t, "c": c})
}

/// A node without content, e.g. `Space`.
fn bare_node(t: &str) -> Value {
    json!({"t": t})
}

fn write_attr(attr: &Attr) -> Value {
    json!([
        attr.0, // id
        attr.1, // classes
        attr.2
            .iter()
            .map(|(k, v)| json!([k, v]))
            .collect::<Vec<_>>()  // key-value pairs
    ])
}

fn write_citation_mode(mode: &CitationMode) -> Value {
    match mode {
        CitationMode::NormalCitation => bare_node("NormalCitation"),
        CitationMode::AuthorInText => bare_node("AuthorInText"),
        CitationMode::SuppressAuthor => bare_node("SuppressAuthor"),
    }
}

fn write_citation(citation: &Citation) -> Value {
    json!({
        "citationId": citation.id,
        "citationPrefix": write_inlines(&citation.prefix),
        "citationSuffix": write_inlines(&citation.suffix),
        "citationMode": write_citation_mode(&citation.mode),
        "citationNoteNum": citation.note_num,
        "citationHash": citation.hash
    })
}

fn write_inline(inline: &Inline) -> Value {
    match inline {
        Inline::Str(s) => node("Str", json!(s.text)),
        Inline::Space(_) => bare_node("Space"),
        Inline::SoftBreak(_) => bare_node("SoftBreak"),
        Inline::LineBreak(_) => bare_node("LineBreak"),
        Inline::Emph(e) => node("Emph", write_inlines(&e.content)),
        Inline::Underline(u) => node("Underline", write_inlines(&u.content)),
        Inline::Strong(s) => node("Strong", write_inlines(&s.content)),
        Inline::Strikeout(s) => node("Strikeout", write_inlines(&s.content)),
        Inline::Superscript(s) => node("Superscript", write_inlines(&s.content)),
        Inline::Subscript(s) => node("Subscript", write_inlines(&s.content)),
        Inline::SmallCaps(s) => node("SmallCaps", write_inlines(&s.content)),
        Inline::Quoted(q) => {
            let quote_type = match q.quote_type {
                QuoteType::SingleQuote => bare_node("SingleQuote"),
                QuoteType::DoubleQuote => bare_node("DoubleQuote"),
            };
            node("Quoted", json!([quote_type, write_inlines(&q.content)]))
        }
        Inline::Cite(c) => node(
            "Cite",
            json!([
                c.citations.iter().map(write_citation).collect::<Vec<_>>(),
                write_inlines(&c.content)
            ]),
        ),
        Inline::Code(c) => node("Code", json!([write_attr(&c.attr), c.text])),
        Inline::Math(m) => {
            let math_type = match m.math_type {
                MathType::InlineMath => bare_node("InlineMath"),
                MathType::DisplayMath => bare_node("DisplayMath"),
            };
            node("Math", json!([math_type, m.text]))
        }
        Inline::RawInline(r) => node("RawInline", json!([r.format, r.text])),
        Inline::Link(l) => node(
            "Link",
            json!([
                write_attr(&l.attr),
                write_inlines(&l.content),
                [l.target.0, l.target.1]
            ]),
        ),
        Inline::Image(i) => node(
            "Image",
            json!([
                write_attr(&i.attr),
                write_inlines(&i.content),
                [i.target.0, i.target.1]
            ]),
        ),
        Inline::Note(n) => node("Note", write_blocks(&n.content)),
        Inline::Span(s) => node("Span", json!([write_attr(&s.attr), write_inlines(&s.content)])),
    }
}

fn write_inlines(inlines: &Inlines) -> Value {
    Value::Array(inlines.iter().map(write_inline).collect())
}

fn write_list_attributes(attr: &ListAttributes) -> Value {
    let style = match attr.1 {
        ListNumberStyle::Default => "DefaultStyle",
        ListNumberStyle::Example => "Example",
        ListNumberStyle::Decimal => "Decimal",
        ListNumberStyle::LowerRoman => "LowerRoman",
        ListNumberStyle::UpperRoman => "UpperRoman",
        ListNumberStyle::LowerAlpha => "LowerAlpha",
        ListNumberStyle::UpperAlpha => "UpperAlpha",
    };
    let delim = match attr.2 {
        ListNumberDelim::Default => "DefaultDelim",
        ListNumberDelim::Period => "Period",
        ListNumberDelim::OneParen => "OneParen",
        ListNumberDelim::TwoParens => "TwoParens",
    };
    json!([attr.0, bare_node(style), bare_node(delim)])
}

fn write_blockss(blockss: &[Vec<Block>]) -> Value {
    Value::Array(blockss.iter().map(|blocks| write_blocks(blocks)).collect())
}

fn write_caption(caption: &Caption) -> Value {
    json!([
        caption.short.as_ref().map(write_inlines),
        write_blocks(&caption.long)
    ])
}

fn write_alignment(alignment: &Alignment) -> Value {
    match alignment {
        Alignment::Left => bare_node("AlignLeft"),
        Alignment::Center => bare_node("AlignCenter"),
        Alignment::Right => bare_node("AlignRight"),
        Alignment::Default => bare_node("AlignDefault"),
    }
}

fn write_colwidth(colwidth: &ColWidth) -> Value {
    match colwidth {
        ColWidth::Default => bare_node("ColWidthDefault"),
        ColWidth::Percentage(p) => node("ColWidth", json!(p)),
    }
}

fn write_colspec(colspec: &ColSpec) -> Value {
    json!([write_alignment(&colspec.0), write_colwidth(&colspec.1)])
}

fn write_cell(cell: &Cell) -> Value {
    json!([
        write_attr(&cell.attr),
        write_alignment(&cell.alignment),
        cell.row_span,
        cell.col_span,
        write_blocks(&cell.content)
    ])
}

fn write_row(row: &Row) -> Value {
    json!([
        write_attr(&row.attr),
        row.cells.iter().map(write_cell).collect::<Vec<_>>()
    ])
}

fn write_rows(rows: &[Row]) -> Value {
    Value::Array(rows.iter().map(write_row).collect())
}

fn write_table_head(head: &TableHead) -> Value {
    json!([write_attr(&head.attr), write_rows(&head.rows)])
}

fn write_table_body(body: &TableBody) -> Value {
    json!([
        write_attr(&body.attr),
        body.rowhead_columns,
        write_rows(&body.head),
        write_rows(&body.body)
    ])
}

fn write_table_foot(foot: &TableFoot) -> Value {
    json!([write_attr(&foot.attr), write_rows(&foot.rows)])
}

fn write_block(block: &Block) -> Value {
    match block {
        Block::Plain(p) => node("Plain", write_inlines(&p.content)),
        Block::Paragraph(p) => node("Para", write_inlines(&p.content)),
        Block::LineBlock(l) => node(
            "LineBlock",
            Value::Array(l.content.iter().map(write_inlines).collect()),
        ),
        Block::CodeBlock(c) => node("CodeBlock", json!([write_attr(&c.attr), c.text])),
        Block::RawBlock(r) => node("RawBlock", json!([r.format, r.text])),
        Block::BlockQuote(b) => node("BlockQuote", write_blocks(&b.content)),
        Block::OrderedList(o) => node(
            "OrderedList",
            json!([write_list_attributes(&o.attr), write_blockss(&o.content)]),
        ),
        Block::BulletList(b) => node("BulletList", write_blockss(&b.content)),
        Block::DefinitionList(d) => node(
            "DefinitionList",
            Value::Array(
                d.content
                    .iter()
                    .map(|(term, defs)| json!([write_inlines(term), write_blockss(defs)]))
                    .collect(),
            ),
        ),
        Block::Header(h) => node(
            "Header",
            json!([h.level, write_attr(&h.attr), write_inlines(&h.content)]),
        ),
        Block::HorizontalRule(_) => bare_node("HorizontalRule"),
        Block::Table(t) => node(
            "Table",
            json!([
                write_attr(&t.attr),
                write_caption(&t.caption),
                t.colspec.iter().map(write_colspec).collect::<Vec<_>>(),
                write_table_head(&t.head),
                t.bodies.iter().map(write_table_body).collect::<Vec<_>>(),
                write_table_foot(&t.foot)
            ]),
        ),
        Block::Figure(f) => node(
            "Figure",
            json!([
                write_attr(&f.attr),
                write_caption(&f.caption),
                write_blocks(&f.content)
            ]),
        ),
        Block::Div(d) => node("Div", json!([write_attr(&d.attr), write_blocks(&d.content)])),
    }
}

fn write_blocks(blocks: &[Block]) -> Value {
    Value::Array(blocks.iter().map(write_block).collect())
}

fn write_meta_value(value: &MetaValue) -> Value {
    match value {
        MetaValue::MetaString(s) => node("MetaString", json!(s)),
        MetaValue::MetaBool(b) => node("MetaBool", json!(b)),
        MetaValue::MetaInlines(inlines) => node("MetaInlines", write_inlines(inlines)),
        MetaValue::MetaBlocks(blocks) => node("MetaBlocks", write_blocks(blocks)),
        MetaValue::MetaList(items) => node(
            "MetaList",
            Value::Array(items.iter().map(write_meta_value).collect()),
        ),
        MetaValue::MetaMap(entries) => node("MetaMap", write_meta(entries)),
    }
}

fn write_meta(meta: &Meta) -> Value {
    let mut map = Map::new();
    for (key, value) in meta {
        map.insert(key.clone(), write_meta_value(value));
    }
    Value::Object(map)
}

/// Build the JSON value of a whole document.
pub fn to_value(pandoc: &Pandoc) -> Value {
    json!({
        "pandoc-api-version": pandoc.api_version,
        "meta": write_meta(&pandoc.meta),
        "blocks": write_blocks(&pandoc.blocks)
    })
}

/// Write a pandoc document as JSON.
pub fn write<W: std::io::Write>(pandoc: &Pandoc, writer: &mut W) -> Result<()> {
    serde_json::to_writer(writer, &to_value(pandoc))?;
    Ok(())
}
