/*
 * json.rs
 * Copyright (c) 2025 Posit, PBC
 */

use fignos_pandoc_types::{
    Alignment, Attr, Block, BlockQuote, BulletList, Caption, Cell, Citation, CitationMode, Cite,
    Code, CodeBlock, ColSpec, ColWidth, DefinitionList, Div, Emph, Figure, Header, HorizontalRule,
    Image, Inline, Inlines, LineBlock, LineBreak, Link, ListAttributes, ListNumberDelim,
    ListNumberStyle, Math, MathType, Meta, MetaValue, Note, OrderedList, Pandoc, Paragraph, Plain,
    QuoteType, Quoted, RawBlock, RawInline, Row, SmallCaps, SoftBreak, Space, Span, Str,
    Strikeout, Strong, Subscript, Superscript, Table, TableBody, TableFoot, TableHead, Underline,
};
use hashlink::LinkedHashMap;
use serde_json::{Map, Value};

#[derive(Debug)]
pub enum JsonReadError {
    InvalidJson(serde_json::Error),
    MissingField(String),
    InvalidType(String),
    UnsupportedVariant(String),
}

impl std::fmt::Display for JsonReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonReadError::InvalidJson(e) => write!(f, "Invalid JSON: {}", e),
            JsonReadError::MissingField(field) => write!(f, "Missing required field: {}", field),
            JsonReadError::InvalidType(msg) => write!(f, "Invalid type: {}", msg),
            JsonReadError::UnsupportedVariant(variant) => {
                write!(f, "Unsupported variant: {}", variant)
            }
        }
    }
}

impl std::error::Error for JsonReadError {}

type Result<T> = std::result::Result<T, JsonReadError>;

fn invalid(msg: &str) -> JsonReadError {
    JsonReadError::InvalidType(msg.to_string())
}

/// The `"t"` tag of a node object.
fn node_tag<'a>(obj: &'a Map<String, Value>) -> Result<&'a str> {
    obj.get("t")
        .and_then(|v| v.as_str())
        .ok_or_else(|| JsonReadError::MissingField("t".to_string()))
}

/// The `"c"` payload of a node object.
fn node_content(obj: &Map<String, Value>) -> Result<&Value> {
    obj.get("c")
        .ok_or_else(|| JsonReadError::MissingField("c".to_string()))
}

fn field<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    obj.get(name)
        .ok_or_else(|| JsonReadError::MissingField(name.to_string()))
}

/// A payload array that must have exactly `len` elements.
fn fixed_array<'a>(value: &'a Value, len: usize, what: &str) -> Result<&'a Vec<Value>> {
    let arr = value
        .as_array()
        .ok_or_else(|| invalid(&format!("{} content must be array", what)))?;
    if arr.len() != len {
        return Err(invalid(&format!(
            "{} array must have {} elements",
            what, len
        )));
    }
    Ok(arr)
}

fn read_string(value: &Value, what: &str) -> Result<String> {
    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| invalid(&format!("{} must be string", what)))
}

fn read_usize(value: &Value, what: &str) -> Result<usize> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| invalid(&format!("{} must be a non-negative integer", what)))
}

fn read_attr(value: &Value) -> Result<Attr> {
    let arr = fixed_array(value, 3, "Attr")?;

    let id = read_string(&arr[0], "Attr id")?;

    let classes = arr[1]
        .as_array()
        .ok_or_else(|| invalid("Attr classes must be array"))?
        .iter()
        .map(|v| read_string(v, "Class"))
        .collect::<Result<Vec<_>>>()?;

    let mut kvs = LinkedHashMap::new();
    for pair in arr[2]
        .as_array()
        .ok_or_else(|| invalid("Attr key-values must be array"))?
    {
        let kv_arr = fixed_array(pair, 2, "Key-value pair")?;
        let key = read_string(&kv_arr[0], "Key")?;
        let value = read_string(&kv_arr[1], "Value")?;
        kvs.insert(key, value);
    }

    Ok((id, classes, kvs))
}

fn read_target(value: &Value) -> Result<(String, String)> {
    let arr = fixed_array(value, 2, "Target")?;
    Ok((
        read_string(&arr[0], "Target url")?,
        read_string(&arr[1], "Target title")?,
    ))
}

fn read_citation_mode(value: &Value) -> Result<CitationMode> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("Expected object for CitationMode"))?;
    match node_tag(obj)? {
        "NormalCitation" => Ok(CitationMode::NormalCitation),
        "AuthorInText" => Ok(CitationMode::AuthorInText),
        "SuppressAuthor" => Ok(CitationMode::SuppressAuthor),
        t => Err(JsonReadError::UnsupportedVariant(format!(
            "CitationMode: {}",
            t
        ))),
    }
}

fn read_citation(value: &Value) -> Result<Citation> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("Citation must be object"))?;
    Ok(Citation {
        id: read_string(field(obj, "citationId")?, "citationId")?,
        prefix: read_inlines(field(obj, "citationPrefix")?)?,
        suffix: read_inlines(field(obj, "citationSuffix")?)?,
        mode: read_citation_mode(field(obj, "citationMode")?)?,
        note_num: read_usize(field(obj, "citationNoteNum")?, "citationNoteNum")?,
        hash: read_usize(field(obj, "citationHash")?, "citationHash")?,
    })
}

fn read_inline(value: &Value) -> Result<Inline> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("Expected object for Inline"))?;
    let t = node_tag(obj)?;

    match t {
        "Str" => Ok(Inline::Str(Str {
            text: read_string(node_content(obj)?, "Str content")?,
        })),
        "Space" => Ok(Inline::Space(Space)),
        "SoftBreak" => Ok(Inline::SoftBreak(SoftBreak)),
        "LineBreak" => Ok(Inline::LineBreak(LineBreak)),
        "Emph" => Ok(Inline::Emph(Emph {
            content: read_inlines(node_content(obj)?)?,
        })),
        "Underline" => Ok(Inline::Underline(Underline {
            content: read_inlines(node_content(obj)?)?,
        })),
        "Strong" => Ok(Inline::Strong(Strong {
            content: read_inlines(node_content(obj)?)?,
        })),
        "Strikeout" => Ok(Inline::Strikeout(Strikeout {
            content: read_inlines(node_content(obj)?)?,
        })),
        "Superscript" => Ok(Inline::Superscript(Superscript {
            content: read_inlines(node_content(obj)?)?,
        })),
        "Subscript" => Ok(Inline::Subscript(Subscript {
            content: read_inlines(node_content(obj)?)?,
        })),
        "SmallCaps" => Ok(Inline::SmallCaps(SmallCaps {
            content: read_inlines(node_content(obj)?)?,
        })),
        "Quoted" => {
            let arr = fixed_array(node_content(obj)?, 2, "Quoted")?;
            let quote_obj = arr[0]
                .as_object()
                .ok_or_else(|| invalid("Quoted type must be object"))?;
            let quote_type = match node_tag(quote_obj)? {
                "SingleQuote" => QuoteType::SingleQuote,
                "DoubleQuote" => QuoteType::DoubleQuote,
                other => {
                    return Err(JsonReadError::UnsupportedVariant(format!(
                        "QuoteType: {}",
                        other
                    )));
                }
            };
            Ok(Inline::Quoted(Quoted {
                quote_type,
                content: read_inlines(&arr[1])?,
            }))
        }
        "Cite" => {
            let arr = fixed_array(node_content(obj)?, 2, "Cite")?;
            let citations = arr[0]
                .as_array()
                .ok_or_else(|| invalid("Citations must be array"))?
                .iter()
                .map(read_citation)
                .collect::<Result<Vec<_>>>()?;
            Ok(Inline::Cite(Cite {
                citations,
                content: read_inlines(&arr[1])?,
            }))
        }
        "Code" => {
            let arr = fixed_array(node_content(obj)?, 2, "Code")?;
            Ok(Inline::Code(Code {
                attr: read_attr(&arr[0])?,
                text: read_string(&arr[1], "Code text")?,
            }))
        }
        "Math" => {
            let arr = fixed_array(node_content(obj)?, 2, "Math")?;
            let math_obj = arr[0]
                .as_object()
                .ok_or_else(|| invalid("Math type must be object"))?;
            let math_type = match node_tag(math_obj)? {
                "InlineMath" => MathType::InlineMath,
                "DisplayMath" => MathType::DisplayMath,
                other => {
                    return Err(JsonReadError::UnsupportedVariant(format!(
                        "MathType: {}",
                        other
                    )));
                }
            };
            Ok(Inline::Math(Math {
                math_type,
                text: read_string(&arr[1], "Math text")?,
            }))
        }
        "RawInline" => {
            let arr = fixed_array(node_content(obj)?, 2, "RawInline")?;
            Ok(Inline::RawInline(RawInline {
                format: read_string(&arr[0], "RawInline format")?,
                text: read_string(&arr[1], "RawInline text")?,
            }))
        }
        "Link" => {
            let arr = fixed_array(node_content(obj)?, 3, "Link")?;
            Ok(Inline::Link(Link {
                attr: read_attr(&arr[0])?,
                content: read_inlines(&arr[1])?,
                target: read_target(&arr[2])?,
            }))
        }
        "Image" => {
            let arr = fixed_array(node_content(obj)?, 3, "Image")?;
            Ok(Inline::Image(Image {
                attr: read_attr(&arr[0])?,
                content: read_inlines(&arr[1])?,
                target: read_target(&arr[2])?,
            }))
        }
        "Note" => Ok(Inline::Note(Note {
            content: read_blocks(node_content(obj)?)?,
        })),
        "Span" => {
            let arr = fixed_array(node_content(obj)?, 2, "Span")?;
            Ok(Inline::Span(Span {
                attr: read_attr(&arr[0])?,
                content: read_inlines(&arr[1])?,
            }))
        }
        _ => Err(JsonReadError::UnsupportedVariant(format!("Inline: {}", t))),
    }
}

fn read_inlines(value: &Value) -> Result<Inlines> {
    value
        .as_array()
        .ok_or_else(|| invalid("Expected array for Inlines"))?
        .iter()
        .map(read_inline)
        .collect()
}

/// Read a pandoc document from JSON.
///
/// Any node that does not have the shape pandoc-types gives it is an error;
/// the filter never guesses at a malformed tree.
pub fn read<R: std::io::Read>(reader: &mut R) -> Result<Pandoc> {
    let mut buffer = String::new();
    reader
        .read_to_string(&mut buffer)
        .map_err(|e| JsonReadError::InvalidJson(serde_json::Error::io(e)))?;
    let json: Value = serde_json::from_str(&buffer).map_err(JsonReadError::InvalidJson)?;
    read_pandoc(&json)
}

fn read_pandoc(value: &Value) -> Result<Pandoc> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("Expected object for Pandoc"))?;

    let api_version = obj
        .get("pandoc-api-version")
        .ok_or_else(|| JsonReadError::MissingField("pandoc-api-version".to_string()))?
        .as_array()
        .ok_or_else(|| invalid("pandoc-api-version must be array"))?
        .iter()
        .map(|v| {
            v.as_u64()
                .map(|n| n as u32)
                .ok_or_else(|| invalid("pandoc-api-version entries must be integers"))
        })
        .collect::<Result<Vec<_>>>()?;

    let meta = read_meta(
        obj.get("meta")
            .ok_or_else(|| JsonReadError::MissingField("meta".to_string()))?,
    )?;
    let blocks = read_blocks(
        obj.get("blocks")
            .ok_or_else(|| JsonReadError::MissingField("blocks".to_string()))?,
    )?;

    Ok(Pandoc {
        api_version,
        meta,
        blocks,
    })
}

fn read_meta(value: &Value) -> Result<Meta> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("Expected object for Meta"))?;
    let mut meta = Meta::new();
    for (key, entry) in obj {
        meta.insert(key.clone(), read_meta_value(entry)?);
    }
    Ok(meta)
}

fn read_meta_value(value: &Value) -> Result<MetaValue> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("Expected object for MetaValue"))?;
    let t = node_tag(obj)?;

    match t {
        "MetaString" => Ok(MetaValue::MetaString(read_string(
            node_content(obj)?,
            "MetaString content",
        )?)),
        "MetaBool" => node_content(obj)?
            .as_bool()
            .map(MetaValue::MetaBool)
            .ok_or_else(|| invalid("MetaBool content must be boolean")),
        "MetaInlines" => Ok(MetaValue::MetaInlines(read_inlines(node_content(obj)?)?)),
        "MetaBlocks" => Ok(MetaValue::MetaBlocks(read_blocks(node_content(obj)?)?)),
        "MetaList" => {
            let items = node_content(obj)?
                .as_array()
                .ok_or_else(|| invalid("MetaList content must be array"))?
                .iter()
                .map(read_meta_value)
                .collect::<Result<Vec<_>>>()?;
            Ok(MetaValue::MetaList(items))
        }
        "MetaMap" => Ok(MetaValue::MetaMap(read_meta(node_content(obj)?)?)),
        _ => Err(JsonReadError::UnsupportedVariant(format!(
            "MetaValue: {}",
            t
        ))),
    }
}

fn read_blockss(value: &Value) -> Result<Vec<Vec<Block>>> {
    value
        .as_array()
        .ok_or_else(|| invalid("Expected array of block lists"))?
        .iter()
        .map(read_blocks)
        .collect()
}

fn read_list_attributes(value: &Value) -> Result<ListAttributes> {
    let arr = fixed_array(value, 3, "ListAttributes")?;
    let start = arr[0]
        .as_i64()
        .ok_or_else(|| invalid("List start must be integer"))?;

    let style_obj = arr[1]
        .as_object()
        .ok_or_else(|| invalid("ListNumberStyle must be object"))?;
    let style = match node_tag(style_obj)? {
        "DefaultStyle" => ListNumberStyle::Default,
        "Example" => ListNumberStyle::Example,
        "Decimal" => ListNumberStyle::Decimal,
        "LowerRoman" => ListNumberStyle::LowerRoman,
        "UpperRoman" => ListNumberStyle::UpperRoman,
        "LowerAlpha" => ListNumberStyle::LowerAlpha,
        "UpperAlpha" => ListNumberStyle::UpperAlpha,
        other => {
            return Err(JsonReadError::UnsupportedVariant(format!(
                "ListNumberStyle: {}",
                other
            )));
        }
    };

    let delim_obj = arr[2]
        .as_object()
        .ok_or_else(|| invalid("ListNumberDelim must be object"))?;
    let delim = match node_tag(delim_obj)? {
        "DefaultDelim" => ListNumberDelim::Default,
        "Period" => ListNumberDelim::Period,
        "OneParen" => ListNumberDelim::OneParen,
        "TwoParens" => ListNumberDelim::TwoParens,
        other => {
            return Err(JsonReadError::UnsupportedVariant(format!(
                "ListNumberDelim: {}",
                other
            )));
        }
    };

    Ok((start, style, delim))
}

fn read_caption(value: &Value) -> Result<Caption> {
    let arr = fixed_array(value, 2, "Caption")?;
    let short = if arr[0].is_null() {
        None
    } else {
        Some(read_inlines(&arr[0])?)
    };
    Ok(Caption {
        short,
        long: read_blocks(&arr[1])?,
    })
}

fn read_blocks(value: &Value) -> Result<Vec<Block>> {
    value
        .as_array()
        .ok_or_else(|| invalid("Expected array for Blocks"))?
        .iter()
        .map(read_block)
        .collect()
}

fn read_alignment(value: &Value) -> Result<Alignment> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("Alignment must be object"))?;
    match node_tag(obj)? {
        "AlignLeft" => Ok(Alignment::Left),
        "AlignCenter" => Ok(Alignment::Center),
        "AlignRight" => Ok(Alignment::Right),
        "AlignDefault" => Ok(Alignment::Default),
        t => Err(JsonReadError::UnsupportedVariant(format!(
            "Alignment: {}",
            t
        ))),
    }
}

fn read_colwidth(value: &Value) -> Result<ColWidth> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("ColWidth must be object"))?;
    match node_tag(obj)? {
        "ColWidthDefault" => Ok(ColWidth::Default),
        "ColWidth" => node_content(obj)?
            .as_f64()
            .map(ColWidth::Percentage)
            .ok_or_else(|| invalid("ColWidth content must be number")),
        t => Err(JsonReadError::UnsupportedVariant(format!("ColWidth: {}", t))),
    }
}

fn read_colspec(value: &Value) -> Result<ColSpec> {
    let arr = fixed_array(value, 2, "ColSpec")?;
    Ok((read_alignment(&arr[0])?, read_colwidth(&arr[1])?))
}

fn read_cell(value: &Value) -> Result<Cell> {
    let arr = fixed_array(value, 5, "Cell")?;
    Ok(Cell {
        attr: read_attr(&arr[0])?,
        alignment: read_alignment(&arr[1])?,
        row_span: read_usize(&arr[2], "Cell row span")?,
        col_span: read_usize(&arr[3], "Cell col span")?,
        content: read_blocks(&arr[4])?,
    })
}

fn read_row(value: &Value) -> Result<Row> {
    let arr = fixed_array(value, 2, "Row")?;
    let cells = arr[1]
        .as_array()
        .ok_or_else(|| invalid("Row cells must be array"))?
        .iter()
        .map(read_cell)
        .collect::<Result<Vec<_>>>()?;
    Ok(Row {
        attr: read_attr(&arr[0])?,
        cells,
    })
}

fn read_rows(value: &Value) -> Result<Vec<Row>> {
    value
        .as_array()
        .ok_or_else(|| invalid("Rows must be array"))?
        .iter()
        .map(read_row)
        .collect()
}

fn read_table_head(value: &Value) -> Result<TableHead> {
    let arr = fixed_array(value, 2, "TableHead")?;
    Ok(TableHead {
        attr: read_attr(&arr[0])?,
        rows: read_rows(&arr[1])?,
    })
}

fn read_table_body(value: &Value) -> Result<TableBody> {
    let arr = fixed_array(value, 4, "TableBody")?;
    Ok(TableBody {
        attr: read_attr(&arr[0])?,
        rowhead_columns: read_usize(&arr[1], "TableBody row head columns")?,
        head: read_rows(&arr[2])?,
        body: read_rows(&arr[3])?,
    })
}

fn read_table_foot(value: &Value) -> Result<TableFoot> {
    let arr = fixed_array(value, 2, "TableFoot")?;
    Ok(TableFoot {
        attr: read_attr(&arr[0])?,
        rows: read_rows(&arr[1])?,
    })
}

fn read_block(value: &Value) -> Result<Block> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("Expected object for Block"))?;
    let t = node_tag(obj)?;

    match t {
        "Plain" => Ok(Block::Plain(Plain {
            content: read_inlines(node_content(obj)?)?,
        })),
        "Para" => Ok(Block::Paragraph(Paragraph {
            content: read_inlines(node_content(obj)?)?,
        })),
        "LineBlock" => {
            let content = node_content(obj)?
                .as_array()
                .ok_or_else(|| invalid("LineBlock content must be array"))?
                .iter()
                .map(read_inlines)
                .collect::<Result<Vec<_>>>()?;
            Ok(Block::LineBlock(LineBlock { content }))
        }
        "CodeBlock" => {
            let arr = fixed_array(node_content(obj)?, 2, "CodeBlock")?;
            Ok(Block::CodeBlock(CodeBlock {
                attr: read_attr(&arr[0])?,
                text: read_string(&arr[1], "CodeBlock text")?,
            }))
        }
        "RawBlock" => {
            let arr = fixed_array(node_content(obj)?, 2, "RawBlock")?;
            Ok(Block::RawBlock(RawBlock {
                format: read_string(&arr[0], "RawBlock format")?,
                text: read_string(&arr[1], "RawBlock text")?,
            }))
        }
        "BlockQuote" => Ok(Block::BlockQuote(BlockQuote {
            content: read_blocks(node_content(obj)?)?,
        })),
        "OrderedList" => {
            let arr = fixed_array(node_content(obj)?, 2, "OrderedList")?;
            Ok(Block::OrderedList(OrderedList {
                attr: read_list_attributes(&arr[0])?,
                content: read_blockss(&arr[1])?,
            }))
        }
        "BulletList" => Ok(Block::BulletList(BulletList {
            content: read_blockss(node_content(obj)?)?,
        })),
        "DefinitionList" => {
            let content = node_content(obj)?
                .as_array()
                .ok_or_else(|| invalid("DefinitionList content must be array"))?
                .iter()
                .map(|item| {
                    let pair = fixed_array(item, 2, "DefinitionList item")?;
                    Ok((read_inlines(&pair[0])?, read_blockss(&pair[1])?))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Block::DefinitionList(DefinitionList { content }))
        }
        "Header" => {
            let arr = fixed_array(node_content(obj)?, 3, "Header")?;
            Ok(Block::Header(Header {
                level: read_usize(&arr[0], "Header level")?,
                attr: read_attr(&arr[1])?,
                content: read_inlines(&arr[2])?,
            }))
        }
        "HorizontalRule" => Ok(Block::HorizontalRule(HorizontalRule)),
        "Table" => {
            let arr = fixed_array(node_content(obj)?, 6, "Table")?;
            let colspec = arr[2]
                .as_array()
                .ok_or_else(|| invalid("Table colspecs must be array"))?
                .iter()
                .map(read_colspec)
                .collect::<Result<Vec<_>>>()?;
            let bodies = arr[4]
                .as_array()
                .ok_or_else(|| invalid("Table bodies must be array"))?
                .iter()
                .map(read_table_body)
                .collect::<Result<Vec<_>>>()?;
            Ok(Block::Table(Table {
                attr: read_attr(&arr[0])?,
                caption: read_caption(&arr[1])?,
                colspec,
                head: read_table_head(&arr[3])?,
                bodies,
                foot: read_table_foot(&arr[5])?,
            }))
        }
        "Figure" => {
            let arr = fixed_array(node_content(obj)?, 3, "Figure")?;
            Ok(Block::Figure(Figure {
                attr: read_attr(&arr[0])?,
                caption: read_caption(&arr[1])?,
                content: read_blocks(&arr[2])?,
            }))
        }
        "Div" => {
            let arr = fixed_array(node_content(obj)?, 2, "Div")?;
            Ok(Block::Div(Div {
                attr: read_attr(&arr[0])?,
                content: read_blocks(&arr[1])?,
            }))
        }
        _ => Err(JsonReadError::UnsupportedVariant(format!("Block: {}", t))),
    }
}
