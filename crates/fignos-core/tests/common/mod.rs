/*
 * common/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Builders for pandoc JSON documents used by the integration tests.
 */

#![allow(dead_code)]

use fignos_core::{FilterOutcome, OutputFormat, filter_json};
use serde_json::{Value, json};

pub fn document(meta: Value, blocks: Vec<Value>) -> Value {
    json!({
        "pandoc-api-version": [1, 23, 1],
        "meta": meta,
        "blocks": blocks,
    })
}

pub fn text(s: &str) -> Value {
    json!({"t": "Str", "c": s})
}

pub fn space() -> Value {
    json!({"t": "Space"})
}

pub fn para(inlines: Vec<Value>) -> Value {
    json!({"t": "Para", "c": inlines})
}

pub fn header(level: u32, title: &str) -> Value {
    json!({"t": "Header", "c": [level, ["", [], []], [text(title)]]})
}

fn key_values(kvs: &[(&str, &str)]) -> Value {
    Value::Array(kvs.iter().map(|(k, v)| json!([k, v])).collect())
}

/// A pandoc 3 `Figure` block around a single image.
pub fn figure(id: &str, kvs: &[(&str, &str)], caption: &str) -> Value {
    json!({
        "t": "Figure",
        "c": [
            [id, [], key_values(kvs)],
            [null, [{"t": "Plain", "c": [text(caption)]}]],
            [{"t": "Plain", "c": [{
                "t": "Image",
                "c": [["", [], []], [], ["plot.png", ""]]
            }]}]
        ]
    })
}

/// A paragraph holding one image titled `fig:`.
pub fn implicit_figure(id: &str, kvs: &[(&str, &str)], caption: &str) -> Value {
    para(vec![json!({
        "t": "Image",
        "c": [[id, [], key_values(kvs)], [text(caption)], ["plot.png", "fig:"]]
    })])
}

pub fn cite(ids: &[&str]) -> Value {
    let citations: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "citationId": id,
                "citationPrefix": [],
                "citationSuffix": [],
                "citationMode": {"t": "AuthorInText"},
                "citationNoteNum": 1,
                "citationHash": 0
            })
        })
        .collect();
    let content: Vec<String> = ids.iter().map(|id| format!("@{}", id)).collect();
    json!({"t": "Cite", "c": [citations, [text(&content.join("; "))]]})
}

pub fn meta_bool(value: bool) -> Value {
    json!({"t": "MetaBool", "c": value})
}

pub fn meta_string(value: &str) -> Value {
    json!({"t": "MetaString", "c": value})
}

/// Run the filter over a JSON document.
pub fn run(doc: &Value, format: &str) -> (Value, FilterOutcome) {
    let input = serde_json::to_vec(doc).unwrap();
    let mut output = Vec::new();
    let outcome = filter_json(&mut input.as_slice(), &mut output, &OutputFormat::new(format))
        .expect("filter failed");
    (serde_json::from_slice(&output).unwrap(), outcome)
}

/// Plain text of an inline list, with non-breaking spaces shown as `~`.
pub fn inline_text(inlines: &Value) -> String {
    let mut out = String::new();
    for inline in inlines.as_array().unwrap() {
        match inline["t"].as_str().unwrap() {
            "Str" => out.push_str(inline["c"].as_str().unwrap()),
            "Space" | "SoftBreak" => out.push(' '),
            "LineBreak" => out.push('\n'),
            "Math" => out.push_str(&format!("${}$", inline["c"][1].as_str().unwrap())),
            "RawInline" => out.push_str(inline["c"][1].as_str().unwrap()),
            "Link" => {
                out.push('[');
                out.push_str(&inline_text(&inline["c"][1]));
                out.push_str(&format!("]({})", inline["c"][2][0].as_str().unwrap()));
            }
            "Image" => out.push_str(&inline_text(&inline["c"][1])),
            "Cite" => out.push_str(&inline_text(&inline["c"][1])),
            other => out.push_str(&format!("<{}>", other)),
        }
    }
    out.replace('\u{a0}', "~")
}

/// Caption text of a `Figure` block or implicit figure paragraph.
pub fn caption_text(block: &Value) -> String {
    match block["t"].as_str().unwrap() {
        "Figure" => inline_text(&block["c"][1][1][0]["c"]),
        "Para" | "Plain" => inline_text(&block["c"][0]["c"][1]),
        other => panic!("not a figure: {}", other),
    }
}
