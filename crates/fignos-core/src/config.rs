/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Filter configuration read from document metadata.
 */

//! Filter configuration read from document metadata.
//!
//! Every setting is a metadata variable. The `xnos-*` spellings are shared
//! with the sibling table and equation filters; a `fignos-*` variable takes
//! precedence over its `xnos-*` counterpart.

use std::str::FromStr;

use fignos_pandoc_types::{Meta, MetaValue};

use crate::{FignosError, Result};

/// Punctuation and spacing between a caption's number and its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    None,
    #[default]
    Colon,
    Period,
    Space,
    /// An em quad (U+2000)
    Quad,
    Newline,
}

impl Separator {
    /// Text appended to the number.
    pub fn punctuation(self) -> &'static str {
        match self {
            Separator::Colon => ":",
            Separator::Period => ".",
            Separator::None | Separator::Space | Separator::Quad | Separator::Newline => "",
        }
    }
}

impl FromStr for Separator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Separator::None),
            "colon" => Ok(Separator::Colon),
            "period" => Ok(Separator::Period),
            "space" => Ok(Separator::Space),
            "quad" => Ok(Separator::Quad),
            "newline" => Ok(Separator::Newline),
            other => Err(format!(
                "must be one of none, colon, period, space, quad or newline (found `{}`)",
                other
            )),
        }
    }
}

/// A metadata value reduced to the shapes configuration understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    String(String),
    StringList(Vec<String>),
}

impl AttributeValue {
    /// Convert a metadata value. Booleans, maps and lists of non-text
    /// values have no attribute form.
    pub fn from_meta(value: &MetaValue) -> Option<Self> {
        match value {
            MetaValue::MetaList(items) => items
                .iter()
                .map(MetaValue::as_text)
                .collect::<Option<Vec<_>>>()
                .map(AttributeValue::StringList),
            other => other.as_text().map(AttributeValue::String),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::StringList(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::StringList(items) => Some(items),
            AttributeValue::String(_) => None,
        }
    }
}

/// Settings for one filter run. Validated once, then read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FignosConfig {
    pub caption_name: String,
    pub separator: Separator,
    pub clever_reference_default: bool,
    pub capitalize_plus_name: bool,
    /// `[singular, plural]` used mid-sentence (`+@fig:a`)
    pub plus_name: [String; 2],
    /// `[singular, plural]` used at the start of a sentence (`*@fig:a`)
    pub star_name: [String; 2],
    pub number_by_section: bool,
    pub section_number_offset: i64,
    pub caption_name_changed: bool,
    pub plus_name_changed: bool,
    pub star_name_changed: bool,
}

impl Default for FignosConfig {
    fn default() -> Self {
        Self {
            caption_name: "Figure".to_string(),
            separator: Separator::default(),
            clever_reference_default: false,
            capitalize_plus_name: false,
            plus_name: ["fig.".to_string(), "figs.".to_string()],
            star_name: ["Figure".to_string(), "Figures".to_string()],
            number_by_section: false,
            section_number_offset: 0,
            caption_name_changed: false,
            plus_name_changed: false,
            star_name_changed: false,
        }
    }
}

impl FignosConfig {
    /// Read the configuration from document metadata.
    ///
    /// # Errors
    ///
    /// Returns [`FignosError::InvalidConfiguration`] when a recognised
    /// variable has a value outside its allowed set.
    pub fn from_meta(meta: &Meta) -> Result<Self> {
        let mut config = Self::default();

        if let Some((key, value)) = first_present(meta, &["fignos-caption-name"]) {
            let name = text_value(key, value)?;
            config.caption_name_changed = name != config.caption_name;
            config.caption_name = name;
        }

        if let Some((key, value)) = first_present(
            meta,
            &["fignos-caption-separator", "xnos-caption-separator"],
        ) {
            config.separator = text_value(key, value)?
                .parse()
                .map_err(|message| FignosError::invalid_configuration(key, message))?;
        }

        if let Some((key, value)) = first_present(meta, &["fignos-cleveref", "xnos-cleveref"]) {
            config.clever_reference_default = bool_value(key, value)?;
        }

        if let Some((key, value)) = first_present(
            meta,
            &[
                "fignos-capitalise",
                "fignos-capitalize",
                "xnos-capitalise",
                "xnos-capitalize",
            ],
        ) {
            config.capitalize_plus_name = bool_value(key, value)?;
        }

        if let Some((key, value)) = first_present(meta, &["fignos-plus-name"]) {
            let names = name_pair(key, value, &config.plus_name)?;
            config.plus_name_changed = names != config.plus_name;
            config.plus_name = names;
        }

        if let Some((key, value)) = first_present(meta, &["fignos-star-name"]) {
            let names = name_pair(key, value, &config.star_name)?;
            config.star_name_changed = names != config.star_name;
            config.star_name = names;
        }

        if let Some((key, value)) = first_present(
            meta,
            &[
                "fignos-number-by-section",
                "xnos-number-by-section",
                "xnos-number-sections",
            ],
        ) {
            config.number_by_section = bool_value(key, value)?;
        }

        if let Some((key, value)) = first_present(meta, &["xnos-number-offset"]) {
            let text = text_value(key, value)?;
            config.section_number_offset = text.trim().parse().map_err(|_| {
                FignosError::invalid_configuration(
                    key,
                    format!("must be an integer (found `{}`)", text),
                )
            })?;
        }

        tracing::debug!(?config, "Loaded fignos configuration");
        Ok(config)
    }

    /// Names for mid-sentence references. Title-cased when capitalisation
    /// is on and the names were not customised.
    pub fn effective_plus_name(&self) -> [String; 2] {
        if self.capitalize_plus_name && !self.plus_name_changed {
            [
                title_case(&self.plus_name[0]),
                title_case(&self.plus_name[1]),
            ]
        } else {
            self.plus_name.clone()
        }
    }
}

fn first_present<'a>(
    meta: &'a Meta,
    keys: &[&'static str],
) -> Option<(&'static str, &'a MetaValue)> {
    keys.iter()
        .find_map(|key| meta.get(*key).map(|value| (*key, value)))
}

fn text_value(key: &str, value: &MetaValue) -> Result<String> {
    AttributeValue::from_meta(value)
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| FignosError::invalid_configuration(key, "must be a string"))
}

fn bool_value(key: &str, value: &MetaValue) -> Result<bool> {
    if let Some(b) = value.as_bool() {
        return Ok(b);
    }
    let text = value.as_text().unwrap_or_default();
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => Err(FignosError::invalid_configuration(
            key,
            format!("must be a boolean (found `{}`)", text),
        )),
    }
}

/// A single string replaces the singular form only; a list gives both.
fn name_pair(key: &str, value: &MetaValue, current: &[String; 2]) -> Result<[String; 2]> {
    match AttributeValue::from_meta(value) {
        Some(AttributeValue::String(singular)) => Ok([singular, current[1].clone()]),
        Some(AttributeValue::StringList(names)) => match <[String; 2]>::try_from(names) {
            Ok(pair) => Ok(pair),
            Err(names) => Err(FignosError::invalid_configuration(
                key,
                format!(
                    "must list exactly 2 names, singular and plural (found {})",
                    names.len()
                ),
            )),
        },
        None => Err(FignosError::invalid_configuration(
            key,
            "must be a string or a list of 2 strings",
        )),
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fignos_pandoc_types::{Inline, Space, Str};

    fn inlines(text: &str) -> MetaValue {
        let mut content = Vec::new();
        for (i, word) in text.split(' ').enumerate() {
            if i > 0 {
                content.push(Inline::Space(Space));
            }
            content.push(Inline::Str(Str::new(word)));
        }
        MetaValue::MetaInlines(content)
    }

    fn meta(entries: Vec<(&str, MetaValue)>) -> Meta {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = FignosConfig::from_meta(&Meta::new()).unwrap();
        assert_eq!(config, FignosConfig::default());
        assert_eq!(config.caption_name, "Figure");
        assert_eq!(config.separator, Separator::Colon);
        assert_eq!(config.plus_name, ["fig.", "figs."]);
        assert_eq!(config.star_name, ["Figure", "Figures"]);
    }

    #[test]
    fn test_caption_name_and_change_flag() {
        let config =
            FignosConfig::from_meta(&meta(vec![("fignos-caption-name", inlines("Abb."))]))
                .unwrap();
        assert_eq!(config.caption_name, "Abb.");
        assert!(config.caption_name_changed);

        let config =
            FignosConfig::from_meta(&meta(vec![("fignos-caption-name", inlines("Figure"))]))
                .unwrap();
        assert!(!config.caption_name_changed);
    }

    #[test]
    fn test_separator_values() {
        for (text, expected) in [
            ("none", Separator::None),
            ("period", Separator::Period),
            ("quad", Separator::Quad),
            ("newline", Separator::Newline),
        ] {
            let config = FignosConfig::from_meta(&meta(vec![(
                "xnos-caption-separator",
                MetaValue::MetaString(text.to_string()),
            )]))
            .unwrap();
            assert_eq!(config.separator, expected);
        }
    }

    #[test]
    fn test_fignos_key_beats_xnos_key() {
        let config = FignosConfig::from_meta(&meta(vec![
            ("xnos-cleveref", MetaValue::MetaBool(false)),
            ("fignos-cleveref", MetaValue::MetaBool(true)),
        ]))
        .unwrap();
        assert!(config.clever_reference_default);
    }

    #[test]
    fn test_boolean_strings() {
        for (text, expected) in [("On", true), ("yes", true), ("off", false), ("False", false)] {
            let config = FignosConfig::from_meta(&meta(vec![(
                "xnos-number-by-section",
                MetaValue::MetaString(text.to_string()),
            )]))
            .unwrap();
            assert_eq!(config.number_by_section, expected, "{text}");
        }
    }

    #[test]
    fn test_invalid_boolean() {
        let err = FignosConfig::from_meta(&meta(vec![("fignos-cleveref", inlines("maybe"))]))
            .unwrap_err();
        assert!(matches!(
            err,
            FignosError::InvalidConfiguration { ref key, .. } if key == "fignos-cleveref"
        ));
    }

    #[test]
    fn test_invalid_separator() {
        let err = FignosConfig::from_meta(&meta(vec![(
            "fignos-caption-separator",
            inlines("semicolon"),
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("semicolon"));
    }

    #[test]
    fn test_plus_name_singular_only() {
        let config =
            FignosConfig::from_meta(&meta(vec![("fignos-plus-name", inlines("Fig."))])).unwrap();
        assert_eq!(config.plus_name, ["Fig.", "figs."]);
        assert!(config.plus_name_changed);
    }

    #[test]
    fn test_star_name_list() {
        let config = FignosConfig::from_meta(&meta(vec![(
            "fignos-star-name",
            MetaValue::MetaList(vec![inlines("Abbildung"), inlines("Abbildungen")]),
        )]))
        .unwrap();
        assert_eq!(config.star_name, ["Abbildung", "Abbildungen"]);
        assert!(config.star_name_changed);
    }

    #[test]
    fn test_name_list_needs_two_entries() {
        let err = FignosConfig::from_meta(&meta(vec![(
            "fignos-plus-name",
            MetaValue::MetaList(vec![inlines("a"), inlines("b"), inlines("c")]),
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("found 3"));
    }

    #[test]
    fn test_number_offset() {
        let config = FignosConfig::from_meta(&meta(vec![(
            "xnos-number-offset",
            MetaValue::MetaString("2".to_string()),
        )]))
        .unwrap();
        assert_eq!(config.section_number_offset, 2);

        assert!(
            FignosConfig::from_meta(&meta(vec![("xnos-number-offset", inlines("two"))])).is_err()
        );
    }

    #[test]
    fn test_capitalized_plus_name() {
        let mut config = FignosConfig {
            capitalize_plus_name: true,
            ..FignosConfig::default()
        };
        assert_eq!(config.effective_plus_name(), ["Fig.", "Figs."]);

        config.plus_name = ["abb.".to_string(), "abbn.".to_string()];
        config.plus_name_changed = true;
        assert_eq!(config.effective_plus_name(), ["abb.", "abbn."]);
    }

    #[test]
    fn test_attribute_value_from_meta() {
        assert_eq!(
            AttributeValue::from_meta(&inlines("fig.")),
            Some(AttributeValue::String("fig.".to_string()))
        );
        assert_eq!(AttributeValue::from_meta(&MetaValue::MetaBool(true)), None);
        let list = AttributeValue::from_meta(&MetaValue::MetaList(vec![inlines("a")])).unwrap();
        assert_eq!(list.as_list(), Some(&["a".to_string()][..]));
        assert_eq!(list.as_str(), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("fig."), "Fig.");
        assert_eq!(title_case("see figs."), "See Figs.");
        assert_eq!(title_case("FIG"), "Fig");
    }
}
