/*
 * attributes.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Parser for pandoc attribute blocks.
 */

//! Parser for pandoc attribute blocks.
//!
//! Parses the compact `{#id .class key=value key2="value 2"}` syntax into an
//! [`Attr`]. Used when a figure's attributes reach the filter as plain text
//! instead of being attached to the image by the reader.

use fignos_pandoc_types::Attr;
use hashlink::LinkedHashMap;
use thiserror::Error;

/// Why an attribute block could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeParseError {
    #[error("unbalanced braces")]
    UnbalancedBraces,

    #[error("unterminated quoted value for `{0}`")]
    UnterminatedQuote(String),

    #[error("missing value for `{0}`")]
    MissingValue(String),

    #[error("empty identifier or class")]
    EmptyName,

    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
}

/// Parse an attribute block. The surrounding braces are optional.
///
/// ```
/// use fignos_core::attributes::parse_attributes;
///
/// let attr = parse_attributes(r#"{#fig:plot .wide tag="B.1"}"#).unwrap();
/// assert_eq!(attr.0, "fig:plot");
/// assert_eq!(attr.1, vec!["wide".to_string()]);
/// assert_eq!(attr.2.get("tag").map(String::as_str), Some("B.1"));
/// ```
pub fn parse_attributes(text: &str) -> Result<Attr, AttributeParseError> {
    let body = strip_braces(text.trim())?;

    let mut id = String::new();
    let mut classes: Vec<String> = Vec::new();
    let mut kvs = LinkedHashMap::new();

    let mut chars = body.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        // Read a bare word up to whitespace or `=`.
        let mut word = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace() && *c != '=') {
            if c == '{' || c == '}' {
                return Err(AttributeParseError::UnbalancedBraces);
            }
            word.push(c);
        }

        if chars.next_if_eq(&'=').is_some() {
            let value = read_value(&mut chars, &word)?;
            if word.is_empty() {
                return Err(AttributeParseError::UnexpectedToken(format!("={}", value)));
            }
            kvs.remove(&word);
            kvs.insert(word, value);
        } else if let Some(name) = word.strip_prefix('#') {
            if name.is_empty() {
                return Err(AttributeParseError::EmptyName);
            }
            id = name.to_string();
        } else if let Some(name) = word.strip_prefix('.') {
            if name.is_empty() {
                return Err(AttributeParseError::EmptyName);
            }
            if !classes.iter().any(|c| c == name) {
                classes.push(name.to_string());
            }
        } else if word == "-" {
            // pandoc shorthand for `.unnumbered`
            if !classes.iter().any(|c| c == "unnumbered") {
                classes.push("unnumbered".to_string());
            }
        } else {
            return Err(AttributeParseError::UnexpectedToken(word));
        }
    }

    Ok((id, classes, kvs))
}

fn strip_braces(text: &str) -> Result<&str, AttributeParseError> {
    match (text.starts_with('{'), text.ends_with('}')) {
        (true, true) if text.len() >= 2 => Ok(&text[1..text.len() - 1]),
        (false, false) => Ok(text),
        _ => Err(AttributeParseError::UnbalancedBraces),
    }
}

fn read_value(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    key: &str,
) -> Result<String, AttributeParseError> {
    let mut value = String::new();

    let Some(quote) = chars.next_if(|c| *c == '"' || *c == '\'') else {
        while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
            if c == '{' || c == '}' {
                return Err(AttributeParseError::UnbalancedBraces);
            }
            value.push(c);
        }
        if value.is_empty() {
            return Err(AttributeParseError::MissingValue(key.to_string()));
        }
        return Ok(value);
    };

    loop {
        match chars.next() {
            None => return Err(AttributeParseError::UnterminatedQuote(key.to_string())),
            // Backslash escapes ASCII punctuation only, so `$\alpha$` survives.
            Some('\\') => match chars.next_if(|c| c.is_ascii_punctuation()) {
                Some(escaped) => value.push(escaped),
                None => value.push('\\'),
            },
            Some(c) if c == quote => break,
            Some(c) => value.push(c),
        }
    }

    // A quoted value must be followed by whitespace or the end of the block.
    match chars.peek() {
        Some(c) if !c.is_whitespace() => {
            Err(AttributeParseError::UnexpectedToken(format!("{}{}", quote, c)))
        }
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classes_and_values() {
        let attr = parse_attributes("{#fig:a .one .two width=50% tag='A 1'}").unwrap();
        assert_eq!(attr.0, "fig:a");
        assert_eq!(attr.1, vec!["one", "two"]);
        assert_eq!(attr.2.get("width").map(String::as_str), Some("50%"));
        assert_eq!(attr.2.get("tag").map(String::as_str), Some("A 1"));
    }

    #[test]
    fn test_braces_are_optional() {
        let attr = parse_attributes("#fig:a").unwrap();
        assert_eq!(attr.0, "fig:a");
    }

    #[test]
    fn test_empty_block() {
        let attr = parse_attributes("{ }").unwrap();
        assert!(fignos_pandoc_types::is_empty_attr(&attr));
    }

    #[test]
    fn test_last_identifier_wins() {
        let attr = parse_attributes("{#fig:a #fig:b}").unwrap();
        assert_eq!(attr.0, "fig:b");
    }

    #[test]
    fn test_last_duplicate_key_wins() {
        let attr = parse_attributes("{tag=1 width=2 tag=3}").unwrap();
        assert_eq!(attr.2.get("tag").map(String::as_str), Some("3"));
        assert_eq!(attr.2.len(), 2);
    }

    #[test]
    fn test_duplicate_classes_collapse() {
        let attr = parse_attributes("{.a .b .a}").unwrap();
        assert_eq!(attr.1, vec!["a", "b"]);
    }

    #[test]
    fn test_dash_means_unnumbered() {
        let attr = parse_attributes("{#fig:a -}").unwrap();
        assert_eq!(attr.1, vec!["unnumbered"]);
    }

    #[test]
    fn test_escaped_quote_in_value() {
        let attr = parse_attributes(r#"{tag="say \"hi\""}"#).unwrap();
        assert_eq!(attr.2.get("tag").map(String::as_str), Some(r#"say "hi""#));
    }

    #[test]
    fn test_dollar_tag_kept_verbatim() {
        let attr = parse_attributes(r#"{#fig:m tag="$\alpha$"}"#).unwrap();
        assert_eq!(attr.2.get("tag").map(String::as_str), Some(r"$\alpha$"));
    }

    #[test]
    fn test_unbalanced_braces() {
        assert_eq!(
            parse_attributes("{#fig:a"),
            Err(AttributeParseError::UnbalancedBraces)
        );
        assert_eq!(
            parse_attributes("#fig:a}"),
            Err(AttributeParseError::UnbalancedBraces)
        );
        assert_eq!(
            parse_attributes("{#fig:a {.b}}"),
            Err(AttributeParseError::UnbalancedBraces)
        );
    }

    #[test]
    fn test_truncated_key_value() {
        assert_eq!(
            parse_attributes("{#fig:a tag=}"),
            Err(AttributeParseError::MissingValue("tag".to_string()))
        );
        assert_eq!(
            parse_attributes(r#"{tag="3.5}"#),
            Err(AttributeParseError::UnterminatedQuote("tag".to_string()))
        );
    }

    #[test]
    fn test_bare_word_is_rejected() {
        assert_eq!(
            parse_attributes("{#fig:a wide}"),
            Err(AttributeParseError::UnexpectedToken("wide".to_string()))
        );
        assert_eq!(parse_attributes("{# .a}"), Err(AttributeParseError::EmptyName));
    }
}
