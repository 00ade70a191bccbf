/*
 * format.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Output format classification.
 */

//! Output format classification.
//!
//! pandoc passes the target format name to a filter as its first argument.
//! The numbering passes only care about which family a format belongs to.

use std::fmt;

/// Output families that render figures and references differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatFamily {
    /// LaTeX and beamer: numbering is left to LaTeX (`\label`/`\ref`)
    Tex,
    /// HTML and EPUB: numbers are hard-coded, references become links
    Web,
    /// docx and odt
    WordProcessor,
    /// Everything else
    Plain,
}

/// The format a document is being filtered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
    name: String,
    family: FormatFamily,
}

impl OutputFormat {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().to_lowercase();
        let family = match name.as_str() {
            "latex" | "beamer" => FormatFamily::Tex,
            "html" | "html4" | "html5" | "epub" | "epub2" | "epub3" => FormatFamily::Web,
            "docx" | "odt" => FormatFamily::WordProcessor,
            _ => FormatFamily::Plain,
        };
        Self { name, family }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> FormatFamily {
        self.family
    }

    pub fn is_tex(&self) -> bool {
        self.family == FormatFamily::Tex
    }

    pub fn is_web(&self) -> bool {
        self.family == FormatFamily::Web
    }

    pub fn is_docx(&self) -> bool {
        self.name == "docx"
    }

    /// Whether the downstream renderer numbers figures per section by
    /// itself. Every other format gets `<section>.<n>` tags computed here.
    pub fn has_native_section_numbering(&self) -> bool {
        self.is_tex()
    }
}

impl From<&str> for OutputFormat {
    fn from(name: &str) -> Self {
        OutputFormat::new(name)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
