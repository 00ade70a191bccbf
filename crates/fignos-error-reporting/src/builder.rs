//! Builder API for diagnostic messages.
//!
//! This module provides a builder pattern that encodes tidyverse-style error message
//! guidelines directly in the API, making it easy to construct well-structured error messages.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};

/// Builder for creating diagnostic messages following tidyverse guidelines.
///
/// ```
/// use fignos_error_reporting::DiagnosticMessageBuilder;
///
/// let warning = DiagnosticMessageBuilder::warning("Duplicate identifier")
///     .with_code("F-1-3")
///     .with_subject("fig:plot")
///     .problem("Two figures carry the identifier `fig:plot`")
///     .add_info("The later figure's number is used for references")
///     .build();
///
/// assert_eq!(warning.code, Some("F-1-3".to_string()));
/// assert_eq!(warning.details.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    kind: DiagnosticKind,
    title: String,
    code: Option<String>,
    subject: Option<String>,
    problem: Option<MessageContent>,
    details: Vec<DetailItem>,
    hints: Vec<MessageContent>,
}

impl DiagnosticMessageBuilder {
    /// Create a new builder with the specified kind and title.
    ///
    /// Most code should use `.error()` or `.warning()` instead of calling
    /// this directly.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            code: None,
            subject: None,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Create an error diagnostic builder.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    /// Create a warning diagnostic builder.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the identifier the diagnostic is about.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the problem statement.
    ///
    /// Following tidyverse guidelines, use "must" for requirements or
    /// "can't" for impossibilities.
    pub fn problem(mut self, stmt: impl Into<MessageContent>) -> Self {
        self.problem = Some(stmt.into());
        self
    }

    /// Add an error detail (displayed with error/cross bullet).
    pub fn add_detail(mut self, detail: impl Into<MessageContent>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Error,
            content: detail.into(),
        });
        self
    }

    /// Add an info detail (displayed with info bullet).
    pub fn add_info(mut self, info: impl Into<MessageContent>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Info,
            content: info.into(),
        });
        self
    }

    /// Add a hint for fixing the error.
    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Build the diagnostic message.
    pub fn build(self) -> DiagnosticMessage {
        DiagnosticMessage {
            code: self.code,
            title: self.title,
            kind: self.kind,
            subject: self.subject,
            problem: self.problem,
            details: self.details,
            hints: self.hints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_all_parts() {
        let msg = DiagnosticMessageBuilder::error("Invalid configuration")
            .with_code("F-2-1")
            .with_subject("fignos-caption-separator")
            .problem("Separator must be one of none, colon, period, space, quad, newline")
            .add_detail("Found `semicolon`")
            .add_info("Metadata is read once per document")
            .add_hint("Did you mean `colon`?")
            .build();

        assert_eq!(msg.kind, DiagnosticKind::Error);
        assert_eq!(msg.code.as_deref(), Some("F-2-1"));
        assert_eq!(msg.subject.as_deref(), Some("fignos-caption-separator"));
        assert!(msg.problem.is_some());
        assert_eq!(msg.details.len(), 2);
        assert_eq!(msg.details[0].kind, DetailKind::Error);
        assert_eq!(msg.details[1].kind, DetailKind::Info);
        assert_eq!(msg.hints.len(), 1);
    }

    #[test]
    fn test_warning_builder_kind() {
        let msg = DiagnosticMessageBuilder::warning("Unresolved reference").build();
        assert_eq!(msg.kind, DiagnosticKind::Warning);
        assert!(msg.details.is_empty());
    }
}
