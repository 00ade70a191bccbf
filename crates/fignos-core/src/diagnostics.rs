/*
 * diagnostics.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Constructors for the recoverable conditions reported by the filter.

use fignos_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};

use crate::attributes::AttributeParseError;

/// F-1-1: an attribute block after an image could not be parsed.
pub fn malformed_attributes(text: &str, err: &AttributeParseError) -> DiagnosticMessage {
    DiagnosticMessageBuilder::warning("Malformed attributes")
        .with_code("F-1-1")
        .with_subject(text)
        .problem(format!("The attribute block `{}` could not be parsed", text))
        .add_detail(err.to_string())
        .add_info("The figure is left unnumbered")
        .build()
}

/// F-1-2: a `fig:` reference names no figure.
pub fn unresolved_reference(identifier: &str) -> DiagnosticMessage {
    DiagnosticMessageBuilder::warning("Unresolved reference")
        .with_code("F-1-2")
        .with_subject(identifier)
        .problem(format!("No figure carries the identifier `{}`", identifier))
        .add_hint("Is the identifier spelled the same way on the figure?")
        .build()
}

/// F-1-3: two figures share an identifier.
pub fn duplicate_identifier(identifier: &str) -> DiagnosticMessage {
    DiagnosticMessageBuilder::warning("Duplicate identifier")
        .with_code("F-1-3")
        .with_subject(identifier)
        .problem(format!(
            "More than one figure carries the identifier `{}`",
            identifier
        ))
        .add_info("References use the number of the last such figure")
        .build()
}
