/*
 * filter.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Entry points that run the whole filter over a document.
 */

//! Entry points that run the whole filter over a document.

use std::io::{Read, Write};

use fignos_error_reporting::DiagnosticMessage;
use fignos_pandoc_types::Pandoc;

use crate::Result;
use crate::config::FignosConfig;
use crate::context::{AdvisoryFlags, ProcessingContext};
use crate::format::OutputFormat;
use crate::registry::TargetEntry;
use crate::transform::TransformPipeline;
use crate::transforms::{
    AttachAttributesTransform, FigureNumberingTransform, ReferenceResolutionTransform,
    RemoveSectionNumbersTransform, RepairReferencesTransform, SectionNumbersTransform,
    SupportMetadataTransform,
};
use crate::{readers, writers};

/// What a run found, for the caller to report or act on.
#[derive(Debug)]
pub struct FilterOutcome {
    pub flags: AdvisoryFlags,
    /// Registered figures in document order
    pub targets: Vec<TargetEntry>,
    /// Recoverable problems in the order they were found
    pub diagnostics: Vec<DiagnosticMessage>,
}

/// The transforms of a complete run, in order. Every figure is registered
/// before any reference is resolved.
pub fn standard_pipeline() -> TransformPipeline {
    let mut pipeline = TransformPipeline::new();
    pipeline.push(Box::new(AttachAttributesTransform::new()));
    pipeline.push(Box::new(SectionNumbersTransform::new()));
    pipeline.push(Box::new(FigureNumberingTransform::new()));
    pipeline.push(Box::new(RemoveSectionNumbersTransform::new()));
    pipeline.push(Box::new(RepairReferencesTransform::new()));
    pipeline.push(Box::new(ReferenceResolutionTransform::new()));
    pipeline.push(Box::new(SupportMetadataTransform::new()));
    pipeline
}

/// Number the figures of `pandoc` and resolve its references in place.
///
/// When `config` is `None` it is read from the document metadata.
///
/// # Errors
///
/// Fails only on invalid configuration. Problems with individual figures or
/// references are returned as diagnostics in the outcome.
pub fn run_filter(
    pandoc: &mut Pandoc,
    format: &OutputFormat,
    config: Option<FignosConfig>,
) -> Result<FilterOutcome> {
    let config = match config {
        Some(config) => config,
        None => FignosConfig::from_meta(&pandoc.meta)?,
    };

    let mut ctx = ProcessingContext::new(format.clone(), config);
    standard_pipeline().execute(pandoc, &mut ctx)?;

    tracing::debug!(
        format = %format,
        figures = ctx.registry.len(),
        diagnostics = ctx.diagnostics.diagnostics().len(),
        unresolved = ctx.diagnostics.count_code("F-1-2"),
        "Filter finished"
    );

    Ok(FilterOutcome {
        flags: ctx.flags,
        targets: ctx.registry.snapshot(),
        diagnostics: ctx.diagnostics.into_diagnostics(),
    })
}

/// Read pandoc JSON, run the filter and write pandoc JSON.
pub fn filter_json<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    format: &OutputFormat,
) -> Result<FilterOutcome> {
    let mut pandoc = readers::json::read(reader)?;
    let outcome = run_filter(&mut pandoc, format, None)?;
    writers::json::write(&pandoc, writer)?;
    writer.flush()?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FignosError;
    use fignos_pandoc_types::MetaValue;

    #[test]
    fn test_standard_pipeline_order() {
        assert_eq!(
            standard_pipeline().transform_names(),
            vec![
                "attach-attributes",
                "section-numbers",
                "figure-numbering",
                "remove-section-numbers",
                "repair-references",
                "resolve-references",
                "support-metadata",
            ]
        );
    }

    #[test]
    fn test_invalid_configuration_is_fatal() {
        let mut pandoc = Pandoc::default();
        pandoc.meta.insert(
            "fignos-caption-separator".to_string(),
            MetaValue::MetaString("semicolon".to_string()),
        );
        let result = run_filter(&mut pandoc, &OutputFormat::new("html"), None);
        assert!(matches!(
            result,
            Err(FignosError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_empty_document() {
        let mut input = br#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[]}"#.as_slice();
        let mut output = Vec::new();
        let outcome = filter_json(&mut input, &mut output, &OutputFormat::new("latex")).unwrap();
        assert!(outcome.targets.is_empty());
        assert!(outcome.diagnostics.is_empty());
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["blocks"], serde_json::json!([]));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let mut input = br#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"Bogus"}]}"#
            .as_slice();
        let result = filter_json(&mut input, &mut Vec::new(), &OutputFormat::new("html"));
        assert!(matches!(result, Err(FignosError::Json(_))));
    }
}
