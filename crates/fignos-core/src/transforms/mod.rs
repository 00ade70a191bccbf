/*
 * transforms/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The transforms that make up the filter.
 */

//! The transforms that make up the filter.
//!
//! In pipeline order:
//!
//! - [`AttachAttributesTransform`] - Attaches attribute text to the image before it
//! - [`SectionNumbersTransform`] - Records each figure's section number
//! - [`FigureNumberingTransform`] - Numbers figures and rewrites captions (first pass)
//! - [`RemoveSectionNumbersTransform`] - Removes the recorded section numbers
//! - [`RepairReferencesTransform`] - Turns references left as text into citations
//! - [`ReferenceResolutionTransform`] - Renders references (second pass)
//! - [`SupportMetadataTransform`] - Records the TeX declarations the document needs
//!
//! These transforms implement [`AstTransform`](crate::transform::AstTransform) and
//! are assembled by [`standard_pipeline`](crate::filter::standard_pipeline).

mod attach_attributes;
mod figures;
mod references;
mod repair_refs;
mod section_numbers;
mod support;

pub use attach_attributes::AttachAttributesTransform;
pub use figures::FigureNumberingTransform;
pub use references::ReferenceResolutionTransform;
pub use repair_refs::RepairReferencesTransform;
pub use section_numbers::{
    RemoveSectionNumbersTransform, SECTION_NUMBER_KEY, SectionNumbersTransform,
};
pub use support::{
    SUPPORT_METADATA_KEY, SupportDeclaration, SupportMetadataTransform, support_declarations,
};
