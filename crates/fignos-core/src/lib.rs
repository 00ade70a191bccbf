//! Figure numbering and cross-reference resolution for pandoc documents
//!
//! This crate is the core of the `pandoc-fignos` filter. It reads a pandoc
//! JSON document, numbers every figure carrying a `fig:` identifier and
//! rewrites references such as `@fig:plot` into text or markup suited to the
//! output format.
//!
//! # Architecture
//!
//! The filter is a [`TransformPipeline`] run over a [`ProcessingContext`]:
//!
//! - [`Registry`] - Figure identifiers and their numbers, in document order
//! - [`FignosConfig`] - Settings read from the document metadata
//! - [`OutputFormat`] - Decides how captions and references are rendered
//! - [`transforms`] - The individual steps, from attribute attachment to
//!   support declarations
//!
//! Numbering happens in a first pass that fills the registry; references are
//! resolved in a second pass, so a reference may precede its figure.
//!
//! # Example
//!
//! ```
//! use fignos_core::{OutputFormat, filter_json};
//!
//! let input = r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[]}"#;
//! let mut output = Vec::new();
//! let outcome = filter_json(&mut input.as_bytes(), &mut output, &OutputFormat::new("html"))?;
//! assert!(outcome.diagnostics.is_empty());
//! # Ok::<(), fignos_core::FignosError>(())
//! ```

pub mod attributes;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod figure;
pub mod filter;
pub mod format;
pub mod readers;
pub mod registry;
pub mod render;
pub mod transform;
pub mod transforms;
pub mod utils;
pub mod walk;
pub mod writers;

// Re-export commonly used types
pub use config::{FignosConfig, Separator};
pub use context::{AdvisoryFlags, ProcessingContext};
pub use error::{FignosError, Result};
pub use filter::{FilterOutcome, filter_json, run_filter, standard_pipeline};
pub use format::{FormatFamily, OutputFormat};
pub use registry::{Registry, TargetEntry, TargetValue};
pub use render::{RefModifier, ReferenceNames};
pub use transform::{AstTransform, TransformPipeline};
pub use transforms::{SupportDeclaration, support_declarations};
pub use utils::diagnostic_collector::DiagnosticCollector;
