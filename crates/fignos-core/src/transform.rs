/*
 * transform.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * AST transformation pipeline infrastructure.
 */

//! AST transformation pipeline infrastructure.
//!
//! - [`AstTransform`] - The trait implemented by every step of the filter
//! - [`TransformPipeline`] - Ordered collection of transforms to execute
//!
//! Transforms run in a flat, ordered sequence (insertion order). Each one
//! may mutate the document and read or update the shared
//! [`ProcessingContext`]: the registry, the advisory flags and the
//! diagnostics collector.
//!
//! # Example
//!
//! ```
//! use fignos_core::transform::{AstTransform, TransformPipeline};
//! use fignos_core::{FignosConfig, OutputFormat, ProcessingContext, Result};
//! use fignos_pandoc_types::Pandoc;
//!
//! struct CountBlocks;
//!
//! impl AstTransform for CountBlocks {
//!     fn name(&self) -> &str { "count-blocks" }
//!
//!     fn transform(&self, ast: &mut Pandoc, _ctx: &mut ProcessingContext) -> Result<()> {
//!         assert!(ast.blocks.is_empty());
//!         Ok(())
//!     }
//! }
//!
//! let mut pipeline = TransformPipeline::new();
//! pipeline.push(Box::new(CountBlocks));
//!
//! let mut ctx = ProcessingContext::new(OutputFormat::new("html"), FignosConfig::default());
//! pipeline.execute(&mut Pandoc::default(), &mut ctx).unwrap();
//! ```

use fignos_pandoc_types::Pandoc;

use crate::Result;
use crate::context::ProcessingContext;

/// Trait for AST transformations.
///
/// Transforms must be `Send + Sync` so a pipeline can be shared between
/// runs over different documents.
pub trait AstTransform: Send + Sync {
    /// Human-readable name for this transform.
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &str;

    /// Apply the transformation to the AST.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions. Per-node problems are
    /// recorded in `ctx.diagnostics` and processing continues.
    fn transform(&self, ast: &mut Pandoc, ctx: &mut ProcessingContext) -> Result<()>;
}

/// A pipeline of AST transforms to execute in order.
pub struct TransformPipeline {
    transforms: Vec<Box<dyn AstTransform>>,
}

impl TransformPipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Add a transform to the pipeline.
    ///
    /// Transforms run in the order they are added.
    pub fn push(&mut self, transform: Box<dyn AstTransform>) {
        self.transforms.push(transform);
    }

    /// Add multiple transforms to the pipeline.
    pub fn extend(&mut self, transforms: impl IntoIterator<Item = Box<dyn AstTransform>>) {
        self.transforms.extend(transforms);
    }

    /// Get the number of transforms in the pipeline.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Execute all transforms in insertion order.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered. Execution stops on error.
    pub fn execute(&self, ast: &mut Pandoc, ctx: &mut ProcessingContext) -> Result<()> {
        for transform in &self.transforms {
            tracing::debug!(transform = transform.name(), "Running transform");
            transform.transform(ast, ctx)?;
        }

        Ok(())
    }

    /// List the names of all transforms in execution order.
    pub fn transform_names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}
