/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Per-run processing state.
//!
//! A [`ProcessingContext`] is built once per filter invocation and threaded
//! through every transform. Nothing here outlives the run.

use serde::Serialize;

use crate::config::FignosConfig;
use crate::format::OutputFormat;
use crate::registry::Registry;
use crate::utils::diagnostic_collector::DiagnosticCollector;

/// Facts discovered while processing that decide which support declarations
/// a TeX document needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdvisoryFlags {
    pub has_unnumbered_figures: bool,
    pub has_tagged_figures: bool,
    pub replaced_figure_env: bool,
    pub cleveref_required: bool,
    pub caption_name_changed: bool,
    pub plus_name_changed: bool,
    pub star_name_changed: bool,
}

impl AdvisoryFlags {
    /// Flags known before any figure is seen.
    pub fn from_config(config: &FignosConfig) -> Self {
        Self {
            caption_name_changed: config.caption_name_changed,
            plus_name_changed: config.plus_name_changed,
            star_name_changed: config.star_name_changed,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct ProcessingContext {
    pub format: OutputFormat,
    pub config: FignosConfig,
    pub registry: Registry,
    pub flags: AdvisoryFlags,
    pub diagnostics: DiagnosticCollector,
}

impl ProcessingContext {
    pub fn new(format: OutputFormat, config: FignosConfig) -> Self {
        Self {
            registry: Registry::new(config.number_by_section),
            flags: AdvisoryFlags::from_config(&config),
            diagnostics: DiagnosticCollector::new(),
            format,
            config,
        }
    }
}
