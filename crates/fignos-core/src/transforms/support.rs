/*
 * support.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Select the TeX header declarations a filtered document needs.
 */

//! Select the TeX header declarations a filtered document needs.
//!
//! Only the selection is made here. The names are recorded in the document
//! metadata under [`SUPPORT_METADATA_KEY`] for the template or a later
//! filter to act on.

use std::fmt;
use std::str::FromStr;

use fignos_pandoc_types::{MetaValue, Pandoc};

use crate::Result;
use crate::config::FignosConfig;
use crate::context::{AdvisoryFlags, ProcessingContext};
use crate::format::OutputFormat;
use crate::transform::AstTransform;

pub const SUPPORT_METADATA_KEY: &str = "fignos-support";

/// A header declaration. Ordered the way they should appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupportDeclaration {
    /// `\usepackage{cleveref}`
    CleverefPackage,
    /// The `capitalise` option of cleveref
    CleverefCapitalise,
    /// `\usepackage{caption}`
    CaptionPackage,
    /// `\crefname{figure}{..}{..}`
    CrefName,
    /// `\Crefname{figure}{..}{..}`
    CrefNameCapitalized,
    /// The `fignos:no-prefix-figure-caption` environment
    NoPrefixCaptionEnv,
    /// The `fignos:tagged-figure` environment
    TaggedFigureEnv,
    /// The `fignos:figure-env` environment
    FigureEnv,
    /// `\renewcommand{\figurename}{..}`
    CaptionName,
}

impl SupportDeclaration {
    pub const ALL: [SupportDeclaration; 9] = [
        SupportDeclaration::CleverefPackage,
        SupportDeclaration::CleverefCapitalise,
        SupportDeclaration::CaptionPackage,
        SupportDeclaration::CrefName,
        SupportDeclaration::CrefNameCapitalized,
        SupportDeclaration::NoPrefixCaptionEnv,
        SupportDeclaration::TaggedFigureEnv,
        SupportDeclaration::FigureEnv,
        SupportDeclaration::CaptionName,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SupportDeclaration::CleverefPackage => "cleveref",
            SupportDeclaration::CleverefCapitalise => "cleveref-capitalise",
            SupportDeclaration::CaptionPackage => "caption",
            SupportDeclaration::CrefName => "crefname",
            SupportDeclaration::CrefNameCapitalized => "Crefname",
            SupportDeclaration::NoPrefixCaptionEnv => "no-prefix-figure-caption",
            SupportDeclaration::TaggedFigureEnv => "tagged-figure",
            SupportDeclaration::FigureEnv => "figure-env",
            SupportDeclaration::CaptionName => "caption-name",
        }
    }
}

impl fmt::Display for SupportDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SupportDeclaration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SupportDeclaration::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| format!("unknown support declaration `{}`", s))
    }
}

/// Declarations a TeX document needs given what the run found. Other
/// formats need none.
pub fn support_declarations(
    flags: &AdvisoryFlags,
    config: &FignosConfig,
    format: &OutputFormat,
) -> Vec<SupportDeclaration> {
    if !format.is_tex() {
        return vec![];
    }

    let mut out = Vec::new();
    if flags.cleveref_required {
        out.push(SupportDeclaration::CleverefPackage);
        if config.capitalize_plus_name {
            out.push(SupportDeclaration::CleverefCapitalise);
        }
    }
    if flags.has_unnumbered_figures {
        out.push(SupportDeclaration::CaptionPackage);
    }
    if flags.plus_name_changed {
        out.push(SupportDeclaration::CrefName);
    }
    if flags.star_name_changed {
        out.push(SupportDeclaration::CrefNameCapitalized);
    }
    if flags.has_unnumbered_figures {
        out.push(SupportDeclaration::NoPrefixCaptionEnv);
    }
    if flags.has_tagged_figures {
        out.push(SupportDeclaration::TaggedFigureEnv);
    }
    if flags.replaced_figure_env {
        out.push(SupportDeclaration::FigureEnv);
    }
    if flags.caption_name_changed {
        out.push(SupportDeclaration::CaptionName);
    }
    out
}

/// Record the selected declarations in the document metadata, keeping any
/// recorded by an earlier run.
pub struct SupportMetadataTransform;

impl SupportMetadataTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SupportMetadataTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl AstTransform for SupportMetadataTransform {
    fn name(&self) -> &str {
        "support-metadata"
    }

    fn transform(&self, ast: &mut Pandoc, ctx: &mut ProcessingContext) -> Result<()> {
        let mut selected = support_declarations(&ctx.flags, &ctx.config, &ctx.format);
        if let Some(existing) = ast.meta.get(SUPPORT_METADATA_KEY).and_then(MetaValue::as_list) {
            selected.extend(
                existing
                    .iter()
                    .filter_map(MetaValue::as_text)
                    .filter_map(|name| name.parse::<SupportDeclaration>().ok()),
            );
        }
        if selected.is_empty() {
            return Ok(());
        }
        selected.sort();
        selected.dedup();

        tracing::debug!(
            declarations = ?selected.iter().map(|d| d.name()).collect::<Vec<_>>(),
            "Support declarations"
        );
        ast.meta.insert(
            SUPPORT_METADATA_KEY.to_string(),
            MetaValue::MetaList(
                selected
                    .into_iter()
                    .map(|d| MetaValue::MetaString(d.name().to_string()))
                    .collect(),
            ),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(declarations: &[SupportDeclaration]) -> Vec<&'static str> {
        declarations.iter().map(|d| d.name()).collect()
    }

    #[test]
    fn test_no_declarations_outside_tex() {
        let flags = AdvisoryFlags {
            has_tagged_figures: true,
            cleveref_required: true,
            ..AdvisoryFlags::default()
        };
        let selected =
            support_declarations(&flags, &FignosConfig::default(), &OutputFormat::new("html"));
        assert!(selected.is_empty());
    }

    #[test]
    fn test_selection_follows_flags() {
        let flags = AdvisoryFlags {
            has_unnumbered_figures: true,
            cleveref_required: true,
            star_name_changed: true,
            ..AdvisoryFlags::default()
        };
        let config = FignosConfig {
            capitalize_plus_name: true,
            ..FignosConfig::default()
        };
        let selected = support_declarations(&flags, &config, &OutputFormat::new("latex"));
        assert_eq!(
            names(&selected),
            vec![
                "cleveref",
                "cleveref-capitalise",
                "caption",
                "Crefname",
                "no-prefix-figure-caption"
            ]
        );
    }

    #[test]
    fn test_names_round_trip() {
        for declaration in SupportDeclaration::ALL {
            assert_eq!(declaration.name().parse::<SupportDeclaration>(), Ok(declaration));
        }
        assert!("bogus".parse::<SupportDeclaration>().is_err());
    }

    #[test]
    fn test_metadata_merges_with_earlier_run() {
        let mut doc = Pandoc::default();
        doc.meta.insert(
            SUPPORT_METADATA_KEY.to_string(),
            MetaValue::MetaList(vec![MetaValue::MetaString("tagged-figure".to_string())]),
        );
        let mut ctx = ProcessingContext::new(OutputFormat::new("latex"), FignosConfig::default());
        ctx.flags.cleveref_required = true;

        SupportMetadataTransform::new()
            .transform(&mut doc, &mut ctx)
            .unwrap();
        SupportMetadataTransform::new()
            .transform(&mut doc, &mut ctx)
            .unwrap();

        let recorded: Vec<String> = doc
            .meta
            .get(SUPPORT_METADATA_KEY)
            .and_then(MetaValue::as_list)
            .unwrap()
            .iter()
            .filter_map(MetaValue::as_text)
            .collect();
        assert_eq!(recorded, vec!["cleveref", "tagged-figure"]);
    }

    #[test]
    fn test_nothing_recorded_when_nothing_needed() {
        let mut doc = Pandoc::default();
        let mut ctx = ProcessingContext::new(OutputFormat::new("latex"), FignosConfig::default());
        SupportMetadataTransform::new()
            .transform(&mut doc, &mut ctx)
            .unwrap();
        assert!(doc.meta.is_empty());
    }
}
