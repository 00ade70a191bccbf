//! Error reporting and diagnostic messages for pandoc-fignos.
//!
//! Recoverable conditions found while numbering figures and resolving
//! references (malformed attribute blocks, unresolved references, duplicate
//! identifiers) are never raised as errors. They are recorded as
//! [`DiagnosticMessage`]s, collected for the whole run, and reported once
//! after the document has been processed.
//!
//! Messages follow the tidyverse structure: a short title, an optional
//! problem statement, bulleted details and hints. Every message may carry a
//! stable code (`F-<subsystem>-<number>`) that is looked up in the embedded
//! [`catalog`].
//!
//! ```
//! use fignos_error_reporting::DiagnosticMessageBuilder;
//!
//! let warning = DiagnosticMessageBuilder::warning("Unresolved reference")
//!     .with_code("F-1-2")
//!     .with_subject("fig:missing")
//!     .problem("No figure carries the identifier `fig:missing`")
//!     .add_hint("Is the identifier spelled the same way on the figure?")
//!     .build();
//!
//! assert!(warning.to_text().contains("fig:missing"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

// Re-export main types for convenience
pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_docs_url, get_error_info};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
