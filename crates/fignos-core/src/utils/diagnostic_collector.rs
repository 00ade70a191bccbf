//! DiagnosticCollector - collects DiagnosticMessage objects for reporting after a run
use fignos_error_reporting::DiagnosticMessage;

/// Collector for diagnostic messages
#[derive(Debug)]
pub struct DiagnosticCollector {
    diagnostics: Vec<DiagnosticMessage>,
}

impl DiagnosticCollector {
    /// Create a new diagnostic collector
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic message
    pub fn add(&mut self, diagnostic: DiagnosticMessage) {
        tracing::debug!(
            code = diagnostic.code.as_deref().unwrap_or(""),
            subject = diagnostic.subject.as_deref().unwrap_or(""),
            "{}",
            diagnostic.title
        );
        self.diagnostics.push(diagnostic);
    }

    /// Get a reference to the collected diagnostics
    pub fn diagnostics(&self) -> &[DiagnosticMessage] {
        &self.diagnostics
    }

    /// Number of diagnostics with the given code
    pub fn count_code(&self, code: &str) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.code.as_deref() == Some(code))
            .count()
    }

    /// Consume the collector and return the diagnostics in the order they were found
    pub fn into_diagnostics(self) -> Vec<DiagnosticMessage> {
        self.diagnostics
    }
}

impl Default for DiagnosticCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fignos_error_reporting::DiagnosticMessageBuilder;

    fn warning(code: &str, subject: &str) -> DiagnosticMessage {
        DiagnosticMessageBuilder::warning("Test warning")
            .with_code(code)
            .with_subject(subject)
            .build()
    }

    #[test]
    fn test_new_collector() {
        let collector = DiagnosticCollector::new();
        assert!(collector.diagnostics().is_empty());
    }

    #[test]
    fn test_add_diagnostic() {
        let mut collector = DiagnosticCollector::new();
        collector.add(warning("F-1-2", "fig:x"));

        assert_eq!(collector.diagnostics().len(), 1);
        assert_eq!(collector.diagnostics()[0].subject.as_deref(), Some("fig:x"));
    }

    #[test]
    fn test_count_code() {
        let mut collector = DiagnosticCollector::new();
        collector.add(warning("F-1-2", "fig:a"));
        collector.add(warning("F-1-3", "fig:b"));
        collector.add(warning("F-1-2", "fig:c"));

        assert_eq!(collector.count_code("F-1-2"), 2);
        assert_eq!(collector.count_code("F-1-1"), 0);
    }

    #[test]
    fn test_into_diagnostics_keeps_order() {
        let mut collector = DiagnosticCollector::new();
        collector.add(warning("F-1-2", "first"));
        collector.add(warning("F-1-2", "second"));
        let diagnostics = collector.into_diagnostics();
        assert_eq!(diagnostics[0].subject.as_deref(), Some("first"));
        assert_eq!(diagnostics[1].subject.as_deref(), Some("second"));
    }
}
