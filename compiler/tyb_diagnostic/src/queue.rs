//! Diagnostic queue for one compilation unit.
//!
//! Features:
//! - Error limit to stop reporting once a unit is clearly broken
//! - Deduplication of identical diagnostics (the same unresolved name is
//!   often reached through several members)

use crate::{Diagnostic, ErrorCode};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors per unit (0 = unlimited).
    pub error_limit: usize,
    /// Drop diagnostics identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 50,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue collecting the diagnostics of one unit in report order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    limit_reported: bool,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a queue with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a queue with a custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            limit_reported: false,
            config,
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if it was queued, `false` if it was filtered.
    pub fn push(&mut self, diag: Diagnostic) -> bool {
        if diag.is_error() && self.limit_reached() {
            if !self.limit_reported {
                self.limit_reported = true;
                tracing::debug!(limit = self.config.error_limit, "error limit reached");
                self.diagnostics
                    .push(too_many_errors(self.config.error_limit));
            }
            return false;
        }

        if self.config.deduplicate && self.diagnostics.contains(&diag) {
            return false;
        }

        if diag.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Add every diagnostic from an iterator.
    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.push(diag);
        }
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Number of errors queued.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of warnings queued.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Check if any errors were queued.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Take the queued diagnostics, resetting the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        self.limit_reported = false;
        std::mem::take(&mut self.diagnostics)
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting unit after {limit} errors"))
        .with_note("raise `DiagnosticConfig::error_limit` to see more")
}
