//! Diagnostics for the type bridge.
//!
//! Every failure the bridge can produce is reported as a [`Diagnostic`]:
//! - an [`ErrorCode`] for searchability,
//! - a message saying what went wrong,
//! - a subject naming the declaration the failure is attributed to,
//! - notes with context.
//!
//! Failures never abort a whole run. The loader, eraser and synthesizer return
//! typed errors; the session converts them into diagnostics and pushes them
//! into the [`DiagnosticQueue`] of the unit being processed, then carries on
//! with the next sibling declaration.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
