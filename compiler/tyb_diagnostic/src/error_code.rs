//! Error codes for all bridge diagnostics.
//!
//! The first digit names the component that reports the problem.

use std::fmt;

/// Error codes for all bridge diagnostics.
///
/// Format: E#### / W#### where the first digit indicates the component:
/// - E1xxx: declaration loading and metadata decoding
/// - E2xxx: erasure and boxing
/// - E3xxx: synthetic member synthesis
/// - E9xxx: internal errors
/// - W1xxx: loader warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Loader Errors (E1xxx)
    /// Unresolved declaration
    E1001,
    /// Malformed metadata
    E1002,
    /// Cyclic supertype chain
    E1003,
    /// Holder artifact lacks its accessor
    E1004,

    // Erasure Errors (E2xxx)
    /// Unsupported construct (no erasure rule)
    E2001,
    /// Boxing mismatch at a call boundary
    E2002,

    // Synthesis Errors (E3xxx)
    /// Missing named argument
    E3001,
    /// Unknown named argument
    E3002,
    /// Duplicate named argument
    E3003,

    // Internal Errors (E9xxx)
    /// Too many errors
    E9002,

    // Loader Warnings (W1xxx)
    /// Ambiguous member (several constructor-like members)
    W1001,
    /// Setter without a matching attribute
    W1002,
}

impl ErrorCode {
    /// All variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E9002,
        ErrorCode::W1001,
        ErrorCode::W1002,
    ];

    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E9002 => "E9002",
            ErrorCode::W1001 => "W1001",
            ErrorCode::W1002 => "W1002",
        }
    }

    /// Short description used by `--explain`-style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "unresolved declaration",
            ErrorCode::E1002 => "malformed metadata",
            ErrorCode::E1003 => "cyclic supertype chain",
            ErrorCode::E1004 => "holder artifact lacks its accessor",
            ErrorCode::E2001 => "unsupported construct",
            ErrorCode::E2002 => "boxing mismatch",
            ErrorCode::E3001 => "missing named argument",
            ErrorCode::E3002 => "unknown named argument",
            ErrorCode::E3003 => "duplicate named argument",
            ErrorCode::E9002 => "too many errors",
            ErrorCode::W1001 => "ambiguous member",
            ErrorCode::W1002 => "setter without attribute",
        }
    }

    /// Check if this is a loader error or warning.
    pub fn is_loader_code(&self) -> bool {
        matches!(self.as_str().as_bytes().get(1), Some(b'1'))
    }

    /// Check if this is a warning code.
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
